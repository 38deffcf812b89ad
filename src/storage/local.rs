//! Image store backed by a local directory served under a public URL prefix.

use super::{ImageStore, ImageUpload};
use crate::{
    config::settings::StorageSettings,
    errors::{Error, Result},
};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, error, instrument};

/// [`ImageStore`] writing into a local directory.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    directory: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    /// Store writing into `directory`, serving under `public_base_url`.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Store configured from the `[storage]` section.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(&settings.directory, settings.public_base_url.as_str())
    }

    fn random_file_name(file: &ImageUpload) -> String {
        let stem = uuid::Uuid::new_v4().simple().to_string();
        match file.extension() {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        }
    }

    /// Last path segment of `url`, rejecting anything that could escape the
    /// storage directory.
    fn file_name_from_url(url: &str) -> Result<&str> {
        let name = url.rsplit('/').next().unwrap_or_default();
        if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
            return Err(Error::DeleteFailed {
                message: format!("invalid image URL: {url}"),
            });
        }
        Ok(name)
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn upload(&self, file: ImageUpload) -> Result<String> {
        let name = Self::random_file_name(&file);
        let path = self.directory.join(&name);

        let written = async {
            tokio::fs::create_dir_all(&self.directory).await?;
            tokio::fs::write(&path, &file.bytes).await
        }
        .await;

        if let Err(e) = written {
            error!("Error uploading image to {:?}: {}", path, e);
            return Err(Error::UploadFailed {
                message: e.to_string(),
            });
        }

        debug!("Stored image at {:?}", path);
        Ok(format!("{}/{}", self.public_base_url, name))
    }

    #[instrument(skip(self))]
    async fn delete(&self, url: &str) -> Result<()> {
        let name = Self::file_name_from_url(url)?;
        let path = self.directory.join(name);

        tokio::fs::remove_file(&path).await.map_err(|e| {
            error!("Error deleting image {:?}: {}", path, e);
            Error::DeleteFailed {
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::storage::upload_batch;

    fn store_in(dir: &tempfile::TempDir) -> LocalImageStore {
        LocalImageStore::new(dir.path(), "https://cdn.example.com/property-images/")
    }

    #[tokio::test]
    async fn test_upload_keeps_extension_and_randomizes_name() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        let a = store
            .upload(ImageUpload::new("fachada.jpg", b"a".to_vec()))
            .await?;
        let b = store
            .upload(ImageUpload::new("fachada.jpg", b"b".to_vec()))
            .await?;

        assert_ne!(a, b);
        assert!(a.starts_with("https://cdn.example.com/property-images/"));
        assert!(a.ends_with(".jpg"));

        let name = a.rsplit('/').next().unwrap();
        assert_eq!(std::fs::read(dir.path().join(name))?, b"a");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_removes_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);
        let url = store
            .upload(ImageUpload::new("sala.png", b"png".to_vec()))
            .await?;

        store.delete(&url).await?;
        let name = url.rsplit('/').next().unwrap();
        assert!(!dir.path().join(name).exists());

        let again = store.delete(&url).await;
        assert!(matches!(again, Err(Error::DeleteFailed { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_rejects_url_without_file_name() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);
        for url in ["https://cdn.example.com/", "../..", ""] {
            assert!(matches!(
                store.delete(url).await,
                Err(Error::DeleteFailed { .. })
            ));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_failure_is_upload_failed() -> Result<()> {
        let dir = tempfile::tempdir()?;
        // A regular file where the directory should be.
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"")?;
        let store = LocalImageStore::new(&blocker, "/uploads");

        let result = store.upload(ImageUpload::new("a.jpg", vec![1])).await;
        assert!(matches!(result, Err(Error::UploadFailed { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_batch_all_or_nothing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        let urls = upload_batch(
            &store,
            vec![
                ImageUpload::new("1.jpg", vec![1]),
                ImageUpload::new("2.jpg", vec![2]),
            ],
        )
        .await?;
        assert_eq!(urls.len(), 2);

        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"")?;
        let broken = LocalImageStore::new(&blocker, "/uploads");
        let result = upload_batch(&broken, vec![ImageUpload::new("3.jpg", vec![3])]).await;
        assert!(matches!(result, Err(Error::UploadFailed { .. })));
        Ok(())
    }
}

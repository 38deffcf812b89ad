//! Image store contract and the local-disk implementation.
//!
//! Listings only ever hold the public URLs this module hands out; the files
//! themselves are written and removed through [`ImageStore`].

mod local;

pub use local::LocalImageStore;

use crate::errors::Result;
use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, instrument};

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name, used only for its extension
    pub file_name: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Upload of `bytes` named `file_name`.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Text after the last `.`, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }
}

/// Binary image storage addressed by public URL.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores the file under a randomized name and returns its public URL.
    async fn upload(&self, file: ImageUpload) -> Result<String>;

    /// Removes the file a public URL points to.
    async fn delete(&self, url: &str) -> Result<()>;
}

/// Uploads every file concurrently. All-or-nothing: the first failure fails
/// the batch and no URL list is returned.
#[instrument(skip(store, files), fields(count = files.len()))]
pub async fn upload_batch<S>(store: &S, files: Vec<ImageUpload>) -> Result<Vec<String>>
where
    S: ImageStore + ?Sized,
{
    let urls = try_join_all(files.into_iter().map(|file| store.upload(file))).await?;
    debug!("Uploaded batch of {} images", urls.len());
    Ok(urls)
}

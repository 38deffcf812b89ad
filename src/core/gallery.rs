//! Gallery state: carousel positions for listing cards and the image
//! selection held by the listing form.

use crate::{
    errors::{Error, Result},
    models::PropertyView,
    storage::{ImageStore, ImageUpload, upload_batch},
};
use tracing::{debug, instrument};

/// Current image index per listing, cycling with wrap-around.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Carousel {
    positions: Vec<usize>,
    lengths: Vec<usize>,
}

impl Carousel {
    /// Every listing starts on its first image.
    #[must_use]
    pub fn new(properties: &[PropertyView]) -> Self {
        Self {
            positions: vec![0; properties.len()],
            lengths: properties.iter().map(|p| p.images.len()).collect(),
        }
    }

    /// Current index of `item`, `None` if out of range.
    #[must_use]
    pub fn current(&self, item: usize) -> Option<usize> {
        self.positions.get(item).copied()
    }

    fn cycling(&mut self, item: usize) -> Option<(&mut usize, usize)> {
        let len = *self.lengths.get(item)?;
        if len <= 1 {
            return None;
        }
        self.positions.get_mut(item).map(|pos| (pos, len))
    }

    /// Advances, wrapping from the last image to the first. No-op for
    /// listings with fewer than two images.
    pub fn next(&mut self, item: usize) {
        if let Some((pos, len)) = self.cycling(item) {
            *pos = if *pos + 1 >= len { 0 } else { *pos + 1 };
        }
    }

    /// Steps back, wrapping from the first image to the last.
    pub fn prev(&mut self, item: usize) {
        if let Some((pos, len)) = self.cycling(item) {
            *pos = if *pos == 0 { len - 1 } else { *pos - 1 };
        }
    }

    /// Jumps straight to `index`; out-of-range indexes are ignored.
    pub fn jump(&mut self, item: usize, index: usize) {
        let in_range = self.lengths.get(item).is_some_and(|len| index < *len);
        if let (true, Some(pos)) = (in_range, self.positions.get_mut(item)) {
            *pos = index;
        }
    }
}

/// Image URLs attached to the listing being edited, capped at `max_images`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSelection {
    images: Vec<String>,
    max_images: usize,
}

impl ImageSelection {
    /// Selection starting from the listing's stored images.
    #[must_use]
    pub const fn new(images: Vec<String>, max_images: usize) -> Self {
        Self { images, max_images }
    }

    /// URLs in display order.
    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Consumes the selection into the URLs to save.
    #[must_use]
    pub fn into_images(self) -> Vec<String> {
        self.images
    }

    /// How many more images fit under the cap.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.max_images.saturating_sub(self.images.len())
    }

    /// Uploads `files` concurrently and appends their URLs.
    ///
    /// A batch that would exceed the cap is rejected before anything is
    /// uploaded. If any upload fails nothing is appended.
    #[instrument(skip(self, store, files), fields(count = files.len()))]
    pub async fn add_files<S>(&mut self, store: &S, files: Vec<ImageUpload>) -> Result<usize>
    where
        S: ImageStore + ?Sized,
    {
        if files.len() > self.remaining() {
            return Err(Error::validation(
                "images",
                format!(
                    "Você pode fazer o upload de no máximo {} imagens.",
                    self.max_images
                ),
            ));
        }

        let urls = upload_batch(store, files).await?;
        let added = urls.len();
        self.images.extend(urls);
        debug!("Selection now holds {} images", self.images.len());
        Ok(added)
    }

    /// Deletes the stored file eagerly, then drops it from the selection.
    /// The selection is unchanged if the delete fails.
    pub async fn remove<S>(&mut self, store: &S, index: usize) -> Result<String>
    where
        S: ImageStore + ?Sized,
    {
        let url = self
            .images
            .get(index)
            .ok_or_else(|| Error::validation("images", format!("no image at position {index}")))?;
        store.delete(url).await?;
        Ok(self.images.remove(index))
    }
}

//! Scene images of a directory tree.

pub use crate::{
    config::FileListConfig,
    error::Error,
    transform::{ImageTransform, Transform},
    view::RgbImage,
};
pub use burn::data::dataset::Dataset;

use crate::{
    dataset::file_list::load_or_list_files,
    view::{is_image_file, load_rgb},
};
use std::{fmt, path::PathBuf};

/// Scene images listed per directory.
pub struct Places365Dataset {
    /// The options used to list the images.
    pub config: FileListConfig,
    files: Vec<PathBuf>,
    transform: Option<ImageTransform>,
}

impl Places365Dataset {
    /// Listing the images, or reusing the cached list.
    pub fn init(config: FileListConfig) -> Result<Self, Error> {
        let files = load_or_list_files(&config, "image", is_image_file)?;

        log::info!(
            target: "realenv_dataset::dataset::places365",
            "Total {} images",
            files.len(),
        );

        Ok(Self {
            config,
            files,
            transform: None,
        })
    }

    /// Applying to every loaded image.
    pub fn with_transform(
        mut self,
        transform: ImageTransform,
    ) -> Self {
        self.transform = Some(transform);
        self
    }

    /// The images in the split.
    #[inline]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Loading the image at `index`.
    pub fn load_sample(
        &self,
        index: usize,
    ) -> Result<RgbImage, Error> {
        let path = self.files.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.files.len(),
        })?;

        let image = load_rgb(path)?;
        Ok(match &self.transform {
            Some(transform) => transform.apply(image),
            None => image,
        })
    }
}

impl Dataset<RgbImage> for Places365Dataset {
    fn get(
        &self,
        index: usize,
    ) -> Option<RgbImage> {
        if index >= self.len() {
            return None;
        }

        self.load_sample(index)
            .inspect_err(|error| {
                log::error!(
                    target: "realenv_dataset::dataset::places365",
                    "Places365Dataset::get({index}) > {error}",
                )
            })
            .ok()
    }

    #[inline]
    fn len(&self) -> usize {
        self.files.len()
    }
}

impl fmt::Debug for Places365Dataset {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Places365Dataset")
            .field("config", &self.config)
            .field("files.len()", &self.files.len())
            .field("transform.is_some()", &self.transform.is_some())
            .finish()
    }
}

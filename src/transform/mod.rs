//! Caller-supplied transforms on images and depth maps.

pub use crate::view::{DepthMap, RgbImage};
pub use image::imageops::FilterType;

use std::sync::Arc;

/// Transforming an image or a depth map.
pub trait Transform<T>: Send + Sync {
    /// Transforming the input.
    fn apply(
        &self,
        input: T,
    ) -> T;
}

impl<T, F> Transform<T> for F
where
    F: Fn(T) -> T + Send + Sync,
{
    #[inline]
    fn apply(
        &self,
        input: T,
    ) -> T {
        self(input)
    }
}

/// A shared image transform.
pub type ImageTransform = Arc<dyn Transform<RgbImage>>;
/// A shared depth map transform.
pub type DepthTransform = Arc<dyn Transform<DepthMap>>;

/// Resizing to the exact dimensions.
///
/// Images are filtered with [`FilterType::Triangle`] and
/// depth maps with [`FilterType::Nearest`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resize {
    /// The target width.
    pub width: u32,
    /// The target height.
    pub height: u32,
}

impl Resize {
    /// Resizing to `width` by `height`.
    #[inline]
    pub fn new(
        width: u32,
        height: u32,
    ) -> Self {
        Self { width, height }
    }
}

impl Transform<RgbImage> for Resize {
    fn apply(
        &self,
        input: RgbImage,
    ) -> RgbImage {
        if input.dimensions() == (self.width, self.height) {
            return input;
        }
        image::imageops::resize(
            &input,
            self.width,
            self.height,
            FilterType::Triangle,
        )
    }
}

impl Transform<DepthMap> for Resize {
    fn apply(
        &self,
        input: DepthMap,
    ) -> DepthMap {
        if input.dimensions() == (self.width, self.height) {
            return input;
        }
        image::imageops::resize(
            &input,
            self.width,
            self.height,
            FilterType::Nearest,
        )
    }
}

//! Decoding the panoramas of a viewpoint.

pub use image::{DynamicImage, ImageBuffer, Luma, RgbImage};

use crate::error::Error;
use std::path::Path;

/// A single-channel map of normalized depths in the range `[0, 1)`.
pub type DepthMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// The extensions of the decodable images.
pub const IMAGE_EXTENSIONS: [&str; 10] = [
    "jpg", "JPG", "jpeg", "JPEG", "png", "PNG", "ppm", "PPM", "bmp", "BMP",
];

/// The scale of the stored 16-bit mist values.
pub const MIST_SCALE: f32 = 65536.0;

/// Checking the extension against [`IMAGE_EXTENSIONS`].
#[inline]
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| IMAGE_EXTENSIONS.contains(&extension))
}

/// `value / 65536`
#[inline]
pub fn decode_mist(value: u16) -> f32 {
    value as f32 / MIST_SCALE
}

/// Loading any decodable image as 8-bit RGB.
pub fn load_rgb(path: &Path) -> Result<RgbImage, Error> {
    Ok(image::open(path)?.into_rgb8())
}

/// Loading the mist panorama as a depth map.
///
/// ## Details
///
/// The values are read as integers, so 8-bit grayscale values
/// are not rescaled to 16 bits.
pub fn load_mist(path: &Path) -> Result<DepthMap, Error> {
    Ok(depth_from_image(image::open(path)?))
}

/// Converting a decoded mist image to normalized depths.
pub fn depth_from_image(image: DynamicImage) -> DepthMap {
    match image {
        DynamicImage::ImageLuma8(image) => {
            let (width, height) = image.dimensions();
            let values = image.into_raw().into_iter().map(u16::from);
            depth_from_values(width, height, values)
        },
        image => {
            let image = image.into_luma16();
            let (width, height) = image.dimensions();
            depth_from_values(width, height, image.into_raw())
        },
    }
}

fn depth_from_values(
    width: u32,
    height: u32,
    values: impl IntoIterator<Item = u16>,
) -> DepthMap {
    let values = values.into_iter().map(decode_mist).collect();
    // The buffer has exactly one value per pixel.
    DepthMap::from_raw(width, height, values)
        .unwrap_or_else(|| DepthMap::new(width, height))
}

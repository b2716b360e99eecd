//! The boundary to the point-cloud renderer.

pub use crate::{
    pose::Pose,
    view::{DepthMap, RgbImage},
};

use crate::{error::Error, pose::pose_to_row_major};
use std::{
    ffi::{c_int, c_void},
    fmt,
    path::Path,
};

/// A view synthesized by a [`PointCloudRenderer`].
#[derive(Clone, PartialEq)]
pub struct RenderedView {
    /// `[H, W, 3]`
    pub image: RgbImage,
    /// `[H, W]`
    pub depth: DepthMap,
}

impl fmt::Debug for RenderedView {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("RenderedView")
            .field("image.dimensions()", &self.image.dimensions())
            .field("depth.dimensions()", &self.depth.dimensions())
            .finish()
    }
}

/// Rendering the point cloud of an RGB-D panorama from another pose.
pub trait PointCloudRenderer: Send + Sync {
    /// ## Arguments
    ///
    /// * `image` - The source panorama.
    /// * `depth` - The normalized depths of `image`.
    /// * `pose` - The pose of the rendered view relative to the source.
    fn render(
        &self,
        image: &RgbImage,
        depth: &DepthMap,
        pose: &Pose,
    ) -> Result<RenderedView, Error>;
}

/// The symbol exported by the renderer library.
pub const RENDER_SYMBOL: &[u8] = b"render";

/// `render(height, width, rgb, depth, pose, rendered_rgb, rendered_depth)`
///
/// The buffers are contiguous and row-major:
/// `rgb` in `u8` with shape `[height, width, 3]`,
/// `depth` in `f32` with shape `[height, width]`,
/// `pose` in `f64` with shape `[4, 4]`.
pub type RenderFn = unsafe extern "C" fn(
    c_int,
    c_int,
    *const c_void,
    *const c_void,
    *const c_void,
    *mut c_void,
    *mut c_void,
);

/// A renderer in a native dynamic library.
pub struct NativeRenderer {
    library: libloading::Library,
}

impl NativeRenderer {
    /// Loading the library and checking its [`RENDER_SYMBOL`].
    pub fn load(path: &Path) -> Result<Self, Error> {
        // SAFETY: Loading the library runs its initializers,
        // which is the contract of the renderer library.
        let library = unsafe { libloading::Library::new(path)? };
        // SAFETY: The symbol is only checked for existence here.
        unsafe { library.get::<RenderFn>(RENDER_SYMBOL)? };

        #[cfg(all(debug_assertions, not(test)))]
        log::debug!(
            target: "realenv_dataset::render",
            "NativeRenderer::load > {path:?}",
        );

        Ok(Self { library })
    }
}

impl PointCloudRenderer for NativeRenderer {
    fn render(
        &self,
        image: &RgbImage,
        depth: &DepthMap,
        pose: &Pose,
    ) -> Result<RenderedView, Error> {
        check_dimensions(image, depth)?;

        let (width, height) = image.dimensions();
        let height_c = c_int::try_from(height)
            .map_err(|_| Error::Renderer(format!("height {height} is too large")))?;
        let width_c = c_int::try_from(width)
            .map_err(|_| Error::Renderer(format!("width {width} is too large")))?;
        let pose = pose_to_row_major(pose);

        let mut rendered_image = RgbImage::new(width, height);
        let mut rendered_depth = DepthMap::new(width, height);

        // SAFETY: The symbol has the signature of `RenderFn`, and every buffer
        // has the size implied by `height` and `width`.
        unsafe {
            let render = self.library.get::<RenderFn>(RENDER_SYMBOL)?;
            render(
                height_c,
                width_c,
                image.as_ptr() as *const c_void,
                depth.as_ptr() as *const c_void,
                pose.as_ptr() as *const c_void,
                rendered_image.as_mut_ptr() as *mut c_void,
                rendered_depth.as_mut_ptr() as *mut c_void,
            );
        }

        Ok(RenderedView {
            image: rendered_image,
            depth: rendered_depth,
        })
    }
}

impl fmt::Debug for NativeRenderer {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("NativeRenderer").finish_non_exhaustive()
    }
}

/// Checking that the depth map matches the image dimensions.
pub fn check_dimensions(
    image: &RgbImage,
    depth: &DepthMap,
) -> Result<(), Error> {
    let (width, height) = image.dimensions();
    let expected = width as usize * height as usize;
    let found = depth.as_raw().len();
    if depth.dimensions() != (width, height) {
        return Err(Error::MismatchedBufferSize { expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn check_dimensions() {
        use super::*;

        let image = RgbImage::new(4, 2);
        super::check_dimensions(&image, &DepthMap::new(4, 2)).unwrap();

        let error =
            super::check_dimensions(&image, &DepthMap::new(2, 2)).unwrap_err();
        assert!(
            matches!(
                error,
                Error::MismatchedBufferSize {
                    expected: 8,
                    found: 4
                }
            ),
            "{error:?}"
        );
    }

    #[test]
    fn load_missing_library() {
        use super::*;

        let dir = tempfile::tempdir().unwrap();
        let error = NativeRenderer::load(&dir.path().join("librender.so"))
            .unwrap_err();
        assert!(matches!(error, Error::Library(_)), "{error:?}");
    }
}

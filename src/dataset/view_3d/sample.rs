//! The samples of [`ViewDataset3d`](super::ViewDataset3d).

pub use crate::{
    function::{Backend, Tensor},
    pose::Pose,
    render::RenderedView,
    view::{DepthMap, RgbImage},
};

use crate::function::{
    get_tensor_from_depth, get_tensor_from_image, get_tensor_from_poses,
};
use std::fmt;

/// A target view and its nearby source views.
#[derive(Clone, PartialEq)]
pub struct ViewSample {
    /// `[H, W, 3]` each
    pub sources: Vec<RgbImage>,
    /// The anchor view.
    pub target: RgbImage,
    /// The pose of each source relative to the target, in the consumer frame.
    pub poses_relative: Vec<Pose>,
    /// Loaded if `load_3d` is set.
    pub geometry: Option<ViewGeometry>,
    /// Synthesized from the first source.
    pub rendered: Option<RenderedView>,
}

/// The mist and normal maps of a [`ViewSample`].
#[derive(Clone, PartialEq)]
pub struct ViewGeometry {
    /// The mist maps of the sources.
    pub mist_sources: Vec<DepthMap>,
    /// The mist map of the target.
    pub mist_target: DepthMap,
    /// The normal maps of the sources.
    pub normal_sources: Vec<RgbImage>,
    /// The normal map of the target.
    pub normal_target: RgbImage,
}

/// The tensors of a [`ViewSample`].
#[derive(Clone, Debug)]
pub struct ViewSampleTensors<B: Backend> {
    /// `[H, W, 3]` each
    pub sources: Vec<Tensor<B, 3>>,
    /// `[H, W, 3]`
    pub target: Tensor<B, 3>,
    /// `[N, 4, 4]`
    pub poses_relative: Tensor<B, 3>,
    /// `[H, W, 1]` each
    pub mist_sources: Option<Vec<Tensor<B, 3>>>,
    /// `[H, W, 1]`
    pub mist_target: Option<Tensor<B, 3>>,
    /// `[H, W, 3]` each
    pub normal_sources: Option<Vec<Tensor<B, 3>>>,
    /// `[H, W, 3]`
    pub normal_target: Option<Tensor<B, 3>>,
    /// `[H, W, 3]`
    pub rendered_image: Option<Tensor<B, 3>>,
    /// `[H, W, 1]`
    pub rendered_depth: Option<Tensor<B, 3>>,
}

impl ViewSample {
    /// Converting every view and pose to a tensor.
    pub fn to_tensors<B: Backend>(
        &self,
        device: &B::Device,
    ) -> ViewSampleTensors<B> {
        let images = |images: &[RgbImage]| {
            images
                .iter()
                .map(|image| get_tensor_from_image::<B>(image, device))
                .collect::<Vec<_>>()
        };
        let depths = |depths: &[DepthMap]| {
            depths
                .iter()
                .map(|depth| get_tensor_from_depth::<B>(depth, device))
                .collect::<Vec<_>>()
        };
        let geometry = self.geometry.as_ref();
        let rendered = self.rendered.as_ref();

        ViewSampleTensors {
            sources: images(&self.sources),
            target: get_tensor_from_image(&self.target, device),
            poses_relative: get_tensor_from_poses(&self.poses_relative, device),
            mist_sources: geometry.map(|g| depths(&g.mist_sources)),
            mist_target: geometry
                .map(|g| get_tensor_from_depth(&g.mist_target, device)),
            normal_sources: geometry.map(|g| images(&g.normal_sources)),
            normal_target: geometry
                .map(|g| get_tensor_from_image(&g.normal_target, device)),
            rendered_image: rendered
                .map(|r| get_tensor_from_image(&r.image, device)),
            rendered_depth: rendered
                .map(|r| get_tensor_from_depth(&r.depth, device)),
        }
    }
}

impl fmt::Debug for ViewSample {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ViewSample")
            .field("sources.len()", &self.sources.len())
            .field("target.dimensions()", &self.target.dimensions())
            .field("poses_relative", &self.poses_relative)
            .field("geometry", &self.geometry)
            .field("rendered", &self.rendered)
            .finish()
    }
}

impl fmt::Debug for ViewGeometry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ViewGeometry")
            .field("mist_sources.len()", &self.mist_sources.len())
            .field("mist_target.dimensions()", &self.mist_target.dimensions())
            .field("normal_sources.len()", &self.normal_sources.len())
            .field(
                "normal_target.dimensions()",
                &self.normal_target.dimensions(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn to_tensors() {
        use super::*;
        use burn::backend::NdArray;

        let device = Default::default();
        let sample = ViewSample {
            sources: vec![RgbImage::new(4, 2); 2],
            target: RgbImage::new(4, 2),
            poses_relative: vec![Pose::IDENTITY; 2],
            geometry: Some(ViewGeometry {
                mist_sources: vec![DepthMap::new(4, 2); 2],
                mist_target: DepthMap::new(4, 2),
                normal_sources: vec![RgbImage::new(4, 2); 2],
                normal_target: RgbImage::new(4, 2),
            }),
            rendered: None,
        };

        let tensors = sample.to_tensors::<NdArray>(&device);
        assert_eq!(tensors.sources.len(), 2);
        assert_eq!(tensors.target.dims(), [2, 4, 3]);
        assert_eq!(tensors.poses_relative.dims(), [2, 4, 4]);
        assert_eq!(tensors.mist_sources.unwrap()[1].dims(), [2, 4, 1]);
        assert_eq!(tensors.normal_target.unwrap().dims(), [2, 4, 3]);
        assert!(tensors.rendered_image.is_none());
        assert!(tensors.rendered_depth.is_none());
    }
}

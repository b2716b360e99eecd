//! Conversions to burn tensors.

pub use burn::tensor::{backend::Backend, Tensor, TensorData};
pub use crate::{
    pose::Pose,
    view::{DepthMap, RgbImage},
};

use crate::pose::pose_to_row_major;

/// Converting to a tensor with shape `[H, W, 3]` in the range `[0, 1]`.
pub fn get_tensor_from_image<B: Backend>(
    image: &RgbImage,
    device: &B::Device,
) -> Tensor<B, 3> {
    let (width, height) = image.dimensions();
    let data = TensorData::new(
        image.as_raw().iter().map(|c| *c as f32).collect::<Vec<_>>(),
        [height as usize, width as usize, 3],
    );
    Tensor::from_data(data.convert::<B::FloatElem>(), device).div_scalar(255.0)
}

/// Converting to a tensor with shape `[H, W, 1]`.
pub fn get_tensor_from_depth<B: Backend>(
    depth: &DepthMap,
    device: &B::Device,
) -> Tensor<B, 3> {
    let (width, height) = depth.dimensions();
    let data = TensorData::new(
        depth.as_raw().to_owned(),
        [height as usize, width as usize, 1],
    );
    Tensor::from_data(data.convert::<B::FloatElem>(), device)
}

/// Converting to a tensor with shape `[N, 4, 4]` in row-major order.
///
/// The poses are narrowed to `f32` only here.
pub fn get_tensor_from_poses<B: Backend>(
    poses: &[Pose],
    device: &B::Device,
) -> Tensor<B, 3> {
    let data = TensorData::new(
        poses
            .iter()
            .flat_map(|pose| pose_to_row_major(pose).map(|v| v as f32))
            .collect::<Vec<_>>(),
        [poses.len(), 4, 4],
    );
    Tensor::from_data(data.convert::<B::FloatElem>(), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn image_to_tensor() {
        let device = Default::default();
        let mut input = RgbImage::new(3, 2);
        input.put_pixel(2, 1, image::Rgb([255, 0, 51]));

        let tensor = get_tensor_from_image::<NdArray>(&input, &device);
        assert_eq!(tensor.dims(), [2, 3, 3]);

        let values = tensor.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values[15..], [1.0f32, 0.0, 0.2]);
        assert!(values[..15].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn depth_to_tensor() {
        let device = Default::default();
        let depth = DepthMap::from_raw(2, 1, vec![0.25, 0.5]).unwrap();

        let tensor = get_tensor_from_depth::<NdArray>(&depth, &device);
        assert_eq!(tensor.dims(), [1, 2, 1]);
        assert_eq!(tensor.into_data().to_vec::<f32>().unwrap(), [0.25f32, 0.5]);
    }

    #[test]
    fn poses_to_tensor() {
        let device = Default::default();
        let poses = [
            Pose::IDENTITY,
            Pose::from_translation(glam::DVec3::new(1.0, 2.0, 3.0)),
        ];

        let tensor = get_tensor_from_poses::<NdArray>(&poses, &device);
        assert_eq!(tensor.dims(), [2, 4, 4]);

        let values = tensor.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values[16..20], [1.0f32, 0.0, 0.0, 1.0]);
        assert_eq!(values[20..24], [0.0f32, 1.0, 0.0, 2.0]);
    }
}

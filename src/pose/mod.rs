//! Camera poses and their relative transforms.

pub use glam::{DMat4, DVec4};

use crate::error::Error;
use serde::Deserialize;
use std::{fs, path::Path};

/// A 4x4 camera transform in double precision.
pub type Pose = DMat4;

/// Mapping the stored axes `(x, y, z)` to the axes of the consumers.
///
/// In row-major order:
///
/// ```plaintext
/// [[ 0, 1, 0, 0],
///  [ 0, 0, 1, 0],
///  [-1, 0, 0, 0],
///  [ 0, 0, 0, 1]]
/// ```
pub const AXIS_PERMUTATION: Pose = DMat4::from_cols(
    DVec4::new(0.0, 0.0, -1.0, 0.0),
    DVec4::new(1.0, 0.0, 0.0, 0.0),
    DVec4::new(0.0, 1.0, 0.0, 0.0),
    DVec4::new(0.0, 0.0, 0.0, 1.0),
);

/// The record used in the points file.
///
/// The record at index 0 has a pitch of `pi / 2` from panorama stitching.
pub const POSE_RECORD_INDEX: usize = 1;

#[derive(Clone, Debug, Deserialize)]
struct PoseRecord {
    camera_rt_matrix: Vec<Vec<f64>>,
}

/// Loading the camera pose of a viewpoint from its points file.
pub fn load_camera_pose(path: &Path) -> Result<Pose, Error> {
    let records =
        serde_json::from_str::<Vec<PoseRecord>>(&fs::read_to_string(path)?)?;
    let record = records.get(POSE_RECORD_INDEX).ok_or_else(|| {
        Error::MissingPoseRecord {
            index: POSE_RECORD_INDEX,
            path: path.to_owned(),
        }
    })?;

    pose_from_camera_rt_matrix(&record.camera_rt_matrix)
        .ok_or_else(|| Error::MalformedCameraMatrix(path.to_owned()))
}

/// Accepting 3x4 matrices, extended with `[0, 0, 0, 1]`, and 4x4 matrices.
///
/// The values are stored in single precision, so they are rounded to `f32`
/// before widening.
pub fn pose_from_camera_rt_matrix(matrix: &[Vec<f64>]) -> Option<Pose> {
    if matrix.len() != 3 && matrix.len() != 4 {
        return None;
    }

    let mut rows = [[0.0, 0.0, 0.0, 1.0]; 4];
    for (row, values) in rows.iter_mut().zip(matrix) {
        if values.len() != 4 {
            return None;
        }
        row.iter_mut()
            .zip(values)
            .for_each(|(value, source)| *value = *source as f32 as f64);
    }

    Some(pose_from_rows(&rows))
}

/// Building from rows.
#[inline]
pub fn pose_from_rows(rows: &[[f64; 4]; 4]) -> Pose {
    DMat4::from_cols_array_2d(rows).transpose()
}

/// Splitting into rows.
#[inline]
pub fn pose_to_rows(pose: &Pose) -> [[f64; 4]; 4] {
    pose.transpose().to_cols_array_2d()
}

/// Flattening in row-major order.
#[inline]
pub fn pose_to_row_major(pose: &Pose) -> [f64; 16] {
    pose.transpose().to_cols_array()
}

/// The source pose in the frame of the target pose:
/// `inverse(target) * source`.
#[inline]
pub fn relative_pose(
    target: &Pose,
    source: &Pose,
) -> Pose {
    target.inverse() * *source
}

/// `pose * AXIS_PERMUTATION`
#[inline]
pub fn to_consumer_frame(pose: &Pose) -> Pose {
    *pose * AXIS_PERMUTATION
}

/// `pose * inverse(AXIS_PERMUTATION)`
#[inline]
pub fn from_consumer_frame(pose: &Pose) -> Pose {
    // The inverse of a permutation is its transpose.
    *pose * AXIS_PERMUTATION.transpose()
}

/// The relative pose of a source view handed to the consumers.
///
/// Both poses are moved to the consumer frame before relativizing,
/// so the result is `inverse(P) * inverse(target) * source * P`.
#[inline]
pub fn relative_pose_in_consumer_frame(
    target: &Pose,
    source: &Pose,
) -> Pose {
    relative_pose(&to_consumer_frame(target), &to_consumer_frame(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pose() -> Pose {
        DMat4::from_rotation_translation(
            glam::DQuat::from_euler(glam::EulerRot::XYZ, 0.3, -1.1, 2.0),
            glam::DVec3::new(1.5, -2.0, 0.25),
        )
    }

    #[test]
    fn axis_permutation_rows() {
        let rows = pose_to_rows(&AXIS_PERMUTATION);
        assert_eq!(
            rows,
            [
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [-1.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn rows_round_trip() {
        let rows = [
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let pose = pose_from_rows(&rows);
        assert_eq!(pose.w_axis, DVec4::new(4.0, 8.0, 12.0, 1.0));
        assert_eq!(pose_to_rows(&pose), rows);
        assert_eq!(pose_to_row_major(&pose)[..4], [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn relative_pose_to_itself_is_identity() {
        let pose = sample_pose();
        let relative = relative_pose(&pose, &pose);
        assert!(relative.abs_diff_eq(DMat4::IDENTITY, 1e-12), "{relative}");
    }

    #[test]
    fn relative_pose_composes() {
        let target = sample_pose();
        let source = DMat4::from_translation(glam::DVec3::new(0.0, 3.0, -1.0));
        let relative = relative_pose(&target, &source);
        assert!((target * relative).abs_diff_eq(source, 1e-12));
    }

    #[test]
    fn consumer_frame_round_trips() {
        let pose = sample_pose();

        let output = from_consumer_frame(&to_consumer_frame(&pose));
        assert_eq!(output, pose);

        let output = to_consumer_frame(&from_consumer_frame(&pose));
        assert_eq!(output, pose);

        assert_eq!(AXIS_PERMUTATION * AXIS_PERMUTATION.transpose(), DMat4::IDENTITY);
    }

    #[test]
    fn relative_pose_in_consumer_frame_to_itself() {
        let pose = sample_pose();
        let relative = relative_pose_in_consumer_frame(&pose, &pose);
        assert!(relative.abs_diff_eq(DMat4::IDENTITY, 1e-12), "{relative}");
    }

    #[test]
    fn relative_pose_in_consumer_frame_permutes_translation() {
        let target = DMat4::from_translation(glam::DVec3::new(5.0, 0.0, 0.0));
        let source = DMat4::from_translation(glam::DVec3::new(1.0, 0.0, 0.0));

        let relative = relative_pose_in_consumer_frame(&target, &source);
        assert_eq!(
            pose_to_rows(&relative),
            [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, -4.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]
        );

        let expected = AXIS_PERMUTATION.transpose()
            * relative_pose(&target, &source)
            * AXIS_PERMUTATION;
        assert_eq!(relative, expected);
    }

    #[test]
    fn relative_pose_in_consumer_frame_in_double_precision() {
        let target = DMat4::from_rotation_translation(
            glam::DQuat::from_rotation_z(0.7),
            glam::DVec3::new(123.456, -78.9, 1.5),
        );
        let source =
            DMat4::from_translation(glam::DVec3::new(124.1, -79.3, 1.5));

        let relative = relative_pose_in_consumer_frame(&target, &source);
        let expected = AXIS_PERMUTATION.transpose()
            * target.inverse()
            * source
            * AXIS_PERMUTATION;
        assert!(relative.abs_diff_eq(expected, 1e-9), "{relative}");
    }

    #[test]
    fn camera_rt_matrix() {
        let matrix = vec![
            vec![1.0, 0.0, 0.0, 2.0],
            vec![0.0, 1.0, 0.0, 3.0],
            vec![0.0, 0.0, 1.0, 4.0],
        ];
        let pose = pose_from_camera_rt_matrix(&matrix).unwrap();
        assert_eq!(
            pose,
            DMat4::from_translation(glam::DVec3::new(2.0, 3.0, 4.0))
        );

        let mut matrix = matrix;
        matrix.push(vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(pose_from_camera_rt_matrix(&matrix), Some(pose));

        matrix.push(vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(pose_from_camera_rt_matrix(&matrix), None);

        let matrix = vec![vec![1.0, 0.0, 0.0]; 3];
        assert_eq!(pose_from_camera_rt_matrix(&matrix), None);
    }

    #[test]
    fn load_camera_pose_second_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("point_u.json");
        std::fs::write(
            &path,
            r#"[
                {"camera_rt_matrix": [[0,0,1,0],[0,1,0,0],[-1,0,0,0]], "field_of_view_rads": 1.57},
                {"camera_rt_matrix": [[1,0,0,5],[0,1,0,6],[0,0,1,7]], "field_of_view_rads": 1.57}
            ]"#,
        )
        .unwrap();

        let pose = load_camera_pose(&path).unwrap();
        assert_eq!(
            pose,
            DMat4::from_translation(glam::DVec3::new(5.0, 6.0, 7.0))
        );
    }

    #[test]
    fn load_camera_pose_err() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("one.json");
        std::fs::write(&path, r#"[{"camera_rt_matrix": [[1,0,0,0]]}]"#).unwrap();
        let error = load_camera_pose(&path).unwrap_err();
        assert!(
            matches!(error, Error::MissingPoseRecord { index: 1, .. }),
            "{error:?}"
        );

        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"[{"camera_rt_matrix": []}, {"camera_rt_matrix": [[1,0]]}]"#,
        )
        .unwrap();
        let error = load_camera_pose(&path).unwrap_err();
        assert!(matches!(error, Error::MalformedCameraMatrix(_)), "{error:?}");

        let path = dir.path().join("garbage.json");
        std::fs::write(&path, "{").unwrap();
        let error = load_camera_pose(&path).unwrap_err();
        assert!(matches!(error, Error::Json(_)), "{error:?}");

        let error = load_camera_pose(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(error, Error::Io(_)), "{error:?}");
    }
}

//! Errors of the crate.

use std::path::PathBuf;

/// The error of every fallible operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An invalid option.
    #[error("Config error: {0}")]
    Config(String),

    /// Propagated from `std::io`.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Propagated from `image`.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Propagated from `serde_json`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Propagated from `ndarray_npy`.
    #[error("Npz error: {0}")]
    Npz(#[from] ndarray_npy::ReadNpzError),

    /// Propagated from `walkdir`.
    #[error("Directory walking error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The renderer library failed to load.
    #[error("Dynamic library error: {0}")]
    Library(#[from] libloading::Error),

    /// A row of `sweep_locations.csv` is malformed.
    #[error("Malformed sweep location at line {line}: {reason}")]
    MalformedSweepLocation {
        /// One-based.
        line: usize,
        /// What is wrong.
        reason: String,
    },

    /// The points file has no record at `index`.
    #[error("Missing pose record {index} in {path:?}")]
    MissingPoseRecord {
        /// The record index.
        index: usize,
        /// The points file.
        path: PathBuf,
    },

    /// The camera matrix is neither 3x4 nor 4x4.
    #[error("Malformed camera matrix in {0:?}")]
    MalformedCameraMatrix(PathBuf),

    /// The neighborhood has no viewpoint.
    #[error("Empty neighborhood at index {0}")]
    EmptyNeighborhood(usize),

    /// The sample index is out of range.
    #[error("Index out of bounds: {index} >= {len}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The number of samples.
        len: usize,
    },

    /// A buffer does not match the image dimensions.
    #[error("Mismatched buffer size: expected {expected}, found {found}")]
    MismatchedBufferSize {
        /// The expected number of values.
        expected: usize,
        /// The actual number of values.
        found: usize,
    },

    /// The renderer rejected its input.
    #[error("Renderer error: {0}")]
    Renderer(String),
}

//! Datasets of panoramic sweeps and their legacy variants.

pub mod file_list;
pub mod pair;
pub mod places365;
pub mod view_3d;

pub use burn::data::dataset::Dataset;
pub use pair::{PairDataset, PairSample};
pub use places365::Places365Dataset;
pub use view_3d::{ViewDataset3d, ViewSample};

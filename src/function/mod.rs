//! Functions on burn tensors.

pub mod convert;

pub use convert::*;

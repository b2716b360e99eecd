//! A library to index panoramic sweeps and assemble view-synthesis samples

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod function;
pub mod index;
pub mod pose;
pub mod render;
pub mod scene;
pub mod transform;
pub mod view;

//! Batching over random access datasets.

mod collate;
mod data_loader;

pub use collate::*;
pub use data_loader::*;

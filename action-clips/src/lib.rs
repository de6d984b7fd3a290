//! Labeled video-clip datasets and batch loading for action recognition.

mod common;
pub mod dataset;
pub mod loader;
pub mod video;

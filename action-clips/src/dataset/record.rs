use crate::common::*;

/// A video file and the index of its class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sample {
    pub path: PathBuf,
    pub class_index: usize,
}

/// A clip with its class label.
#[derive(Debug, TensorLike)]
pub struct DataRecord {
    /// Clip frames in `[T, H, W, C]` layout.
    pub video: Tensor,
    #[tensor_like(clone)]
    pub label: usize,
}

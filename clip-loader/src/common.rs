//! Common imports from external crates.

pub use action_clips::{
    dataset::{GenericDataset, Hmdb51, Hmdb51Init, RandomAccessDataset, Split},
    loader::{DataLoader, DataLoaderConfig},
    video::{ResizeOptions, VideoClipsMetadata, VideoReader},
};
pub use anyhow::{Context, Result};
pub use futures::stream::TryStreamExt;
pub use serde::{Deserialize, Serialize};
pub use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};
pub use tracing::{info, warn};

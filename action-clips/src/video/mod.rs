//! Clip indexing over a list of video files.

mod clips;
mod metadata;
#[cfg(feature = "opencv")]
mod opencv_;
mod reader;
mod sampling;

pub use clips::*;
pub use metadata::*;
#[cfg(feature = "opencv")]
pub use opencv_::*;
pub use reader::*;
pub use sampling::*;

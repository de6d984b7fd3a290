//! Labeled clip datasets.

mod hmdb51;
mod record;
mod traits;
mod utils;

pub use hmdb51::*;
pub use record::*;
pub use traits::*;
pub use utils::*;

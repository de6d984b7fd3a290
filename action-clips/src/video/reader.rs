//! The video decoding backend interface.

use crate::common::*;

/// The stream properties collected when a video is probed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// The number of decodable frames.
    pub num_frames: usize,
    /// The frame rate, or `None` if the container does not report one.
    pub fps: Option<f64>,
}

/// Output frame size constraints.
///
/// A zero field means unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResizeOptions {
    #[serde(default)]
    pub width: usize,
    #[serde(default)]
    pub height: usize,
    #[serde(default)]
    pub min_dimension: usize,
}

impl ResizeOptions {
    pub fn is_identity(&self) -> bool {
        self.width == 0 && self.height == 0 && self.min_dimension == 0
    }

    /// Compute the output `(height, width)` of a frame of the given size.
    ///
    /// Explicit width and height take precedence over `min_dimension`. When
    /// only one of them is set, the other one follows the aspect ratio.
    pub fn output_size(&self, orig_h: usize, orig_w: usize) -> (usize, usize) {
        let Self {
            width,
            height,
            min_dimension,
        } = *self;

        let scale = |len: usize, num: usize, den: usize| -> usize {
            ((len as f64 * num as f64 / den as f64).round() as usize).max(1)
        };

        match (height, width) {
            (0, 0) if min_dimension == 0 || orig_h == 0 || orig_w == 0 => (orig_h, orig_w),
            (0, 0) => {
                if orig_h <= orig_w {
                    (min_dimension, scale(orig_w, min_dimension, orig_h))
                } else {
                    (scale(orig_h, min_dimension, orig_w), min_dimension)
                }
            }
            (0, w) => (scale(orig_h, w, orig_w.max(1)), w),
            (h, 0) => (h, scale(orig_w, h, orig_h.max(1))),
            (h, w) => (h, w),
        }
    }
}

/// A video decoding backend.
///
/// Implementations must be shareable across loader workers.
pub trait VideoReader
where
    Self: Debug + Send + Sync,
{
    /// Inspect the video without decoding pixel data into tensors.
    fn probe(&self, path: &Path) -> Result<VideoInfo>;

    /// Decode the frames at `frame_indices`, in the given order.
    ///
    /// Returns an `uint8` tensor of shape `[T, H, W, C]` with RGB channels,
    /// where `T == frame_indices.len()`.
    fn read_frames(
        &self,
        path: &Path,
        frame_indices: &[usize],
        resize: &ResizeOptions,
    ) -> Result<Tensor>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_output_size_test() {
        let resize = ResizeOptions::default();
        assert!(resize.is_identity());
        assert_eq!(resize.output_size(240, 320), (240, 320));

        let resize = ResizeOptions {
            width: 160,
            height: 120,
            min_dimension: 64,
        };
        assert_eq!(resize.output_size(240, 320), (120, 160));

        let resize = ResizeOptions {
            width: 160,
            ..Default::default()
        };
        assert_eq!(resize.output_size(240, 320), (120, 160));

        let resize = ResizeOptions {
            height: 60,
            ..Default::default()
        };
        assert_eq!(resize.output_size(240, 320), (60, 80));

        let resize = ResizeOptions {
            min_dimension: 128,
            ..Default::default()
        };
        assert_eq!(resize.output_size(240, 320), (128, 171));
        assert_eq!(resize.output_size(320, 240), (171, 128));
    }
}

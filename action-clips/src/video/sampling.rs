//! Frame resampling and clip windowing.

/// Pick the source frame indices that remain after converting a video of
/// `fps` to `frame_rate`.
///
/// A missing or non-positive `fps` is treated as 1. If `frame_rate` is not
/// set, every frame is kept.
pub fn resample_frame_indices(
    num_frames: usize,
    fps: Option<f64>,
    frame_rate: Option<f64>,
) -> Vec<usize> {
    let fps = fps.filter(|&fps| fps > 0.0).unwrap_or(1.0);
    let frame_rate = match frame_rate {
        Some(frame_rate) => frame_rate,
        None => return (0..num_frames).collect(),
    };
    let step = fps / frame_rate;

    if step >= 1.0 && step.fract() == 0.0 {
        (0..num_frames).step_by(step as usize).collect()
    } else {
        let total = (num_frames as f64 * frame_rate / fps).floor() as usize;
        (0..total)
            .map(|index| ((index as f64 * step).floor() as usize).min(num_frames - 1))
            .collect()
    }
}

/// The number of windows of length `size` taken every `step` positions from
/// a sequence of length `len`.
pub fn num_windows(len: usize, size: usize, step: usize) -> usize {
    debug_assert!(size > 0 && step > 0);
    if len < size {
        0
    } else {
        (len - size) / step + 1
    }
}

/// The clip windows of a single video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipWindows {
    frame_indices: Vec<usize>,
    frames_per_clip: usize,
    step_between_clips: usize,
    num_clips: usize,
}

impl ClipWindows {
    pub fn new(frame_indices: Vec<usize>, frames_per_clip: usize, step_between_clips: usize) -> Self {
        let num_clips = num_windows(frame_indices.len(), frames_per_clip, step_between_clips);
        Self {
            frame_indices,
            frames_per_clip,
            step_between_clips,
            num_clips,
        }
    }

    pub fn num_clips(&self) -> usize {
        self.num_clips
    }

    /// The source frame indices of the `clip_index`th clip.
    pub fn clip(&self, clip_index: usize) -> Option<&[usize]> {
        if clip_index >= self.num_clips {
            return None;
        }
        let start = clip_index * self.step_between_clips;
        Some(&self.frame_indices[start..(start + self.frames_per_clip)])
    }
}

#![allow(dead_code)]

use action_clips::video::{ResizeOptions, VideoInfo, VideoReader};
use anyhow::{ensure, format_err, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};
use tch::Tensor;

lazy_static::lazy_static! {
    pub static ref DATA_DIR: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data");
}

/// Decodes fixture files in place of real videos.
///
/// A fixture file contains `num_frames fps height width`, where zero fps
/// means unknown. Every pixel of a decoded frame holds the frame index.
#[derive(Debug, Default)]
pub struct FixtureReader {
    num_probes: AtomicUsize,
}

impl FixtureReader {
    pub fn num_probes(&self) -> usize {
        self.num_probes.load(Ordering::SeqCst)
    }

    fn parse(path: &Path) -> Result<(VideoInfo, usize, usize)> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture '{}'", path.display()))?;
        let fields: Vec<f64> = text
            .split_whitespace()
            .map(|field| field.parse())
            .collect::<Result<_, _>>()?;
        ensure!(fields.len() == 4, "malformed fixture '{}'", path.display());

        let fps = (fields[1] > 0.0).then(|| fields[1]);
        let info = VideoInfo {
            num_frames: fields[0] as usize,
            fps,
        };
        Ok((info, fields[2] as usize, fields[3] as usize))
    }
}

impl VideoReader for FixtureReader {
    fn probe(&self, path: &Path) -> Result<VideoInfo> {
        self.num_probes.fetch_add(1, Ordering::SeqCst);
        let (info, _, _) = Self::parse(path)?;
        Ok(info)
    }

    fn read_frames(
        &self,
        path: &Path,
        frame_indices: &[usize],
        resize: &ResizeOptions,
    ) -> Result<Tensor> {
        let (info, height, width) = Self::parse(path)?;
        let (height, width) = resize.output_size(height, width);

        let data: Vec<u8> = frame_indices
            .iter()
            .map(|&index| {
                if index < info.num_frames {
                    Ok(index as u8)
                } else {
                    Err(format_err!("frame {} of '{}' does not exist", index, path.display()))
                }
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flat_map(|value| std::iter::repeat(value).take(height * width * 3))
            .collect();

        Ok(Tensor::of_slice(&data).view([
            frame_indices.len() as i64,
            height as i64,
            width as i64,
            3,
        ]))
    }
}

/// Read the pixel at the origin of every frame of a `[T, H, W, C]` clip.
pub fn frame_values(video: &Tensor) -> Vec<u8> {
    Vec::from(&video.select(1, 0).select(1, 0).select(1, 0))
}

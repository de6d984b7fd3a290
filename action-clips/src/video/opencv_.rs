//! The OpenCV video decoding backend.

use super::{ResizeOptions, VideoInfo, VideoReader};
use crate::common::*;
use itertools::MinMaxResult;
use opencv::{
    core::{Mat, Size},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};

/// Decodes videos with OpenCV `videoio`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCvReader;

impl OpenCvReader {
    fn open(path: &Path) -> Result<VideoCapture> {
        let file_name = path
            .to_str()
            .ok_or_else(|| format_err!("the path '{}' is not valid UTF-8", path.display()))?;
        let capture = VideoCapture::from_file(file_name, videoio::CAP_ANY)?;
        ensure!(
            capture.is_opened()?,
            "unable to open video '{}'",
            path.display()
        );
        Ok(capture)
    }
}

impl VideoReader for OpenCvReader {
    fn probe(&self, path: &Path) -> Result<VideoInfo> {
        let mut capture = Self::open(path)?;
        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let fps = (fps.is_finite() && fps > 0.0).then(|| fps);

        // CAP_PROP_FRAME_COUNT is an estimate for many containers
        let mut num_frames = 0;
        while capture.grab()? {
            num_frames += 1;
        }

        Ok(VideoInfo { num_frames, fps })
    }

    fn read_frames(
        &self,
        path: &Path,
        frame_indices: &[usize],
        resize: &ResizeOptions,
    ) -> Result<Tensor> {
        let (first, last) = match frame_indices.iter().minmax() {
            MinMaxResult::NoElements => bail!("no frames are requested"),
            MinMaxResult::OneElement(&index) => (index, index),
            MinMaxResult::MinMax(&min, &max) => (min, max),
        };
        let mut capture = Self::open(path)?;

        // seeking by CAP_PROP_POS_FRAMES is not frame accurate on every codec
        for frame_index in 0..first {
            ensure!(
                capture.grab()?,
                "video '{}' ends at frame {}",
                path.display(),
                frame_index
            );
        }

        let mut bgr = Mat::default();
        let decoded: Vec<Tensor> = (first..=last)
            .map(|frame_index| -> Result<_> {
                ensure!(
                    capture.read(&mut bgr)?,
                    "video '{}' ends at frame {}",
                    path.display(),
                    frame_index
                );
                frame_to_tensor(&bgr, resize)
            })
            .try_collect()?;

        let frames: Vec<_> = frame_indices
            .iter()
            .map(|&index| decoded[index - first].shallow_clone())
            .collect();
        Ok(Tensor::stack(&frames, 0))
    }
}

/// Convert a BGR frame to a `[H, W, 3]` RGB tensor.
fn frame_to_tensor(bgr: &Mat, resize: &ResizeOptions) -> Result<Tensor> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(bgr, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

    let orig_h = rgb.rows() as usize;
    let orig_w = rgb.cols() as usize;
    let (out_h, out_w) = resize.output_size(orig_h, orig_w);

    let rgb = if (out_h, out_w) != (orig_h, orig_w) {
        let mut resized = Mat::default();
        imgproc::resize(
            &rgb,
            &mut resized,
            Size::new(out_w as i32, out_h as i32),
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )?;
        resized
    } else {
        rgb
    };

    let tensor = Tensor::of_slice(rgb.data_bytes()?).view([out_h as i64, out_w as i64, 3]);
    Ok(tensor)
}

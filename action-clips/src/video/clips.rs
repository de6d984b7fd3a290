use super::{
    resample_frame_indices, ClipWindows, ResizeOptions, VideoClipsMetadata, VideoInfo, VideoReader,
};
use crate::common::*;

/// Clip windowing and decoding options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipOptions {
    /// The number of frames in a clip.
    pub frames_per_clip: NonZeroUsize,
    /// The number of resampled frames between the starts of adjacent clips.
    pub step_between_clips: NonZeroUsize,
    /// If set, videos are resampled to this frame rate before windowing.
    pub frame_rate: Option<f64>,
    /// The number of parallel workers used to probe videos.
    pub num_workers: usize,
    /// The output frame size.
    pub resize: ResizeOptions,
}

impl ClipOptions {
    pub fn new(frames_per_clip: NonZeroUsize) -> Self {
        Self {
            frames_per_clip,
            step_between_clips: NonZeroUsize::new(1).unwrap(),
            frame_rate: None,
            num_workers: 1,
            resize: ResizeOptions::default(),
        }
    }

    fn check(&self) -> Result<()> {
        if let Some(frame_rate) = self.frame_rate {
            ensure!(
                frame_rate.is_finite() && frame_rate > 0.0,
                "frame_rate must be positive, but get {}",
                frame_rate
            );
        }
        Ok(())
    }
}

/// Extra information about a decoded clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipInfo {
    /// The effective frame rate of the clip.
    pub video_fps: Option<f64>,
}

/// A decoded clip.
#[derive(Debug)]
pub struct Clip {
    /// The `uint8` frames in `[T, H, W, C]` layout.
    pub video: Tensor,
    pub info: ClipInfo,
    /// The index of the source video.
    pub video_index: usize,
    /// The index of the clip within the source video.
    pub clip_index: usize,
}

/// The collection of all clips derivable from a list of videos.
#[derive(Debug)]
pub struct VideoClips<R>
where
    R: VideoReader,
{
    reader: Arc<R>,
    options: ClipOptions,
    metadata: VideoClipsMetadata,
    windows: Vec<ClipWindows>,
    cumulative_sizes: Vec<usize>,
}

impl<R> VideoClips<R>
where
    R: 'static + VideoReader,
{
    /// Index the clips of `video_paths`.
    ///
    /// Videos are probed through `reader` unless `precomputed_metadata` is
    /// given, in which case its video list must equal `video_paths`.
    pub async fn new(
        video_paths: Vec<PathBuf>,
        options: ClipOptions,
        precomputed_metadata: Option<VideoClipsMetadata>,
        reader: Arc<R>,
    ) -> Result<Self> {
        options.check()?;

        let metadata = match precomputed_metadata {
            Some(metadata) => {
                metadata.check_consistency()?;
                ensure!(
                    metadata.video_paths == video_paths,
                    "the precomputed metadata lists {} videos that do not match the {} given videos",
                    metadata.num_videos(),
                    video_paths.len()
                );
                metadata
            }
            None => probe_videos(video_paths, options.num_workers, reader.clone()).await?,
        };

        let windows: Vec<_> = izip!(
            &metadata.video_paths,
            &metadata.video_num_frames,
            &metadata.video_fps
        )
        .map(|(path, &num_frames, &fps)| {
            let frame_indices = resample_frame_indices(num_frames, fps, options.frame_rate);
            let windows = ClipWindows::new(
                frame_indices,
                options.frames_per_clip.get(),
                options.step_between_clips.get(),
            );
            if windows.num_clips() == 0 {
                warn!(
                    "no clips can be made from '{}' with {} frames",
                    path.display(),
                    num_frames
                );
            }
            windows
        })
        .collect();

        Ok(Self::from_parts(reader, options, metadata, windows))
    }

    fn from_parts(
        reader: Arc<R>,
        options: ClipOptions,
        metadata: VideoClipsMetadata,
        windows: Vec<ClipWindows>,
    ) -> Self {
        let cumulative_sizes = windows
            .iter()
            .scan(0, |sum, windows| {
                *sum += windows.num_clips();
                Some(*sum)
            })
            .collect();

        Self {
            reader,
            options,
            metadata,
            windows,
            cumulative_sizes,
        }
    }

    pub fn metadata(&self) -> &VideoClipsMetadata {
        &self.metadata
    }

    pub fn options(&self) -> &ClipOptions {
        &self.options
    }

    pub fn num_videos(&self) -> usize {
        self.metadata.num_videos()
    }

    pub fn num_clips(&self) -> usize {
        self.cumulative_sizes.last().copied().unwrap_or(0)
    }

    /// The number of clips of each video.
    pub fn clips_per_video(&self) -> impl Iterator<Item = usize> + '_ {
        self.windows.iter().map(|windows| windows.num_clips())
    }

    /// Map a global clip index to `(video_index, clip_index)`.
    pub fn get_clip_location(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.num_clips() {
            return None;
        }
        let video_index = self.cumulative_sizes.partition_point(|&size| size <= index);
        let clip_index = match video_index {
            0 => index,
            _ => index - self.cumulative_sizes[video_index - 1],
        };
        Some((video_index, clip_index))
    }

    /// Decode the `index`th clip.
    pub fn get_clip(&self, index: usize) -> Result<Clip> {
        let (video_index, clip_index) = self.get_clip_location(index).ok_or_else(|| {
            format_err!(
                "clip index {} out of range, the number of clips is {}",
                index,
                self.num_clips()
            )
        })?;
        let path = &self.metadata.video_paths[video_index];
        let frame_indices = self.windows[video_index]
            .clip(clip_index)
            .ok_or_else(|| {
                format_err!("invalid clip index {} of '{}'", clip_index, path.display())
            })?;

        let video = self
            .reader
            .read_frames(path, frame_indices, &self.options.resize)
            .with_context(|| {
                format!("failed to read clip {} of '{}'", clip_index, path.display())
            })?;

        let expect_frames = self.options.frames_per_clip.get() as i64;
        let shape = video.size();
        ensure!(
            shape.len() == 4 && shape[0] == expect_frames,
            "expect a clip of {} frames in [T, H, W, C] layout, but get shape {:?}",
            expect_frames,
            shape
        );

        let info = ClipInfo {
            video_fps: self
                .options
                .frame_rate
                .or(self.metadata.video_fps[video_index]),
        };

        Ok(Clip {
            video,
            info,
            video_index,
            clip_index,
        })
    }

    /// Restrict the collection to the videos at `indices` without probing
    /// them again.
    pub fn subset(&self, indices: &[usize]) -> Result<Self> {
        let metadata = self.metadata.select(indices)?;
        let windows = indices
            .iter()
            .map(|&index| self.windows[index].clone())
            .collect();

        Ok(Self::from_parts(
            self.reader.clone(),
            self.options.clone(),
            metadata,
            windows,
        ))
    }
}

async fn probe_videos<R>(
    video_paths: Vec<PathBuf>,
    num_workers: usize,
    reader: Arc<R>,
) -> Result<VideoClipsMetadata>
where
    R: 'static + VideoReader,
{
    let num_videos = video_paths.len();
    info!(
        "probing {} videos with {} workers",
        num_videos,
        num_workers.max(1)
    );

    let infos: Vec<VideoInfo> = stream::iter(video_paths.clone())
        .par_map(num_workers.max(1), move |path| {
            let reader = reader.clone();
            move || {
                reader
                    .probe(&path)
                    .with_context(|| format!("failed to probe video '{}'", path.display()))
            }
        })
        .try_collect()
        .await?;

    VideoClipsMetadata::from_infos(video_paths, &infos)
}

use super::*;
use crate::{
    common::*,
    video::{Clip, ClipOptions, ResizeOptions, VideoClips, VideoClipsMetadata, VideoReader},
};

/// A function applied to every clip tensor before it is returned.
pub type ClipTransform = Arc<dyn Fn(Tensor) -> Result<Tensor> + Send + Sync>;

/// The dataset split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// The name of the split directory under the dataset root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Test => "test",
        }
    }
}

/// The [Hmdb51] dataset initializer.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Hmdb51Init {
    /// The dataset directory containing `train` and `test` splits.
    pub root: PathBuf,
    /// The number of frames in a clip.
    pub frames_per_clip: NonZeroUsize,
    /// The number of frames between the starts of adjacent clips.
    pub step_between_clips: NonZeroUsize,
    /// If set, videos are resampled to this frame rate.
    pub frame_rate: Option<f64>,
    pub split: Split,
    /// The transformation applied to each clip tensor.
    #[derivative(Debug = "ignore")]
    pub transform: Option<ClipTransform>,
    /// The metadata from an earlier build over the same files.
    pub precomputed_metadata: Option<VideoClipsMetadata>,
    /// The number of workers probing videos.
    pub num_workers: usize,
    pub resize: ResizeOptions,
}

impl Hmdb51Init {
    pub fn new(root: impl AsRef<Path>, frames_per_clip: NonZeroUsize) -> Self {
        Self {
            root: root.as_ref().to_owned(),
            frames_per_clip,
            step_between_clips: NonZeroUsize::new(1).unwrap(),
            frame_rate: None,
            split: Split::Train,
            transform: None,
            precomputed_metadata: None,
            num_workers: 1,
            resize: ResizeOptions::default(),
        }
    }

    pub async fn build<R>(self, reader: Arc<R>) -> Result<Hmdb51<R>>
    where
        R: 'static + VideoReader,
    {
        let Self {
            root,
            frames_per_clip,
            step_between_clips,
            frame_rate,
            split,
            transform,
            precomputed_metadata,
            num_workers,
            resize,
        } = self;
        let split_dir = root.join(split.dir_name());

        // scan class directories
        let (classes, samples) = {
            let split_dir = split_dir.clone();
            tokio::task::spawn_blocking(move || -> Result<_> {
                let classes = list_classes(&split_dir)?;
                let samples = find_samples(&split_dir, &classes)?;
                Ok((classes, samples))
            })
            .await??
        };

        if classes.is_empty() {
            warn!("no class directories found in '{}'", split_dir.display());
        }
        info!(
            "found {} classes and {} videos in '{}'",
            classes.len(),
            samples.len(),
            split_dir.display()
        );

        // index clips
        let video_paths: Vec<_> = samples.iter().map(|sample| sample.path.clone()).collect();
        let options = ClipOptions {
            frames_per_clip,
            step_between_clips,
            frame_rate,
            num_workers,
            resize,
        };
        let video_clips =
            VideoClips::new(video_paths, options, precomputed_metadata, reader).await?;
        let metadata = video_clips.metadata().clone();

        let indices = retained_video_indices(&samples);
        let video_clips = video_clips.subset(&indices)?;
        info!(
            "indexed {} clips from {} videos in '{}'",
            video_clips.num_clips(),
            video_clips.num_videos(),
            split_dir.display()
        );

        Ok(Hmdb51 {
            split,
            classes,
            samples,
            metadata,
            indices,
            video_clips,
            transform,
        })
    }
}

/// The HMDB51 action recognition dataset.
///
/// Each record is a clip of `frames_per_clip` frames with the class index of
/// its source video.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Hmdb51<R>
where
    R: VideoReader,
{
    split: Split,
    classes: IndexSet<String>,
    samples: Vec<Sample>,
    metadata: VideoClipsMetadata,
    /// Maps a video index of `video_clips` to a sample index.
    indices: Vec<usize>,
    video_clips: VideoClips<R>,
    #[derivative(Debug = "ignore")]
    transform: Option<ClipTransform>,
}

impl<R> Hmdb51<R>
where
    R: 'static + VideoReader,
{
    pub fn split(&self) -> Split {
        self.split
    }

    /// The number of clips in the dataset.
    pub fn num_clips(&self) -> usize {
        self.video_clips.num_clips()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The clip metadata of all discovered videos.
    ///
    /// It can be passed as `precomputed_metadata` to skip probing on the next
    /// build.
    pub fn metadata(&self) -> &VideoClipsMetadata {
        &self.metadata
    }

    pub fn video_clips(&self) -> &VideoClips<R> {
        &self.video_clips
    }

    /// The sample that the `index`th clip is cut from.
    pub fn sample_of_clip(&self, index: usize) -> Option<&Sample> {
        let (video_index, _) = self.video_clips.get_clip_location(index)?;
        self.samples.get(self.indices[video_index])
    }
}

impl<R> GenericDataset for Hmdb51<R>
where
    R: 'static + VideoReader,
{
    fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }
}

impl<R> RandomAccessDataset for Hmdb51<R>
where
    R: 'static + VideoReader,
{
    fn num_records(&self) -> usize {
        self.num_clips()
    }

    fn nth(&self, index: usize) -> Result<DataRecord> {
        let Clip {
            video, video_index, ..
        } = self.video_clips.get_clip(index)?;
        let sample_index = self.indices[video_index];
        let label = self.samples[sample_index].class_index;

        let video = match &self.transform {
            Some(transform) => {
                transform(video).with_context(|| format!("failed to transform clip {}", index))?
            }
            None => video,
        };

        Ok(DataRecord { video, label })
    }
}

/// Select the samples whose videos are kept in the dataset.
///
/// Every discovered video is kept.
fn retained_video_indices(samples: &[Sample]) -> Vec<usize> {
    (0..samples.len()).collect()
}

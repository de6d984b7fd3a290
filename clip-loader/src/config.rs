//! Program configuration format.

use crate::common::*;

/// The main program configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The dataset directory containing `train` and `test` splits.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_frames_per_clip")]
    pub frames_per_clip: NonZeroUsize,
    #[serde(default = "default_step_between_clips")]
    pub step_between_clips: NonZeroUsize,
    #[serde(default)]
    pub frame_rate: Option<f64>,
    /// The number of workers probing videos.
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
    #[serde(default)]
    pub resize: ResizeOptions,
    /// If set, clip metadata is saved to and reused from this directory.
    #[serde(default)]
    pub metadata_cache_dir: Option<PathBuf>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            frames_per_clip: default_frames_per_clip(),
            step_between_clips: default_step_between_clips(),
            frame_rate: None,
            num_workers: default_num_workers(),
            resize: ResizeOptions::default(),
            metadata_cache_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub batch_size: NonZeroUsize,
    /// The number of workers decoding clips.
    #[serde(default)]
    pub num_workers: usize,
    /// The shuffling seed of the train loader.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: NonZeroUsize::new(2).unwrap(),
            num_workers: 0,
            seed: None,
        }
    }
}

impl LoaderConfig {
    /// The data loader options for a split. Only the train split is shuffled.
    pub fn data_loader_config(&self, split: Split) -> DataLoaderConfig {
        DataLoaderConfig {
            batch_size: self.batch_size,
            shuffle: split == Split::Train,
            num_workers: self.num_workers,
            seed: self.seed,
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_frames_per_clip() -> NonZeroUsize {
    NonZeroUsize::new(5).unwrap()
}

fn default_step_between_clips() -> NonZeroUsize {
    NonZeroUsize::new(1).unwrap()
}

fn default_num_workers() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_test() {
        let config = Config::default();
        assert_eq!(config.dataset.dir, Path::new("data"));
        assert_eq!(config.dataset.frames_per_clip.get(), 5);
        assert_eq!(config.loader.batch_size.get(), 2);
        assert!(config.loader.data_loader_config(Split::Train).shuffle);
        assert!(!config.loader.data_loader_config(Split::Test).shuffle);
    }

    #[test]
    fn open_config_test() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("clip-loader.json5");
        std::fs::write(
            &path,
            r#"{
                // the loader section falls back to defaults
                dataset: {
                    dir: "/srv/hmdb51",
                    frames_per_clip: 16,
                    resize: { min_dimension: 128 },
                },
            }"#,
        )?;

        let config = Config::open(&path)?;
        assert_eq!(config.dataset.dir, Path::new("/srv/hmdb51"));
        assert_eq!(config.dataset.frames_per_clip.get(), 16);
        assert_eq!(config.dataset.step_between_clips.get(), 1);
        assert_eq!(config.dataset.resize.min_dimension, 128);
        assert_eq!(config.loader.batch_size.get(), 2);
        Ok(())
    }

    #[test]
    fn partial_dataset_config_test() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("clip-loader.json5");
        std::fs::write(&path, "{ dataset: { num_workers: 4 } }")?;

        let config = Config::open(&path)?;
        assert_eq!(config.dataset.num_workers, 4);
        assert_eq!(config.dataset.dir, Path::new("data"));
        assert_eq!(config.dataset.frames_per_clip.get(), 5);
        assert_eq!(config.dataset.step_between_clips.get(), 1);
        Ok(())
    }
}

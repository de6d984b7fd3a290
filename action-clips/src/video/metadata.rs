use super::VideoInfo;
use crate::common::*;

/// Probed properties of a list of videos.
///
/// It is produced once by [VideoClips](super::VideoClips) and can be passed
/// back to a later construction to skip probing the files again.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoClipsMetadata {
    pub video_paths: Vec<PathBuf>,
    pub video_num_frames: Vec<usize>,
    pub video_fps: Vec<Option<f64>>,
}

impl VideoClipsMetadata {
    pub fn from_infos(video_paths: Vec<PathBuf>, infos: &[VideoInfo]) -> Result<Self> {
        ensure!(
            video_paths.len() == infos.len(),
            "expect {} video infos, but get {}",
            video_paths.len(),
            infos.len()
        );
        let (video_num_frames, video_fps): (Vec<_>, Vec<_>) = infos
            .iter()
            .map(|info| (info.num_frames, info.fps))
            .unzip();

        Ok(Self {
            video_paths,
            video_num_frames,
            video_fps,
        })
    }

    pub fn num_videos(&self) -> usize {
        self.video_paths.len()
    }

    pub fn info(&self, video_index: usize) -> Option<VideoInfo> {
        Some(VideoInfo {
            num_frames: *self.video_num_frames.get(video_index)?,
            fps: *self.video_fps.get(video_index)?,
        })
    }

    /// Keep the videos at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let num_videos = self.num_videos();
        let mut selected = Self::default();

        for &index in indices {
            ensure!(
                index < num_videos,
                "video index {} out of range, the number of videos is {}",
                index,
                num_videos
            );
            selected.video_paths.push(self.video_paths[index].clone());
            selected.video_num_frames.push(self.video_num_frames[index]);
            selected.video_fps.push(self.video_fps[index]);
        }

        Ok(selected)
    }

    pub(crate) fn check_consistency(&self) -> Result<()> {
        ensure!(
            self.video_paths.len() == self.video_num_frames.len()
                && self.video_paths.len() == self.video_fps.len(),
            "inconsistent metadata: {} paths, {} frame counts and {} frame rates",
            self.video_paths.len(),
            self.video_num_frames.len(),
            self.video_fps.len()
        );
        Ok(())
    }

    /// Load the metadata from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read metadata file '{}'", path.display()))?;
        let metadata: Self = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse metadata file '{}'", path.display()))?;
        metadata.check_consistency()?;
        Ok(metadata)
    }

    /// Save the metadata to a JSON file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, text)
            .await
            .with_context(|| format!("failed to write metadata file '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> VideoClipsMetadata {
        VideoClipsMetadata {
            video_paths: vec!["a.avi".into(), "b.avi".into(), "c.avi".into()],
            video_num_frames: vec![10, 20, 30],
            video_fps: vec![Some(25.0), None, Some(30.0)],
        }
    }

    #[test]
    fn select_test() {
        let metadata = sample_metadata();
        let selected = metadata.select(&[2, 0]).unwrap();
        assert_eq!(
            selected.video_paths,
            vec![PathBuf::from("c.avi"), PathBuf::from("a.avi")]
        );
        assert_eq!(selected.video_num_frames, vec![30, 10]);
        assert_eq!(selected.video_fps, vec![Some(30.0), Some(25.0)]);
        assert!(metadata.select(&[3]).is_err());
    }

    #[tokio::test]
    async fn save_and_load_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");

        let metadata = sample_metadata();
        metadata.save(&path).await.unwrap();
        let loaded = VideoClipsMetadata::load(&path).await.unwrap();
        assert_eq!(loaded, metadata);
    }

    #[tokio::test]
    async fn load_inconsistent_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        tokio::fs::write(
            &path,
            r#"{"video_paths": ["a.avi"], "video_num_frames": [], "video_fps": [null]}"#,
        )
        .await
        .unwrap();
        assert!(VideoClipsMetadata::load(&path).await.is_err());
    }
}

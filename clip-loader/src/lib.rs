//! The program that walks through the HMDB51 clip loaders.

pub mod common;
pub mod config;

use crate::{
    common::*,
    config::{Config, DatasetConfig},
};

/// The entry of the program.
///
/// It loads both splits, then iterates the train loader once and prints
/// every batch.
pub async fn start<R>(config: Arc<Config>, reader: Arc<R>) -> Result<()>
where
    R: 'static + VideoReader,
{
    info!("loading dataset from '{}'", config.dataset.dir.display());
    let train_set = Arc::new(load_dataset(&config.dataset, Split::Train, reader.clone()).await?);
    let test_set = Arc::new(load_dataset(&config.dataset, Split::Test, reader).await?);
    info!(
        "{} classes, {} train clips, {} test clips",
        train_set.classes().len(),
        train_set.num_records(),
        test_set.num_records()
    );

    let train_loader = DataLoader::new(
        train_set,
        config.loader.data_loader_config(Split::Train),
    );
    let test_loader = DataLoader::new(test_set, config.loader.data_loader_config(Split::Test));
    info!(
        "{} train batches, {} test batches",
        train_loader.num_batches(),
        test_loader.num_batches()
    );

    let mut stream = train_loader.stream();
    while let Some(batch) = stream.try_next().await? {
        println!("{:?}", batch);
        println!();
    }

    Ok(())
}

/// Build the dataset of a split.
///
/// With `metadata_cache_dir` set, clip metadata is read from
/// `<split>-metadata.json` when present and written back after the build.
pub async fn load_dataset<R>(
    config: &DatasetConfig,
    split: Split,
    reader: Arc<R>,
) -> Result<Hmdb51<R>>
where
    R: 'static + VideoReader,
{
    let init = || Hmdb51Init {
        step_between_clips: config.step_between_clips,
        frame_rate: config.frame_rate,
        split,
        num_workers: config.num_workers,
        resize: config.resize,
        ..Hmdb51Init::new(&config.dir, config.frames_per_clip)
    };

    let cache_path = match &config.metadata_cache_dir {
        Some(dir) => dir.join(format!("{}-metadata.json", split.dir_name())),
        None => return init().build(reader).await,
    };

    let cached = if cache_path.exists() {
        match VideoClipsMetadata::load(&cache_path).await {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                warn!("ignore unreadable metadata cache: {:#}", err);
                None
            }
        }
    } else {
        None
    };

    let dataset = match cached {
        Some(metadata) => {
            let result = Hmdb51Init {
                precomputed_metadata: Some(metadata),
                ..init()
            }
            .build(reader.clone())
            .await;

            match result {
                Ok(dataset) => {
                    info!("reuse metadata cache '{}'", cache_path.display());
                    return Ok(dataset);
                }
                Err(err) => {
                    warn!("discard stale metadata cache: {:#}", err);
                    init().build(reader).await?
                }
            }
        }
        None => init().build(reader).await?,
    };

    if let Some(dir) = cache_path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    dataset
        .metadata()
        .save(&cache_path)
        .await
        .with_context(|| format!("failed to write '{}'", cache_path.display()))?;

    Ok(dataset)
}

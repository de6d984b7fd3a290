use super::*;
use crate::{
    common::*,
    dataset::{DataRecord, RandomAccessDataset},
};

/// The data loader options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLoaderConfig {
    /// The number of clips per batch.
    pub batch_size: NonZeroUsize,
    /// If set, the records are visited in random order on every pass.
    #[serde(default)]
    pub shuffle: bool,
    /// The number of parallel workers loading records. Zero loads records on
    /// the consuming task.
    #[serde(default)]
    pub num_workers: usize,
    /// The seed of the shuffling. The pass count is added to it so that passes
    /// are reproducible but different from each other.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Iterates a dataset in batches.
#[derive(Debug)]
pub struct DataLoader<D>
where
    D: 'static + RandomAccessDataset,
{
    dataset: Arc<D>,
    config: DataLoaderConfig,
    num_passes: AtomicU64,
}

impl<D> DataLoader<D>
where
    D: 'static + RandomAccessDataset,
{
    pub fn new(dataset: Arc<D>, config: DataLoaderConfig) -> Self {
        Self {
            dataset,
            config,
            num_passes: AtomicU64::new(0),
        }
    }

    pub fn dataset(&self) -> &Arc<D> {
        &self.dataset
    }

    pub fn config(&self) -> &DataLoaderConfig {
        &self.config
    }

    /// The number of batches in a full pass.
    pub fn num_batches(&self) -> usize {
        let batch_size = self.config.batch_size.get();
        let num_records = self.dataset.num_records();
        num_records / batch_size + (num_records % batch_size != 0) as usize
    }

    /// Start a new pass over the dataset.
    ///
    /// Every record is visited exactly once per pass. The final batch is
    /// shorter if the dataset size is not a multiple of the batch size.
    pub fn stream(&self) -> BoxStream<'static, Result<ClipBatch>> {
        let DataLoaderConfig {
            batch_size,
            num_workers,
            ..
        } = self.config;
        let order = self.pass_order();
        let chunk_size = batch_size.get().min(order.len().max(1));
        let dataset = self.dataset.clone();

        // load records
        let stream: BoxStream<'static, Result<(usize, DataRecord)>> = if num_workers == 0 {
            stream::iter(order)
                .map(move |index| {
                    let record = dataset.nth(index)?;
                    Fallible::Ok((index, record))
                })
                .boxed()
        } else {
            stream::iter(order)
                .par_map(num_workers, move |index| {
                    let dataset = dataset.clone();
                    move || {
                        let record = dataset.nth(index)?;
                        Fallible::Ok((index, record))
                    }
                })
                .boxed()
        };

        // group into batches
        stream
            .chunks(chunk_size)
            .map(|results| {
                let items: Vec<_> = results.into_iter().try_collect()?;
                let batch = collate(items)?;
                Fallible::Ok(batch)
            })
            .boxed()
    }

    fn pass_order(&self) -> Vec<usize> {
        let mut order: Vec<_> = (0..self.dataset.num_records()).collect();

        if self.config.shuffle {
            let pass = self.num_passes.fetch_add(1, atomic::Ordering::SeqCst);
            let mut rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(pass)),
                None => StdRng::from_entropy(),
            };
            order.shuffle(&mut rng);
        }

        order
    }
}

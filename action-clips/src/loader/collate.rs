use crate::{common::*, dataset::DataRecord};
use thiserror::Error;

/// The batch of clips produced by the data loader.
#[derive(Debug, TensorLike)]
pub struct ClipBatch {
    /// The dataset indices of the clips.
    #[tensor_like(clone)]
    pub indices: Vec<usize>,
    /// Stacked clips in `[B, T, H, W, C]` layout.
    pub videos: Tensor,
    #[tensor_like(clone)]
    pub labels: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollateError {
    #[error("unable to collate an empty batch")]
    EmptyBatch,
    #[error("clip at position {position} has shape {found:?}, but expect {expect:?}")]
    ShapeMismatch {
        position: usize,
        expect: Vec<i64>,
        found: Vec<i64>,
    },
}

/// Merge `(dataset index, record)` pairs into a batch, preserving order.
///
/// All clips must have the same shape.
pub fn collate(items: Vec<(usize, DataRecord)>) -> Result<ClipBatch, CollateError> {
    let expect = match items.first() {
        Some((_, record)) => record.video.size(),
        None => return Err(CollateError::EmptyBatch),
    };

    let mut indices = Vec::with_capacity(items.len());
    let mut videos = Vec::with_capacity(items.len());
    let mut labels = Vec::with_capacity(items.len());

    for (position, (index, DataRecord { video, label })) in items.into_iter().enumerate() {
        let found = video.size();
        if found != expect {
            return Err(CollateError::ShapeMismatch {
                position,
                expect,
                found,
            });
        }
        indices.push(index);
        videos.push(video);
        labels.push(label);
    }

    Ok(ClipBatch {
        indices,
        videos: Tensor::stack(&videos, 0),
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(shape: &[i64], value: f64, label: usize) -> DataRecord {
        DataRecord {
            video: Tensor::ones(shape, (Kind::Float, Device::Cpu)) * value,
            label,
        }
    }

    #[test]
    fn collate_test() {
        let batch = collate(vec![
            (4, record(&[5, 4, 6, 3], 1.0, 1)),
            (0, record(&[5, 4, 6, 3], 2.0, 0)),
        ])
        .unwrap();

        assert_eq!(batch.videos.size(), vec![2, 5, 4, 6, 3]);
        assert_eq!(batch.indices, vec![4, 0]);
        assert_eq!(batch.labels, vec![1, 0]);
        assert_eq!(batch.videos.get(0).mean(Kind::Float).double_value(&[]), 1.0);
        assert_eq!(batch.videos.get(1).mean(Kind::Float).double_value(&[]), 2.0);
    }

    #[test]
    fn collate_partial_batch_test() {
        let batch = collate(vec![(8, record(&[5, 4, 6, 3], 0.0, 1))]).unwrap();
        assert_eq!(batch.videos.size(), vec![1, 5, 4, 6, 3]);
        assert_eq!(batch.labels, vec![1]);
    }

    #[test]
    fn collate_shape_mismatch_test() {
        let result = collate(vec![
            (0, record(&[5, 4, 6, 3], 0.0, 0)),
            (1, record(&[5, 4, 6, 3], 0.0, 0)),
            (2, record(&[5, 8, 6, 3], 0.0, 1)),
        ]);

        match result {
            Err(CollateError::ShapeMismatch {
                position,
                expect,
                found,
            }) => {
                assert_eq!(position, 2);
                assert_eq!(expect, vec![5, 4, 6, 3]);
                assert_eq!(found, vec![5, 8, 6, 3]);
            }
            other => panic!("unexpected result {:?}", other.map(|batch| batch.labels)),
        }
    }

    #[test]
    fn collate_empty_test() {
        assert_eq!(
            collate(vec![]).map(|batch| batch.labels),
            Err(CollateError::EmptyBatch)
        );
    }
}

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;
use crate::domain::review::ReviewSplits;

/// One padded review ready for batching.
/// `tokens.len()` equals the pipeline's max_len.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSample {
    pub tokens: Vec<u32>,
    pub label:  u8,
}

pub struct ReviewDataset {
    samples: Vec<ReviewSample>,
}

impl ReviewDataset {
    pub fn new(samples: Vec<ReviewSample>) -> Self { Self { samples } }

    /// Zip parallel input/label vectors into samples.
    pub fn from_parallel(inputs: Vec<Vec<u32>>, labels: Vec<u8>) -> Result<Self, PipelineError> {
        if inputs.len() != labels.len() {
            return Err(PipelineError::ShapeMismatch {
                context:  "dataset inputs vs labels",
                expected: vec![inputs.len()],
                actual:   vec![labels.len()],
            });
        }
        let samples = inputs
            .into_iter()
            .zip(labels)
            .map(|(tokens, label)| ReviewSample { tokens, label })
            .collect();
        Ok(Self { samples })
    }

    /// Split a padded ReviewSplits record into (train, eval) datasets.
    pub fn from_splits(splits: ReviewSplits) -> Result<(Self, Self), PipelineError> {
        Ok((
            Self::from_parallel(splits.train_inputs, splits.train_labels)?,
            Self::from_parallel(splits.eval_inputs, splits.eval_labels)?,
        ))
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn positives(&self) -> usize {
        self.samples.iter().filter(|s| s.label == 1).count()
    }
}

impl Dataset<ReviewSample> for ReviewDataset {
    fn get(&self, index: usize) -> Option<ReviewSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

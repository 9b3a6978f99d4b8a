// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Reloads the best checkpoint and scores one review:
//   - either an explicit token sequence given on the command line
//   - or review #index of the eval partition, reported together
//     with its true label
//
// The eval partition is rebuilt from the configuration saved at
// training time, so the sample goes through exactly the same
// cutoffs and padding the model was trained with.

use anyhow::{Context, Result};

use crate::application::config::PipelineConfig;
use crate::application::train_use_case::{prepare_splits, review_source};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

/// One scored review.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Raw sigmoid output
    pub score: f32,
    /// Ground truth, when the review came from the eval partition
    pub label: Option<u8>,
}

pub struct PredictUseCase {
    config:     PipelineConfig,
    inferencer: Inferencer,
}

impl PredictUseCase {
    /// Open `checkpoint_dir`; `data_dir` overrides the dataset
    /// location recorded at training time.
    pub fn new(checkpoint_dir: &str, data_dir: Option<String>) -> Result<Self> {
        let ckpt       = CheckpointManager::open(checkpoint_dir)?;
        let mut config = ckpt.load_config()?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        let inferencer = Inferencer::from_checkpoint(&ckpt, Default::default())?;
        Ok(Self { config, inferencer })
    }

    /// Score an explicit, already-encoded review.
    pub fn score_tokens(&self, tokens: &[u32]) -> Result<Prediction> {
        let score = self.inferencer.predict(tokens)?;
        Ok(Prediction { score, label: None })
    }

    /// Score review #`index` of the eval partition.
    pub fn score_eval_sample(&self, index: usize) -> Result<Prediction> {
        let source = review_source(&self.config);
        let splits = prepare_splits(&self.config, source.as_ref())
            .with_context(|| format!("Cannot rebuild eval partition from {}", source.describe()))?;

        let tokens = splits.eval_inputs.get(index).with_context(|| {
            format!("Eval partition has {} reviews; index {} is out of range", splits.eval_len(), index)
        })?;
        let score = self.inferencer.predict(tokens)?;
        Ok(Prediction { score, label: Some(splits.eval_labels[index]) })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainUseCase;
    use crate::domain::error::PipelineError;

    fn trained_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PipelineConfig {
            synthetic: true,
            synthetic_train: 8,
            synthetic_eval: 4,
            vocab_size: 30,
            max_len: 10,
            batch_size: 4,
            epochs: 1,
            embedding_dim: 4,
            conv_filters: 4,
            hidden_dim: 4,
            dense_dim: 2,
            checkpoint_dir: dir.path().display().to_string(),
            ..PipelineConfig::default()
        };
        TrainUseCase::new(cfg).execute().unwrap();
        dir
    }

    #[test]
    fn test_eval_sample_reports_score_and_label() {
        let dir = trained_dir();
        let uc  = PredictUseCase::new(&dir.path().display().to_string(), None).unwrap();

        let p = uc.score_eval_sample(0).unwrap();
        assert!((0.0..=1.0).contains(&p.score));
        // Synthetic eval partitions start with a positive review
        assert_eq!(p.label, Some(1));

        assert!(uc.score_eval_sample(99).is_err());
    }

    #[test]
    fn test_explicit_tokens_have_no_label() {
        let dir = trained_dir();
        let uc  = PredictUseCase::new(&dir.path().display().to_string(), None).unwrap();
        let p = uc.score_tokens(&[1, 4, 5, 6]).unwrap();
        assert_eq!(p.label, None);
    }

    #[test]
    fn test_untrained_directory_is_checkpoint_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = PredictUseCase::new(&dir.path().display().to_string(), None).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::CheckpointNotFound { .. })
        ));
    }
}

// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Pick the review source        (Layer 4 - data)
//   Step 2: Load both partitions          (Layer 4 - data)
//   Step 3: Apply vocab / length cutoffs  (Layer 4 - data)
//   Step 4: Pad to max_len                (Layer 4 - data)
//   Step 5: Build Burn datasets           (Layer 4 - data)
//   Step 6: Save config                   (Layer 6 - infra)
//   Step 7: Run training loop             (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::{Context, Result};

use crate::application::config::PipelineConfig;
use crate::data::{
    dataset::ReviewDataset,
    loader::{JsonlReviewSource, SyntheticReviewSource},
    padding::pad_all,
    preprocessor::Preprocessor,
};
use crate::domain::{
    error::PipelineError,
    review::{ReviewSplits, PAD_ID},
    traits::ReviewSource,
};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::trainer::{run_training, TrainingReport};

pub struct TrainUseCase {
    config: PipelineConfig,
}

impl TrainUseCase {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingReport> {
        let cfg = &self.config;

        // ── Steps 1-4: source → cutoffs → padding ─────────────────────────────
        let source = review_source(cfg);
        tracing::info!("Loading reviews from {}", source.describe());
        let splits = prepare_splits(cfg, source.as_ref())?;

        // ── Step 5: Build Burn datasets ───────────────────────────────────────
        let (train_dataset, eval_dataset) = ReviewDataset::from_splits(splits)?;
        tracing::info!(
            "Datasets: {} train ({} positive), {} eval",
            train_dataset.sample_count(),
            train_dataset.positives(),
            eval_dataset.sample_count(),
        );

        // ── Step 6: Save config for inference ─────────────────────────────────
        let mut ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir, &cfg.model_name)?;
        ckpt_manager.save_config(cfg)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 7: Run training loop (Layer 5) ───────────────────────────────
        let report = run_training(cfg, train_dataset, eval_dataset, &mut ckpt_manager, &metrics)
            .context("Training failed")?;

        match (report.best_epoch, report.best_eval_loss) {
            (Some(epoch), Some(loss)) => tracing::info!(
                "Best epoch {} (eval_loss={:.4}) saved to '{}'",
                epoch,
                loss,
                report.checkpoint.display()
            ),
            _ => tracing::warn!("No epoch produced a finite eval loss; no checkpoint written"),
        }
        Ok(report)
    }
}

/// The dataset source the configuration asks for.
pub fn review_source(cfg: &PipelineConfig) -> Box<dyn ReviewSource> {
    if cfg.synthetic {
        Box::new(SyntheticReviewSource::new(
            cfg.synthetic_train,
            cfg.synthetic_eval,
            cfg.vocab_size,
            cfg.max_len,
            cfg.seed,
        ))
    } else {
        Box::new(JsonlReviewSource::new(&cfg.data_dir))
    }
}

/// Load, apply cutoffs and pad both partitions.
pub fn prepare_splits(cfg: &PipelineConfig, source: &dyn ReviewSource) -> Result<ReviewSplits> {
    let raw = source.load_splits()?;

    let preprocessor = Preprocessor::new(cfg.vocab_size, cfg.max_len);
    let (train, train_stats) = preprocessor.apply_all(raw.train);
    let (eval, eval_stats)   = preprocessor.apply_all(raw.eval);

    for (split, stats) in [("train", train_stats), ("eval", eval_stats)] {
        if stats.dropped_too_long > 0 {
            tracing::warn!(
                "{}: dropped {} reviews longer than max_len={}",
                split,
                stats.dropped_too_long,
                cfg.max_len
            );
        }
        tracing::debug!(
            "{}: kept {}, {} out-of-vocabulary codes replaced",
            split,
            stats.kept,
            stats.oov_replaced
        );
    }

    if train.is_empty() {
        return Err(PipelineError::EmptySplit { split: "train" }.into());
    }
    if eval.is_empty() {
        return Err(PipelineError::EmptySplit { split: "eval" }.into());
    }

    let max_len = cfg.max_len;
    Ok(ReviewSplits::from_reviews(train, eval).map_inputs(|rows| pad_all(rows, max_len, PAD_ID)))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::data::loader::{EVAL_FILE, TRAIN_FILE};

    #[test]
    fn test_prepare_splits_pads_every_row() {
        let cfg = PipelineConfig {
            synthetic: true,
            synthetic_train: 6,
            synthetic_eval: 3,
            vocab_size: 40,
            max_len: 16,
            ..PipelineConfig::default()
        };
        let splits = prepare_splits(&cfg, review_source(&cfg).as_ref()).unwrap();
        assert_eq!(splits.train_len(), 6);
        assert_eq!(splits.eval_len(), 3);
        assert!(splits.train_inputs.iter().chain(&splits.eval_inputs).all(|r| r.len() == 16));
    }

    #[test]
    fn test_prepare_splits_applies_cutoffs_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(TRAIN_FILE),
            "{\"tokens\": [1, 4, 900], \"label\": 1}\n\
             {\"tokens\": [1, 4, 5, 6, 7, 8], \"label\": 0}\n",
        )
        .unwrap();
        fs::write(dir.path().join(EVAL_FILE), "{\"tokens\": [1, 3], \"label\": 0}\n").unwrap();

        let cfg = PipelineConfig {
            data_dir: dir.path().display().to_string(),
            vocab_size: 100,
            max_len: 4,
            ..PipelineConfig::default()
        };
        let splits = prepare_splits(&cfg, review_source(&cfg).as_ref()).unwrap();

        // Second review is longer than max_len and is dropped
        assert_eq!(splits.train_inputs, vec![vec![1, 4, 2, 0]]);
        assert_eq!(splits.train_labels, vec![1]);
        assert_eq!(splits.eval_inputs, vec![vec![1, 3, 0, 0]]);
    }

    #[test]
    fn test_all_reviews_filtered_is_empty_split() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TRAIN_FILE), "{\"tokens\": [1, 2, 3], \"label\": 1}\n").unwrap();
        fs::write(dir.path().join(EVAL_FILE), "{\"tokens\": [1], \"label\": 1}\n").unwrap();

        let cfg = PipelineConfig {
            data_dir: dir.path().display().to_string(),
            max_len: 2,
            ..PipelineConfig::default()
        };
        let err = prepare_splits(&cfg, review_source(&cfg).as_ref()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::EmptySplit { split: "train" })
        ));
    }

    #[test]
    fn test_execute_trains_and_leaves_a_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PipelineConfig {
            synthetic: true,
            synthetic_train: 8,
            synthetic_eval: 4,
            vocab_size: 30,
            max_len: 10,
            batch_size: 4,
            epochs: 2,
            embedding_dim: 4,
            conv_filters: 4,
            hidden_dim: 4,
            dense_dim: 2,
            checkpoint_dir: dir.path().display().to_string(),
            ..PipelineConfig::default()
        };

        let report = TrainUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(report.epochs.len(), 2);
        assert!(report.checkpoint.is_file());

        let ckpt = CheckpointManager::open(dir.path()).unwrap();
        assert_eq!(ckpt.load_config().unwrap(), cfg);
        assert!(dir.path().join(crate::infra::metrics::METRICS_FILE).is_file());
    }
}

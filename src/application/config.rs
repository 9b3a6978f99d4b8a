// ============================================================
// Layer 2 — Pipeline Configuration
// ============================================================
// Every hyperparameter and path for one run, in one struct.
// Each stage receives it explicitly instead of reading loose
// module-level settings.
//
// The struct is serialised to pipeline_config.json next to the
// checkpoint, so `predict` can rebuild the exact same model
// topology before loading the weights into it.

use serde::{Deserialize, Serialize};

use crate::infra::metrics::TrackedMetric;
use crate::ml::model::SentimentConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    // ── Data ──────────────────────────────────────────────────────────────────
    /// Directory holding train.jsonl / test.jsonl
    pub data_dir:        String,
    /// Generate a seeded synthetic corpus instead of reading data_dir
    pub synthetic:       bool,
    pub synthetic_train: usize,
    pub synthetic_eval:  usize,
    /// Keep only the `vocab_size` most frequent word ranks
    pub vocab_size:      usize,
    /// Drop longer reviews; pad shorter ones to this length
    pub max_len:         usize,

    // ── Checkpointing ─────────────────────────────────────────────────────────
    pub checkpoint_dir:  String,
    /// Checkpoint file is <checkpoint_dir>/<model_name>_best_loss.mpk
    pub model_name:      String,

    // ── Training loop ─────────────────────────────────────────────────────────
    pub batch_size:      usize,
    pub epochs:          usize,
    /// Max train batches per epoch; None runs the full partition
    pub train_steps:     Option<usize>,
    /// Max eval batches per epoch; None runs the full partition
    pub eval_steps:      Option<usize>,
    pub lr:              f64,
    pub seed:            u64,
    /// Metrics reported in the per-epoch log line
    pub metrics:         Vec<TrackedMetric>,

    // ── Model topology ────────────────────────────────────────────────────────
    pub embedding_dim:   usize,
    pub conv_filters:    usize,
    pub kernel_size:     usize,
    pub pool_size:       usize,
    pub hidden_dim:      usize,
    pub dense_dim:       usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir:        "data/reviews".to_string(),
            synthetic:       false,
            synthetic_train: 512,
            synthetic_eval:  128,
            vocab_size:      10_000,
            max_len:         500,
            checkpoint_dir:  "checkpoints".to_string(),
            model_name:      "sentiment".to_string(),
            batch_size:      64,
            epochs:          3,
            train_steps:     None,
            eval_steps:      None,
            lr:              1e-3,
            seed:            42,
            metrics:         vec![TrackedMetric::Accuracy],
            embedding_dim:   32,
            conv_filters:    32,
            kernel_size:     3,
            pool_size:       2,
            hidden_dim:      32,
            dense_dim:       16,
        }
    }
}

impl PipelineConfig {
    /// The burn model config derived from the topology fields.
    pub fn model_config(&self) -> SentimentConfig {
        SentimentConfig::new(self.vocab_size, self.max_len)
            .with_embedding_dim(self.embedding_dim)
            .with_conv_filters(self.conv_filters)
            .with_kernel_size(self.kernel_size)
            .with_pool_size(self.pool_size)
            .with_hidden_dim(self.hidden_dim)
            .with_dense_dim(self.dense_dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip_keeps_topology() {
        let cfg = PipelineConfig {
            max_len: 80,
            hidden_dim: 12,
            train_steps: Some(3),
            metrics: vec![TrackedMetric::Loss, TrackedMetric::Accuracy],
            ..PipelineConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"metrics\":[\"loss\",\"accuracy\"]"));
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_model_config_mirrors_fields() {
        let cfg = PipelineConfig { kernel_size: 5, pool_size: 4, ..PipelineConfig::default() };
        let model = cfg.model_config();
        assert_eq!(model.kernel_size, 5);
        assert_eq!(model.pool_size, 4);
        assert_eq!(model.max_len, 500);
        assert!(model.validate().is_ok());
    }
}

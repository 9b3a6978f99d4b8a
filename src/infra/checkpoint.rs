// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Keeps the single best checkpoint of a training run using
// Burn's CompactRecorder.
//
// What gets saved:
//   1. Model weights (.mpk) — written only when the eval loss
//      beats every earlier epoch of this run
//   2. pipeline_config.json    — the configuration needed to
//      rebuild the model topology for inference
//
// File naming convention:
//   checkpoints/
//     sentiment_best_loss.mpk      ← <model_name>_best_loss
//     pipeline_config.json
//     metrics.csv                  ← written by MetricsLogger
//
// The best loss is tracked per run. A new `train` invocation
// starts from "no best yet", so its first epoch replaces any
// checkpoint left over from a previous run.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{CompactRecorder, FileRecorder, Recorder},
};

use crate::application::config::PipelineConfig;
use crate::domain::error::PipelineError;
use crate::ml::model::SentimentModel;
use crate::ml::InferBackend;

pub const CONFIG_FILE: &str = "pipeline_config.json";

pub struct CheckpointManager {
    dir:        PathBuf,
    model_name: String,
    /// Lowest eval loss saved so far in this run
    best_loss:  Option<f64>,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating `dir` if needed.
    pub fn new(dir: impl AsRef<Path>, model_name: impl Into<String>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir, model_name: model_name.into(), best_loss: None })
    }

    /// Open an existing checkpoint directory for inference.
    /// Nothing is created; a missing config is CheckpointNotFound.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let cfg = read_config(&dir)?;
        Ok(Self { dir, model_name: cfg.model_name, best_loss: None })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path handed to the recorder (extension added by Burn).
    fn record_path(&self) -> PathBuf {
        self.dir.join(format!("{}_best_loss", self.model_name))
    }

    /// Full path of the checkpoint file on disk. The recorder sets
    /// its own extension on `record_path()`, so do the same here.
    pub fn checkpoint_file(&self) -> PathBuf {
        let mut path = self.record_path();
        path.set_extension(<CompactRecorder as FileRecorder<InferBackend>>::file_extension());
        path
    }

    pub fn has_checkpoint(&self) -> bool {
        self.checkpoint_file().is_file()
    }

    pub fn best_loss(&self) -> Option<f64> {
        self.best_loss
    }

    /// True if `eval_loss` beats every loss saved so far.
    /// NaN never counts as an improvement.
    pub fn is_improvement(&self, eval_loss: f64) -> bool {
        if eval_loss.is_nan() {
            return false;
        }
        self.best_loss.map_or(true, |best| eval_loss < best)
    }

    /// Save `model` if `eval_loss` is a new best.
    /// Returns whether a checkpoint was written.
    pub fn save_if_improved<B: Backend>(
        &mut self,
        model:     &SentimentModel<B>,
        eval_loss: f64,
    ) -> Result<bool> {
        if !self.is_improvement(eval_loss) {
            tracing::debug!(
                "eval_loss={:.6} does not beat best={:?}; checkpoint kept",
                eval_loss,
                self.best_loss
            );
            return Ok(false);
        }

        let path = self.record_path();
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        self.best_loss = Some(eval_loss);
        tracing::info!(
            "New best eval_loss={:.6}, checkpoint written to '{}'",
            eval_loss,
            self.checkpoint_file().display()
        );
        Ok(true)
    }

    /// Load the best checkpoint into `model`.
    /// The model must have the same topology the checkpoint was saved with.
    pub fn load_model<B: Backend>(
        &self,
        model:  SentimentModel<B>,
        device: &B::Device,
    ) -> Result<SentimentModel<B>> {
        if !self.has_checkpoint() {
            return Err(PipelineError::CheckpointNotFound { path: self.checkpoint_file() }.into());
        }

        let path = self.record_path();
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load checkpoint '{}'", self.checkpoint_file().display()))?;

        tracing::info!("Loaded checkpoint '{}'", self.checkpoint_file().display());
        Ok(model.load_record(record))
    }

    /// Persist the run configuration as JSON.
    pub fn save_config(&self, cfg: &PipelineConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved pipeline config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<PipelineConfig> {
        read_config(&self.dir)
    }
}

fn read_config(dir: &Path) -> Result<PipelineConfig> {
    let path = dir.join(CONFIG_FILE);
    if !path.is_file() {
        return Err(PipelineError::CheckpointNotFound { path }.into());
    }
    let json = fs::read_to_string(&path)
        .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Malformed config in '{}'", path.display()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::ml::model::SentimentConfig;

    type TestBackend = NdArray;

    fn tiny_model() -> SentimentModel<TestBackend> {
        SentimentConfig::new(20, 10)
            .with_embedding_dim(4)
            .with_conv_filters(4)
            .with_hidden_dim(4)
            .with_dense_dim(2)
            .init(&Default::default())
    }

    #[test]
    fn test_nan_and_worse_losses_are_not_improvements() {
        let dir = tempfile::tempdir().unwrap();
        let mut ckpt = CheckpointManager::new(dir.path(), "m").unwrap();
        assert!(!ckpt.is_improvement(f64::NAN));
        assert!(ckpt.is_improvement(10.0));

        ckpt.save_if_improved(&tiny_model(), 0.5).unwrap();
        assert!(!ckpt.is_improvement(0.5));
        assert!(!ckpt.is_improvement(0.7));
        assert!(ckpt.is_improvement(0.4));
    }

    #[test]
    fn test_checkpoint_written_only_on_improvement() {
        let dir = tempfile::tempdir().unwrap();
        let mut ckpt = CheckpointManager::new(dir.path(), "review").unwrap();
        assert!(!ckpt.has_checkpoint());

        // First epoch: anything finite is the best so far
        let first = tiny_model();
        assert!(ckpt.save_if_improved(&first, 0.69).unwrap());
        assert!(ckpt.has_checkpoint());
        assert!(ckpt.checkpoint_file().ends_with("review_best_loss.mpk"));
        let saved = fs::read(ckpt.checkpoint_file()).unwrap();

        // Worse epoch with different weights must not touch the file
        let worse = tiny_model();
        assert!(!ckpt.save_if_improved(&worse, 0.80).unwrap());
        assert_eq!(fs::read(ckpt.checkpoint_file()).unwrap(), saved);
        assert_eq!(ckpt.best_loss(), Some(0.69));

        // Better epoch replaces it
        assert!(ckpt.save_if_improved(&worse, 0.30).unwrap());
        assert_eq!(ckpt.best_loss(), Some(0.30));
    }

    #[test]
    fn test_load_without_checkpoint_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path(), "missing").unwrap();
        let err = ckpt.load_model(tiny_model(), &Default::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::CheckpointNotFound { .. })
        ));
    }

    #[test]
    fn test_open_without_config_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = CheckpointManager::open(dir.path()).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::CheckpointNotFound { .. })
        ));
    }

    #[test]
    fn test_config_roundtrip_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PipelineConfig { model_name: "imdb".to_string(), max_len: 40, ..PipelineConfig::default() };
        let ckpt = CheckpointManager::new(dir.path(), &cfg.model_name).unwrap();
        ckpt.save_config(&cfg).unwrap();

        let reopened = CheckpointManager::open(dir.path()).unwrap();
        assert_eq!(reopened.load_config().unwrap(), cfg);
        assert!(reopened.checkpoint_file().ends_with("imdb_best_loss.mpk"));
    }

    #[test]
    fn test_checkpoint_file_is_what_the_recorder_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let mut ckpt = CheckpointManager::new(dir.path(), "review").unwrap();
        assert!(ckpt.save_if_improved(&tiny_model(), 0.5).unwrap());

        let written: Vec<PathBuf> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(written, vec![ckpt.checkpoint_file()]);
        assert!(ckpt.has_checkpoint());

        let loaded = ckpt.load_model(tiny_model(), &Default::default());
        assert!(loaded.is_ok());
    }
}

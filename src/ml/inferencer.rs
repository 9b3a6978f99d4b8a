// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Rebuilds the trained model from pipeline_config.json, loads
// the best checkpoint into it and scores single reviews.
//
// Explicit token lists go through the same vocabulary cutoff as
// training data, so codes >= vocab_size score as OOV_ID instead
// of indexing past the embedding table.
//
// The score is the raw sigmoid output in [0, 1]. No threshold
// is applied here; callers decide what counts as positive.

use anyhow::Result;
use burn::prelude::*;

use crate::data::{padding::pad_sequence, preprocessor::Preprocessor};
use crate::domain::review::PAD_ID;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::SentimentModel;
use crate::ml::InferBackend;

pub struct Inferencer<B: Backend = InferBackend> {
    model:        SentimentModel<B>,
    preprocessor: Preprocessor,
    max_len:      usize,
    device:       B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let cfg       = ckpt_manager.load_config()?;
        let model_cfg = cfg.model_config();
        model_cfg.validate()?;

        let model: SentimentModel<B> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint (max_len={})", cfg.max_len);
        Ok(Self {
            model,
            preprocessor: Preprocessor::new(cfg.vocab_size, cfg.max_len),
            max_len: cfg.max_len,
            device,
        })
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Map out-of-vocabulary codes, pad `tokens` and run one forward
    /// pass. Returns the sigmoid score.
    pub fn predict(&self, tokens: &[u32]) -> Result<f32> {
        let mut codes = tokens.to_vec();
        let replaced = self.preprocessor.vocab_cutoff(&mut codes);
        if replaced > 0 {
            tracing::debug!("{} out-of-vocabulary codes mapped to OOV", replaced);
        }

        let padded: Vec<i32> = pad_sequence(&codes, self.max_len, PAD_ID)
            .into_iter()
            .map(|t| t as i32)
            .collect();

        let input = Tensor::<B, 1, Int>::from_ints(padded.as_slice(), &self.device)
            .reshape([1, self.max_len]);

        let score: f32 = self.model.forward(input).reshape([1]).into_scalar().elem::<f32>();
        tracing::debug!("Scored review of {} tokens: {:.6}", tokens.len(), score);
        Ok(score)
    }
}

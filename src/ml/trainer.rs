// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + evaluation loop using Burn's DataLoader and Adam.
//
// Per epoch:
//   1. Up to `train_steps` batches of forward → BCE loss →
//      backward → Adam step on the autodiff model
//   2. Up to `eval_steps` batches on model.valid(), the same
//      weights on the inner backend with no autodiff graph
//   3. Eval accuracy = sigmoid score on the label's side of 0.5
//   4. Checkpoint written only when eval loss is a new best
//
// Burn notes:
//   - model.valid() returns the model on B::InnerBackend, so
//     the eval loader must batch onto the inner backend too
//   - optim.step() consumes the model and hands back the
//     updated one
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use std::{path::PathBuf, sync::Arc};
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::config::PipelineConfig;
use crate::data::{batcher::{ReviewBatch, ReviewBatcher}, dataset::ReviewDataset};
use crate::domain::error::PipelineError;
use crate::infra::{checkpoint::CheckpointManager, metrics::{EpochMetrics, MetricsLogger}};
use crate::ml::model::{count_correct, SentimentModel};
use crate::ml::TrainBackend;

/// Loss and accuracy over (part of) a partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalOutcome {
    pub loss:     f64,
    pub accuracy: f64,
    pub samples:  usize,
}

/// What one training epoch consumed, with its sample-weighted loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainOutcome {
    pub loss:    f64,
    pub batches: usize,
    pub samples: usize,
}

/// What a finished run hands back to the use case.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub epochs:         Vec<EpochMetrics>,
    pub best_epoch:     Option<usize>,
    pub best_eval_loss: Option<f64>,
    pub checkpoint:     PathBuf,
}

pub fn run_training(
    cfg:           &PipelineConfig,
    train_dataset: ReviewDataset,
    eval_dataset:  ReviewDataset,
    ckpt_manager:  &mut CheckpointManager,
    metrics:       &MetricsLogger,
) -> Result<TrainingReport> {
    let device: <TrainBackend as Backend>::Device = Default::default();
    tracing::info!("Using device: {:?}", device);
    TrainBackend::seed(cfg.seed);
    train_loop::<TrainBackend>(cfg, train_dataset, eval_dataset, ckpt_manager, metrics, device)
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:           &PipelineConfig,
    train_dataset: ReviewDataset,
    eval_dataset:  ReviewDataset,
    ckpt_manager:  &mut CheckpointManager,
    metrics:       &MetricsLogger,
    device:        B::Device,
) -> Result<TrainingReport> {
    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = cfg.model_config();
    model_cfg.validate()?;
    let mut model: SentimentModel<B> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: vocab={}, max_len={}, recurrent steps={}",
        model_cfg.vocab_size,
        model_cfg.max_len,
        model_cfg.pooled_len()
    );

    let mut optim = AdamConfig::new().init();

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::new(ReviewBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    let eval_loader = DataLoaderBuilder::new(ReviewBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(eval_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut history    = Vec::with_capacity(cfg.epochs);
    let mut best_epoch = None;

    for epoch in 1..=cfg.epochs {
        let (trained, trained_on) = train_epoch(model, &mut optim, &train_loader, cfg.train_steps, cfg.lr)?;
        model = trained;

        let outcome  = evaluate(&model.valid(), &eval_loader, cfg.eval_steps)?;
        let improved = ckpt_manager.save_if_improved(&model, outcome.loss)?;
        if improved {
            best_epoch = Some(epoch);
        }

        let m = EpochMetrics {
            epoch,
            train_loss:    trained_on.loss,
            eval_loss:     outcome.loss,
            eval_accuracy: outcome.accuracy,
            improved,
        };
        println!("{}", m.summary(cfg.epochs, &cfg.metrics));
        metrics.log(&m)?;
        history.push(m);
    }

    tracing::info!("Training complete!");
    Ok(TrainingReport {
        epochs:         history,
        best_epoch,
        best_eval_loss: ckpt_manager.best_loss(),
        checkpoint:     ckpt_manager.checkpoint_file(),
    })
}

/// One pass over the train loader, capped at `max_steps` batches.
/// Returns the updated model and what the pass consumed.
pub fn train_epoch<B, O>(
    mut model: SentimentModel<B>,
    optim:     &mut O,
    loader:    &Arc<dyn DataLoader<ReviewBatch<B>>>,
    max_steps: Option<usize>,
    lr:        f64,
) -> Result<(SentimentModel<B>, TrainOutcome)>
where
    B: AutodiffBackend,
    O: Optimizer<SentimentModel<B>, B>,
{
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;
    let mut samples  = 0usize;

    for batch in loader.iter().take(max_steps.unwrap_or(usize::MAX)) {
        let batch_len = batch.labels.dims()[0];
        let out = model.forward_loss(batch.inputs, batch.labels)?;

        loss_sum += out.loss.clone().into_scalar().elem::<f64>() * batch_len as f64;
        batches  += 1;
        samples  += batch_len;

        let grads = out.loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(lr, model, grads);
    }

    if batches == 0 || samples == 0 {
        return Err(PipelineError::EmptySplit { split: "train" }.into());
    }
    tracing::debug!("Trained on {} batches ({} reviews)", batches, samples);
    Ok((model, TrainOutcome { loss: loss_sum / samples as f64, batches, samples }))
}

/// Loss and accuracy with no gradient tracking. The loss is
/// weighted by batch size, so a short final batch counts per review.
pub fn evaluate<B: Backend>(
    model:     &SentimentModel<B>,
    loader:    &Arc<dyn DataLoader<ReviewBatch<B>>>,
    max_steps: Option<usize>,
) -> Result<EvalOutcome> {
    let mut loss_sum = 0.0f64;
    let mut correct  = 0usize;
    let mut samples  = 0usize;

    for batch in loader.iter().take(max_steps.unwrap_or(usize::MAX)) {
        let batch_len = batch.labels.dims()[0];
        let out = model.forward_loss(batch.inputs, batch.labels.clone())?;

        loss_sum += out.loss.into_scalar().elem::<f64>() * batch_len as f64;
        samples  += batch_len;
        correct  += count_correct(out.probs, batch.labels);
    }

    if samples == 0 {
        return Err(PipelineError::EmptySplit { split: "eval" }.into());
    }
    Ok(EvalOutcome {
        loss:     loss_sum / samples as f64,
        accuracy: correct as f64 / samples as f64,
        samples,
    })
}

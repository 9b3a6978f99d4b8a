// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model, training and inference code lives here.
//
//   model.rs      — SentimentModel: embedding → conv1d → max pool
//                   → GRU → dense → dense(1) + sigmoid, plus the
//                   binary cross-entropy loss it is trained with
//
//   trainer.rs    — The epoch loop: forward/backward/Adam over the
//                   train partition, evaluation, best-checkpoint
//
//   inferencer.rs — Reloads the best checkpoint and scores one
//                   padded review
//
// Backend selection:
//   NdArray (CPU) by default so training is reproducible
//   anywhere; build with `--features wgpu` to run on the GPU.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Sentiment classifier architecture
pub mod model;

/// Training loop with evaluation and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and scores reviews
pub mod inferencer;

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

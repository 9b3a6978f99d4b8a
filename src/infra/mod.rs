// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that touch the filesystem:
//
//   checkpoint.rs — Best-loss checkpoint of the model weights
//                   via Burn's CompactRecorder, plus the
//                   pipeline_config.json needed to rebuild the
//                   model for inference.
//
//   metrics.rs    — Per-epoch metrics appended to metrics.csv,
//                   and the traced-metric console summary.
//
// Reference: Burn Book §5 (Checkpointing)
//            Rust Book §9 (Error Handling with anyhow)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

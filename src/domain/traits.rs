// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The training pipeline only needs "something that hands me a
// train partition and an eval partition". Programming against
// this trait lets the CLI swap the on-disk dataset for the
// seeded synthetic one without touching the use case.
//
// Implementations:
//   - JsonlReviewSource     → reads train.jsonl / test.jsonl
//   - SyntheticReviewSource → generates polarity-coded reviews

use crate::domain::error::PipelineError;
use crate::domain::review::Review;

/// Raw train and eval reviews, before cutoffs and padding.
#[derive(Debug, Clone, Default)]
pub struct RawSplits {
    pub train: Vec<Review>,
    pub eval:  Vec<Review>,
}

// ─── ReviewSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the two dataset partitions.
pub trait ReviewSource {
    /// Load both partitions. Implementations report a missing
    /// or unreadable source as `PipelineError::DatasetUnavailable`.
    fn load_splits(&self) -> Result<RawSplits, PipelineError>;

    /// Short human-readable description used in log lines.
    fn describe(&self) -> String;
}

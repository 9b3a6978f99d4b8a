// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// Every failure the pipeline can report on its own, as opposed
// to opaque errors bubbling up from burn or the filesystem.
// The application layer wraps these in anyhow::Error with
// extra context before they reach the user.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A dataset split could not be opened or read.
    #[error("dataset unavailable at '{path}': {reason}")]
    DatasetUnavailable { path: PathBuf, reason: String },

    /// One line of a dataset file could not be parsed.
    #[error("malformed record at {path}:{line}: {reason}")]
    MalformedRecord { path: PathBuf, line: usize, reason: String },

    /// A partition has no reviews left after the cutoffs were applied.
    #[error("the {split} partition is empty")]
    EmptySplit { split: &'static str },

    /// Two tensors (or parallel vectors) that must agree do not.
    #[error("shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context:  &'static str,
        expected: Vec<usize>,
        actual:   Vec<usize>,
    },

    /// Inference was asked for before any checkpoint was written.
    #[error("no checkpoint found at '{path}'; run `train` first")]
    CheckpointNotFound { path: PathBuf },

    /// The model topology cannot be built from the given settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

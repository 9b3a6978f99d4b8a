// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: each use case tells the data,
// ml and infra layers what to do, in order, and hands the
// result back to the CLI. No tensor code and no printing here.
//
// Reference: Clean Architecture pattern

// Hyperparameters and paths for one run
pub mod config;

// Load → cutoffs → pad → train → checkpoint
pub mod train_use_case;

// Reload checkpoint → score one review
pub mod predict_use_case;

// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types describing what the pipeline works on:
// reviews, their labels, the train/eval partitions, and the
// error conditions every other layer reports.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Keeping it free of tensors means padding, splitting and
// label handling can all be unit tested without a backend.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A single encoded review and the typed train/eval record
pub mod review;

// The error taxonomy shared by every layer
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;

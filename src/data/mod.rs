// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the dataset on disk and tensor batches.
//
//   train.jsonl / test.jsonl   (or SyntheticReviewSource)
//       │
//       ▼
//   ReviewSource      → raw encoded reviews, two partitions
//       │
//       ▼
//   Preprocessor      → vocabulary cutoff, length cutoff
//       │
//       ▼
//   padding           → every review exactly max_len tokens
//       │
//       ▼
//   ReviewDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   ReviewBatcher     → inputs [N, L], labels [N, 1]
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the review dataset (jsonl or synthetic)
pub mod loader;

/// Vocabulary and length cutoffs
pub mod preprocessor;

/// Fixed-length padding of token sequences
pub mod padding;

/// Implements Burn's Dataset trait for padded reviews
pub mod dataset;

/// Implements Burn's Batcher trait and the label reshape
pub mod batcher;

// ============================================================
// Layer 4 — Review Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<ReviewSample>
// into tensors the model can consume.
//
// How batching works here:
//   Input:  N ReviewSamples, each already padded to L tokens
//   Output: inputs  [N, L]  Int
//           labels  [N, 1]  Int
//
// Labels are reshaped from (N) to (N, 1) so they line up with
// the model's output, which is one sigmoid score per row.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::ReviewSample;

// ─── Label Reshape ────────────────────────────────────────────────────────────
/// Reshape a flat label vector (N) into N rows of one column.
pub fn reshape_labels(labels: &[u8]) -> Vec<[u8; 1]> {
    labels.iter().map(|&l| [l]).collect()
}

// ─── ReviewBatch ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct ReviewBatch<B: Backend> {
    /// Padded token ids — shape: [batch_size, max_len]
    pub inputs: Tensor<B, 2, Int>,

    /// Ground-truth polarity — shape: [batch_size, 1]
    pub labels: Tensor<B, 2, Int>,
}

// ─── ReviewBatcher ────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct ReviewBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ReviewBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ReviewSample, ReviewBatch<B>> for ReviewBatcher<B> {
    fn batch(&self, items: Vec<ReviewSample>) -> ReviewBatch<B> {
        let batch_size = items.len();
        // All rows were padded to the same length upstream
        let seq_len = items.first().map_or(0, |s| s.tokens.len());

        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.tokens.iter().map(|&t| t as i32))
            .collect();

        let raw_labels: Vec<u8> = items.iter().map(|s| s.label).collect();
        let label_flat: Vec<i32> = reshape_labels(&raw_labels)
            .iter()
            .map(|row| row[0] as i32)
            .collect();

        let inputs = Tensor::<B, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device,
        ).reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(
            label_flat.as_slice(), &self.device,
        ).reshape([batch_size, 1]);

        ReviewBatch { inputs, labels }
    }
}

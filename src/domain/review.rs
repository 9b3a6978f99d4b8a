// ============================================================
// Layer 3 — Review Domain Types
// ============================================================
// A review arrives already integer-encoded: every word has been
// replaced by its frequency rank in the corpus vocabulary, so
// "the" is a small number and rare words are large numbers.
//
// Example:
//   Text:   "this film was great"
//   Tokens: [1, 14, 22, 16, 43]     (1 = start-of-review marker)
//   Label:  1                        (positive)
//
// ReviewSplits replaces an ad hoc nested map of
// {"train": {...}, "eval": {...}} with named fields.

use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

/// Token id written into every padded position.
pub const PAD_ID: u32 = 0;

/// Token id that marks the start of a review.
pub const START_ID: u32 = 1;

/// Token id substituted for any rank outside the vocabulary cutoff.
pub const OOV_ID: u32 = 2;

/// Sentiment polarity of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Positive,
}

impl Sentiment {
    /// Map a raw 0/1 label into a Sentiment.
    /// Any other value is rejected.
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(Self::Negative),
            1 => Some(Self::Positive),
            _ => None,
        }
    }

    pub fn label(self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }
}

/// One encoded review exactly as read from the dataset source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Word-rank codes, unpadded
    pub tokens: Vec<u32>,

    /// Ground-truth polarity
    pub sentiment: Sentiment,
}

impl Review {
    pub fn new(tokens: Vec<u32>, sentiment: Sentiment) -> Self {
        Self { tokens, sentiment }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// The two named partitions of the dataset.
///
/// Inputs and labels are parallel vectors: `train_labels[i]`
/// belongs to `train_inputs[i]`. Use [`ReviewSplits::new`] to
/// build one so the lengths are checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSplits {
    pub train_inputs: Vec<Vec<u32>>,
    pub train_labels: Vec<u8>,
    pub eval_inputs:  Vec<Vec<u32>>,
    pub eval_labels:  Vec<u8>,
}

impl ReviewSplits {
    /// Build a split record, rejecting mismatched input/label counts.
    pub fn new(
        train_inputs: Vec<Vec<u32>>,
        train_labels: Vec<u8>,
        eval_inputs:  Vec<Vec<u32>>,
        eval_labels:  Vec<u8>,
    ) -> Result<Self, PipelineError> {
        if train_inputs.len() != train_labels.len() {
            return Err(PipelineError::ShapeMismatch {
                context:  "train partition inputs vs labels",
                expected: vec![train_inputs.len()],
                actual:   vec![train_labels.len()],
            });
        }
        if eval_inputs.len() != eval_labels.len() {
            return Err(PipelineError::ShapeMismatch {
                context:  "eval partition inputs vs labels",
                expected: vec![eval_inputs.len()],
                actual:   vec![eval_labels.len()],
            });
        }
        Ok(Self { train_inputs, train_labels, eval_inputs, eval_labels })
    }

    /// Build a split record from two lists of reviews.
    pub fn from_reviews(train: Vec<Review>, eval: Vec<Review>) -> Self {
        let (train_inputs, train_labels) = unzip_reviews(train);
        let (eval_inputs, eval_labels)   = unzip_reviews(eval);
        Self { train_inputs, train_labels, eval_inputs, eval_labels }
    }

    pub fn train_len(&self) -> usize {
        self.train_inputs.len()
    }

    pub fn eval_len(&self) -> usize {
        self.eval_inputs.len()
    }

    /// Apply `f` to the input rows of each partition in turn.
    /// Labels are left untouched.
    pub fn map_inputs<F>(self, mut f: F) -> Self
    where
        F: FnMut(Vec<Vec<u32>>) -> Vec<Vec<u32>>,
    {
        Self {
            train_inputs: f(self.train_inputs),
            train_labels: self.train_labels,
            eval_inputs:  f(self.eval_inputs),
            eval_labels:  self.eval_labels,
        }
    }
}

fn unzip_reviews(reviews: Vec<Review>) -> (Vec<Vec<u32>>, Vec<u8>) {
    reviews
        .into_iter()
        .map(|r| (r.tokens, r.sentiment.label()))
        .unzip()
}

// ============================================================
// Layer 4 — Review Loaders
// ============================================================
// Two implementations of the ReviewSource trait:
//
//   JsonlReviewSource
//     Reads the fixed, already-encoded review dataset from
//     <data_dir>/train.jsonl and <data_dir>/test.jsonl.
//     One JSON object per line:
//       {"tokens": [1, 14, 22, 16, 43], "label": 1}
//     Blank lines are ignored.
//
//   SyntheticReviewSource
//     Generates a small polarity-coded corpus from a seed.
//     Positive reviews lean on the lower half of the vocabulary,
//     negative reviews on the upper half, so a model can learn
//     the split in a handful of steps. Used for demos and tests.
//
// Reference: serde_json documentation
//            rand crate documentation

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;

use crate::domain::error::PipelineError;
use crate::domain::review::{Review, Sentiment, OOV_ID, START_ID};
use crate::domain::traits::{RawSplits, ReviewSource};

pub const TRAIN_FILE: &str = "train.jsonl";
pub const EVAL_FILE:  &str = "test.jsonl";

// ─── JsonlReviewSource ────────────────────────────────────────────────────────
pub struct JsonlReviewSource {
    dir: PathBuf,
}

/// On-disk shape of one dataset line
#[derive(Debug, Deserialize)]
struct RawRecord {
    tokens: Vec<u32>,
    label:  u8,
}

impl JsonlReviewSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReviewSource for JsonlReviewSource {
    fn load_splits(&self) -> Result<RawSplits, PipelineError> {
        let train = read_jsonl(&self.dir.join(TRAIN_FILE))?;
        let eval  = read_jsonl(&self.dir.join(EVAL_FILE))?;
        tracing::info!(
            "Read {} train and {} eval reviews from '{}'",
            train.len(),
            eval.len(),
            self.dir.display()
        );
        Ok(RawSplits { train, eval })
    }

    fn describe(&self) -> String {
        format!("jsonl dataset in '{}'", self.dir.display())
    }
}

/// Parse one split file into reviews.
fn read_jsonl(path: &Path) -> Result<Vec<Review>, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::DatasetUnavailable {
        path:   path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut reviews = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| PipelineError::DatasetUnavailable {
            path:   path.to_path_buf(),
            reason: format!("read failed at line {line_no}: {e}"),
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let record: RawRecord = serde_json::from_str(&line).map_err(|e| {
            PipelineError::MalformedRecord {
                path:   path.to_path_buf(),
                line:   line_no,
                reason: e.to_string(),
            }
        })?;

        let sentiment = Sentiment::from_label(record.label).ok_or_else(|| {
            PipelineError::MalformedRecord {
                path:   path.to_path_buf(),
                line:   line_no,
                reason: format!("label must be 0 or 1, got {}", record.label),
            }
        })?;

        reviews.push(Review::new(record.tokens, sentiment));
    }

    tracing::debug!("Parsed {} reviews from '{}'", reviews.len(), path.display());
    Ok(reviews)
}

// ─── SyntheticReviewSource ────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SyntheticReviewSource {
    pub train_size: usize,
    pub eval_size:  usize,
    pub vocab_size: usize,
    pub min_len:    usize,
    pub max_len:    usize,
    pub seed:       u64,
}

// Probability that a word is drawn from the review's own polarity band
const SIGNAL: f64 = 0.7;

impl SyntheticReviewSource {
    pub fn new(train_size: usize, eval_size: usize, vocab_size: usize, max_len: usize, seed: u64) -> Self {
        Self {
            train_size,
            eval_size,
            vocab_size,
            min_len: (max_len / 2).max(2),
            max_len,
            seed,
        }
    }

    fn generate(&self, rng: &mut StdRng, count: usize) -> Vec<Review> {
        let first = OOV_ID + 1;
        let mid   = first + (self.vocab_size as u32 - first) / 2;
        let end   = self.vocab_size as u32;

        (0..count)
            .map(|i| {
                // Alternate labels so every partition is balanced
                let sentiment = if i % 2 == 0 { Sentiment::Positive } else { Sentiment::Negative };
                let band = match sentiment {
                    Sentiment::Positive => first..mid,
                    Sentiment::Negative => mid..end,
                };

                let len = rng.gen_range(self.min_len..=self.max_len);
                let mut tokens = Vec::with_capacity(len);
                tokens.push(START_ID);
                while tokens.len() < len {
                    let code = if rng.gen_bool(SIGNAL) {
                        rng.gen_range(band.clone())
                    } else {
                        rng.gen_range(first..end)
                    };
                    tokens.push(code);
                }
                Review::new(tokens, sentiment)
            })
            .collect()
    }
}

impl ReviewSource for SyntheticReviewSource {
    fn load_splits(&self) -> Result<RawSplits, PipelineError> {
        // Need at least two codes in each polarity band
        if self.vocab_size < (OOV_ID as usize + 1) + 4 {
            return Err(PipelineError::InvalidConfig(format!(
                "synthetic data needs vocab_size >= 7, got {}",
                self.vocab_size
            )));
        }
        if self.min_len < 1 || self.min_len > self.max_len {
            return Err(PipelineError::InvalidConfig(format!(
                "synthetic review length range {}..={} is empty",
                self.min_len, self.max_len
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let train = self.generate(&mut rng, self.train_size);
        let eval  = self.generate(&mut rng, self.eval_size);
        tracing::info!(
            "Generated {} train and {} eval synthetic reviews (seed={})",
            train.len(),
            eval.len(),
            self.seed
        );
        Ok(RawSplits { train, eval })
    }

    fn describe(&self) -> String {
        format!("synthetic reviews (seed={})", self.seed)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_directory_is_dataset_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let src = JsonlReviewSource::new(dir.path().join("nope"));
        let err = src.load_splits().unwrap_err();
        assert!(matches!(err, PipelineError::DatasetUnavailable { .. }));
    }

    #[test]
    fn test_reads_both_splits_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(TRAIN_FILE),
            "{\"tokens\": [1, 14, 22], \"label\": 1}\n\n{\"tokens\": [1, 9], \"label\": 0}\n",
        )
        .unwrap();
        fs::write(dir.path().join(EVAL_FILE), "{\"tokens\": [1], \"label\": 1}\n").unwrap();

        let splits = JsonlReviewSource::new(dir.path()).load_splits().unwrap();
        assert_eq!(splits.train.len(), 2);
        assert_eq!(splits.train[0].tokens, vec![1, 14, 22]);
        assert_eq!(splits.train[1].sentiment, Sentiment::Negative);
        assert_eq!(splits.eval.len(), 1);
    }

    #[test]
    fn test_bad_label_is_malformed_record() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TRAIN_FILE), "{\"tokens\": [1], \"label\": 3}\n").unwrap();
        fs::write(dir.path().join(EVAL_FILE), "").unwrap();

        let err = JsonlReviewSource::new(dir.path()).load_splits().unwrap_err();
        match err {
            PipelineError::MalformedRecord { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_synthetic_source_is_seeded_and_balanced() {
        let src = SyntheticReviewSource::new(4, 2, 50, 10, 7);
        let a = src.load_splits().unwrap();
        let b = src.load_splits().unwrap();
        assert_eq!(a.train, b.train);

        let positives = a.train.iter().filter(|r| r.sentiment == Sentiment::Positive).count();
        assert_eq!(positives, 2);
        assert!(a.train.iter().all(|r| r.len() <= 10 && r.tokens[0] == START_ID));
        assert!(a.train.iter().flat_map(|r| r.tokens.iter()).all(|&t| (t as usize) < 50));
    }

    #[test]
    fn test_synthetic_source_rejects_tiny_vocab() {
        let src = SyntheticReviewSource::new(4, 2, 5, 10, 7);
        assert!(matches!(src.load_splits(), Err(PipelineError::InvalidConfig(_))));
    }
}

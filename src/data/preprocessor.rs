// ============================================================
// Layer 4 — Review Preprocessor
// ============================================================
// Applies the two dataset cutoffs to raw encoded reviews before
// they are padded:
//
//   1. Vocabulary cutoff
//      Codes are word frequency ranks. Only the `vocab_size`
//      most frequent words get their own embedding row; every
//      code >= vocab_size is replaced by OOV_ID.
//
//   2. Length cutoff
//      Reviews longer than `max_len` are dropped entirely
//      rather than clipped, matching how the fixed review
//      dataset is served. This also means padding never has
//      to truncate real data in practice.
//
// Example with vocab_size = 100, max_len = 4:
//   [1, 14, 522, 16]      → [1, 14, 2, 16]   (522 out of vocab)
//   [1, 14, 22, 16, 43]   → dropped          (5 > 4)

use crate::domain::review::{Review, OOV_ID};

/// Counts of what the cutoffs did, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CutoffStats {
    pub kept:             usize,
    pub dropped_too_long: usize,
    pub oov_replaced:     usize,
}

pub struct Preprocessor {
    vocab_size: usize,
    max_len:    usize,
}

impl Preprocessor {
    pub fn new(vocab_size: usize, max_len: usize) -> Self {
        Self { vocab_size, max_len }
    }

    /// Vocabulary cutoff only, in place. Returns how many codes
    /// were replaced. Inference uses this on reviews that never
    /// went through the length cutoff.
    pub fn vocab_cutoff(&self, tokens: &mut [u32]) -> usize {
        let limit = self.vocab_size as u64;
        let mut replaced = 0usize;
        for code in tokens.iter_mut() {
            if u64::from(*code) >= limit {
                *code = OOV_ID;
                replaced += 1;
            }
        }
        replaced
    }

    /// Apply both cutoffs to a whole partition.
    pub fn apply_all(&self, reviews: Vec<Review>) -> (Vec<Review>, CutoffStats) {
        let mut stats = CutoffStats::default();
        let mut kept  = Vec::with_capacity(reviews.len());

        for review in reviews {
            match self.apply_counted(review) {
                Some((r, replaced)) => {
                    stats.oov_replaced += replaced;
                    kept.push(r);
                }
                None => stats.dropped_too_long += 1,
            }
        }

        stats.kept = kept.len();
        (kept, stats)
    }

    fn apply_counted(&self, mut review: Review) -> Option<(Review, usize)> {
        if review.len() > self.max_len {
            return None;
        }

        let replaced = self.vocab_cutoff(&mut review.tokens);
        Some((review, replaced))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::Sentiment;

    fn review(tokens: &[u32]) -> Review {
        Review::new(tokens.to_vec(), Sentiment::Positive)
    }

    #[test]
    fn test_out_of_vocab_codes_are_replaced() {
        let p = Preprocessor::new(100, 10);
        let (kept, _) = p.apply_all(vec![review(&[1, 14, 522, 99, 100])]);
        assert_eq!(kept[0].tokens, vec![1, 14, OOV_ID, 99, OOV_ID]);
    }

    #[test]
    fn test_vocab_cutoff_ignores_length() {
        let p = Preprocessor::new(30, 2);
        let mut tokens = vec![1, 14, 5000, 29, 30];
        assert_eq!(p.vocab_cutoff(&mut tokens), 2);
        assert_eq!(tokens, vec![1, 14, OOV_ID, 29, OOV_ID]);
    }

    #[test]
    fn test_over_length_reviews_are_dropped() {
        let p = Preprocessor::new(100, 4);
        let (kept, stats) = p.apply_all(vec![review(&[1, 2, 3, 4, 5]), review(&[1, 2, 3, 4])]);
        assert_eq!(kept, vec![review(&[1, 2, 3, 4])]);
        assert_eq!(stats.dropped_too_long, 1);
    }

    #[test]
    fn test_apply_all_reports_stats() {
        let p = Preprocessor::new(10, 3);
        let (kept, stats) = p.apply_all(vec![
            review(&[1, 50]),
            review(&[1, 2, 3, 4]),
            review(&[1, 2]),
        ]);
        assert_eq!(kept.len(), 2);
        assert_eq!(stats, CutoffStats { kept: 2, dropped_too_long: 1, oov_replaced: 1 });
    }
}

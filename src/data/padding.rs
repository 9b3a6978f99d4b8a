// ============================================================
// Layer 4 — Sequence Padding
// ============================================================
// The model consumes fixed-shape [batch, max_len] tensors, so
// every review must end up exactly max_len tokens long.
//
//   Short review:  [1, 14, 22]            target 6, fill 0
//               →  [1, 14, 22, 0, 0, 0]
//
//   Long review:   [1, 14, 22, 16, 43, 9, 7]   target 6
//               →  [1, 14, 22, 16, 43, 9]      (tail dropped)
//
// Padding is appended at the end. Over-length input is
// truncated to its first `target_len` tokens, so the output
// length is always exactly `target_len`. Appending
// `target_len - len` fill values without that truncation would
// underflow and leave long reviews longer than the tensor row.

/// Pad (or truncate) one sequence to exactly `target_len` tokens.
pub fn pad_sequence(tokens: &[u32], target_len: usize, fill: u32) -> Vec<u32> {
    let mut out = Vec::with_capacity(target_len);
    out.extend(tokens.iter().copied().take(target_len));
    out.resize(target_len, fill);
    out
}

/// Owned variant used when the caller no longer needs the input.
pub fn pad_owned(mut tokens: Vec<u32>, target_len: usize, fill: u32) -> Vec<u32> {
    tokens.truncate(target_len);
    tokens.resize(target_len, fill);
    tokens
}

/// Pad every sequence in `sequences` to `target_len`.
pub fn pad_all(sequences: Vec<Vec<u32>>, target_len: usize, fill: u32) -> Vec<Vec<u32>> {
    sequences
        .into_iter()
        .map(|s| pad_owned(s, target_len, fill))
        .collect()
}

//! Subsequence scoring over plain strings.
//!
//! A field score lies in `(0, 1]` for a match and is `0.0` otherwise. It is
//! the sum of squared run lengths of matched characters divided by
//! `query_len * text_len`: one contiguous run beats the same characters
//! scattered, and a run covering the whole text scores exactly 1.

use nucleo_matcher::{Config, Matcher, Utf32Str};

/// Score for a case-insensitive exact match on the leaf segment
pub const EXACT_LEAF_SCORE: f64 = 1000.0;

/// Floor for any record whose leaf matches
pub const LEAF_BASE: f64 = 100.0;

pub const LEAF_WEIGHT: f64 = 400.0;

/// Weight of the full-path field, for both leaf and ancestor-only matches
pub const PATH_WEIGHT: f64 = 100.0;

/// Ceiling of the bonus when the leaf starts with the query
pub const PREFIX_BONUS: f64 = 50.0;

pub(crate) fn new_matcher() -> Matcher {
    let mut config = Config::DEFAULT.match_paths();
    config.ignore_case = true;
    config.normalize = false;
    Matcher::new(config)
}

/// Score `query` against `text` as a case-insensitive subsequence.
///
/// Pure and total; builds its own matcher. Hot loops should go through
/// [`SearchEngine`](super::SearchEngine) instead.
#[must_use]
pub fn fuzzy_score(query: &str, text: &str) -> f64 {
    let mut matcher = new_matcher();
    let mut indices = Vec::new();
    field_score(&mut matcher, &mut indices, &query.to_lowercase(), text)
}

/// Field score with caller-provided matcher state. `query` must already be lowercase.
pub(crate) fn field_score(
    matcher: &mut Matcher,
    indices: &mut Vec<u32>,
    query: &str,
    text: &str,
) -> f64 {
    if query.is_empty() || text.is_empty() {
        return 0.0;
    }

    let mut haystack_buf = Vec::new();
    let mut needle_buf = Vec::new();
    let haystack = Utf32Str::new(text, &mut haystack_buf);
    let needle = Utf32Str::new(query, &mut needle_buf);

    indices.clear();
    if matcher.fuzzy_indices(haystack, needle, indices).is_none() {
        return 0.0;
    }
    indices.sort_unstable();
    indices.dedup();

    run_score(indices, needle.len(), haystack.len())
}

/// Squared-run score for sorted, deduplicated match positions
// Lengths stay far below 2^52
#[allow(clippy::cast_precision_loss)]
pub(crate) fn run_score(indices: &[u32], query_len: usize, text_len: usize) -> f64 {
    if indices.is_empty() || query_len == 0 || text_len == 0 {
        return 0.0;
    }

    let mut sum_sq = 0usize;
    let mut run = 1usize;
    for pair in indices.windows(2) {
        if pair[1] == pair[0] + 1 {
            run += 1;
        } else {
            sum_sq += run * run;
            run = 1;
        }
    }
    sum_sq += run * run;

    (sum_sq as f64 / (query_len * text_len) as f64).min(1.0)
}

use super::MatchResult;
use super::scoring::{
    EXACT_LEAF_SCORE, LEAF_BASE, LEAF_WEIGHT, PATH_WEIGHT, PREFIX_BONUS, field_score, new_matcher,
};
use crate::store::WorkspaceRecord;
use nucleo_matcher::Matcher;
use std::cmp::Ordering;
use tracing::debug;

/// Fuzzy ranking of workspace records, reusing one nucleo matcher across calls
pub struct SearchEngine {
    matcher: Matcher,
    indices: Vec<u32>,
}

impl SearchEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            matcher: new_matcher(),
            indices: Vec::new(),
        }
    }

    /// Rank `records` against `query`.
    ///
    /// A blank query lists every record by recency. Otherwise only records
    /// whose leaf or full path contains the query as a case-insensitive
    /// subsequence are returned, best first. `\` in the query matches `/` in
    /// the path, so a Windows path typed as displayed still matches. Never
    /// fails.
    pub fn rank<'a>(&mut self, query: &str, records: &'a [WorkspaceRecord]) -> Vec<MatchResult<'a>> {
        let query = query.trim();
        if query.is_empty() {
            return rank_by_recency(records);
        }

        let query_lower = query.to_lowercase().replace('\\', "/");
        let mut results: Vec<MatchResult<'a>> = records
            .iter()
            .filter_map(|record| {
                let score = self.score_record(&query_lower, record);
                (score > 0.0).then(|| MatchResult::new(record, score))
            })
            .collect();

        results.sort_by(compare_results);

        debug!(
            "Query {query:?} matched {} of {} workspaces",
            results.len(),
            records.len()
        );
        results
    }

    /// Score one record; 0.0 means no match.
    fn score_record(&mut self, query_lower: &str, record: &WorkspaceRecord) -> f64 {
        let leaf = record.leaf();
        let leaf_lower = leaf.to_lowercase();
        if query_lower == leaf_lower {
            return EXACT_LEAF_SCORE;
        }

        let path_field = field_score(
            &mut self.matcher,
            &mut self.indices,
            query_lower,
            record.normalized_path(),
        );
        let leaf_field = field_score(&mut self.matcher, &mut self.indices, query_lower, leaf);

        if leaf_field > 0.0 {
            LEAF_BASE
                + LEAF_WEIGHT * leaf_field
                + PATH_WEIGHT * path_field
                + leaf_prefix_bonus(query_lower, &leaf_lower)
        } else {
            PATH_WEIGHT * path_field
        }
    }
}

/// Bonus for a leaf that starts with the query, scaled by how much of the
/// leaf the query covers. Both inputs are already lowercased.
// Character counts fit comfortably in f64
#[allow(clippy::cast_precision_loss)]
fn leaf_prefix_bonus(query_lower: &str, leaf_lower: &str) -> f64 {
    if query_lower.is_empty() || query_lower == leaf_lower || !leaf_lower.starts_with(query_lower) {
        return 0.0;
    }
    let coverage = query_lower.chars().count() as f64 / leaf_lower.chars().count() as f64;
    PREFIX_BONUS * coverage
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Rank with a throwaway engine
#[must_use]
pub fn rank<'a>(query: &str, records: &'a [WorkspaceRecord]) -> Vec<MatchResult<'a>> {
    SearchEngine::new().rank(query, records)
}

/// Most recent first, undated records after dated ones in input order.
/// Scores count down from `records.len()` so they stay positive and ordered.
// Record counts fit comfortably in f64
#[allow(clippy::cast_precision_loss)]
fn rank_by_recency(records: &[WorkspaceRecord]) -> Vec<MatchResult<'_>> {
    let mut ordered: Vec<&WorkspaceRecord> = records.iter().collect();
    ordered.sort_by(|a, b| compare_recency(a, b));

    let total = ordered.len();
    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, record)| MatchResult::new(record, (total - idx) as f64))
        .collect()
}

fn compare_recency(a: &WorkspaceRecord, b: &WorkspaceRecord) -> Ordering {
    match (a.last_accessed, b.last_accessed) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Score descending, then recency, then normalized path ascending
fn compare_results(a: &MatchResult<'_>, b: &MatchResult<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| compare_recency(a.record, b.record))
        .then_with(|| a.record.normalized_path().cmp(b.record.normalized_path()))
}

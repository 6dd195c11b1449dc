//! Property tests for normalization and ranking invariants

use crate::location::{NormalizeOptions, normalize_with};
use crate::search::{fuzzy_score, rank};
use crate::store::{WorkspaceRecord, dedup_records};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._-]{1,12}"
}

fn arb_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_segment(), 1..5)
}

fn arb_raw_location() -> impl Strategy<Value = String> {
    prop_oneof![
        (prop::sample::select(vec!['C', 'd', 'E']), arb_segments())
            .prop_map(|(drive, segs)| format!("{drive}:\\{}", segs.join("\\"))),
        (prop::sample::select(vec!["wsl$", "wsl.localhost"]), arb_segment(), arb_segments())
            .prop_map(|(host, distro, segs)| format!("\\\\{host}\\{distro}\\{}", segs.join("\\"))),
        arb_segments().prop_map(|segs| format!("/{}", segs.join("/"))),
        (arb_segment(), arb_segment(), arb_segments())
            .prop_map(|(server, share, segs)| format!("\\\\{server}\\{share}\\{}", segs.join("\\"))),
    ]
}

fn arb_records() -> impl Strategy<Value = Vec<WorkspaceRecord>> {
    prop::collection::vec((arb_raw_location(), prop::option::of(0i64..1_000_000)), 0..24).prop_map(
        |rows| {
            rows.into_iter()
                .filter_map(|(raw, secs)| {
                    let ts = secs.and_then(|s| Utc.timestamp_opt(s, 0).single());
                    WorkspaceRecord::from_raw(&raw, ts, None, NormalizeOptions::WINDOWS_HOST).ok()
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn normalize_is_deterministic(raw in ".{0,64}") {
        let first = normalize_with(&raw, NormalizeOptions::WINDOWS_HOST);
        let second = normalize_with(&raw, NormalizeOptions::WINDOWS_HOST);
        prop_assert_eq!(first.ok(), second.ok());
    }

    #[test]
    fn recognized_shapes_always_normalize(raw in arb_raw_location()) {
        let location = normalize_with(&raw, NormalizeOptions::WINDOWS_HOST).unwrap();
        prop_assert!(!location.leaf.is_empty());
        let lower = raw.to_lowercase();
        let is_wsl_share = lower.starts_with("\\\\wsl$\\") || lower.starts_with("\\\\wsl.localhost\\");
        prop_assert_eq!(location.distro.is_some(), is_wsl_share);
    }

    #[test]
    fn separator_and_case_variants_share_normalized_path(raw in arb_raw_location()) {
        prop_assume!(!raw.starts_with('/'));
        prop_assume!(!raw.to_lowercase().starts_with("\\\\wsl"));
        let a = normalize_with(&raw, NormalizeOptions::WINDOWS_HOST).unwrap();
        let variant = format!("{}\\", raw.replace('\\', "/").to_uppercase());
        let b = normalize_with(&variant, NormalizeOptions::WINDOWS_HOST).unwrap();
        prop_assert_eq!(a.normalized_path, b.normalized_path);
    }

    #[test]
    fn fuzzy_score_in_unit_interval(query in ".{0,16}", text in ".{0,48}") {
        let score = fuzzy_score(&query, &text);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn rank_never_panics(query in ".{0,32}", records in arb_records()) {
        let _ = rank(&query, &records);
    }

    #[test]
    fn rank_scores_positive_and_sorted(query in "[a-z/]{0,6}", records in arb_records()) {
        let results = rank(&query, &records);
        prop_assert!(results.iter().all(|r| r.score > 0.0));
        for pair in results.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.score >= b.score);
            if a.score == b.score {
                match (a.record.last_accessed, b.record.last_accessed) {
                    (Some(x), Some(y)) => {
                        prop_assert!(x >= y);
                        if x == y {
                            prop_assert!(a.record.normalized_path() <= b.record.normalized_path());
                        }
                    }
                    (None, Some(_)) => prop_assert!(false, "undated ranked before dated"),
                    (None, None) => {
                        prop_assert!(a.record.normalized_path() <= b.record.normalized_path());
                    }
                    (Some(_), None) => {}
                }
            }
        }
    }

    #[test]
    fn empty_query_returns_every_record(records in arb_records()) {
        let results = rank("", &records);
        prop_assert_eq!(results.len(), records.len());
    }

    #[test]
    fn dedup_leaves_unique_paths(records in arb_records()) {
        let total = records.len();
        let (kept, dropped) = dedup_records(records);
        let unique: HashSet<_> = kept.iter().map(WorkspaceRecord::normalized_path).collect();
        prop_assert_eq!(unique.len(), kept.len());
        prop_assert_eq!(kept.len() + dropped, total);
    }
}

//! Cross-module tests for zedws-core
//!
//! - Store reading against sqlite files shaped like Zed's database
//! - Ranking properties over normalized records
//! - Full query cycles through `WorkspaceSearch`
//! - Property tests for normalization and ranking invariants

// Test modules use exact float comparisons
#![allow(clippy::float_cmp)]

mod proptest_tests;

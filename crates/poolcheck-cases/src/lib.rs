//! # poolcheck-cases
//!
//! The ordered catalog of test cases. Every case starts on a freshly
//! created pool and works below [`TestContext::root_dataset`], which it
//! creates itself.
//!
//! [`TestContext::root_dataset`]: poolcheck_harness::context::TestContext::root_dataset

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

mod bookmarks;
mod datasets;
mod snapshots;
pub mod zfs;

use poolcheck_harness::case::TestCase;

/// All registered cases, in run order.
pub static CASES: &[TestCase] = &[
    TestCase::new("root_dataset_lifecycle", datasets::root_dataset_lifecycle),
    TestCase::new("nested_datasets_are_listed", datasets::nested_datasets_are_listed),
    TestCase::new("snapshot_create_and_list", snapshots::snapshot_create_and_list),
    TestCase::new("snapshot_destroy", snapshots::snapshot_destroy),
    TestCase::new("rollback_discards_newer_snapshots", snapshots::rollback_discards_newer_snapshots),
    TestCase::new("hold_blocks_snapshot_destroy", snapshots::hold_blocks_snapshot_destroy),
    TestCase::new("bookmark_survives_snapshot_destroy", bookmarks::bookmark_survives_snapshot_destroy),
    TestCase::new("bookmark_requires_existing_snapshot", bookmarks::bookmark_requires_existing_snapshot),
];

/// Returns the cases whose name contains `filter`, or all cases.
#[must_use]
pub fn select(filter: Option<&str>) -> Vec<TestCase> {
    CASES
        .iter()
        .filter(|c| filter.is_none_or(|f| c.name.contains(f)))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn case_names_are_unique() {
        let names: HashSet<_> = CASES.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), CASES.len());
    }

    #[test]
    fn select_without_filter_keeps_order() {
        let all = select(None);
        assert_eq!(all.len(), CASES.len());
        assert_eq!(all[0].name, "root_dataset_lifecycle");
    }

    #[test]
    fn select_filters_by_substring() {
        let names: Vec<_> = select(Some("bookmark")).iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "bookmark_survives_snapshot_destroy",
                "bookmark_requires_existing_snapshot"
            ]
        );
        assert!(select(Some("no-such-case")).is_empty());
    }
}

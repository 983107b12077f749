//! # Property-Based Tests
//!
//! Verification of store and analysis invariants using proptest.

#![allow(clippy::unwrap_used, clippy::panic)]

use proptest::collection::btree_set;
use proptest::prelude::*;
use tidemark_core::{
    DailySnapshot, DayStamp, MemoryStore, Platform, SnapshotInput, StatStore, compute_growth,
};

fn snapshot(platform: Platform, day: u32, followers: u64, posts: u64) -> DailySnapshot {
    DailySnapshot {
        platform,
        day: DayStamp::new(day),
        followers,
        posts,
        engagement: None,
        recorded_at: 0,
    }
}

fn any_platform() -> impl Strategy<Value = Platform> {
    prop_oneof![
        Just(Platform::Instagram),
        Just(Platform::Facebook),
        Just(Platform::Threads),
    ]
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Saving a valid snapshot makes it visible to a range query from its day.
    #[test]
    fn save_then_range_round_trips(
        platform in any_platform(),
        day in 0u32..60_000,
        followers in 0u64..1_000_000_000,
        posts in 0u64..1_000_000,
    ) {
        let mut store = MemoryStore::new();
        let snap = snapshot(platform, day, followers, posts);

        store.put(snap.clone()).expect("put");
        let window = store.range_since(platform, DayStamp::new(day)).expect("range");

        prop_assert_eq!(window, vec![snap]);
    }

    /// Writing the same (platform, day) twice keeps only the second value.
    #[test]
    fn same_day_overwrite_keeps_latest(
        platform in any_platform(),
        day in 0u32..60_000,
        first in 0u64..1_000_000,
        second in 0u64..1_000_000,
    ) {
        let mut store = MemoryStore::new();
        store.put(snapshot(platform, day, first, 0)).expect("put");
        store.put(snapshot(platform, day, second, 0)).expect("put");

        prop_assert_eq!(store.snapshot_count(platform).expect("count"), 1);
        let loaded = store.get(platform, DayStamp::new(day)).expect("get").expect("present");
        prop_assert_eq!(loaded.followers, second);
    }

    /// A range query returns exactly the days at or after the cutoff.
    #[test]
    fn range_since_selects_exact_day_set(
        days in btree_set(0u32..2000, 0..40),
        since in 0u32..2000,
    ) {
        let mut store = MemoryStore::new();
        for &day in &days {
            store.put(snapshot(Platform::Instagram, day, 1, 0)).expect("put");
        }

        let window = store.range_since(Platform::Instagram, DayStamp::new(since)).expect("range");
        let returned: std::collections::BTreeSet<u32> =
            window.iter().map(|s| s.day.value()).collect();
        let expected: std::collections::BTreeSet<u32> =
            days.iter().copied().filter(|&d| d >= since).collect();

        prop_assert_eq!(returned, expected);
    }

    /// Growth analysis is deterministic and its rate sign follows the delta.
    #[test]
    fn growth_is_deterministic_and_sign_consistent(
        start in 1u64..1_000_000,
        end in 0u64..1_000_000,
    ) {
        let snaps = vec![
            snapshot(Platform::Facebook, 10, start, 0),
            snapshot(Platform::Facebook, 20, end, 0),
        ];

        let a = compute_growth(Platform::Facebook, 30, snaps.clone()).expect("report");
        let b = compute_growth(Platform::Facebook, 30, snaps).expect("report");

        prop_assert_eq!(&a, &b);
        // Truncating division may round a small delta to 0 bp, but the signs
        // never contradict.
        prop_assert!(
            a.growth_rate_bp == 0 || a.growth_rate_bp.signum() == a.follower_delta.signum()
        );
    }

    /// Validation accepts exactly the inputs with no negative count.
    #[test]
    fn validation_rejects_any_negative(
        followers in -1000i64..1000,
        posts in -1000i64..1000,
        likes in proptest::option::of(-1000i64..1000),
        comments in proptest::option::of(-1000i64..1000),
    ) {
        let input = SnapshotInput { followers, posts, likes, comments };
        let result = input.validate(Platform::Threads, DayStamp::new(100), 0);

        let has_negative = followers < 0
            || posts < 0
            || likes.is_some_and(|v| v < 0)
            || comments.is_some_and(|v| v < 0);

        prop_assert_eq!(result.is_err(), has_negative);
    }

    /// Retention removes exactly the stale days and is idempotent.
    #[test]
    fn retention_deletes_exactly_stale_days(
        days in btree_set(0u32..2000, 0..80),
        cutoff in 0u32..2000,
    ) {
        let mut store = MemoryStore::new();
        for &day in &days {
            store.put(snapshot(Platform::Instagram, day, 1, 0)).expect("put");
        }

        let stale = days.iter().filter(|&&d| d < cutoff).count();
        let first = store
            .delete_older_than(Platform::Instagram, DayStamp::new(cutoff))
            .expect("delete");
        let second = store
            .delete_older_than(Platform::Instagram, DayStamp::new(cutoff))
            .expect("delete");

        prop_assert_eq!(first, stale);
        prop_assert_eq!(second, 0);
        prop_assert_eq!(
            store.snapshot_count(Platform::Instagram).expect("count"),
            days.len() - stale
        );
    }
}

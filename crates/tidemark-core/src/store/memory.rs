//! In-memory snapshot store.
//!
//! A `BTreeMap`-backed backend: deterministic iteration, no I/O. Used as the
//! test double for the service layer and for throwaway runs.

use super::{StatStore, delete_batches};
use crate::types::{DailySnapshot, DayStamp, Platform, StatsError};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Volatile snapshot store over a `BTreeMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: BTreeMap<(Platform, DayStamp), DailySnapshot>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total snapshots across all platforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// True when no snapshot is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl StatStore for MemoryStore {
    fn put(&mut self, snapshot: DailySnapshot) -> Result<(), StatsError> {
        self.snapshots
            .insert((snapshot.platform, snapshot.day), snapshot);
        Ok(())
    }

    fn get(&self, platform: Platform, day: DayStamp) -> Result<Option<DailySnapshot>, StatsError> {
        Ok(self.snapshots.get(&(platform, day)).cloned())
    }

    fn range_since(
        &self,
        platform: Platform,
        since: DayStamp,
    ) -> Result<Vec<DailySnapshot>, StatsError> {
        let range = (
            Bound::Included((platform, since)),
            Bound::Included((platform, DayStamp(u32::MAX))),
        );
        Ok(self.snapshots.range(range).map(|(_, s)| s.clone()).collect())
    }

    fn delete_older_than(
        &mut self,
        platform: Platform,
        cutoff: DayStamp,
    ) -> Result<usize, StatsError> {
        let range = (
            Bound::Included((platform, DayStamp(0))),
            Bound::Excluded((platform, cutoff)),
        );
        let stale: Vec<DayStamp> = self.snapshots.range(range).map(|((_, day), _)| *day).collect();

        let mut deleted = 0;
        for batch in delete_batches(&stale) {
            for day in batch {
                if self.snapshots.remove(&(platform, *day)).is_some() {
                    deleted += 1;
                }
            }
        }
        Ok(deleted)
    }

    fn snapshot_count(&self, platform: Platform) -> Result<usize, StatsError> {
        Ok(self.range_since(platform, DayStamp(0))?.len())
    }

    fn latest(&self, platform: Platform) -> Result<Option<DailySnapshot>, StatsError> {
        let range = (
            Bound::Included((platform, DayStamp(0))),
            Bound::Included((platform, DayStamp(u32::MAX))),
        );
        Ok(self
            .snapshots
            .range(range)
            .next_back()
            .map(|(_, s)| s.clone()))
    }
}

// =============================================================================
// TESTS
// =============================================================================

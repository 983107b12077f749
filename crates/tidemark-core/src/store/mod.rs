//! # Persistence Adapter
//!
//! Storage for daily snapshots, keyed by (platform, day).
//!
//! The [`StatStore`] trait is the injected store handle: callers construct a
//! backend explicitly and pass it around, so tests can substitute doubles.
//! Two backends are provided:
//! - [`MemoryStore`]: in-memory `BTreeMap` (volatile, deterministic)
//! - [`RedbStatStore`]: disk-backed redb database (ACID, persistent)

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStatStore;

use crate::types::{DailySnapshot, DayStamp, Platform, StatsError};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Maximum keys removed per delete batch.
///
/// Matches the 25-item batch-write limit of the hosted key-value stores this
/// engine mirrors; each batch is its own write transaction.
pub const DELETE_BATCH_SIZE: usize = 25;

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Storage backend abstraction for daily snapshots.
///
/// Every operation returns `Result`: callers distinguish "no data" from
/// "operation failed" without relying on log side effects.
pub trait StatStore {
    /// Write a snapshot keyed by (platform, day), overwriting any entry for
    /// the same day.
    fn put(&mut self, snapshot: DailySnapshot) -> Result<(), StatsError>;

    /// Point read of a single (platform, day) snapshot.
    fn get(&self, platform: Platform, day: DayStamp) -> Result<Option<DailySnapshot>, StatsError>;

    /// All snapshots for a platform with day >= `since`.
    ///
    /// Order is not part of the contract; callers sort.
    fn range_since(
        &self,
        platform: Platform,
        since: DayStamp,
    ) -> Result<Vec<DailySnapshot>, StatsError>;

    /// Delete all snapshots for a platform with day < `cutoff`, in batches
    /// of at most [`DELETE_BATCH_SIZE`] keys. Returns the number deleted;
    /// 0 (a no-op) when nothing matches. Idempotent.
    fn delete_older_than(
        &mut self,
        platform: Platform,
        cutoff: DayStamp,
    ) -> Result<usize, StatsError>;

    /// Number of stored days for a platform.
    fn snapshot_count(&self, platform: Platform) -> Result<usize, StatsError>;

    /// The most recent snapshot for a platform, if any.
    fn latest(&self, platform: Platform) -> Result<Option<DailySnapshot>, StatsError>;
}

/// Split stale keys into delete batches.
///
/// Shared by both backends so the batch contract lives in one place.
pub(crate) fn delete_batches(keys: &[DayStamp]) -> impl Iterator<Item = &[DayStamp]> {
    keys.chunks(DELETE_BATCH_SIZE)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_batches_never_exceed_limit() {
        let keys: Vec<DayStamp> = (0..103).map(DayStamp::new).collect();
        let batches: Vec<&[DayStamp]> = delete_batches(&keys).collect();

        assert_eq!(batches.len(), 5);
        assert!(batches.iter().all(|b| b.len() <= DELETE_BATCH_SIZE));
        assert_eq!(batches.iter().map(|b| b.len()).sum::<usize>(), 103);
    }

    #[test]
    fn delete_batches_empty_input_yields_no_batches() {
        assert_eq!(delete_batches(&[]).count(), 0);
    }
}

//! # redb-backed Snapshot Storage
//!
//! A disk-backed snapshot store using the redb embedded database:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//! - Zero configuration
//!
//! Keys are `(platform code, day index)` tuples so a per-platform window is
//! a single range scan; rows are postcard-serialized [`DailySnapshot`]s.

use super::{StatStore, delete_batches};
use crate::types::{DailySnapshot, DayStamp, Platform, StatsError};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

/// Table for snapshots: (platform code, days since epoch) -> serialized row
const SNAPSHOTS: TableDefinition<(u8, u32), &[u8]> = TableDefinition::new("snapshots");

/// A disk-backed snapshot store using redb.
pub struct RedbStatStore {
    /// The redb database handle. Long-lived; callers construct one store and
    /// inject it everywhere a persistence handle is needed.
    db: Database,
}

impl std::fmt::Debug for RedbStatStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStatStore").finish_non_exhaustive()
    }
}

impl RedbStatStore {
    /// Open or create a snapshot database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StatsError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| StatsError::IoError(e.to_string()))?;

        // Initialize the table if it doesn't exist
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| StatsError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(SNAPSHOTS)
                .map_err(|e| StatsError::IoError(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| StatsError::IoError(e.to_string()))?;
        }

        Ok(Self { db })
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), StatsError> {
        self.db
            .compact()
            .map_err(|e| StatsError::IoError(e.to_string()))?;
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<DailySnapshot, StatsError> {
        postcard::from_bytes(bytes).map_err(|e| StatsError::SerializationError(e.to_string()))
    }

    /// Days with stored snapshots strictly before `cutoff`, ascending.
    fn stale_days(&self, platform: Platform, cutoff: DayStamp) -> Result<Vec<DayStamp>, StatsError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StatsError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(SNAPSHOTS)
            .map_err(|e| StatsError::IoError(e.to_string()))?;

        let mut days = Vec::new();
        for entry in table
            .range((platform.code(), 0u32)..(platform.code(), cutoff.value()))
            .map_err(|e| StatsError::IoError(e.to_string()))?
        {
            let (key, _) = entry.map_err(|e| StatsError::IoError(e.to_string()))?;
            let (_code, day) = key.value();
            days.push(DayStamp(day));
        }
        Ok(days)
    }
}

impl StatStore for RedbStatStore {
    fn put(&mut self, snapshot: DailySnapshot) -> Result<(), StatsError> {
        let bytes = postcard::to_allocvec(&snapshot)
            .map_err(|e| StatsError::SerializationError(e.to_string()))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StatsError::IoError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SNAPSHOTS)
                .map_err(|e| StatsError::IoError(e.to_string()))?;
            table
                .insert(
                    (snapshot.platform.code(), snapshot.day.value()),
                    bytes.as_slice(),
                )
                .map_err(|e| StatsError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StatsError::IoError(e.to_string()))?;
        Ok(())
    }

    fn get(&self, platform: Platform, day: DayStamp) -> Result<Option<DailySnapshot>, StatsError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StatsError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(SNAPSHOTS)
            .map_err(|e| StatsError::IoError(e.to_string()))?;

        let row = table
            .get((platform.code(), day.value()))
            .map_err(|e| StatsError::IoError(e.to_string()))?;
        match row {
            Some(bytes) => Ok(Some(Self::decode(bytes.value())?)),
            None => Ok(None),
        }
    }

    fn range_since(
        &self,
        platform: Platform,
        since: DayStamp,
    ) -> Result<Vec<DailySnapshot>, StatsError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StatsError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(SNAPSHOTS)
            .map_err(|e| StatsError::IoError(e.to_string()))?;

        let mut snapshots = Vec::new();
        for entry in table
            .range((platform.code(), since.value())..=(platform.code(), u32::MAX))
            .map_err(|e| StatsError::IoError(e.to_string()))?
        {
            let (_, value) = entry.map_err(|e| StatsError::IoError(e.to_string()))?;
            snapshots.push(Self::decode(value.value())?);
        }
        Ok(snapshots)
    }

    fn delete_older_than(
        &mut self,
        platform: Platform,
        cutoff: DayStamp,
    ) -> Result<usize, StatsError> {
        let stale = self.stale_days(platform, cutoff)?;
        if stale.is_empty() {
            return Ok(0);
        }

        // One write transaction per batch, matching the batch-write limit of
        // the hosted stores this mirrors.
        let mut deleted = 0;
        for batch in delete_batches(&stale) {
            let write_txn = self
                .db
                .begin_write()
                .map_err(|e| StatsError::IoError(e.to_string()))?;
            {
                let mut table = write_txn
                    .open_table(SNAPSHOTS)
                    .map_err(|e| StatsError::IoError(e.to_string()))?;
                for day in batch {
                    let removed = table
                        .remove((platform.code(), day.value()))
                        .map_err(|e| StatsError::IoError(e.to_string()))?;
                    if removed.is_some() {
                        deleted += 1;
                    }
                }
            }
            write_txn
                .commit()
                .map_err(|e| StatsError::IoError(e.to_string()))?;
        }
        Ok(deleted)
    }

    fn snapshot_count(&self, platform: Platform) -> Result<usize, StatsError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StatsError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(SNAPSHOTS)
            .map_err(|e| StatsError::IoError(e.to_string()))?;

        let mut count = 0;
        for entry in table
            .range((platform.code(), 0u32)..=(platform.code(), u32::MAX))
            .map_err(|e| StatsError::IoError(e.to_string()))?
        {
            entry.map_err(|e| StatsError::IoError(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }

    fn latest(&self, platform: Platform) -> Result<Option<DailySnapshot>, StatsError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StatsError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(SNAPSHOTS)
            .map_err(|e| StatsError::IoError(e.to_string()))?;

        let last = table
            .range((platform.code(), 0u32)..=(platform.code(), u32::MAX))
            .map_err(|e| StatsError::IoError(e.to_string()))?
            .next_back();
        match last {
            Some(entry) => {
                let (_, value) = entry.map_err(|e| StatsError::IoError(e.to_string()))?;
                Ok(Some(Self::decode(value.value())?))
            }
            None => Ok(None),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(platform: Platform, day: u32, followers: u64) -> DailySnapshot {
        DailySnapshot {
            platform,
            day: DayStamp(day),
            followers,
            posts: 3,
            engagement: None,
            recorded_at: 1_700_000_000,
        }
    }

    #[test]
    fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = RedbStatStore::open(dir.path().join("stats.db")).expect("open");

        let snap = snapshot(Platform::Instagram, 20_100, 4321);
        store.put(snap.clone()).expect("put");

        let loaded = store
            .get(Platform::Instagram, DayStamp(20_100))
            .expect("get");
        assert_eq!(loaded, Some(snap));
    }

    #[test]
    fn snapshots_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stats.db");

        {
            let mut store = RedbStatStore::open(&path).expect("open");
            store.put(snapshot(Platform::Facebook, 20_000, 77)).expect("put");
        }

        let store = RedbStatStore::open(&path).expect("reopen");
        let loaded = store
            .get(Platform::Facebook, DayStamp(20_000))
            .expect("get")
            .expect("present");
        assert_eq!(loaded.followers, 77);
    }

    #[test]
    fn range_since_is_per_platform() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = RedbStatStore::open(dir.path().join("stats.db")).expect("open");

        for day in [10, 20, 30] {
            store.put(snapshot(Platform::Instagram, day, 100)).expect("put");
        }
        store.put(snapshot(Platform::Facebook, 25, 999)).expect("put");

        let window = store
            .range_since(Platform::Instagram, DayStamp(20))
            .expect("range");

        assert_eq!(window.len(), 2);
        assert!(window.iter().all(|s| s.platform == Platform::Instagram));
    }

    #[test]
    fn delete_older_than_spans_multiple_batches() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = RedbStatStore::open(dir.path().join("stats.db")).expect("open");

        // 60 stale days forces three delete batches at the 25-key limit.
        for day in 0..60 {
            store.put(snapshot(Platform::Threads, day, 10)).expect("put");
        }
        store.put(snapshot(Platform::Threads, 500, 10)).expect("put");

        let first = store
            .delete_older_than(Platform::Threads, DayStamp(60))
            .expect("delete");
        let second = store
            .delete_older_than(Platform::Threads, DayStamp(60))
            .expect("delete");

        assert_eq!(first, 60);
        assert_eq!(second, 0);
        assert_eq!(store.snapshot_count(Platform::Threads).expect("count"), 1);
    }

    #[test]
    fn latest_tracks_highest_day() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = RedbStatStore::open(dir.path().join("stats.db")).expect("open");

        store.put(snapshot(Platform::Instagram, 100, 1)).expect("put");
        store.put(snapshot(Platform::Instagram, 90, 2)).expect("put");

        let latest = store
            .latest(Platform::Instagram)
            .expect("latest")
            .expect("present");
        assert_eq!(latest.day, DayStamp(100));
    }
}

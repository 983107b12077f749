//! # Stats Service
//!
//! The async orchestration layer over an injected [`StatStore`].
//!
//! Responsibilities:
//! - Stamp wall-clock state (today's day, recorded-at) onto writes, keeping
//!   the core clock-free
//! - Wrap every store operation in the retry combinator
//! - Issue the per-platform analyses of a comparison concurrently
//!
//! The store is shared behind one `Arc<RwLock<_>>`: a long-lived handle
//! constructed once and reused across all calls.

use crate::retry::{RetryPolicy, retry};
use chrono::Utc;
use std::sync::Arc;
use tidemark_core::{
    ComparisonSummary, DailySnapshot, DayStamp, GrowthReport, Platform, SnapshotInput, StatStore,
    StatsError, compute_growth, summarize,
};
use tokio::sync::RwLock;

// =============================================================================
// CLOCK ACCESS
// =============================================================================

/// Today's calendar day in UTC.
pub fn current_day() -> Result<DayStamp, StatsError> {
    DayStamp::from_date(Utc::now().date_naive())
        .ok_or_else(|| StatsError::IoError("system clock precedes the Unix epoch".to_string()))
}

/// Current epoch seconds, used for `recorded_at` stamps.
#[must_use]
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

// =============================================================================
// SERVICE
// =============================================================================

/// Per-platform storage summary for the status command.
#[derive(Debug, Clone)]
pub struct PlatformStatus {
    pub platform: Platform,
    pub snapshots: usize,
    pub latest: Option<DailySnapshot>,
}

/// The snapshot service: validation, retries, and concurrent analysis over
/// one injected store backend.
#[derive(Debug)]
pub struct StatsService<S> {
    /// The shared store handle.
    pub store: Arc<RwLock<S>>,
    retry: RetryPolicy,
}

impl<S: StatStore> StatsService<S> {
    /// Build a service around a store backend.
    pub fn new(store: S, retry: RetryPolicy) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            retry,
        }
    }

    /// Validate input and write today's snapshot for a platform.
    ///
    /// The snapshot is keyed by today's UTC date and stamped with the current
    /// time; a same-day snapshot is overwritten. Invalid input returns
    /// [`StatsError::InvalidSnapshot`] without touching the store.
    pub async fn record_snapshot(
        &self,
        platform: Platform,
        input: &SnapshotInput,
    ) -> Result<DailySnapshot, StatsError> {
        let snapshot = input.validate(platform, current_day()?, current_timestamp())?;

        let store = Arc::clone(&self.store);
        let row = snapshot.clone();
        retry(self.retry, move || {
            let store = Arc::clone(&store);
            let row = row.clone();
            async move { store.write().await.put(row) }
        })
        .await?;

        tracing::debug!(
            "recorded snapshot for {} on {}",
            snapshot.platform,
            snapshot.day
        );
        Ok(snapshot)
    }

    /// Growth analysis for one platform over a lookback window ending today.
    ///
    /// Fetches the window through the retry wrapper, then hands the
    /// snapshots to the pure growth math.
    pub async fn growth_analysis(
        &self,
        platform: Platform,
        window_days: u32,
        today: DayStamp,
    ) -> Result<GrowthReport, StatsError> {
        let since = today.minus_days(window_days);

        let store = Arc::clone(&self.store);
        let snapshots = retry(self.retry, move || {
            let store = Arc::clone(&store);
            async move { store.read().await.range_since(platform, since) }
        })
        .await?;

        compute_growth(platform, window_days, snapshots)
    }

    /// Compare growth across the full platform set.
    ///
    /// The three per-platform analyses run concurrently (fire-and-await-all);
    /// platforms that error are excluded from the totals and from
    /// best-platform selection.
    pub async fn compare_all_platforms(
        &self,
        window_days: u32,
        today: DayStamp,
    ) -> ComparisonSummary {
        let [first, second, third] = Platform::ALL;
        let (a, b, c) = tokio::join!(
            self.growth_analysis(first, window_days, today),
            self.growth_analysis(second, window_days, today),
            self.growth_analysis(third, window_days, today),
        );

        summarize(window_days, vec![(first, a), (second, b), (third, c)])
    }

    /// Delete snapshots older than the retention window for every platform.
    ///
    /// Deletion counts are logged per platform; the total is returned so the
    /// CLI can print it. Running twice is harmless (the second pass deletes
    /// nothing).
    pub async fn prune_snapshots(
        &self,
        retention_days: u32,
        today: DayStamp,
    ) -> Result<usize, StatsError> {
        let cutoff = today.minus_days(retention_days);
        let mut total = 0;

        for platform in Platform::ALL {
            let store = Arc::clone(&self.store);
            let deleted = retry(self.retry, move || {
                let store = Arc::clone(&store);
                async move { store.write().await.delete_older_than(platform, cutoff) }
            })
            .await?;

            if deleted > 0 {
                tracing::info!("pruned {} snapshot(s) for {}", deleted, platform);
            }
            total += deleted;
        }

        Ok(total)
    }

    /// Snapshot counts and latest entry per platform.
    pub async fn platform_status(&self) -> Result<Vec<PlatformStatus>, StatsError> {
        let store = self.store.read().await;
        Platform::ALL
            .iter()
            .map(|&platform| {
                Ok(PlatformStatus {
                    platform,
                    snapshots: store.snapshot_count(platform)?,
                    latest: store.latest(platform)?,
                })
            })
            .collect()
    }
}

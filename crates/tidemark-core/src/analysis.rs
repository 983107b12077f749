//! # Growth Analysis
//!
//! Pure aggregation math over snapshot windows.
//!
//! - Rates are integer basis points (1/100th of a percent); display strings
//!   are derived from them. No floating-point.
//! - Insufficient data is a structured error value, never a panic.
//! - Cross-platform comparison excludes errored platforms from both the
//!   follower total and best-platform selection.

use crate::types::{DailySnapshot, DayStamp, Platform, StatsError};
use serde::{Deserialize, Serialize};

/// Sentinel reported when no platform has enough data to compare.
pub const NO_BEST_PLATFORM: &str = "none";

// =============================================================================
// REPORT TYPES
// =============================================================================

/// Growth over a window, derived from the oldest and newest snapshots.
/// Never persisted; computed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthReport {
    pub platform: Platform,
    pub window_days: u32,
    /// Day of the oldest snapshot in the window.
    pub period_start: DayStamp,
    /// Day of the newest snapshot in the window.
    pub period_end: DayStamp,
    pub snapshot_count: usize,
    pub followers_start: u64,
    pub followers_end: u64,
    pub follower_delta: i64,
    /// Growth rate in basis points (5000 = 50.00%). 0 when the base is 0.
    pub growth_rate_bp: i64,
    /// Display form: `"50.00%"`, or exactly `"0%"` for a zero base.
    pub growth_rate: String,
    pub post_delta: i64,
    /// Average posts per day over the number of snapshots, in hundredths.
    pub avg_posts_per_day_centi: i64,
}

/// A platform excluded from a comparison, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPlatform {
    pub platform: Platform,
    pub reason: String,
}

/// Cross-platform aggregate over per-platform growth reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub window_days: u32,
    /// Valid reports, in [`Platform::ALL`] order.
    pub reports: Vec<GrowthReport>,
    /// Platforms whose analysis failed (insufficient data, store error).
    pub skipped: Vec<SkippedPlatform>,
    /// Sum of ending follower counts across valid platforms.
    pub total_followers: u64,
    /// Name of the platform with the highest growth rate, or
    /// [`NO_BEST_PLATFORM`] when no platform is valid.
    pub best_platform: String,
}

// =============================================================================
// GROWTH COMPUTATION
// =============================================================================

/// Compute a growth report from the snapshots of one window.
///
/// Sorts ascending by day, then compares the first and last entries.
/// Requires at least two data points; otherwise returns
/// [`StatsError::InsufficientData`] echoing the platform and window.
pub fn compute_growth(
    platform: Platform,
    window_days: u32,
    mut snapshots: Vec<DailySnapshot>,
) -> Result<GrowthReport, StatsError> {
    snapshots.sort_by_key(|s| s.day);

    let [oldest, .., newest] = snapshots.as_slice() else {
        return Err(StatsError::InsufficientData {
            platform,
            days: window_days,
            found: snapshots.len(),
        });
    };

    let followers_start = oldest.followers;
    let followers_end = newest.followers;
    let follower_delta = signed(followers_end).saturating_sub(signed(followers_start));
    let post_delta = signed(newest.posts).saturating_sub(signed(oldest.posts));

    // Zero base: report 0% instead of dividing by zero.
    let (growth_rate_bp, growth_rate) = if followers_start == 0 {
        (0, "0%".to_string())
    } else {
        let bp = follower_delta.saturating_mul(10_000) / signed(followers_start);
        (bp, format_basis_points(bp))
    };

    let count = signed(snapshots.len() as u64).max(1);
    let avg_posts_per_day_centi = post_delta.saturating_mul(100) / count;

    Ok(GrowthReport {
        platform,
        window_days,
        period_start: oldest.day,
        period_end: newest.day,
        snapshot_count: snapshots.len(),
        followers_start,
        followers_end,
        follower_delta,
        growth_rate_bp,
        growth_rate,
        post_delta,
        avg_posts_per_day_centi,
    })
}

/// Render basis points as a two-decimal percentage, e.g. 5000 -> `"50.00%"`.
#[must_use]
pub fn format_basis_points(bp: i64) -> String {
    let sign = if bp < 0 { "-" } else { "" };
    let abs = bp.unsigned_abs();
    format!("{}{}.{:02}%", sign, abs / 100, abs % 100)
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// =============================================================================
// CROSS-PLATFORM COMPARISON
// =============================================================================

/// Aggregate per-platform results into a comparison summary.
///
/// `results` must arrive in [`Platform::ALL`] order; the best platform is
/// picked by strictly greater growth rate, so on a tie the first encountered
/// (earlier in `ALL`) wins.
#[must_use]
pub fn summarize(
    window_days: u32,
    results: Vec<(Platform, Result<GrowthReport, StatsError>)>,
) -> ComparisonSummary {
    let mut reports = Vec::new();
    let mut skipped = Vec::new();

    for (platform, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => skipped.push(SkippedPlatform {
                platform,
                reason: e.to_string(),
            }),
        }
    }

    let total_followers = reports
        .iter()
        .fold(0u64, |sum, r| sum.saturating_add(r.followers_end));

    let best_platform = reports
        .iter()
        .fold(None::<&GrowthReport>, |best, report| match best {
            Some(b) if report.growth_rate_bp > b.growth_rate_bp => Some(report),
            Some(b) => Some(b),
            None => Some(report),
        })
        .map_or_else(|| NO_BEST_PLATFORM.to_string(), |r| r.platform.to_string());

    ComparisonSummary {
        window_days,
        reports,
        skipped,
        total_followers,
        best_platform,
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! # Core Type Definitions
//!
//! This module contains all core types for the Tidemark snapshot engine:
//! - The closed platform set (`Platform`)
//! - Calendar-day indexing (`DayStamp`)
//! - Snapshot records and ingest validation (`DailySnapshot`, `SnapshotInput`)
//! - Error types (`StatsError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use saturating arithmetic for counters to prevent overflow

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// PLATFORM
// =============================================================================

/// A tracked social network.
///
/// The set is closed: every stored key and every comparison iterates this
/// enum, and `ALL` fixes the iteration order (which is also the tie-break
/// order for best-platform selection).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
    Threads,
}

impl Platform {
    /// Every tracked platform, in comparison order.
    pub const ALL: [Platform; 3] = [Platform::Instagram, Platform::Facebook, Platform::Threads];

    /// Stable storage code used as the first component of store keys.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Platform::Instagram => 0,
            Platform::Facebook => 1,
            Platform::Threads => 2,
        }
    }

    /// Inverse of [`Platform::code`].
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Platform::Instagram),
            1 => Some(Platform::Facebook),
            2 => Some(Platform::Threads),
            _ => None,
        }
    }

    /// Lowercase identifier used in CLI arguments and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Threads => "threads",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width/alignment flags work in CLI tables
        f.pad(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "facebook" => Ok(Platform::Facebook),
            "threads" => Ok(Platform::Threads),
            other => Err(StatsError::UnknownPlatform(other.to_string())),
        }
    }
}

// =============================================================================
// DAYSTAMP
// =============================================================================

/// A calendar day, stored as days since the Unix epoch (1970-01-01).
///
/// The integer form orders naturally, makes lookback-window arithmetic a
/// `saturating_sub`, and serves directly as the second component of store
/// keys so that range scans select a window without decoding rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct DayStamp(pub u32);

impl DayStamp {
    /// Create a day stamp from a raw day index.
    #[must_use]
    pub const fn new(days_since_epoch: u32) -> Self {
        Self(days_since_epoch)
    }

    /// Convert a calendar date. Returns `None` for dates before the epoch.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        let days = date.signed_duration_since(NaiveDate::default()).num_days();
        u32::try_from(days).ok().map(Self)
    }

    /// Convert back to a calendar date. `None` only for day indices past
    /// chrono's representable range.
    #[must_use]
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::default().checked_add_days(Days::new(u64::from(self.0)))
    }

    /// The day `days` before this one, clamped at the epoch.
    #[must_use]
    pub const fn minus_days(self, days: u32) -> Self {
        Self(self.0.saturating_sub(days))
    }

    /// Raw day index.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DayStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_date() {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => write!(f, "day+{}", self.0),
        }
    }
}

impl FromStr for DayStamp {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|e| StatsError::InvalidSnapshot(format!("bad date '{}': {}", s, e)))?;
        Self::from_date(date)
            .ok_or_else(|| StatsError::InvalidSnapshot(format!("date '{}' is before 1970", s)))
    }
}

// =============================================================================
// SNAPSHOT RECORDS
// =============================================================================

/// Optional engagement aggregates attached to a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EngagementTotals {
    pub likes: u64,
    pub comments: u64,
}

/// One stored (platform, day) record of follower/post counts.
///
/// At most one snapshot exists per platform per calendar day; re-saving the
/// same day overwrites. `recorded_at` is stamped by the service at save time
/// (epoch seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub platform: Platform,
    pub day: DayStamp,
    pub followers: u64,
    pub posts: u64,
    pub engagement: Option<EngagementTotals>,
    pub recorded_at: i64,
}

/// Loosely-typed snapshot counts as they arrive from JSON or CLI flags.
///
/// Counts are `i64` at this boundary so negative input can be rejected with
/// a typed error instead of wrapping silently; non-numeric fields never get
/// this far (serde rejects them during deserialization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInput {
    pub followers: i64,
    pub posts: i64,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub comments: Option<i64>,
}

impl SnapshotInput {
    /// Validate counts and produce a storable snapshot.
    ///
    /// Rejects any negative follower/post/engagement count. Invalid input
    /// never reaches a store: callers treat the error as a no-op.
    pub fn validate(
        &self,
        platform: Platform,
        day: DayStamp,
        recorded_at: i64,
    ) -> Result<DailySnapshot, StatsError> {
        let followers = non_negative(self.followers, "followers")?;
        let posts = non_negative(self.posts, "posts")?;

        let engagement = match (self.likes, self.comments) {
            (None, None) => None,
            (likes, comments) => Some(EngagementTotals {
                likes: non_negative(likes.unwrap_or(0), "likes")?,
                comments: non_negative(comments.unwrap_or(0), "comments")?,
            }),
        };

        Ok(DailySnapshot {
            platform,
            day,
            followers,
            posts,
            engagement,
            recorded_at,
        })
    }
}

/// Reject negative counts at the ingest boundary.
fn non_negative(value: i64, field: &str) -> Result<u64, StatsError> {
    u64::try_from(value)
        .map_err(|_| StatsError::InvalidSnapshot(format!("{} must be non-negative, got {}", field, value)))
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Tidemark system.
///
/// - No silent failures
/// - Use `Result<T, StatsError>` for fallible operations
/// - Insufficient data is a structured value, never a panic
#[derive(Debug, Error)]
pub enum StatsError {
    /// Snapshot input failed validation; the save is a no-op.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// The platform identifier is outside the closed set.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    /// Fewer than two snapshots in the requested window.
    #[error("Insufficient data for {platform}: {found} snapshot(s) in {days}-day window")]
    InsufficientData {
        platform: Platform,
        days: u32,
        found: usize,
    },

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_code_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_code(platform.code()), Some(platform));
        }
        assert_eq!(Platform::from_code(7), None);
    }

    #[test]
    fn platform_parse_round_trip() {
        for platform in Platform::ALL {
            let parsed: Platform = platform.as_str().parse().expect("parse");
            assert_eq!(parsed, platform);
        }
    }

    #[test]
    fn platform_parse_is_case_insensitive() {
        let parsed: Platform = "Instagram".parse().expect("parse");
        assert_eq!(parsed, Platform::Instagram);
    }

    #[test]
    fn platform_parse_rejects_unknown() {
        let result = "myspace".parse::<Platform>();
        assert!(matches!(result, Err(StatsError::UnknownPlatform(_))));
    }

    #[test]
    fn daystamp_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).expect("date");
        let stamp = DayStamp::from_date(date).expect("stamp");
        assert_eq!(stamp.to_date(), Some(date));
        assert_eq!(stamp.to_string(), "2025-03-14");
    }

    #[test]
    fn daystamp_epoch_is_zero() {
        assert_eq!(DayStamp::from_date(NaiveDate::default()), Some(DayStamp(0)));
    }

    #[test]
    fn daystamp_rejects_pre_epoch() {
        let date = NaiveDate::from_ymd_opt(1969, 12, 31).expect("date");
        assert_eq!(DayStamp::from_date(date), None);
    }

    #[test]
    fn daystamp_minus_days_clamps_at_epoch() {
        assert_eq!(DayStamp(5).minus_days(30), DayStamp(0));
        assert_eq!(DayStamp(100).minus_days(30), DayStamp(70));
    }

    #[test]
    fn daystamp_parses_iso_dates() {
        let stamp: DayStamp = "2025-03-14".parse().expect("parse");
        assert_eq!(stamp.to_string(), "2025-03-14");
        assert!("14/03/2025".parse::<DayStamp>().is_err());
    }

    #[test]
    fn valid_input_accepted() {
        let input = SnapshotInput {
            followers: 1200,
            posts: 34,
            likes: Some(5000),
            comments: None,
        };
        let snapshot = input
            .validate(Platform::Instagram, DayStamp(20_000), 1_700_000_000)
            .expect("valid");

        assert_eq!(snapshot.followers, 1200);
        assert_eq!(snapshot.posts, 34);
        assert_eq!(
            snapshot.engagement,
            Some(EngagementTotals {
                likes: 5000,
                comments: 0
            })
        );
    }

    #[test]
    fn negative_followers_rejected() {
        let input = SnapshotInput {
            followers: -1,
            posts: 10,
            likes: None,
            comments: None,
        };
        let result = input.validate(Platform::Facebook, DayStamp(20_000), 0);
        assert!(matches!(result, Err(StatsError::InvalidSnapshot(_))));
    }

    #[test]
    fn negative_engagement_rejected() {
        let input = SnapshotInput {
            followers: 10,
            posts: 1,
            likes: None,
            comments: Some(-3),
        };
        let result = input.validate(Platform::Threads, DayStamp(20_000), 0);
        assert!(matches!(result, Err(StatsError::InvalidSnapshot(_))));
    }

    #[test]
    fn non_numeric_counts_rejected_by_serde() {
        let result = serde_json::from_str::<SnapshotInput>(r#"{"followers": 10, "posts": "many"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn insufficient_data_error_carries_context() {
        let err = StatsError::InsufficientData {
            platform: Platform::Instagram,
            days: 30,
            found: 1,
        };
        let message = err.to_string();
        assert!(message.contains("instagram"));
        assert!(message.contains("30"));
    }
}

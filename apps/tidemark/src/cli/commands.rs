//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Degradation policy: invalid snapshot input and insufficient-data analyses
//! are reported (logged, and printed as error-shaped output) without failing
//! the process; everything else propagates and exits non-zero.

use crate::retry::RetryPolicy;
use crate::service::{StatsService, current_day};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tidemark_core::{
    GrowthReport, Platform, RedbStatStore, SnapshotInput, StatsError,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for bulk record input (10 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_RECORD_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), StatsError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| StatsError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(StatsError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate file path for security.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it is an
/// existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, StatsError> {
    let canonical = path.canonicalize().map_err(|e| {
        StatsError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(StatsError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// One entry of a bulk record file.
#[derive(Debug, Deserialize)]
struct RecordEntry {
    platform: Platform,
    #[serde(flatten)]
    counts: SnapshotInput,
}

/// Open the database and build the service around it.
fn open_service(db_path: &Path) -> Result<StatsService<RedbStatStore>, StatsError> {
    let store = RedbStatStore::open(db_path)?;
    Ok(StatsService::new(store, RetryPolicy::from_env()))
}

/// Render a centi-scaled value ("200" -> "2.00").
fn format_centi(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// JSON shape of a growth report.
fn report_json(report: &GrowthReport) -> serde_json::Value {
    serde_json::json!({
        "platform": report.platform.as_str(),
        "window_days": report.window_days,
        "period_start": report.period_start.to_string(),
        "period_end": report.period_end.to_string(),
        "snapshot_count": report.snapshot_count,
        "followers_start": report.followers_start,
        "followers_end": report.followers_end,
        "follower_delta": report.follower_delta,
        "growth_rate": report.growth_rate,
        "post_delta": report.post_delta,
        "avg_posts_per_day": format_centi(report.avg_posts_per_day_centi),
    })
}

fn print_report_text(report: &GrowthReport) {
    println!(
        "Growth Analysis: {} ({}-day window)",
        report.platform, report.window_days
    );
    println!("=========================================");
    println!(
        "Period:     {} -> {} ({} snapshots)",
        report.period_start, report.period_end, report.snapshot_count
    );
    println!(
        "Followers:  {} -> {} ({:+}, {})",
        report.followers_start, report.followers_end, report.follower_delta, report.growth_rate
    );
    println!(
        "Posts:      {:+} (avg {}/day)",
        report.post_delta,
        format_centi(report.avg_posts_per_day_centi)
    );
}

// =============================================================================
// RECORD COMMAND
// =============================================================================

/// Record today's snapshot, from flags or a bulk file.
pub async fn cmd_record(
    db_path: &Path,
    json_mode: bool,
    platform: Option<&str>,
    followers: Option<i64>,
    posts: Option<i64>,
    likes: Option<i64>,
    comments: Option<i64>,
    file: Option<&Path>,
) -> Result<(), StatsError> {
    let service = open_service(db_path)?;

    if let Some(file) = file {
        return record_from_file(&service, json_mode, file).await;
    }

    let Some(platform) = platform else {
        return Err(StatsError::InvalidSnapshot(
            "either --platform or --file is required".to_string(),
        ));
    };
    let platform = Platform::from_str(platform)?;

    let (Some(followers), Some(posts)) = (followers, posts) else {
        return Err(StatsError::InvalidSnapshot(
            "--followers and --posts are required".to_string(),
        ));
    };
    let input = SnapshotInput {
        followers,
        posts,
        likes,
        comments,
    };

    match service.record_snapshot(platform, &input).await {
        Ok(snapshot) => {
            if json_mode {
                let output = serde_json::json!({
                    "platform": snapshot.platform.as_str(),
                    "day": snapshot.day.to_string(),
                    "followers": snapshot.followers,
                    "posts": snapshot.posts,
                });
                println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
            } else {
                println!(
                    "Recorded {} snapshot for {}: {} followers, {} posts",
                    snapshot.day, snapshot.platform, snapshot.followers, snapshot.posts
                );
            }
            Ok(())
        }
        // Invalid input is a logged no-op, not a process failure.
        Err(StatsError::InvalidSnapshot(reason)) => {
            tracing::warn!("rejected snapshot for {}: {}", platform, reason);
            print_degraded(json_mode, &reason, Some(platform), None);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

async fn record_from_file(
    service: &StatsService<RedbStatStore>,
    json_mode: bool,
    file: &Path,
) -> Result<(), StatsError> {
    let validated_path = validate_file_path(file)?;
    validate_file_size(&validated_path, MAX_RECORD_FILE_SIZE)?;

    let contents = std::fs::read(&validated_path)
        .map_err(|e| StatsError::IoError(format!("Read file: {}", e)))?;
    let entries: Vec<RecordEntry> = serde_json::from_slice(&contents)
        .map_err(|e| StatsError::SerializationError(format!("Parse entries: {}", e)))?;

    let mut recorded = 0usize;
    let mut rejected = 0usize;
    for entry in entries {
        match service.record_snapshot(entry.platform, &entry.counts).await {
            Ok(_) => recorded += 1,
            Err(StatsError::InvalidSnapshot(reason)) => {
                tracing::warn!("rejected snapshot for {}: {}", entry.platform, reason);
                rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if json_mode {
        let output = serde_json::json!({ "recorded": recorded, "rejected": rejected });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
    } else {
        println!("Recorded {} snapshot(s), rejected {}", recorded, rejected);
    }
    Ok(())
}

// =============================================================================
// ANALYZE COMMAND
// =============================================================================

/// Growth analysis for one platform.
pub async fn cmd_analyze(
    db_path: &Path,
    json_mode: bool,
    platform: &str,
    window: u32,
) -> Result<(), StatsError> {
    let platform = Platform::from_str(platform)?;
    let service = open_service(db_path)?;
    let today = current_day()?;

    match service.growth_analysis(platform, window, today).await {
        Ok(report) => {
            if json_mode {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report_json(&report)).unwrap_or_default()
                );
            } else {
                print_report_text(&report);
            }
            Ok(())
        }
        // Insufficient data is an error-shaped result, not a process failure.
        Err(StatsError::InsufficientData {
            platform,
            days,
            found,
        }) => {
            let err = StatsError::InsufficientData {
                platform,
                days,
                found,
            };
            print_degraded(json_mode, &err.to_string(), Some(platform), Some(days));
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Print an error-shaped result: `{"error", "platform", "days"}`.
fn print_degraded(json_mode: bool, message: &str, platform: Option<Platform>, days: Option<u32>) {
    if json_mode {
        let output = serde_json::json!({
            "error": message,
            "platform": platform.map(|p| p.as_str()),
            "days": days,
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
    } else {
        println!("{}", message);
    }
}

// =============================================================================
// COMPARE COMMAND
// =============================================================================

/// Compare growth across all platforms.
pub async fn cmd_compare(db_path: &Path, json_mode: bool, window: u32) -> Result<(), StatsError> {
    let service = open_service(db_path)?;
    let today = current_day()?;
    let summary = service.compare_all_platforms(window, today).await;

    if json_mode {
        let output = serde_json::json!({
            "window_days": summary.window_days,
            "total_followers": summary.total_followers,
            "best_platform": summary.best_platform,
            "reports": summary.reports.iter().map(report_json).collect::<Vec<_>>(),
            "skipped": summary
                .skipped
                .iter()
                .map(|s| serde_json::json!({
                    "platform": s.platform.as_str(),
                    "reason": s.reason,
                }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        return Ok(());
    }

    println!("Cross-Platform Comparison ({}-day window)", summary.window_days);
    println!("=========================================");
    for report in &summary.reports {
        println!(
            "  {:<10} {} -> {} followers ({})",
            report.platform, report.followers_start, report.followers_end, report.growth_rate
        );
    }
    for skipped in &summary.skipped {
        println!("  {:<10} skipped: {}", skipped.platform, skipped.reason);
    }
    println!();
    println!("Total Followers: {}", summary.total_followers);
    println!("Best Platform:   {}", summary.best_platform);

    Ok(())
}

// =============================================================================
// PRUNE COMMAND
// =============================================================================

/// Retention cleanup: delete snapshots older than the retention window.
pub async fn cmd_prune(
    db_path: &Path,
    json_mode: bool,
    retention_days: u32,
) -> Result<(), StatsError> {
    let service = open_service(db_path)?;
    let today = current_day()?;

    let deleted = service.prune_snapshots(retention_days, today).await?;
    tracing::info!("retention cleanup removed {} snapshot(s)", deleted);

    if json_mode {
        let output = serde_json::json!({
            "retention_days": retention_days,
            "deleted": deleted,
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
    } else {
        println!(
            "Deleted {} snapshot(s) older than {} days",
            deleted, retention_days
        );
    }
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show per-platform snapshot counts.
pub async fn cmd_status(db_path: &Path, json_mode: bool) -> Result<(), StatsError> {
    let service = open_service(db_path)?;
    let statuses = service.platform_status().await?;

    if json_mode {
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "platforms": statuses.iter().map(|s| serde_json::json!({
                "platform": s.platform.as_str(),
                "snapshots": s.snapshots,
                "latest_day": s.latest.as_ref().map(|l| l.day.to_string()),
                "latest_followers": s.latest.as_ref().map(|l| l.followers),
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        return Ok(());
    }

    println!("Tidemark Snapshot Status");
    println!("========================");
    println!("Database: {:?}", db_path);
    println!();
    for status in statuses {
        match status.latest {
            Some(latest) => println!(
                "{:<10} {} snapshot(s), latest {} ({} followers)",
                status.platform, status.snapshots, latest.day, latest.followers
            ),
            None => println!("{:<10} no snapshots", status.platform),
        }
    }

    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize new database.
pub fn cmd_init(db_path: &Path, force: bool) -> Result<(), StatsError> {
    if db_path.exists() && !force {
        return Err(StatsError::IoError(
            "Database already exists. Use --force to overwrite.".to_string(),
        ));
    }

    let _store = RedbStatStore::open(db_path)?;
    println!("Initialized new snapshot database at {:?}", db_path);
    Ok(())
}

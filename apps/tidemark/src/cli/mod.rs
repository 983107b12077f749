//! # Tidemark CLI Module
//!
//! This module implements the CLI interface for Tidemark.
//!
//! ## Available Commands
//!
//! - `record` - Record today's snapshot for a platform (or bulk from a file)
//! - `analyze` - Growth analysis for one platform over a lookback window
//! - `compare` - Cross-platform growth comparison
//! - `prune` - Delete snapshots older than the retention window
//! - `status` - Show per-platform snapshot counts
//! - `init` - Initialize a new database

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tidemark_core::StatsError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Tidemark - daily social-stats snapshot store
///
/// Records one follower/post snapshot per platform per day and computes
/// growth reports and cross-platform comparisons over lookback windows.
#[derive(Parser, Debug)]
#[command(name = "tidemark")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the snapshot database
    #[arg(short = 'D', long, global = true, default_value = "tidemark.db")]
    pub database: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record today's snapshot for a platform
    Record {
        /// Platform identifier (instagram, facebook, threads)
        #[arg(short, long)]
        platform: Option<String>,

        /// Follower count
        #[arg(short, long)]
        followers: Option<i64>,

        /// Cumulative post count
        #[arg(long)]
        posts: Option<i64>,

        /// Aggregate like count
        #[arg(long)]
        likes: Option<i64>,

        /// Aggregate comment count
        #[arg(long)]
        comments: Option<i64>,

        /// Bulk input: JSON array of {platform, followers, posts, likes?, comments?}
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Growth analysis for one platform
    Analyze {
        /// Platform identifier (instagram, facebook, threads)
        #[arg(short, long)]
        platform: String,

        /// Lookback window in days
        #[arg(short, long, default_value = "30")]
        window: u32,
    },

    /// Compare growth across all platforms
    Compare {
        /// Lookback window in days
        #[arg(short, long, default_value = "30")]
        window: u32,
    },

    /// Delete snapshots older than the retention window
    Prune {
        /// Days of history to keep
        #[arg(short, long, default_value = "365")]
        retention_days: u32,
    },

    /// Show per-platform snapshot counts
    Status,

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), StatsError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Record {
            platform,
            followers,
            posts,
            likes,
            comments,
            file,
        }) => {
            cmd_record(
                &cli.database,
                json_mode,
                platform.as_deref(),
                followers,
                posts,
                likes,
                comments,
                file.as_deref(),
            )
            .await
        }
        Some(Commands::Analyze { platform, window }) => {
            cmd_analyze(&cli.database, json_mode, &platform, window).await
        }
        Some(Commands::Compare { window }) => {
            cmd_compare(&cli.database, json_mode, window).await
        }
        Some(Commands::Prune { retention_days }) => {
            cmd_prune(&cli.database, json_mode, retention_days).await
        }
        Some(Commands::Init { force }) => cmd_init(&cli.database, force),
        Some(Commands::Status) | None => cmd_status(&cli.database, json_mode).await,
    }
}

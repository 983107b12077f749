//! # Tidemark - Daily Social-Stats Snapshot Store
//!
//! The main binary for the Tidemark snapshot engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/tidemark (THE BINARY)             │
//! │                                                       │
//! │  ┌─────────────┐      ┌─────────────────────────┐    │
//! │  │   CLI       │      │  Service (async)        │    │
//! │  │  (clap)     │─────▶│  retry + concurrency    │    │
//! │  └─────────────┘      └───────────┬─────────────┘    │
//! │                                   ▼                   │
//! │                         ┌──────────────────┐          │
//! │                         │  tidemark-core   │          │
//! │                         │  (THE LOGIC)     │          │
//! │                         └──────────────────┘          │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Record today's snapshot
//! tidemark record -p instagram -f 1250 --posts 34
//!
//! # Growth analysis and comparison
//! tidemark analyze -p instagram -w 30
//! tidemark compare -w 30
//!
//! # Retention cleanup
//! tidemark prune --retention-days 365
//! ```

use clap::Parser;
use tidemark::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — TIDEMARK_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("TIDEMARK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tidemark=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Tidemark startup banner.
fn print_banner() {
    println!(
        r#"
  ████████╗██╗██████╗ ███████╗███╗   ███╗ █████╗ ██████╗ ██╗  ██╗
  ╚══██╔══╝██║██╔══██╗██╔════╝████╗ ████║██╔══██╗██╔══██╗██║ ██╔╝
     ██║   ██║██║  ██║█████╗  ██╔████╔██║███████║██████╔╝█████╔╝
     ██║   ██║██║  ██║██╔══╝  ██║╚██╔╝██║██╔══██║██╔══██╗██╔═██╗
     ██║   ██║██████╔╝███████╗██║ ╚═╝ ██║██║  ██║██║  ██║██║  ██╗
     ╚═╝   ╚═╝╚═════╝ ╚══════╝╚═╝     ╚═╝╚═╝  ╚═╝╚═╝  ╚═╝╚═╝  ╚═╝

  Daily Snapshot Store v{}

  One snapshot per platform per day • Windowed growth • Retention
"#,
        env!("CARGO_PKG_VERSION")
    );
}

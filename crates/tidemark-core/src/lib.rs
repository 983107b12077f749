//! # tidemark-core
//!
//! The deterministic stats engine for Tidemark - THE LOGIC.
//!
//! This crate owns everything that does not need a clock, a network, or a
//! runtime: the snapshot data model and its validation, the persistence
//! adapter (one trait, in-memory and redb backends), and the pure growth
//! and cross-platform comparison math.
//!
//! ## Architectural Constraints
//!
//! - The store handle is explicitly constructed and injected; there is no
//!   global client singleton
//! - Integer arithmetic only: growth rates are basis points, averages are
//!   hundredths (the workspace denies float arithmetic)
//! - Every fallible operation returns `Result<T, StatsError>`; callers can
//!   always distinguish "no data" from "operation failed"
//! - NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod analysis;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    DailySnapshot, DayStamp, EngagementTotals, Platform, SnapshotInput, StatsError,
};

// =============================================================================
// RE-EXPORTS: Persistence Adapter
// =============================================================================

pub use store::{DELETE_BATCH_SIZE, MemoryStore, RedbStatStore, StatStore};

// =============================================================================
// RE-EXPORTS: Analysis
// =============================================================================

pub use analysis::{
    ComparisonSummary, GrowthReport, NO_BEST_PLATFORM, SkippedPlatform, compute_growth,
    format_basis_points, summarize,
};

//! Domain models for the cutoff tracker.
//!
//! Snapshots are what the collector writes and the loader reads back;
//! cutoff points and series are derived from them per query.

pub mod series;
pub mod snapshot;

// Re-export all models for convenient access
pub use series::{CutoffPoint, Series};
pub use snapshot::{EventGroup, RankEntry, Snapshot, SnapshotDate, SnapshotKey, DATE_FORMAT};

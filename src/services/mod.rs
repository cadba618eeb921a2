pub mod collector;
pub mod cutoff_extractor;
pub mod graph_service;
pub mod series_builder;
pub mod snapshot_loader;
pub mod watcher;

pub use collector::{CollectReport, Collector};
pub use cutoff_extractor::{CutoffExtractor, DEFAULT_CUTOFF_RANK};
pub use graph_service::GraphService;
pub use series_builder::SeriesBuilder;
pub use snapshot_loader::{DayLoad, SnapshotLoader};
pub use watcher::{Watcher, MIN_REFRESH_INTERVAL};

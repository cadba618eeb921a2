use crate::error::{AppError, AppResult};
use crate::models::{Snapshot, SnapshotDate, SnapshotKey};
use crate::repositories::SnapshotSource;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of loading one day: the snapshot or why it is missing
#[derive(Debug)]
pub struct DayLoad {
    pub date: SnapshotDate,
    pub result: AppResult<Snapshot>,
}

/// Fetches the date index and the per-date snapshots from a source
pub struct SnapshotLoader {
    source: Arc<dyn SnapshotSource>,
    max_concurrent_fetches: usize, // 0 = every date in flight at once
}

impl SnapshotLoader {
    /// Create a new loader
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            max_concurrent_fetches: 8,
        }
    }

    /// Set the fan-out bound
    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = limit;
        self
    }

    /// Read the index: every available snapshot, ascending by date.
    ///
    /// Each key keeps the identifier as the index spells it, since that is
    /// what names the per-date resource. When two entries name the same day
    /// only the first in sort order is kept.
    pub async fn list_available_dates(&self) -> AppResult<Vec<SnapshotKey>> {
        let bytes = self.source.fetch_index().await.map_err(|e| {
            AppError::IndexUnavailable(format!("{}: {}", self.source.describe(), e))
        })?;

        let entries: Vec<String> = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::IndexUnavailable(format!("{}: malformed index: {}", self.source.describe(), e))
        })?;

        let mut keys = Vec::with_capacity(entries.len());
        for entry in entries {
            match SnapshotKey::parse(&entry) {
                Ok(key) => keys.push(key),
                Err(e) => warn!("Ignoring index entry {:?}: {}", entry, e),
            }
        }
        keys.sort();
        keys.dedup_by(|later, kept| {
            let same_day = later.date == kept.date;
            if same_day && later.id != kept.id {
                warn!("Index lists {} twice ({:?} and {:?}), using {:?}", kept.date, kept.id, later.id, kept.id);
            }
            same_day
        });

        info!("Index lists {} snapshot dates ({})", keys.len(), self.source.describe());
        Ok(keys)
    }

    /// Fetch and decode one day's snapshot
    pub async fn load_snapshot(&self, key: &SnapshotKey) -> AppResult<Snapshot> {
        let date = key.date;
        let bytes = self
            .source
            .fetch_snapshot(&key.id)
            .await
            .map_err(|e| AppError::snapshot_unavailable(date, e))?;

        let snapshot =
            Snapshot::from_json(date, &bytes).map_err(|e| AppError::snapshot_unavailable(date, e))?;

        debug!("Loaded snapshot {} ({:?}) with {} event groups", date, key.id, snapshot.groups.len());
        Ok(snapshot)
    }

    /// Load every listed day concurrently.
    ///
    /// Each day yields its own tagged result; one failed day never fails the
    /// others. Results come back in completion order.
    pub async fn load_all(&self, keys: &[SnapshotKey]) -> Vec<DayLoad> {
        let limit = match self.max_concurrent_fetches {
            0 => keys.len().max(1),
            n => n,
        };

        stream::iter(keys)
            .map(|key| async move {
                DayLoad {
                    date: key.date,
                    result: self.load_snapshot(key).await,
                }
            })
            .buffer_unordered(limit)
            .collect()
            .await
    }
}

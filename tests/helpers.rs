#![allow(dead_code)]

use async_trait::async_trait;
use cutoff_tracker::config::AppConfig;
use cutoff_tracker::models::{EventGroup, RankEntry, SnapshotDate, SnapshotKey};
use cutoff_tracker::repositories::SnapshotSource;
use cutoff_tracker::services::SnapshotLoader;
use cutoff_tracker::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory snapshot source with scriptable failures
pub struct MemorySource {
    index: Mutex<Option<Vec<u8>>>,
    snapshots: Mutex<HashMap<String, Result<Vec<u8>, String>>>,
    pub fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            index: Mutex::new(Some(b"[]".to_vec())),
            snapshots: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Index listing exactly these dates, in the given order
    pub fn with_index(self, dates: &[&str]) -> Self {
        self.set_index(dates);
        self
    }

    pub fn set_index(&self, dates: &[&str]) {
        let bytes = serde_json::to_vec(dates).expect("Failed to encode index");
        *self.index.lock().unwrap() = Some(bytes);
    }

    pub fn set_raw_index(&self, bytes: &[u8]) {
        *self.index.lock().unwrap() = Some(bytes.to_vec());
    }

    /// Make the index fetch fail
    pub fn break_index(&self) {
        *self.index.lock().unwrap() = None;
    }

    pub fn with_snapshot(self, date: &str, groups: Vec<EventGroup>) -> Self {
        self.put_snapshot(date, groups);
        self
    }

    pub fn put_snapshot(&self, date: &str, groups: Vec<EventGroup>) {
        let bytes = serde_json::to_vec(&groups).expect("Failed to encode snapshot");
        self.snapshots.lock().unwrap().insert(date.to_string(), Ok(bytes));
    }

    pub fn with_raw_snapshot(self, date: &str, bytes: &[u8]) -> Self {
        self.snapshots
            .lock()
            .unwrap()
            .insert(date.to_string(), Ok(bytes.to_vec()));
        self
    }

    /// Make one day's fetch fail
    pub fn with_failing_snapshot(self, date: &str, reason: &str) -> Self {
        self.snapshots
            .lock()
            .unwrap()
            .insert(date.to_string(), Err(reason.to_string()));
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for MemorySource {
    async fn fetch_index(&self) -> AppResult<Vec<u8>> {
        self.index
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::Message("index offline".to_string()))
    }

    async fn fetch_snapshot(&self, id: &str) -> AppResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        // let other days interleave
        tokio::task::yield_now().await;

        match self.snapshots.lock().unwrap().get(id) {
            Some(Ok(bytes)) => Ok(bytes.clone()),
            Some(Err(reason)) => Err(AppError::Message(reason.clone())),
            None => Err(AppError::Message(format!("no snapshot for {}", id))),
        }
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

pub fn date_of(s: &str) -> SnapshotDate {
    SnapshotDate::parse(s).expect("Invalid test date")
}

pub fn key_of(s: &str) -> SnapshotKey {
    SnapshotKey::parse(s).expect("Invalid test date")
}

/// Event group whose entry at `rank` carries `time`; other ranks get filler marks
pub fn group_with_cutoff(label: &str, rank: u32, time: &str) -> EventGroup {
    let rankings = (1..=20)
        .map(|r| RankEntry {
            rank: r,
            athlete: Some(format!("Athlete {}", r)),
            time: if r == rank {
                time.to_string()
            } else {
                format!("4:{:02}.00", r)
            },
        })
        .collect();

    EventGroup {
        event: label.to_string(),
        rankings,
    }
}

/// Event group with fewer than 16 entries
pub fn short_group(label: &str, entries: u32) -> EventGroup {
    EventGroup {
        event: label.to_string(),
        rankings: (1..=entries)
            .map(|r| RankEntry {
                rank: r,
                athlete: None,
                time: format!("3:{:02}.50", 50 + r),
            })
            .collect(),
    }
}

pub fn loader(source: Arc<MemorySource>) -> SnapshotLoader {
    SnapshotLoader::new(source)
}

/// Config from defaults overridden by `pairs`
pub fn test_config(pairs: &[(&str, &str)]) -> AppConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(&|key: &str| vars.get(key).cloned()).expect("Invalid test config")
}

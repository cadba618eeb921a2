use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date format used by the index, the snapshot file names and chart labels
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar date identifying one snapshot (`YYYY-MM-DD`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SnapshotDate(NaiveDate);

impl SnapshotDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a `YYYY-MM-DD` identifier
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map(Self)
    }

    /// Today's date in local time (the collector stamps snapshots with it)
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Whole days from `earlier` to `self`
    pub fn days_since(&self, earlier: SnapshotDate) -> i64 {
        self.0.signed_duration_since(earlier.0).num_days()
    }
}

impl fmt::Display for SnapshotDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for SnapshotDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SnapshotDate {
    type Error = chrono::ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<SnapshotDate> for String {
    fn from(date: SnapshotDate) -> Self {
        date.to_string()
    }
}

/// One index entry: the identifier exactly as listed, and the date it names.
///
/// The per-date resource is addressed by `id`; ordering and dedup use `date`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotKey {
    pub date: SnapshotDate,
    pub id: String,
}

impl SnapshotKey {
    /// Parse an index entry, keeping its original text
    pub fn parse(id: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            date: SnapshotDate::parse(id)?,
            id: id.to_string(),
        })
    }
}

/// One ranked performance inside an event group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athlete: Option<String>,
    pub time: String, // Raw mark as published, e.g. "4:01.20" or "#6.70"
}

/// Rankings for one event/gender in one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventGroup {
    /// Free-text label; may contain newlines between event and gender
    pub event: String,
    pub rankings: Vec<RankEntry>,
}

impl EventGroup {
    /// Check if the label mentions both the event name and the gender
    pub fn matches(&self, event_name: &str, gender: &str) -> bool {
        self.event.contains(event_name) && self.event.contains(gender)
    }

    /// First entry holding the given rank
    pub fn entry_at_rank(&self, rank: u32) -> Option<&RankEntry> {
        self.rankings.iter().find(|entry| entry.rank == rank)
    }
}

/// One day's rankings across every tracked event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub date: SnapshotDate,
    pub groups: Vec<EventGroup>,
}

impl Snapshot {
    pub fn new(date: SnapshotDate, groups: Vec<EventGroup>) -> Self {
        Self { date, groups }
    }

    /// Decode a per-date payload (a JSON array of event groups)
    pub fn from_json(date: SnapshotDate, bytes: &[u8]) -> serde_json::Result<Self> {
        let groups: Vec<EventGroup> = serde_json::from_slice(bytes)?;
        Ok(Self::new(date, groups))
    }

    /// First group whose label matches both filters
    pub fn find_group(&self, event_name: &str, gender: &str) -> Option<&EventGroup> {
        self.groups.iter().find(|group| group.matches(event_name, gender))
    }
}

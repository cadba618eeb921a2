use crate::codec::TimeValue;
use crate::models::SnapshotDate;
use serde::{Deserialize, Serialize};

/// The cutoff time observed on one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoffPoint {
    pub date: SnapshotDate,
    pub value: TimeValue,
}

impl CutoffPoint {
    pub fn new(date: SnapshotDate, value: TimeValue) -> Self {
        Self { date, value }
    }
}

/// Date-ordered cutoff values answering one (event, gender) query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub event: String,
    pub gender: String,
    points: Vec<CutoffPoint>,
}

impl Series {
    /// Create a series; points are sorted ascending by calendar date
    pub fn new(event: impl Into<String>, gender: impl Into<String>, mut points: Vec<CutoffPoint>) -> Self {
        points.sort_by_key(|point| point.date);
        Self {
            event: event.into(),
            gender: gender.into(),
            points,
        }
    }

    pub fn points(&self) -> &[CutoffPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `"Mile (Men)"`
    pub fn title(&self) -> String {
        format!("{} ({})", self.event, self.gender)
    }

    /// Date labels, index-aligned with [`Series::values`]
    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.date.to_string()).collect()
    }

    /// Cutoff values in seconds, index-aligned with [`Series::labels`]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value.seconds()).collect()
    }
}

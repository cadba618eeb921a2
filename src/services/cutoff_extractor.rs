use crate::codec::{parse_time, TimeParseError};
use crate::models::{CutoffPoint, Snapshot};

/// Rank whose time is treated as the qualifying line
pub const DEFAULT_CUTOFF_RANK: u32 = 16;

/// Pulls the cutoff time for one event/gender out of a snapshot
#[derive(Debug, Clone, Copy)]
pub struct CutoffExtractor {
    rank: u32,
}

impl CutoffExtractor {
    pub fn new(rank: u32) -> Self {
        Self { rank }
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// Find the cutoff point in `snapshot`.
    ///
    /// `Ok(None)` when no group matches or the group has no entry at the
    /// cutoff rank; both are normal (not every event fills 16 places every
    /// day). An unreadable mark is an error the caller decides how to treat.
    pub fn extract(
        &self,
        snapshot: &Snapshot,
        event_name: &str,
        gender: &str,
    ) -> Result<Option<CutoffPoint>, TimeParseError> {
        let entry = match snapshot
            .find_group(event_name, gender)
            .and_then(|group| group.entry_at_rank(self.rank))
        {
            Some(entry) => entry,
            None => return Ok(None),
        };

        let value = parse_time(&entry.time)?;
        Ok(Some(CutoffPoint::new(snapshot.date, value)))
    }
}

impl Default for CutoffExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF_RANK)
    }
}

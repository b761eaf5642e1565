//! Hourly burnout samples recorded alongside every score mutation.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::scores::{calculate_burnout, BurnoutHistory, EpcScores};
use crate::storage::{encode_json, keys, read_json, KeyValueStore};
use crate::time::local_naive;

/// Writes burnout samples keyed by local hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryRecorder {
    pub timezone_offset_hours: i32,
    pub retention_days: u32,
}

impl HistoryRecorder {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<BurnoutHistory> {
        Ok(read_json(store, keys::BURNOUT_HISTORY)?.unwrap_or_default())
    }

    /// Build the updated history record for `scores` without writing it.
    pub fn entry<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        scores: &EpcScores,
        now: DateTime<Utc>,
    ) -> Result<(String, String)> {
        let burnout = calculate_burnout(scores)?;
        let local = local_naive(now, self.timezone_offset_hours);
        let mut history = Self::load(store)?;
        history.record(local, burnout);
        history.prune(local, self.retention_days);
        Ok(encode_json(keys::BURNOUT_HISTORY, &history)?)
    }
}

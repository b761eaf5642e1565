//! Time-based side effects of tool completion.
//!
//! - At most one [`EnergyBuffer`] is live. Creating a new one replaces the
//!   old one (last write wins). Reads past its end delete it.
//! - Any number of [`ScoreTail`]s may be live; new tails are appended.

mod buffer;
mod tail;

pub use buffer::EnergyBuffer;
pub use tail::{fade_tails, ScoreTail, TailFadeOutcome, TailPoints};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scores::EpcScores;
use crate::storage::{encode_json, keys, read_json, KeyValueStore};
use crate::tools::ToolId;

/// A live tail together with what it still holds right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailView {
    pub tail: ScoreTail,
    pub remaining_now: TailPoints,
    pub hours_left: f64,
}

/// Store-backed view of the buffer slot and the tail set.
pub struct EffectsLedger<S> {
    store: S,
}

impl<S: KeyValueStore> EffectsLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current buffer, deleting it if it has run out.
    pub fn read_buffer(&self, now: DateTime<Utc>) -> Result<Option<EnergyBuffer>> {
        let Some(buffer) = read_json::<EnergyBuffer, _>(&self.store, keys::ENERGY_BUFFER)? else {
            return Ok(None);
        };
        if buffer.is_expired(now) {
            self.store.multi_remove(&[keys::ENERGY_BUFFER])?;
            tracing::debug!(source = %buffer.source, "energy buffer expired");
            return Ok(None);
        }
        Ok(Some(buffer))
    }

    /// Store a new buffer, replacing any existing one.
    pub fn create_buffer(
        &self,
        source: ToolId,
        duration_hours: f64,
        multiplier: f64,
        now: DateTime<Utc>,
    ) -> Result<EnergyBuffer> {
        let buffer = EnergyBuffer::new(source, duration_hours, multiplier, now)?;
        let (key, json) = encode_json(keys::ENERGY_BUFFER, &buffer)?;
        self.store.set(&key, &json)?;
        tracing::info!(source = %source, duration_hours, multiplier, "energy buffer created");
        Ok(buffer)
    }

    /// Every stored tail, expired or not.
    pub fn tails(&self) -> Result<Vec<ScoreTail>> {
        Ok(read_json(&self.store, keys::SCORE_TAILS)?.unwrap_or_default())
    }

    /// Live tails with their current remaining amount.
    pub fn active_tails(&self, now: DateTime<Utc>) -> Result<Vec<TailView>> {
        Ok(self
            .tails()?
            .into_iter()
            .filter(|t| !t.is_expired(now))
            .map(|tail| TailView {
                remaining_now: tail.remaining_at(now),
                hours_left: (tail.duration_hours - crate::time::hours_between(tail.start_time, now)).max(0.0),
                tail,
            })
            .collect())
    }

    /// Append a new tail to the set.
    pub fn create_tail(
        &self,
        source: ToolId,
        duration_hours: f64,
        points: TailPoints,
        now: DateTime<Utc>,
    ) -> Result<ScoreTail> {
        let tail = ScoreTail::new(source, duration_hours, points, now)?;
        let mut tails = self.tails()?;
        tails.push(tail.clone());
        let (key, json) = encode_json(keys::SCORE_TAILS, &tails)?;
        self.store.set(&key, &json)?;
        tracing::info!(source = %source, duration_hours, purpose = points.purpose, connection = points.connection, "score tail created");
        Ok(tail)
    }

    /// Fade every live tail to `now` and persist scores and tails together.
    ///
    /// Without stored scores this is a silent no-op.
    pub fn apply_fade(&self, now: DateTime<Utc>) -> Result<TailFadeOutcome> {
        let Some(scores) = read_json::<EpcScores, _>(&self.store, keys::EPC_SCORES)? else {
            tracing::debug!("no scores yet, skipping tail fade");
            return Ok(TailFadeOutcome::default());
        };
        let tails = self.tails()?;
        if tails.is_empty() {
            return Ok(TailFadeOutcome::default());
        }

        let (survivors, next, outcome) = fade_tails(tails, scores, now);
        self.store.multi_set(&[
            encode_json(keys::EPC_SCORES, &next)?,
            encode_json(keys::SCORE_TAILS, &survivors)?,
        ])?;

        if !outcome.total_points_faded.is_zero() || outcome.tails_expired > 0 {
            tracing::info!(
                tails_applied = outcome.tails_applied,
                tails_expired = outcome.tails_expired,
                purpose_faded = outcome.total_points_faded.purpose,
                connection_faded = outcome.total_points_faded.connection,
                "score tails faded"
            );
        }
        Ok(outcome)
    }
}

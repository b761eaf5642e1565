//! Hourly energy decay.
//!
//! The engine is a wall-clock state machine driven by the caller: it may be
//! invoked on app resume, on a timer, or on a background wake, as often as
//! the caller likes. A persisted `last_decay_timestamp` makes every call
//! before the next interval a no-op, so redundant calls never double-apply.
//!
//! ## Rate composition
//!
//! ```text
//! energy_lost = base (0 while asleep)
//!             x time-of-day band
//!             x step-count band
//!             x active buffer multiplier (1.0 without one)
//! ```

mod rates;

pub use rates::{ActivityBand, DecayRate, TimeOfDayBand};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::ActivityOracle;
use crate::effects::EffectsLedger;
use crate::error::Result;
use crate::history::HistoryRecorder;
use crate::scores::EpcScores;
use crate::storage::{encode_json, keys, read_json, Config, KeyValueStore};
use crate::time::local_hour;

/// Tunables for the decay engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecaySettings {
    pub base_rate_per_hour: f64,
    pub interval: Duration,
    pub timezone_offset_hours: i32,
    pub history: HistoryRecorder,
}

impl DecaySettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_rate_per_hour: config.decay.base_rate_per_hour,
            interval: Duration::minutes(config.decay.interval_minutes as i64),
            timezone_offset_hours: config.decay.timezone_offset_hours,
            history: HistoryRecorder {
                timezone_offset_hours: config.decay.timezone_offset_hours,
                retention_days: config.history.retention_days,
            },
        }
    }
}

impl Default for DecaySettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Result of one decay check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayOutcome {
    pub decay_applied: bool,
    pub energy_lost: f64,
    pub new_energy: f64,
    /// Factors used, when decay was applied
    pub rate: Option<DecayRate>,
}

impl DecayOutcome {
    fn skipped(energy: f64) -> Self {
        Self {
            decay_applied: false,
            energy_lost: 0.0,
            new_energy: energy,
            rate: None,
        }
    }
}

/// Applies hourly energy loss to the stored scores.
pub struct DecayEngine<S, A> {
    store: S,
    oracle: A,
    settings: DecaySettings,
}

impl<S: KeyValueStore, A: ActivityOracle> DecayEngine<S, A> {
    pub fn new(store: S, oracle: A, settings: DecaySettings) -> Self {
        Self {
            store,
            oracle,
            settings,
        }
    }

    /// Earliest time the next decay may apply, if decay has run before.
    pub fn next_due(&self) -> Result<Option<DateTime<Utc>>> {
        let last: Option<DateTime<Utc>> = read_json(&self.store, keys::LAST_DECAY_TIMESTAMP)?;
        Ok(last.map(|t| t + self.settings.interval))
    }

    /// Compute the rate that would apply at `now`.
    pub fn current_rate(&self, now: DateTime<Utc>) -> Result<DecayRate> {
        let asleep = self.oracle.is_currently_asleep(now)?;
        let steps = self.oracle.today_activity(now)?.map(|a| a.steps);
        let buffer = EffectsLedger::new(&self.store).read_buffer(now)?;

        Ok(DecayRate {
            base_rate: if asleep { 0.0 } else { self.settings.base_rate_per_hour },
            time_band: TimeOfDayBand::from_hour(local_hour(now, self.settings.timezone_offset_hours)),
            activity_band: ActivityBand::from_steps(steps),
            buffer_multiplier: buffer.map(|b| b.multiplier).unwrap_or(1.0),
        })
    }

    /// Apply one hour of decay if it is due.
    pub fn check_and_apply(&self, now: DateTime<Utc>) -> Result<DecayOutcome> {
        let Some(scores) = read_json::<EpcScores, _>(&self.store, keys::EPC_SCORES)? else {
            tracing::debug!("no scores yet, skipping energy decay");
            return Ok(DecayOutcome::skipped(0.0));
        };

        if let Some(due) = self.next_due()? {
            if now < due {
                tracing::debug!(next_due = %due, "energy decay not yet due");
                return Ok(DecayOutcome::skipped(scores.energy));
            }
        }

        let rate = self.current_rate(now)?;
        let energy_lost = rate.energy_lost();
        let next = scores.with_energy(scores.energy - energy_lost);

        let history = self.settings.history.entry(&self.store, &next, now)?;
        self.store.multi_set(&[
            encode_json(keys::EPC_SCORES, &next)?,
            encode_json(keys::LAST_DECAY_TIMESTAMP, &now)?,
            history,
        ])?;

        tracing::info!(
            energy_lost,
            new_energy = next.energy,
            time_band = ?rate.time_band,
            activity_band = ?rate.activity_band,
            buffer_multiplier = rate.buffer_multiplier,
            "energy decay applied"
        );

        Ok(DecayOutcome {
            decay_applied: true,
            energy_lost,
            new_energy: next.energy,
            rate: Some(rate),
        })
    }
}

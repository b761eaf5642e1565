//! Burnout percentage and its hourly history.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::EpcScores;
use crate::error::ValidationError;

const HOUR_KEY_FORMAT: &str = "%Y-%m-%dT%H";

/// Burnout risk: the inverse of the average score, rounded and clamped to [0, 100].
pub fn calculate_burnout(scores: &EpcScores) -> Result<u8, ValidationError> {
    scores.validate()?;
    let burnout = (100.0 - scores.average()).round().clamp(0.0, 100.0);
    Ok(burnout as u8)
}

/// One stored history point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnoutSample {
    /// Local calendar hour, `YYYY-MM-DDTHH`
    pub hour: String,
    pub burnout: u8,
}

/// Burnout samples keyed by local calendar hour.
///
/// A later sample in the same hour replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BurnoutHistory {
    samples: BTreeMap<String, u8>,
}

impl BurnoutHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hour_key(local: NaiveDateTime) -> String {
        local.format(HOUR_KEY_FORMAT).to_string()
    }

    /// Record a sample for the hour containing `local`.
    pub fn record(&mut self, local: NaiveDateTime, burnout: u8) {
        self.samples.insert(Self::hour_key(local), burnout);
    }

    /// Drop samples older than `retention_days` before `local`.
    pub fn prune(&mut self, local: NaiveDateTime, retention_days: u32) {
        let cutoff = Self::hour_key(local - Duration::days(retention_days as i64));
        self.samples.retain(|hour, _| hour.as_str() >= cutoff.as_str());
    }

    pub fn get(&self, local: NaiveDateTime) -> Option<u8> {
        self.samples.get(&Self::hour_key(local)).copied()
    }

    /// Samples in chronological order.
    pub fn samples(&self) -> Vec<BurnoutSample> {
        self.samples
            .iter()
            .map(|(hour, burnout)| BurnoutSample {
                hour: hour.clone(),
                burnout: *burnout,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

//! Score tails: purpose/connection bonuses that fade linearly to zero.
//!
//! A tail remembers the points it started with and the points still
//! outstanding at its last checkpoint. Each fade recomputes the remaining
//! amount from the original start time and subtracts only the difference
//! since the checkpoint, so repeated fades at the same instant are no-ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::scores::{EpcScores, PointDelta};
use crate::time::hours_between;
use crate::tools::ToolId;

/// Purpose and connection points carried by a tail.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TailPoints {
    pub purpose: f64,
    pub connection: f64,
}

impl TailPoints {
    pub fn new(purpose: f64, connection: f64) -> Self {
        Self {
            purpose,
            connection,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.purpose == 0.0 && self.connection == 0.0
    }

    fn minus(&self, other: &TailPoints) -> TailPoints {
        TailPoints::new(self.purpose - other.purpose, self.connection - other.connection)
    }

    fn plus(&self, other: &TailPoints) -> TailPoints {
        TailPoints::new(self.purpose + other.purpose, self.connection + other.connection)
    }
}

/// One fading bonus created by a tool completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTail {
    pub active: bool,
    pub start_time: DateTime<Utc>,
    pub duration_hours: f64,
    pub initial_points: TailPoints,
    /// Points still outstanding at the last fade checkpoint
    pub remaining_points: TailPoints,
    pub source: ToolId,
}

impl ScoreTail {
    pub fn new(
        source: ToolId,
        duration_hours: f64,
        points: TailPoints,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if !(duration_hours.is_finite() && duration_hours > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "tail.duration".to_string(),
                message: format!("must be positive hours, got {duration_hours}"),
            });
        }
        for (field, value) in [("tail.purpose", points.purpose), ("tail.connection", points.connection)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: format!("must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(Self {
            active: true,
            start_time: now,
            duration_hours,
            initial_points: points,
            remaining_points: points,
            source,
        })
    }

    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        (hours_between(self.start_time, now) / self.duration_hours).min(1.0)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.active || hours_between(self.start_time, now) >= self.duration_hours
    }

    /// Linear remaining amount at `now`, rounded to whole points.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> TailPoints {
        let left = 1.0 - self.progress(now);
        TailPoints::new(
            (self.initial_points.purpose * left).round().max(0.0),
            (self.initial_points.connection * left).round().max(0.0),
        )
    }
}

/// Summary of one fade pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailFadeOutcome {
    pub tails_applied: usize,
    pub total_points_faded: TailPoints,
    pub tails_expired: usize,
}

/// Fade every tail to `now`, returning the surviving tails and new scores.
pub fn fade_tails(
    tails: Vec<ScoreTail>,
    scores: EpcScores,
    now: DateTime<Utc>,
) -> (Vec<ScoreTail>, EpcScores, TailFadeOutcome) {
    let mut outcome = TailFadeOutcome::default();
    let mut scores = scores;
    let mut survivors = Vec::with_capacity(tails.len());

    for mut tail in tails {
        if tail.is_expired(now) {
            outcome.tails_expired += 1;
            continue;
        }

        let remaining = tail.remaining_at(now);
        let faded = tail.remaining_points.minus(&remaining);
        // Rounding can never make a tail grow back.
        let faded = TailPoints::new(faded.purpose.max(0.0), faded.connection.max(0.0));

        if !faded.is_zero() {
            scores = scores.apply_delta(&PointDelta::new(0.0, -faded.purpose, -faded.connection));
        }
        tail.remaining_points = tail.remaining_points.minus(&faded);
        outcome.total_points_faded = outcome.total_points_faded.plus(&faded);
        outcome.tails_applied += 1;
        survivors.push(tail);
    }

    (survivors, scores, outcome)
}

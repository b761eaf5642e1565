//! Energy / Purpose / Connection scores.
//!
//! The three wellbeing batteries are always kept within [0, 100]. Every
//! mutation path goes through [`clamp_score`], so a stored record can never
//! hold NaN or an out-of-range value.

mod assessment;
mod burnout;

pub use assessment::Assessment;
pub use burnout::{calculate_burnout, BurnoutHistory, BurnoutSample};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// Clamp a score into [0, 100]. NaN collapses to 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        SCORE_MIN
    } else {
        value.clamp(SCORE_MIN, SCORE_MAX)
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn check_score(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&value) {
        return Err(ValidationError::ScoreOutOfRange {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// One of the three batteries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Battery {
    Energy,
    Purpose,
    Connection,
}

impl Battery {
    pub const ALL: [Battery; 3] = [Battery::Energy, Battery::Purpose, Battery::Connection];

    pub fn name(&self) -> &'static str {
        match self {
            Battery::Energy => "energy",
            Battery::Purpose => "purpose",
            Battery::Connection => "connection",
        }
    }
}

/// The user's current wellbeing scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpcScores {
    pub energy: f64,
    pub purpose: f64,
    pub connection: f64,
}

impl EpcScores {
    /// Build validated scores. Fails if any field is outside [0, 100].
    pub fn new(energy: f64, purpose: f64, connection: f64) -> Result<Self, ValidationError> {
        let scores = Self {
            energy,
            purpose,
            connection,
        };
        scores.validate()?;
        Ok(scores)
    }

    /// Build scores by clamping each field instead of rejecting.
    pub fn clamped(energy: f64, purpose: f64, connection: f64) -> Self {
        Self {
            energy: clamp_score(energy),
            purpose: clamp_score(purpose),
            connection: clamp_score(connection),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_score("energy", self.energy)?;
        check_score("purpose", self.purpose)?;
        check_score("connection", self.connection)?;
        Ok(())
    }

    pub fn get(&self, battery: Battery) -> f64 {
        match battery {
            Battery::Energy => self.energy,
            Battery::Purpose => self.purpose,
            Battery::Connection => self.connection,
        }
    }

    pub fn average(&self) -> f64 {
        (self.energy + self.purpose + self.connection) / 3.0
    }

    /// True if any battery is strictly above `threshold`.
    pub fn any_above(&self, threshold: f64) -> bool {
        Battery::ALL.iter().any(|b| self.get(*b) > threshold)
    }

    /// True if any battery is strictly below `threshold`.
    pub fn any_below(&self, threshold: f64) -> bool {
        Battery::ALL.iter().any(|b| self.get(*b) < threshold)
    }

    /// Add a point delta and clamp the result.
    pub fn apply_delta(&self, delta: &PointDelta) -> Self {
        Self::clamped(
            round2(self.energy + delta.energy),
            round2(self.purpose + delta.purpose),
            round2(self.connection + delta.connection),
        )
    }

    /// Replace energy, clamped.
    pub fn with_energy(&self, energy: f64) -> Self {
        Self::clamped(round2(energy), self.purpose, self.connection)
    }
}

/// A proposed or applied change to the three batteries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointDelta {
    pub energy: f64,
    pub purpose: f64,
    pub connection: f64,
}

impl PointDelta {
    pub const ZERO: PointDelta = PointDelta {
        energy: 0.0,
        purpose: 0.0,
        connection: 0.0,
    };

    pub fn new(energy: f64, purpose: f64, connection: f64) -> Self {
        Self {
            energy,
            purpose,
            connection,
        }
    }

    pub fn get(&self, battery: Battery) -> f64 {
        match battery {
            Battery::Energy => self.energy,
            Battery::Purpose => self.purpose,
            Battery::Connection => self.connection,
        }
    }

    /// Multiply every field by `factor` and round each to the nearest point.
    pub fn scaled_rounded(&self, factor: f64) -> Self {
        Self {
            energy: (self.energy * factor).round(),
            purpose: (self.purpose * factor).round(),
            connection: (self.connection * factor).round(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.energy == 0.0 && self.purpose == 0.0 && self.connection == 0.0
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for battery in Battery::ALL {
            let value = self.get(battery);
            if !value.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: format!("points.{}", battery.name()),
                    message: format!("must be finite, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_out_of_range_and_nan() {
        assert!(EpcScores::new(50.0, 50.0, 50.0).is_ok());
        assert!(EpcScores::new(0.0, 100.0, 0.0).is_ok());
        assert!(EpcScores::new(-0.1, 50.0, 50.0).is_err());
        assert!(EpcScores::new(50.0, 100.5, 50.0).is_err());
        assert!(EpcScores::new(50.0, 50.0, f64::NAN).is_err());
        assert!(EpcScores::new(f64::INFINITY, 50.0, 50.0).is_err());
    }

    #[test]
    fn apply_delta_clamps_both_ends() {
        let scores = EpcScores::new(99.0, 1.0, 50.0).unwrap();
        let next = scores.apply_delta(&PointDelta::new(5.0, -3.0, 2.0));
        assert_eq!(next, EpcScores::new(100.0, 0.0, 52.0).unwrap());
    }

    #[test]
    fn clamp_score_handles_nan() {
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(150.0), 100.0);
        assert_eq!(clamp_score(-4.0), 0.0);
    }

    #[test]
    fn thresholds_are_strict() {
        let scores = EpcScores::new(90.0, 70.0, 75.0).unwrap();
        assert!(!scores.any_above(90.0));
        assert!(!scores.any_below(70.0));
        assert!(scores.any_above(89.9));
    }

    #[test]
    fn scaled_rounded_rounds_each_field() {
        let delta = PointDelta::new(3.0, 2.0, 1.0).scaled_rounded(0.7);
        assert_eq!(delta, PointDelta::new(2.0, 1.0, 1.0));
    }
}

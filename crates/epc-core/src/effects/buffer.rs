//! Energy buffers: temporary slow-down of energy decay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::{hours_between, hours_to_duration};
use crate::tools::{BufferSpec, ToolId};

/// The single live energy buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyBuffer {
    pub active: bool,
    pub start_time: DateTime<Utc>,
    pub duration_hours: f64,
    /// Decay multiplier in (0, 1]
    pub multiplier: f64,
    pub source: ToolId,
}

impl EnergyBuffer {
    pub fn new(
        source: ToolId,
        duration_hours: f64,
        multiplier: f64,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if !(duration_hours.is_finite() && duration_hours > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "buffer.duration".to_string(),
                message: format!("must be positive hours, got {duration_hours}"),
            });
        }
        if !(multiplier > 0.0 && multiplier <= 1.0) {
            return Err(ValidationError::InvalidValue {
                field: "buffer.multiplier".to_string(),
                message: format!("must be within (0, 1], got {multiplier}"),
            });
        }
        Ok(Self {
            active: true,
            start_time: now,
            duration_hours,
            multiplier,
            source,
        })
    }

    pub fn from_spec(source: ToolId, spec: &BufferSpec, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        Self::new(source, spec.duration_hours, spec.multiplier, now)
    }

    pub fn elapsed_hours(&self, now: DateTime<Utc>) -> f64 {
        hours_between(self.start_time, now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.active || self.elapsed_hours(now) >= self.duration_hours
    }

    pub fn remaining_hours(&self, now: DateTime<Utc>) -> f64 {
        (self.duration_hours - self.elapsed_hours(now)).max(0.0)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.start_time + hours_to_duration(self.duration_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn expires_at_duration() {
        let buffer = EnergyBuffer::new(ToolId::HydrationHero, 4.0, 0.5, start()).unwrap();
        assert!(!buffer.is_expired(start() + Duration::hours(3)));
        assert_eq!(buffer.remaining_hours(start() + Duration::hours(3)), 1.0);
        assert!(buffer.is_expired(start() + Duration::hours(4)));
        assert_eq!(buffer.expires_at(), start() + Duration::hours(4));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(EnergyBuffer::new(ToolId::PowerNap, 0.0, 0.5, start()).is_err());
        assert!(EnergyBuffer::new(ToolId::PowerNap, 2.0, 0.0, start()).is_err());
        assert!(EnergyBuffer::new(ToolId::PowerNap, 2.0, 1.5, start()).is_err());
        assert!(EnergyBuffer::new(ToolId::PowerNap, f64::NAN, 0.5, start()).is_err());
    }

    #[test]
    fn inactive_buffer_counts_as_expired() {
        let mut buffer = EnergyBuffer::new(ToolId::PowerNap, 2.0, 0.6, start()).unwrap();
        buffer.active = false;
        assert!(buffer.is_expired(start()));
    }
}

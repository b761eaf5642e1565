//! Activity and sleep signals feeding the decay engine.
//!
//! The engine never reads step counters or sleep trackers directly. It asks
//! an [`ActivityOracle`]; the default implementation reads the last stored
//! [`DailyActivity`] reading and a configured [`SleepWindow`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError, ValidationError};
use crate::storage::{keys, read_json, KeyValueStore, SleepConfig};
use crate::time::{local_hour, local_naive};

/// Step and activity totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub steps: u32,
    pub active_minutes: u32,
    pub exercise_minutes: u32,
}

impl DailyActivity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.active_minutes > 24 * 60 {
            return Err(ValidationError::InvalidValue {
                field: "activeMinutes".to_string(),
                message: format!("{} exceeds minutes in a day", self.active_minutes),
            });
        }
        if self.exercise_minutes > 24 * 60 {
            return Err(ValidationError::InvalidValue {
                field: "exerciseMinutes".to_string(),
                message: format!("{} exceeds minutes in a day", self.exercise_minutes),
            });
        }
        Ok(())
    }
}

/// Source of today's activity and the current sleep state.
pub trait ActivityOracle {
    /// Today's reading, or `None` when nothing has been recorded today.
    fn today_activity(&self, now: DateTime<Utc>) -> Result<Option<DailyActivity>, StorageError>;

    fn is_currently_asleep(&self, now: DateTime<Utc>) -> Result<bool, StorageError>;
}

impl<T: ActivityOracle + ?Sized> ActivityOracle for &T {
    fn today_activity(&self, now: DateTime<Utc>) -> Result<Option<DailyActivity>, StorageError> {
        (**self).today_activity(now)
    }

    fn is_currently_asleep(&self, now: DateTime<Utc>) -> Result<bool, StorageError> {
        (**self).is_currently_asleep(now)
    }
}

/// Habitual sleep hours in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepWindow {
    pub enabled: bool,
    pub start_hour: u32,
    pub end_hour: u32,
    pub timezone_offset_hours: i32,
}

impl SleepWindow {
    pub fn from_config(sleep: &SleepConfig, timezone_offset_hours: i32) -> Self {
        Self {
            enabled: sleep.enabled,
            start_hour: sleep.start_hour,
            end_hour: sleep.end_hour,
            timezone_offset_hours,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            start_hour: 0,
            end_hour: 0,
            timezone_offset_hours: 0,
        }
    }

    /// Whether `now` falls in the window. `start == end` is an empty window.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        if !self.enabled || self.start_hour == self.end_hour {
            return false;
        }
        let hour = local_hour(now, self.timezone_offset_hours);
        if self.start_hour < self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// Oracle backed by the key-value store and a sleep window.
pub struct StoredActivityOracle<S> {
    store: S,
    sleep: SleepWindow,
}

impl<S: KeyValueStore> StoredActivityOracle<S> {
    pub fn new(store: S, sleep: SleepWindow) -> Self {
        Self { store, sleep }
    }

    /// Store today's reading, replacing any earlier reading.
    pub fn record(&self, activity: &DailyActivity) -> Result<()> {
        record_activity(&self.store, activity)
    }
}

impl<S: KeyValueStore> ActivityOracle for StoredActivityOracle<S> {
    fn today_activity(&self, now: DateTime<Utc>) -> Result<Option<DailyActivity>, StorageError> {
        let stored: Option<DailyActivity> = read_json(&self.store, keys::DAILY_ACTIVITY)?;
        let today = local_naive(now, self.sleep.timezone_offset_hours).date();
        Ok(stored.filter(|a| a.date == today))
    }

    fn is_currently_asleep(&self, now: DateTime<Utc>) -> Result<bool, StorageError> {
        Ok(self.sleep.contains(now))
    }
}

/// Validate and store a daily activity reading.
pub fn record_activity<S: KeyValueStore + ?Sized>(store: &S, activity: &DailyActivity) -> Result<()> {
    activity.validate()?;
    let json = serde_json::to_string(activity)?;
    store.set(keys::DAILY_ACTIVITY, &json)?;
    tracing::debug!(date = %activity.date, steps = activity.steps, "recorded daily activity");
    Ok(())
}

/// Oracle with constant answers.
#[derive(Debug, Clone, Default)]
pub struct FixedActivityOracle {
    pub activity: Option<DailyActivity>,
    pub asleep: bool,
}

impl FixedActivityOracle {
    pub fn awake_with_steps(date: NaiveDate, steps: u32) -> Self {
        Self {
            activity: Some(DailyActivity {
                date,
                steps,
                active_minutes: 0,
                exercise_minutes: 0,
            }),
            asleep: false,
        }
    }
}

impl ActivityOracle for FixedActivityOracle {
    fn today_activity(&self, _now: DateTime<Utc>) -> Result<Option<DailyActivity>, StorageError> {
        Ok(self.activity.clone())
    }

    fn is_currently_asleep(&self, _now: DateTime<Utc>) -> Result<bool, StorageError> {
        Ok(self.asleep)
    }
}

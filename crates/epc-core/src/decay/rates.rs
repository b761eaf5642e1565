//! Decay rate tables.

use serde::{Deserialize, Serialize};

/// Band of the local day used to scale decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDayBand {
    /// 06:00-10:00
    Morning,
    /// 10:00-14:00
    Midday,
    /// 14:00-18:00
    Afternoon,
    /// 18:00-22:00
    Evening,
    /// 22:00-06:00
    Night,
}

impl TimeOfDayBand {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=9 => TimeOfDayBand::Morning,
            10..=13 => TimeOfDayBand::Midday,
            14..=17 => TimeOfDayBand::Afternoon,
            18..=21 => TimeOfDayBand::Evening,
            _ => TimeOfDayBand::Night,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            TimeOfDayBand::Morning => 0.5,
            TimeOfDayBand::Midday => 1.0,
            TimeOfDayBand::Afternoon => 1.5,
            TimeOfDayBand::Evening => 2.0,
            TimeOfDayBand::Night => 0.0,
        }
    }
}

/// Band of today's step count. More steps means faster decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityBand {
    /// up to 2,000 steps (also used when no reading exists)
    Sedentary,
    /// 2,001-8,000
    Light,
    /// 8,001-15,000
    Active,
    /// above 15,000
    VeryActive,
}

impl ActivityBand {
    pub fn from_steps(steps: Option<u32>) -> Self {
        match steps.unwrap_or(0) {
            0..=2000 => ActivityBand::Sedentary,
            2001..=8000 => ActivityBand::Light,
            8001..=15000 => ActivityBand::Active,
            _ => ActivityBand::VeryActive,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityBand::Sedentary => 1.0,
            ActivityBand::Light => 1.2,
            ActivityBand::Active => 1.5,
            ActivityBand::VeryActive => 2.0,
        }
    }
}

/// Every factor that went into one hour of decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayRate {
    pub base_rate: f64,
    pub time_band: TimeOfDayBand,
    pub activity_band: ActivityBand,
    pub buffer_multiplier: f64,
}

impl DecayRate {
    /// Energy lost for one hour, rounded to two decimals.
    pub fn energy_lost(&self) -> f64 {
        let raw = self.base_rate
            * self.time_band.multiplier()
            * self.activity_band.multiplier()
            * self.buffer_multiplier;
        crate::scores::round2(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(TimeOfDayBand::from_hour(5), TimeOfDayBand::Night);
        assert_eq!(TimeOfDayBand::from_hour(6), TimeOfDayBand::Morning);
        assert_eq!(TimeOfDayBand::from_hour(10), TimeOfDayBand::Midday);
        assert_eq!(TimeOfDayBand::from_hour(14), TimeOfDayBand::Afternoon);
        assert_eq!(TimeOfDayBand::from_hour(18), TimeOfDayBand::Evening);
        assert_eq!(TimeOfDayBand::from_hour(21), TimeOfDayBand::Evening);
        assert_eq!(TimeOfDayBand::from_hour(22), TimeOfDayBand::Night);
    }

    #[test]
    fn step_edges() {
        assert_eq!(ActivityBand::from_steps(None), ActivityBand::Sedentary);
        assert_eq!(ActivityBand::from_steps(Some(2000)), ActivityBand::Sedentary);
        assert_eq!(ActivityBand::from_steps(Some(2001)), ActivityBand::Light);
        assert_eq!(ActivityBand::from_steps(Some(8000)), ActivityBand::Light);
        assert_eq!(ActivityBand::from_steps(Some(8001)), ActivityBand::Active);
        assert_eq!(ActivityBand::from_steps(Some(15000)), ActivityBand::Active);
        assert_eq!(ActivityBand::from_steps(Some(15001)), ActivityBand::VeryActive);
    }

    #[test]
    fn energy_lost_composes_multiplicatively() {
        let rate = DecayRate {
            base_rate: 0.5,
            time_band: TimeOfDayBand::Afternoon,
            activity_band: ActivityBand::Light,
            buffer_multiplier: 0.5,
        };
        // 0.5 * 1.5 * 1.2 * 0.5 = 0.45
        assert_eq!(rate.energy_lost(), 0.45);
    }
}

//! Global point modulation.
//!
//! Two multiplicative rules are evaluated against the scores *before* an
//! award is added:
//!
//! - **Saturation**: any battery above the saturation threshold dampens the
//!   whole award.
//! - **Low-state amplifier**: any battery below the amplifier threshold
//!   boosts the (possibly already dampened) award.
//!
//! Both checks are instantaneous. Each field is rounded after each rule.

use serde::{Deserialize, Serialize};

use crate::scores::{EpcScores, PointDelta};
use crate::storage::RulesConfig;

/// Rule thresholds and factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalRules {
    pub saturation_threshold: f64,
    pub saturation_factor: f64,
    pub amplifier_threshold: f64,
    pub amplifier_factor: f64,
}

impl Default for GlobalRules {
    fn default() -> Self {
        Self::from_config(&RulesConfig::default())
    }
}

/// Award after modulation, with the rules that fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulatedPoints {
    pub points: PointDelta,
    pub saturation_applied: bool,
    pub amplifier_applied: bool,
}

impl GlobalRules {
    pub fn from_config(config: &RulesConfig) -> Self {
        Self {
            saturation_threshold: config.saturation_threshold,
            saturation_factor: config.saturation_factor,
            amplifier_threshold: config.amplifier_threshold,
            amplifier_factor: config.amplifier_factor,
        }
    }

    /// Apply saturation then amplifier to `proposed`, judged on `current`.
    pub fn apply(&self, current: &EpcScores, proposed: PointDelta) -> ModulatedPoints {
        let mut points = proposed;

        let saturation_applied = current.any_above(self.saturation_threshold);
        if saturation_applied {
            points = points.scaled_rounded(self.saturation_factor);
        }

        let amplifier_applied = current.any_below(self.amplifier_threshold);
        if amplifier_applied {
            points = points.scaled_rounded(self.amplifier_factor);
        }

        ModulatedPoints {
            points,
            saturation_applied,
            amplifier_applied,
        }
    }
}

//! Cooldown-scaled rewards for repeat tool use.
//!
//! Rewards ramp linearly from 0% right after a use back to 100% once the
//! tool's full cooldown has passed. There is no bonus beyond 100%.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::registry::ToolConfig;
use crate::scores::PointDelta;
use crate::time::hours_between;

/// Last use of a tool. One record per tool, overwritten on every use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUsage {
    pub last_used: DateTime<Utc>,
    pub points_earned: PointDelta,
    pub cooldown_hours: f64,
}

/// Reward a tool would give right now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CooldownStatus {
    pub effective_points: PointDelta,
    /// 0-100
    pub effectiveness_percentage: u8,
    /// Whole hours until full effectiveness, 0 when ready
    pub cooldown_remaining: u32,
    pub is_on_cooldown: bool,
    pub last_used: Option<DateTime<Utc>>,
}

/// Compute the effective reward for `config` given its last use.
pub fn effectiveness(
    config: &ToolConfig,
    last_usage: Option<&ToolUsage>,
    now: DateTime<Utc>,
) -> CooldownStatus {
    let Some(usage) = last_usage else {
        return CooldownStatus {
            effective_points: config.boost,
            effectiveness_percentage: 100,
            cooldown_remaining: 0,
            is_on_cooldown: false,
            last_used: None,
        };
    };

    let hours_since = hours_between(usage.last_used, now);
    let ratio = (hours_since / config.cooldown_hours).min(1.0);
    let is_on_cooldown = ratio < 1.0;
    let cooldown_remaining = if is_on_cooldown {
        (config.cooldown_hours - hours_since).ceil().max(0.0) as u32
    } else {
        0
    };

    CooldownStatus {
        effective_points: config.boost.scaled_rounded(ratio),
        effectiveness_percentage: (ratio * 100.0).round() as u8,
        cooldown_remaining,
        is_on_cooldown,
        last_used: Some(usage.last_used),
    }
}

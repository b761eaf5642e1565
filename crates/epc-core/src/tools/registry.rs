//! Static tool configuration table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::scores::PointDelta;

/// Every wellness tool the app offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToolId {
    HydrationHero,
    BoxBreathing,
    PowerNap,
    SunlightWalk,
    GratitudeJournal,
    KindnessText,
    DeskStretch,
    ColdSplash,
    ValuesCheckIn,
    FriendCall,
    MindfulMinute,
    ProteinSnack,
    DigitalSunset,
    GoalSprint,
    TeamHighFive,
    NatureSounds,
    SelfCompassion,
    FocusReset,
}

impl ToolId {
    pub const ALL: [ToolId; 18] = [
        ToolId::HydrationHero,
        ToolId::BoxBreathing,
        ToolId::PowerNap,
        ToolId::SunlightWalk,
        ToolId::GratitudeJournal,
        ToolId::KindnessText,
        ToolId::DeskStretch,
        ToolId::ColdSplash,
        ToolId::ValuesCheckIn,
        ToolId::FriendCall,
        ToolId::MindfulMinute,
        ToolId::ProteinSnack,
        ToolId::DigitalSunset,
        ToolId::GoalSprint,
        ToolId::TeamHighFive,
        ToolId::NatureSounds,
        ToolId::SelfCompassion,
        ToolId::FocusReset,
    ];

    /// Stable identifier used in storage keys and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::HydrationHero => "hydrationHero",
            ToolId::BoxBreathing => "boxBreathing",
            ToolId::PowerNap => "powerNap",
            ToolId::SunlightWalk => "sunlightWalk",
            ToolId::GratitudeJournal => "gratitudeJournal",
            ToolId::KindnessText => "kindnessText",
            ToolId::DeskStretch => "deskStretch",
            ToolId::ColdSplash => "coldSplash",
            ToolId::ValuesCheckIn => "valuesCheckIn",
            ToolId::FriendCall => "friendCall",
            ToolId::MindfulMinute => "mindfulMinute",
            ToolId::ProteinSnack => "proteinSnack",
            ToolId::DigitalSunset => "digitalSunset",
            ToolId::GoalSprint => "goalSprint",
            ToolId::TeamHighFive => "teamHighFive",
            ToolId::NatureSounds => "natureSounds",
            ToolId::SelfCompassion => "selfCompassion",
            ToolId::FocusReset => "focusReset",
        }
    }

    pub fn config(&self) -> ToolConfig {
        tool_config(*self)
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolId::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| ValidationError::UnknownTool(s.to_string()))
    }
}

/// The user state a tool is designed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolState {
    Maximized,
    Reserved,
    Indulgent,
    Fatigued,
}

/// Energy buffer created on completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferSpec {
    pub duration_hours: f64,
    /// Decay multiplier while active, in (0, 1]
    pub multiplier: f64,
}

/// Purpose/connection tail created on completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TailSpec {
    pub duration_hours: f64,
    pub purpose: f64,
    pub connection: f64,
}

/// Immutable per-tool configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    pub boost: PointDelta,
    pub cooldown_hours: f64,
    pub state: ToolState,
    pub buffer: Option<BufferSpec>,
    pub tail: Option<TailSpec>,
}

const fn boost(energy: f64, purpose: f64, connection: f64) -> PointDelta {
    PointDelta {
        energy,
        purpose,
        connection,
    }
}

const fn buffer(duration_hours: f64, multiplier: f64) -> Option<BufferSpec> {
    Some(BufferSpec {
        duration_hours,
        multiplier,
    })
}

const fn tail(duration_hours: f64, purpose: f64, connection: f64) -> Option<TailSpec> {
    Some(TailSpec {
        duration_hours,
        purpose,
        connection,
    })
}

/// Look up the configuration of a tool.
pub fn tool_config(tool: ToolId) -> ToolConfig {
    use ToolState::*;

    let (boost, cooldown_hours, state, buffer, tail) = match tool {
        ToolId::HydrationHero => (boost(2.0, 0.0, 0.0), 2.0, Maximized, buffer(4.0, 0.5), None),
        ToolId::BoxBreathing => (boost(1.0, 1.0, 0.0), 1.0, Fatigued, None, None),
        ToolId::PowerNap => (boost(5.0, 0.0, 0.0), 6.0, Fatigued, buffer(3.0, 0.6), None),
        ToolId::SunlightWalk => (boost(3.0, 1.0, 0.0), 4.0, Reserved, buffer(2.0, 0.75), None),
        ToolId::GratitudeJournal => (boost(0.0, 3.0, 1.0), 12.0, Reserved, None, tail(24.0, 2.0, 0.0)),
        ToolId::KindnessText => (boost(0.0, 1.0, 3.0), 6.0, Indulgent, None, tail(12.0, 0.0, 2.0)),
        ToolId::DeskStretch => (boost(2.0, 0.0, 0.0), 1.0, Fatigued, None, None),
        ToolId::ColdSplash => (boost(3.0, 0.0, 0.0), 3.0, Fatigued, buffer(1.0, 0.8), None),
        ToolId::ValuesCheckIn => (boost(0.0, 4.0, 0.0), 24.0, Reserved, None, tail(48.0, 3.0, 0.0)),
        ToolId::FriendCall => (boost(0.0, 1.0, 4.0), 12.0, Indulgent, None, tail(24.0, 0.0, 3.0)),
        ToolId::MindfulMinute => (boost(1.0, 1.0, 1.0), 2.0, Maximized, None, None),
        ToolId::ProteinSnack => (boost(2.0, 0.0, 0.0), 3.0, Maximized, buffer(2.0, 0.7), None),
        ToolId::DigitalSunset => (boost(1.0, 1.0, 0.0), 24.0, Indulgent, buffer(8.0, 0.5), None),
        ToolId::GoalSprint => (boost(0.0, 3.0, 0.0), 8.0, Maximized, None, tail(12.0, 2.0, 0.0)),
        ToolId::TeamHighFive => (boost(0.0, 1.0, 2.0), 4.0, Maximized, None, tail(6.0, 0.0, 1.0)),
        ToolId::NatureSounds => (boost(1.0, 0.0, 1.0), 2.0, Reserved, None, None),
        ToolId::SelfCompassion => (boost(0.0, 2.0, 1.0), 8.0, Indulgent, None, tail(8.0, 1.0, 1.0)),
        ToolId::FocusReset => (boost(2.0, 1.0, 0.0), 3.0, Fatigued, buffer(2.0, 0.6), None),
    };

    ToolConfig {
        boost,
        cooldown_hours,
        state,
        buffer,
        tail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_eighteen_unique_ids() {
        let mut names: Vec<_> = ToolId::ALL.iter().map(|t| t.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 18);
    }

    #[test]
    fn parse_roundtrips_and_rejects_unknown() {
        for tool in ToolId::ALL {
            assert_eq!(tool.as_str().parse::<ToolId>().unwrap(), tool);
        }
        assert_eq!("HYDRATIONHERO".parse::<ToolId>().unwrap(), ToolId::HydrationHero);
        assert!("teleport".parse::<ToolId>().is_err());
    }

    #[test]
    fn serde_name_matches_storage_name() {
        for tool in ToolId::ALL {
            let json = serde_json::to_string(&tool).unwrap();
            assert_eq!(json, format!("\"{}\"", tool.as_str()));
        }
    }

    #[test]
    fn every_entry_is_well_formed() {
        for tool in ToolId::ALL {
            let cfg = tool.config();
            assert!(cfg.cooldown_hours > 0.0, "{tool} cooldown");
            assert!(!cfg.boost.is_zero(), "{tool} boost");
            if let Some(b) = cfg.buffer {
                assert!(b.duration_hours > 0.0);
                assert!(b.multiplier > 0.0 && b.multiplier <= 1.0);
            }
            if let Some(t) = cfg.tail {
                assert!(t.duration_hours > 0.0);
                assert!(t.purpose <= cfg.boost.purpose, "{tool} tail purpose");
                assert!(t.connection <= cfg.boost.connection, "{tool} tail connection");
            }
        }
    }

    #[test]
    fn hydration_hero_matches_catalog() {
        let cfg = ToolId::HydrationHero.config();
        assert_eq!(cfg.boost, PointDelta::new(2.0, 0.0, 0.0));
        assert_eq!(cfg.buffer, Some(BufferSpec { duration_hours: 4.0, multiplier: 0.5 }));
        assert!(cfg.tail.is_none());
    }
}

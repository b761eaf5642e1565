//! # EPC Core Library
//!
//! Scoring and temporal decay engine for the Energy / Purpose / Connection
//! wellbeing model. The UI layer is a thin consumer of this crate; the
//! bundled `epc` CLI drives the same API.
//!
//! ## Architecture
//!
//! - **Scores**: three batteries clamped to [0, 100] and the derived burnout
//!   percentage
//! - **Decay**: hourly energy loss shaped by time of day, step count, sleep,
//!   and any active energy buffer
//! - **Tools**: a closed registry of wellness tools with cooldown-scaled
//!   rewards, modulated by global saturation/amplifier rules
//! - **Effects**: one replaceable energy buffer and a stack of fading score
//!   tails
//! - **Storage**: an abstract key-value store with in-memory and SQLite
//!   backends, plus TOML configuration
//!
//! ## Key Components
//!
//! - [`EpcEngine`]: the public facade
//! - [`KeyValueStore`]: persistence seam
//! - [`ActivityOracle`]: step count and sleep state seam
//! - [`Config`]: engine configuration

pub mod activity;
pub mod completion;
pub mod decay;
pub mod effects;
pub mod engine;
pub mod error;
pub mod history;
pub mod rules;
pub mod scores;
pub mod storage;
pub mod time;
pub mod tools;

pub use activity::{ActivityOracle, DailyActivity, FixedActivityOracle, SleepWindow, StoredActivityOracle};
pub use completion::{CompletionOutcome, ToolCompletion};
pub use decay::{ActivityBand, DecayEngine, DecayOutcome, DecayRate, DecaySettings, TimeOfDayBand};
pub use effects::{EffectsLedger, EnergyBuffer, ScoreTail, TailFadeOutcome, TailPoints, TailView};
pub use engine::{BufferView, EpcEngine, HourlyReport};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use rules::{GlobalRules, ModulatedPoints};
pub use scores::{calculate_burnout, Assessment, Battery, BurnoutSample, EpcScores, PointDelta};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use tools::{effectiveness, CooldownStatus, ToolConfig, ToolId, ToolState, ToolUsage};

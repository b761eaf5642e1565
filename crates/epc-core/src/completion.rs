//! Tool completion.
//!
//! A single transition triggered when a tool session ends:
//!
//! 1. look up the tool's configuration
//! 2. scale its boost by the cooldown ramp
//! 3. modulate the award with the global rules, judged on current scores
//! 4. add the award to the scores (clamped)
//! 5. replace the energy buffer, if the tool has one
//! 6. append a score tail, if the tool has one
//! 7. overwrite the tool's usage record
//! 8. record a burnout sample
//!
//! Steps 4-8 are computed in memory and written with one `multi_set`, so a
//! storage failure leaves every record as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::effects::{EffectsLedger, EnergyBuffer, ScoreTail, TailPoints};
use crate::error::{Result, ValidationError};
use crate::history::HistoryRecorder;
use crate::rules::{GlobalRules, ModulatedPoints};
use crate::scores::{calculate_burnout, EpcScores};
use crate::storage::{encode_json, keys, read_json, KeyValueStore};
use crate::tools::{effectiveness, CooldownStatus, ToolId, ToolUsage};

/// Everything a completion changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOutcome {
    pub tool: ToolId,
    pub cooldown: CooldownStatus,
    pub awarded: ModulatedPoints,
    pub previous_scores: EpcScores,
    pub new_scores: EpcScores,
    pub burnout: u8,
    pub buffer: Option<EnergyBuffer>,
    pub tail: Option<ScoreTail>,
}

/// Runs the completion transition against a store.
pub struct ToolCompletion<S> {
    store: S,
    rules: GlobalRules,
    history: HistoryRecorder,
}

impl<S: KeyValueStore> ToolCompletion<S> {
    pub fn new(store: S, rules: GlobalRules, history: HistoryRecorder) -> Self {
        Self {
            store,
            rules,
            history,
        }
    }

    /// Stored usage record for a tool.
    pub fn usage(&self, tool: ToolId) -> Result<Option<ToolUsage>> {
        Ok(read_json(&self.store, &keys::tool_usage(tool))?)
    }

    /// What completing `tool` at `now` would award before global rules.
    pub fn cooldown_status(&self, tool: ToolId, now: DateTime<Utc>) -> Result<CooldownStatus> {
        let usage = self.usage(tool)?;
        Ok(effectiveness(&tool.config(), usage.as_ref(), now))
    }

    pub fn complete(&self, tool: ToolId, now: DateTime<Utc>) -> Result<CompletionOutcome> {
        let config = tool.config();
        let scores: EpcScores =
            read_json(&self.store, keys::EPC_SCORES)?.ok_or(ValidationError::NotOnboarded)?;

        let cooldown = self.cooldown_status(tool, now)?;
        let awarded = self.rules.apply(&scores, cooldown.effective_points);
        awarded.points.validate()?;
        let new_scores = scores.apply_delta(&awarded.points);

        let mut entries = vec![encode_json(keys::EPC_SCORES, &new_scores)?];

        let buffer = match config.buffer {
            Some(spec) => {
                let buffer = EnergyBuffer::from_spec(tool, &spec, now)?;
                entries.push(encode_json(keys::ENERGY_BUFFER, &buffer)?);
                Some(buffer)
            }
            None => None,
        };

        let tail = match config.tail {
            Some(spec) => {
                let points = TailPoints::new(spec.purpose, spec.connection);
                let tail = ScoreTail::new(tool, spec.duration_hours, points, now)?;
                let mut tails = EffectsLedger::new(&self.store).tails()?;
                tails.push(tail.clone());
                entries.push(encode_json(keys::SCORE_TAILS, &tails)?);
                Some(tail)
            }
            None => None,
        };

        let usage = ToolUsage {
            last_used: now,
            points_earned: cooldown.effective_points,
            cooldown_hours: config.cooldown_hours,
        };
        entries.push(encode_json(&keys::tool_usage(tool), &usage)?);
        entries.push(self.history.entry(&self.store, &new_scores, now)?);

        self.store.multi_set(&entries)?;

        let burnout = calculate_burnout(&new_scores)?;
        tracing::info!(
            tool = %tool,
            effectiveness = cooldown.effectiveness_percentage,
            energy = awarded.points.energy,
            purpose = awarded.points.purpose,
            connection = awarded.points.connection,
            saturation = awarded.saturation_applied,
            amplifier = awarded.amplifier_applied,
            burnout,
            "tool completed"
        );

        Ok(CompletionOutcome {
            tool,
            cooldown,
            awarded,
            previous_scores: scores,
            new_scores,
            burnout,
            buffer,
            tail,
        })
    }
}

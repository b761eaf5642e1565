//! Public entry point for the UI layer.
//!
//! [`EpcEngine`] owns its collaborators explicitly: a key-value store, an
//! activity oracle, and the configuration. Nothing is global, so each test
//! can build an isolated engine over a [`crate::storage::MemoryStore`].
//!
//! Every time-dependent operation has an `*_at(now)` form; the plain form
//! uses the wall clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{record_activity, ActivityOracle, DailyActivity};
use crate::completion::{CompletionOutcome, ToolCompletion};
use crate::decay::{DecayEngine, DecayOutcome, DecaySettings};
use crate::effects::{EffectsLedger, EnergyBuffer, TailFadeOutcome, TailView};
use crate::error::{CoreError, Result};
use crate::history::HistoryRecorder;
use crate::rules::GlobalRules;
use crate::scores::{calculate_burnout, Assessment, BurnoutSample, EpcScores};
use crate::storage::{all_engine_keys, encode_json, keys, read_json, Config, KeyValueStore};
use crate::tools::{CooldownStatus, ToolId};

/// Result of the combined hourly check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyReport {
    pub decay: DecayOutcome,
    pub tails: TailFadeOutcome,
}

/// Live buffer plus how long it still runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: EnergyBuffer,
    pub remaining_hours: f64,
    pub expires_at: DateTime<Utc>,
}

fn logged<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        match err {
            CoreError::Validation(_) => tracing::warn!(operation, error = %err, "rejected input"),
            _ => tracing::error!(operation, error = %err, "operation failed"),
        }
    }
    result
}

/// The EPC scoring engine.
pub struct EpcEngine<S, A> {
    store: S,
    oracle: A,
    config: Config,
}

impl<S: KeyValueStore, A: ActivityOracle> EpcEngine<S, A> {
    pub fn new(store: S, oracle: A, config: Config) -> Self {
        Self {
            store,
            oracle,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn history(&self) -> HistoryRecorder {
        DecaySettings::from_config(&self.config).history
    }

    fn ledger(&self) -> EffectsLedger<&S> {
        EffectsLedger::new(&self.store)
    }

    fn decay(&self) -> DecayEngine<&S, &A> {
        DecayEngine::new(&self.store, &self.oracle, DecaySettings::from_config(&self.config))
    }

    fn completion(&self) -> ToolCompletion<&S> {
        ToolCompletion::new(
            &self.store,
            GlobalRules::from_config(&self.config.rules),
            self.history(),
        )
    }

    // ── Scores ───────────────────────────────────────────────────────

    /// Current scores, or `None` before onboarding.
    pub fn get_epc_scores(&self) -> Result<Option<EpcScores>> {
        logged("get_epc_scores", read_json(&self.store, keys::EPC_SCORES).map_err(Into::into))
    }

    pub fn calculate_burnout(&self, scores: &EpcScores) -> Result<u8> {
        logged("calculate_burnout", calculate_burnout(scores).map_err(Into::into))
    }

    /// Burnout of the stored scores, or `None` before onboarding.
    pub fn current_burnout(&self) -> Result<Option<u8>> {
        match self.get_epc_scores()? {
            Some(scores) => self.calculate_burnout(&scores).map(Some),
            None => Ok(None),
        }
    }

    /// Store initial scores and start the decay clock.
    pub fn initialize_scores_at(&self, scores: EpcScores, now: DateTime<Utc>) -> Result<EpcScores> {
        logged("initialize_scores", self.write_initial_scores(scores, now))
    }

    fn write_initial_scores(&self, scores: EpcScores, now: DateTime<Utc>) -> Result<EpcScores> {
        scores.validate()?;
        let history = self.history().entry(&self.store, &scores, now)?;
        self.store.multi_set(&[
            encode_json(keys::EPC_SCORES, &scores)?,
            encode_json(keys::LAST_DECAY_TIMESTAMP, &now)?,
            history,
        ])?;
        tracing::info!(
            energy = scores.energy,
            purpose = scores.purpose,
            connection = scores.connection,
            "scores initialized"
        );
        Ok(scores)
    }

    pub fn initialize_scores(&self, scores: EpcScores) -> Result<EpcScores> {
        self.initialize_scores_at(scores, Utc::now())
    }

    /// Derive initial scores from an onboarding assessment and store them.
    pub fn onboard_at(&self, assessment: &Assessment, now: DateTime<Utc>) -> Result<EpcScores> {
        let scores = logged("onboard", assessment.to_scores().map_err(Into::into))?;
        self.initialize_scores_at(scores, now)
    }

    pub fn onboard(&self, assessment: &Assessment) -> Result<EpcScores> {
        self.onboard_at(assessment, Utc::now())
    }

    // ── Hourly effects ───────────────────────────────────────────────

    pub fn check_and_apply_energy_decay_at(&self, now: DateTime<Utc>) -> Result<DecayOutcome> {
        logged("check_and_apply_energy_decay", self.decay().check_and_apply(now))
    }

    pub fn check_and_apply_energy_decay(&self) -> Result<DecayOutcome> {
        self.check_and_apply_energy_decay_at(Utc::now())
    }

    pub fn apply_score_tail_effects_at(&self, now: DateTime<Utc>) -> Result<TailFadeOutcome> {
        logged("apply_score_tail_effects", self.ledger().apply_fade(now))
    }

    pub fn apply_score_tail_effects(&self) -> Result<TailFadeOutcome> {
        self.apply_score_tail_effects_at(Utc::now())
    }

    /// Decay then tail fade. Safe to call as often as the caller likes.
    pub fn run_hourly_check_at(&self, now: DateTime<Utc>) -> Result<HourlyReport> {
        let decay = self.check_and_apply_energy_decay_at(now)?;
        let tails = self.apply_score_tail_effects_at(now)?;
        Ok(HourlyReport { decay, tails })
    }

    pub fn run_hourly_check(&self) -> Result<HourlyReport> {
        self.run_hourly_check_at(Utc::now())
    }

    pub fn next_decay_due(&self) -> Result<Option<DateTime<Utc>>> {
        self.decay().next_due()
    }

    // ── Tools ────────────────────────────────────────────────────────

    pub fn get_tool_cooldown_status_at(&self, tool: ToolId, now: DateTime<Utc>) -> Result<CooldownStatus> {
        logged("get_tool_cooldown_status", self.completion().cooldown_status(tool, now))
    }

    pub fn get_tool_cooldown_status(&self, tool: ToolId) -> Result<CooldownStatus> {
        self.get_tool_cooldown_status_at(tool, Utc::now())
    }

    pub fn all_tool_statuses_at(&self, now: DateTime<Utc>) -> Result<Vec<(ToolId, CooldownStatus)>> {
        ToolId::ALL
            .iter()
            .map(|tool| Ok((*tool, self.get_tool_cooldown_status_at(*tool, now)?)))
            .collect()
    }

    pub fn complete_tool_at(&self, tool: ToolId, now: DateTime<Utc>) -> Result<CompletionOutcome> {
        logged("complete_tool", self.completion().complete(tool, now))
    }

    pub fn complete_tool(&self, tool: ToolId) -> Result<CompletionOutcome> {
        self.complete_tool_at(tool, Utc::now())
    }

    // ── Effects ──────────────────────────────────────────────────────

    pub fn active_buffer_at(&self, now: DateTime<Utc>) -> Result<Option<BufferView>> {
        let buffer = logged("active_buffer", self.ledger().read_buffer(now))?;
        Ok(buffer.map(|buffer| BufferView {
            remaining_hours: buffer.remaining_hours(now),
            expires_at: buffer.expires_at(),
            buffer,
        }))
    }

    pub fn active_tails_at(&self, now: DateTime<Utc>) -> Result<Vec<TailView>> {
        logged("active_tails", self.ledger().active_tails(now))
    }

    // ── Activity, history, data ──────────────────────────────────────

    pub fn record_activity(&self, activity: &DailyActivity) -> Result<()> {
        logged("record_activity", record_activity(&self.store, activity))
    }

    pub fn today_activity_at(&self, now: DateTime<Utc>) -> Result<Option<DailyActivity>> {
        Ok(self.oracle.today_activity(now)?)
    }

    pub fn burnout_history(&self) -> Result<Vec<BurnoutSample>> {
        Ok(HistoryRecorder::load(&self.store)?.samples())
    }

    /// Remove every record the engine has written.
    pub fn clear_all_data(&self) -> Result<()> {
        let all = all_engine_keys();
        let refs: Vec<&str> = all.iter().map(String::as_str).collect();
        logged("clear_all_data", self.store.multi_remove(&refs).map_err(Into::into))?;
        tracing::info!(keys = refs.len(), "engine data cleared");
        Ok(())
    }
}

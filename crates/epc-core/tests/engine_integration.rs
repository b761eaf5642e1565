//! Integration tests for the EPC engine: completion, decay, buffers and tails.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use epc_core::storage::keys;
use epc_core::{
    Config, Database, EpcEngine, EpcScores, FixedActivityOracle, KeyValueStore, MemoryStore,
    PointDelta, TailPoints, ToolId,
};

fn t0() -> DateTime<Utc> {
    // A Tuesday, midday band
    Utc.with_ymd_and_hms(2024, 3, 12, 11, 0, 0).unwrap()
}

fn onboarded(store: &MemoryStore, scores: EpcScores) -> EpcEngine<&MemoryStore, FixedActivityOracle> {
    let engine = EpcEngine::new(store, FixedActivityOracle::default(), Config::default());
    engine.initialize_scores_at(scores, t0()).unwrap();
    engine
}

#[test]
fn test_hydration_hero_scenario() {
    let store = MemoryStore::new();
    let engine = onboarded(&store, EpcScores::new(80.0, 70.0, 75.0).unwrap());

    let first = engine.complete_tool_at(ToolId::HydrationHero, t0()).unwrap();
    assert_eq!(first.cooldown.effectiveness_percentage, 100);
    assert!(!first.awarded.saturation_applied);
    assert!(!first.awarded.amplifier_applied);
    assert_eq!(first.new_scores, EpcScores::new(82.0, 70.0, 75.0).unwrap());

    let buffer = engine.active_buffer_at(t0()).unwrap().expect("buffer active");
    assert_eq!(buffer.buffer.source, ToolId::HydrationHero);
    assert_eq!(buffer.remaining_hours, 4.0);
    assert_eq!(buffer.expires_at, t0() + Duration::hours(4));

    let second = engine.complete_tool_at(ToolId::HydrationHero, t0()).unwrap();
    assert_eq!(second.cooldown.effectiveness_percentage, 0);
    assert_eq!(second.awarded.points, PointDelta::ZERO);
    assert_eq!(
        engine.get_epc_scores().unwrap().unwrap(),
        EpcScores::new(82.0, 70.0, 75.0).unwrap()
    );
}

#[test]
fn test_saturated_user_gets_dampened_reward() {
    let store = MemoryStore::new();
    let engine = onboarded(&store, EpcScores::new(95.0, 50.0, 60.0).unwrap());

    // ColdSplash E3: 3 * 0.7 = 2.1 -> 2, then low-state amplifier 2 * 1.2 = 2.4 -> 2
    let out = engine.complete_tool_at(ToolId::ColdSplash, t0()).unwrap();
    assert_eq!(out.awarded.points, PointDelta::new(2.0, 0.0, 0.0));
    assert!(out.awarded.saturation_applied);
    assert!(out.awarded.amplifier_applied);
    assert_eq!(out.new_scores.energy, 97.0);
}

#[test]
fn test_decay_is_idempotent_within_the_hour() {
    let store = MemoryStore::new();
    let engine = onboarded(&store, EpcScores::new(80.0, 70.0, 75.0).unwrap());

    let due = t0() + Duration::hours(1);
    let first = engine.check_and_apply_energy_decay_at(due).unwrap();
    let second = engine.check_and_apply_energy_decay_at(due + Duration::minutes(10)).unwrap();
    let third = engine.check_and_apply_energy_decay_at(due + Duration::minutes(59)).unwrap();

    assert!(first.decay_applied);
    assert!(!second.decay_applied);
    assert!(!third.decay_applied);
    assert_eq!(engine.get_epc_scores().unwrap().unwrap().energy, 79.5);
    assert_eq!(engine.next_decay_due().unwrap(), Some(due + Duration::hours(1)));
}

#[test]
fn test_buffer_slows_decay_until_expiry() {
    let store = MemoryStore::new();
    let engine = onboarded(&store, EpcScores::new(80.0, 70.0, 75.0).unwrap());
    engine.complete_tool_at(ToolId::HydrationHero, t0()).unwrap();

    // 12:00 midday, buffer 0.5x: 0.5 * 1.0 * 1.0 * 0.5 = 0.25
    let buffered = engine.check_and_apply_energy_decay_at(t0() + Duration::hours(1)).unwrap();
    assert_eq!(buffered.energy_lost, 0.25);
    assert_eq!(buffered.new_energy, 81.75);

    // 16:00 afternoon, buffer gone after 4h: 0.5 * 1.5 = 0.75
    let unbuffered = engine.check_and_apply_energy_decay_at(t0() + Duration::hours(5)).unwrap();
    assert_eq!(unbuffered.energy_lost, 0.75);
    assert!(engine.active_buffer_at(t0() + Duration::hours(5)).unwrap().is_none());
    assert!(store.get(keys::ENERGY_BUFFER).unwrap().is_none());
}

#[test]
fn test_step_count_speeds_up_decay() {
    let store = MemoryStore::new();
    let oracle = FixedActivityOracle::awake_with_steps(NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(), 9000);
    let engine = EpcEngine::new(&store, oracle, Config::default());
    engine
        .initialize_scores_at(EpcScores::new(80.0, 70.0, 75.0).unwrap(), t0())
        .unwrap();

    // 12:00 midday, 9000 steps: 0.5 * 1.0 * 1.5 = 0.75
    let out = engine.check_and_apply_energy_decay_at(t0() + Duration::hours(1)).unwrap();
    assert_eq!(out.energy_lost, 0.75);
}

#[test]
fn test_tail_fades_hour_by_hour() {
    let store = MemoryStore::new();
    let engine = onboarded(&store, EpcScores::new(80.0, 75.0, 75.0).unwrap());

    // FriendCall: P1 C4, connection tail 3 over 24h
    let out = engine.complete_tool_at(ToolId::FriendCall, t0()).unwrap();
    assert_eq!(out.new_scores.connection, 79.0);
    assert_eq!(out.tail.as_ref().unwrap().initial_points, TailPoints::new(0.0, 3.0));

    let mut faded = 0.0;
    for hour in 1..=23 {
        let report = engine.run_hourly_check_at(t0() + Duration::hours(hour)).unwrap();
        faded += report.tails.total_points_faded.connection;
        // Redundant call in the same instant changes nothing.
        let again = engine.apply_score_tail_effects_at(t0() + Duration::hours(hour)).unwrap();
        assert_eq!(again.total_points_faded, TailPoints::default());
    }
    // At 23h the linear remainder rounds to 0, so the whole tail has faded.
    assert_eq!(faded, 3.0);
    assert_eq!(engine.get_epc_scores().unwrap().unwrap().connection, 76.0);

    let last = engine.apply_score_tail_effects_at(t0() + Duration::hours(24)).unwrap();
    assert_eq!(last.tails_expired, 1);
    assert!(engine.active_tails_at(t0() + Duration::hours(24)).unwrap().is_empty());
}

#[test]
fn test_tails_stack_while_buffer_replaces() {
    let store = MemoryStore::new();
    let engine = onboarded(&store, EpcScores::new(50.0, 50.0, 50.0).unwrap());

    engine.complete_tool_at(ToolId::GoalSprint, t0()).unwrap();
    engine.complete_tool_at(ToolId::TeamHighFive, t0()).unwrap();
    assert_eq!(engine.active_tails_at(t0()).unwrap().len(), 2);

    engine.complete_tool_at(ToolId::HydrationHero, t0()).unwrap();
    engine.complete_tool_at(ToolId::PowerNap, t0()).unwrap();
    let live = engine.active_buffer_at(t0()).unwrap().unwrap();
    assert_eq!(live.buffer.source, ToolId::PowerNap);
}

#[test]
fn test_not_onboarded_hourly_check_is_silent() {
    let store = MemoryStore::new();
    let engine = EpcEngine::new(&store, FixedActivityOracle::default(), Config::default());
    let report = engine.run_hourly_check_at(t0()).unwrap();
    assert!(!report.decay.decay_applied);
    assert_eq!(report.tails.tails_applied, 0);
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn test_history_records_each_mutation_hour() {
    let store = MemoryStore::new();
    let engine = onboarded(&store, EpcScores::new(50.0, 50.0, 50.0).unwrap());
    engine.check_and_apply_energy_decay_at(t0() + Duration::hours(1)).unwrap();
    engine.complete_tool_at(ToolId::MindfulMinute, t0() + Duration::hours(2)).unwrap();

    let history = engine.burnout_history().unwrap();
    let hours: Vec<_> = history.iter().map(|s| s.hour.as_str()).collect();
    assert_eq!(hours, vec!["2024-03-12T11", "2024-03-12T12", "2024-03-12T13"]);
    assert_eq!(history[0].burnout, 50);
}

#[test]
fn test_sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("epc.db");

    {
        let db = Database::open_path(&path).unwrap();
        let engine = EpcEngine::new(&db, FixedActivityOracle::default(), Config::default());
        engine
            .initialize_scores_at(EpcScores::new(60.0, 60.0, 60.0).unwrap(), t0())
            .unwrap();
        engine.complete_tool_at(ToolId::SunlightWalk, t0()).unwrap();
    }

    let db = Database::open_path(&path).unwrap();
    let engine = EpcEngine::new(&db, FixedActivityOracle::default(), Config::default());
    // SunlightWalk E3 P1, amplifier: 3 * 1.2 = 3.6 -> 4, 1 * 1.2 -> 1
    assert_eq!(
        engine.get_epc_scores().unwrap().unwrap(),
        EpcScores::new(64.0, 61.0, 60.0).unwrap()
    );
    let status = engine
        .get_tool_cooldown_status_at(ToolId::SunlightWalk, t0() + Duration::hours(1))
        .unwrap();
    assert!(status.is_on_cooldown);
    assert_eq!(status.effectiveness_percentage, 25);
    assert_eq!(status.cooldown_remaining, 3);
}

//! Property tests for the scoring arithmetic.

use chrono::{Duration, TimeZone, Utc};
use epc_core::{
    calculate_burnout, effectiveness, EpcScores, GlobalRules, PointDelta, ScoreTail, TailPoints,
    ToolId, ToolUsage,
};
use epc_core::effects::fade_tails;
use proptest::prelude::*;

fn score() -> impl Strategy<Value = f64> {
    0.0..=100.0f64
}

proptest! {
    #[test]
    fn applied_deltas_stay_in_range(
        e in score(), p in score(), c in score(),
        de in -150.0..150.0f64, dp in -150.0..150.0f64, dc in -150.0..150.0f64,
    ) {
        let scores = EpcScores::new(e, p, c).unwrap();
        let next = scores.apply_delta(&PointDelta::new(de, dp, dc));
        for value in [next.energy, next.purpose, next.connection] {
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn burnout_is_bounded_and_falls_as_scores_rise(
        e in score(), p in score(), c in score(),
        battery in 0usize..3, step in 0.0..=50.0f64,
    ) {
        let mut raised = [e, p, c];
        raised[battery] = (raised[battery] + step).min(100.0);
        let low = EpcScores::new(e, p, c).unwrap();
        let high = EpcScores::new(raised[0], raised[1], raised[2]).unwrap();

        let before = calculate_burnout(&low).unwrap();
        let after = calculate_burnout(&high).unwrap();
        prop_assert!(before <= 100);
        prop_assert!(after <= before);
        // A rise of over three points moves the mean by more than one.
        if raised[battery] - [e, p, c][battery] > 3.01 {
            prop_assert!(after < before || before == 0);
        }
    }

    #[test]
    fn cooldown_effectiveness_is_bounded(minutes in 0i64..(72 * 60)) {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        for tool in ToolId::ALL {
            let config = tool.config();
            let usage = ToolUsage {
                last_used: now - Duration::minutes(minutes),
                points_earned: config.boost,
                cooldown_hours: config.cooldown_hours,
            };
            let status = effectiveness(&config, Some(&usage), now);
            prop_assert!(status.effectiveness_percentage <= 100);
            prop_assert!(status.effective_points.energy <= config.boost.energy);
            prop_assert!(status.effective_points.purpose <= config.boost.purpose);
            prop_assert!(status.effective_points.connection <= config.boost.connection);
            prop_assert_eq!(status.is_on_cooldown, status.cooldown_remaining > 0);
        }
    }

    #[test]
    fn modulated_award_keeps_sign(
        e in score(), p in score(), c in score(), boost in 0.0..=10.0f64,
    ) {
        let scores = EpcScores::new(e, p, c).unwrap();
        let out = GlobalRules::default().apply(&scores, PointDelta::new(boost, 0.0, 0.0));
        prop_assert!(out.points.energy >= 0.0);
        prop_assert!(out.points.energy <= (boost * 1.2).round() + 1.0);
    }

    #[test]
    fn tail_fade_never_exceeds_initial_points(
        purpose in 0u8..=6, connection in 0u8..=6,
        hours in prop::collection::vec(1i64..=4, 1..12),
    ) {
        let start = Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap();
        let points = TailPoints::new(purpose as f64, connection as f64);
        let mut tails = vec![ScoreTail::new(ToolId::SelfCompassion, 8.0, points, start).unwrap()];
        let mut scores = EpcScores::new(50.0, 50.0, 50.0).unwrap();
        let mut now = start;
        let mut total = TailPoints::default();

        for step in hours {
            now += Duration::hours(step);
            let previous = scores;
            let (next_tails, next_scores, out) = fade_tails(tails, scores, now);
            prop_assert!(next_scores.purpose <= previous.purpose);
            prop_assert!(next_scores.connection <= previous.connection);
            total.purpose += out.total_points_faded.purpose;
            total.connection += out.total_points_faded.connection;
            tails = next_tails;
            scores = next_scores;
        }

        prop_assert!(total.purpose <= points.purpose);
        prop_assert!(total.connection <= points.connection);
    }
}

//! Match lifecycle integration tests
//!
//! The state machine and clock through the engine service: gating of
//! operations by state, idempotent finalization, clock expiry with and
//! without a decisive score, pause semantics, and match independence.

use std::sync::Arc;
use std::time::Duration;

use tatami::bout::action::PenaltyKind;
use tatami::bout::BoutState;
use tatami::core::config::EngineConfig;
use tatami::core::error::EngineError;
use tatami::core::types::{Competitor, CompetitorId, MatchId};
use tatami::engine::repository::InMemoryRepository;
use tatami::engine::{Engine, TickOutcome};
use tatami::score::combination::SubAction;
use tatami::score::outcome::WinReason;
use tatami::score::value::ScoreValue;

fn manual_engine(duration: u32) -> (Engine, Arc<InMemoryRepository>) {
    let repository = Arc::new(InMemoryRepository::new());
    let config = EngineConfig {
        match_duration_secs: duration,
        drive_clock: false,
    };
    (Engine::new(config, repository.clone()), repository)
}

async fn active_match(engine: &Engine) -> (MatchId, CompetitorId, CompetitorId) {
    let bout = engine
        .create_match(Competitor::new("Shirai"), Competitor::new("Aoki"))
        .unwrap();
    engine.start_match(bout.id()).await.unwrap();
    (bout.id(), bout.white().id, bout.blue().id)
}

#[tokio::test]
async fn test_actions_rejected_before_start() {
    let (engine, _) = manual_engine(240);
    let bout = engine
        .create_match(Competitor::new("Shirai"), Competitor::new("Aoki"))
        .unwrap();
    let white = bout.white().id;

    let result = engine
        .record_throw(bout.id(), white, "uchi_mata", ScoreValue::Yuko, true)
        .await;
    assert!(matches!(result, Err(EngineError::MatchNotActive(_))));
}

#[tokio::test]
async fn test_start_twice_fails() {
    let (engine, _) = manual_engine(240);
    let (id, _, _) = active_match(&engine).await;
    assert!(matches!(
        engine.start_match(id).await,
        Err(EngineError::AlreadyStarted(_))
    ));
}

#[tokio::test]
async fn test_unknown_match_is_reported() {
    let (engine, _) = manual_engine(240);
    let ghost = MatchId::new();
    assert!(matches!(
        engine.tally(ghost).await,
        Err(EngineError::UnknownMatch(_))
    ));
    assert!(matches!(
        engine.start_match(ghost).await,
        Err(EngineError::UnknownMatch(_))
    ));
}

#[tokio::test]
async fn test_technique_family_is_enforced() {
    let (engine, _) = manual_engine(240);
    let (id, white, _) = active_match(&engine).await;

    // A hold is not a throw, and a throw is not a ground technique.
    let throw = engine
        .record_throw(id, white, "kesa_gatame", ScoreValue::Yuko, true)
        .await;
    assert!(matches!(throw, Err(EngineError::InvalidTechnique(_))));
    let ground = engine
        .record_ground(id, white, "uchi_mata", true, None)
        .await;
    assert!(matches!(ground, Err(EngineError::InvalidTechnique(_))));

    // Nothing landed in the ledger.
    let snapshot = engine.snapshot(id).await.unwrap();
    assert!(snapshot.ledger().is_empty());
}

#[tokio::test]
async fn test_unknown_competitor_is_rejected() {
    let (engine, _) = manual_engine(240);
    let (id, _, _) = active_match(&engine).await;
    let stranger = CompetitorId::new();
    let result = engine
        .record_penalty(id, stranger, PenaltyKind::Shido)
        .await;
    assert!(matches!(result, Err(EngineError::UnknownCompetitor(..))));
}

#[tokio::test]
async fn test_finalize_is_idempotent_safe() {
    let (engine, repository) = manual_engine(240);
    let (id, white, blue) = active_match(&engine).await;

    let first = engine.finalize_match(id, Some(white)).await.unwrap();
    assert_eq!(first.winner, white);
    assert_eq!(first.reason, WinReason::RefereeDecision);

    // The second attempt fails and cannot rewrite the decision.
    assert!(matches!(
        engine.finalize_match(id, Some(blue)).await,
        Err(EngineError::AlreadyFinished(_))
    ));
    let snapshot = engine.snapshot(id).await.unwrap();
    assert_eq!(snapshot.winner(), Some(white));
    assert_eq!(
        snapshot.finalization_reason(),
        Some(WinReason::RefereeDecision)
    );
    assert_eq!(repository.get(id).unwrap().winner(), Some(white));
}

#[tokio::test]
async fn test_finalize_without_winner_needs_a_decisive_tally() {
    let (engine, _) = manual_engine(240);
    let (id, white, _) = active_match(&engine).await;

    assert!(matches!(
        engine.finalize_match(id, None).await,
        Err(EngineError::UnresolvedDraw(_))
    ));

    // One yuko breaks the tie and the resolver can decide.
    engine
        .record_throw(id, white, "osoto_gari", ScoreValue::Yuko, true)
        .await
        .unwrap();
    let finalization = engine.finalize_match(id, None).await.unwrap();
    assert_eq!(finalization.winner, white);
    assert_eq!(finalization.reason, WinReason::YukoAdvantage);
}

#[tokio::test]
async fn test_clock_expiry_decides_on_the_scores() {
    let (engine, repository) = manual_engine(3);
    let (id, white, _) = active_match(&engine).await;

    engine
        .record_throw(id, white, "kouchi_gari", ScoreValue::Yuko, true)
        .await
        .unwrap();

    assert_eq!(engine.tick_clock(id).await.unwrap(), TickOutcome::Ticked(2));
    assert_eq!(engine.tick_clock(id).await.unwrap(), TickOutcome::Ticked(1));
    match engine.tick_clock(id).await.unwrap() {
        TickOutcome::Expired(Some(finalization)) => {
            assert_eq!(finalization.winner, white);
            assert_eq!(finalization.reason, WinReason::YukoAdvantage);
        }
        other => panic!("expected a decided expiry, got {other:?}"),
    }
    let snapshot = engine.snapshot(id).await.unwrap();
    assert_eq!(snapshot.state(), BoutState::Finished);
    assert!(repository.get(id).is_some());
    // Further ticks see a finished match.
    assert_eq!(engine.tick_clock(id).await.unwrap(), TickOutcome::Finished);
}

#[tokio::test]
async fn test_clock_expiry_on_level_scores_waits_for_the_referee() {
    let (engine, repository) = manual_engine(2);
    let (id, _, blue) = active_match(&engine).await;

    assert_eq!(engine.tick_clock(id).await.unwrap(), TickOutcome::Ticked(1));
    assert_eq!(
        engine.tick_clock(id).await.unwrap(),
        TickOutcome::Expired(None)
    );

    // Not auto-finished: the match hangs in Active with a dead clock until
    // someone names a winner.
    let snapshot = engine.snapshot(id).await.unwrap();
    assert_eq!(snapshot.state(), BoutState::Active);
    assert!(snapshot.clock().is_expired());
    assert!(repository.get(id).is_none());
    assert!(matches!(
        engine.finalize_match(id, None).await,
        Err(EngineError::UnresolvedDraw(_))
    ));

    let finalization = engine.finalize_match(id, Some(blue)).await.unwrap();
    assert_eq!(finalization.winner, blue);
    assert_eq!(finalization.reason, WinReason::RefereeDecision);
    assert!(repository.get(id).is_some());
}

#[tokio::test]
async fn test_pause_blocks_the_next_tick() {
    let (engine, _) = manual_engine(240);
    let (id, _, _) = active_match(&engine).await;

    assert_eq!(
        engine.tick_clock(id).await.unwrap(),
        TickOutcome::Ticked(239)
    );
    let remaining = engine.pause_clock(id).await.unwrap();
    assert_eq!(remaining, 239);

    // A paused clock ignores ticks.
    assert_eq!(engine.tick_clock(id).await.unwrap(), TickOutcome::Idle);
    assert_eq!(engine.snapshot(id).await.unwrap().clock().remaining(), 239);

    engine.resume_clock(id).await.unwrap();
    assert_eq!(
        engine.tick_clock(id).await.unwrap(),
        TickOutcome::Ticked(238)
    );
}

#[tokio::test]
async fn test_matches_do_not_share_clocks() {
    let (engine, _) = manual_engine(240);
    let (first, _, _) = active_match(&engine).await;
    let (second, _, _) = active_match(&engine).await;

    engine.tick_clock(first).await.unwrap();
    engine.tick_clock(first).await.unwrap();

    assert_eq!(engine.snapshot(first).await.unwrap().clock().remaining(), 238);
    assert_eq!(engine.snapshot(second).await.unwrap().clock().remaining(), 240);
}

#[tokio::test]
async fn test_combined_action_reports_label_and_score() {
    let (engine, _) = manual_engine(240);
    let (id, white, _) = active_match(&engine).await;

    let sub_actions = vec![
        SubAction {
            technique: "harai_goshi".into(),
            effective: true,
            score: Some(ScoreValue::Yuko),
            hold_seconds: None,
        },
        SubAction {
            technique: "osoto_gari".into(),
            effective: true,
            score: Some(ScoreValue::WazaAri),
            hold_seconds: None,
        },
    ];
    let (receipt, outcome) = engine
        .record_combined(id, white, sub_actions, Some("transition off the grip".into()))
        .await
        .unwrap();

    assert_eq!(outcome.label, "Koshi waza - Ashi waza (K-A)");
    assert_eq!(outcome.final_score, ScoreValue::WazaAri);
    assert!(receipt.finished.is_none());

    // The exchange scores once, not per sub-technique.
    let tally = engine.tally(id).await.unwrap();
    assert_eq!(tally.white.waza_ari, 1);
    assert_eq!(tally.white.yuko, 0);
}

#[tokio::test]
async fn test_combined_ippon_finishes_the_match() {
    let (engine, _) = manual_engine(240);
    let (id, white, _) = active_match(&engine).await;

    let sub_actions = vec![
        SubAction {
            technique: "ouchi_gari".into(),
            effective: false,
            score: None,
            hold_seconds: None,
        },
        SubAction {
            technique: "sankaku_jime".into(),
            effective: true,
            score: None,
            hold_seconds: None,
        },
    ];
    let (receipt, outcome) = engine
        .record_combined(id, white, sub_actions, None)
        .await
        .unwrap();

    assert_eq!(outcome.final_score, ScoreValue::Ippon);
    let finalization = receipt.finished.expect("combined ippon ends the match");
    assert_eq!(finalization.winner, white);
}

#[tokio::test]
async fn test_empty_combination_is_rejected() {
    let (engine, _) = manual_engine(240);
    let (id, white, _) = active_match(&engine).await;
    let result = engine.record_combined(id, white, Vec::new(), None).await;
    assert!(matches!(result, Err(EngineError::EmptyCombination)));
}

#[tokio::test]
async fn test_combination_with_unknown_technique_is_rejected() {
    let (engine, _) = manual_engine(240);
    let (id, white, _) = active_match(&engine).await;
    let sub_actions = vec![SubAction {
        technique: "no_such_waza".into(),
        effective: true,
        score: Some(ScoreValue::Yuko),
        hold_seconds: None,
    }];
    let result = engine.record_combined(id, white, sub_actions, None).await;
    assert!(matches!(result, Err(EngineError::InvalidTechnique(_))));
    assert!(engine.snapshot(id).await.unwrap().ledger().is_empty());
}

#[tokio::test]
async fn test_match_record_survives_a_serialization_round_trip() {
    // The archived record (match + ledger) must be enough to replay any
    // tally, including after a trip through the persistence format.
    let (engine, repository) = manual_engine(240);
    let (id, white, blue) = active_match(&engine).await;

    engine
        .record_throw(id, white, "seoi_nage", ScoreValue::WazaAri, true)
        .await
        .unwrap();
    engine
        .record_penalty(id, blue, PenaltyKind::Shido)
        .await
        .unwrap();
    engine.finalize_match(id, None).await.unwrap();

    let archived = repository.get(id).unwrap();
    let json = serde_json::to_string(&archived).unwrap();
    let restored: tatami::bout::Bout = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.winner(), Some(white));
    assert_eq!(restored.tally().unwrap(), archived.tally().unwrap());
    assert_eq!(restored.ledger().len(), 2);
}

#[tokio::test]
async fn test_driven_clock_finishes_a_short_match() {
    // The one test that lets the real 1 Hz driver run: a 1 second match
    // with a decisive score must finish on its own shortly after expiry.
    let repository = Arc::new(InMemoryRepository::new());
    let config = EngineConfig {
        match_duration_secs: 1,
        drive_clock: true,
    };
    let engine = Engine::new(config, repository.clone());
    let bout = engine
        .create_match(Competitor::new("Shirai"), Competitor::new("Aoki"))
        .unwrap();
    let id = bout.id();
    let white = bout.white().id;
    engine.start_match(id).await.unwrap();
    engine
        .record_throw(id, white, "de_ashi_harai", ScoreValue::Yuko, true)
        .await
        .unwrap();

    let mut finished = false;
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(500)).await;
        if engine.snapshot(id).await.unwrap().state() == BoutState::Finished {
            finished = true;
            break;
        }
    }
    assert!(finished, "driver task should expire and decide the match");
    assert_eq!(repository.get(id).unwrap().winner(), Some(white));
}

#[tokio::test]
async fn test_concurrent_recording_is_serialized() {
    // Hammer one match from many tasks; every append must land exactly
    // once in the ledger.
    let (engine, _) = manual_engine(240);
    let engine = Arc::new(engine);
    let (id, white, blue) = active_match(&engine).await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let engine = Arc::clone(&engine);
        let competitor = if i % 2 == 0 { white } else { blue };
        handles.push(tokio::spawn(async move {
            engine
                .record_throw(id, competitor, "uchi_mata", ScoreValue::None, false)
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let snapshot = engine.snapshot(id).await.unwrap();
    assert_eq!(snapshot.ledger().len(), 20);
    // Ineffective attempts leave the scoreboard untouched.
    let tally = engine.tally(id).await.unwrap();
    assert_eq!(tally.white, Default::default());
    assert_eq!(tally.blue, Default::default());
}

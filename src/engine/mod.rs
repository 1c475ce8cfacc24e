//! The addressable match engine
//!
//! One `Engine` serves many matches. Each match sits behind its own
//! `tokio::sync::RwLock`, which is the per-match exclusion scope: every
//! mutation (start, record, finalize, clock tick) takes the write lock and
//! completes atomically; tallies and snapshots take the read lock and see
//! committed state only. Independent matches never block each other.
//!
//! The clock is a per-match driver task firing once a second. It calls the
//! same tick operation tests call directly, inside the same lock, so a tick
//! and a simultaneously submitted action never interleave partially.

pub mod repository;

use std::sync::{Arc, Mutex, RwLock as StdRwLock};
use std::time::Duration;

use ahash::AHashMap;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::bout::action::{Action, PenaltyKind};
use crate::bout::clock::ClockTick;
use crate::bout::{Bout, BoutState};
use crate::catalog::{self, Family};
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{ActionId, Competitor, CompetitorId, MatchId, Seconds};
use crate::engine::repository::{BoutRepository, InMemoryRepository};
use crate::score::combination::{classify, CombinationOutcome, SubAction};
use crate::score::outcome::{Finalization, Resolution};
use crate::score::tally::MatchTally;
use crate::score::value::ScoreValue;

/// Result of recording an action: the ledger id, plus the finalization if
/// the action ended the match on the spot
#[derive(Debug, Clone, Copy)]
pub struct RecordReceipt {
    pub action_id: ActionId,
    pub finished: Option<Finalization>,
}

/// What one clock tick did to a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock paused or match not yet started; nothing changed
    Idle,
    /// Clock decremented; seconds remaining
    Ticked(Seconds),
    /// Time ran out. `Some` if the resolver settled a winner, `None` if
    /// the match is level and now waits for a manual decision.
    Expired(Option<Finalization>),
    /// Match already finished; the driver should stop
    Finished,
}

struct BoutSlot {
    bout: Arc<RwLock<Bout>>,
    clock_task: Mutex<Option<JoinHandle<()>>>,
}

pub struct Engine {
    config: EngineConfig,
    repository: Arc<dyn BoutRepository>,
    bouts: StdRwLock<AHashMap<MatchId, Arc<BoutSlot>>>,
}

impl Engine {
    pub fn new(config: EngineConfig, repository: Arc<dyn BoutRepository>) -> Self {
        Self {
            config,
            repository,
            bouts: StdRwLock::new(AHashMap::new()),
        }
    }

    /// Engine with default config and an in-memory archive
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default(), Arc::new(InMemoryRepository::new()))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn slot(&self, id: MatchId) -> Result<Arc<BoutSlot>> {
        self.bouts
            .read()
            .expect("match registry poisoned")
            .get(&id)
            .cloned()
            .ok_or(EngineError::UnknownMatch(id))
    }

    /// Register a new match in `Created` state
    pub fn create_match(&self, white: Competitor, blue: Competitor) -> Result<Bout> {
        let bout = Bout::new(white, blue, self.config.match_duration_secs)?;
        let snapshot = bout.clone();
        let slot = Arc::new(BoutSlot {
            bout: Arc::new(RwLock::new(bout)),
            clock_task: Mutex::new(None),
        });
        self.bouts
            .write()
            .expect("match registry poisoned")
            .insert(snapshot.id(), slot);
        tracing::info!(
            match_id = %snapshot.id(),
            white = %snapshot.white().name,
            blue = %snapshot.blue().name,
            "match created"
        );
        Ok(snapshot)
    }

    /// `Created -> Active`: arm the clock and, in production config, spawn
    /// the 1 Hz driver for it
    pub async fn start_match(&self, id: MatchId) -> Result<Bout> {
        let slot = self.slot(id)?;
        let snapshot = {
            let mut bout = slot.bout.write().await;
            bout.start()?;
            bout.clone()
        };
        if self.config.drive_clock {
            let handle = spawn_clock_driver(id, Arc::clone(&slot.bout), Arc::clone(&self.repository));
            *slot.clock_task.lock().expect("clock task lock poisoned") = Some(handle);
        }
        tracing::info!(match_id = %id, remaining = snapshot.clock().remaining(), "match started");
        Ok(snapshot)
    }

    /// Record a tachi-waza attempt
    pub async fn record_throw(
        &self,
        id: MatchId,
        competitor: CompetitorId,
        technique: &str,
        score: ScoreValue,
        effective: bool,
    ) -> Result<RecordReceipt> {
        let slot = self.slot(id)?;
        let mut bout = slot.bout.write().await;
        if bout.state() != BoutState::Active {
            return Err(EngineError::MatchNotActive(id));
        }
        catalog::validate(technique, Family::TachiWaza)?;
        let action_id = bout.record(Action::Throw {
            competitor,
            technique: technique.to_string(),
            score,
            effective,
        })?;
        tracing::debug!(match_id = %id, %competitor, technique, %score, effective, "throw recorded");
        let finished = self.after_append(&mut bout)?;
        Ok(RecordReceipt {
            action_id,
            finished,
        })
    }

    /// Record a ne-waza attempt; the score is derived at tally time, never
    /// accepted from the caller
    pub async fn record_ground(
        &self,
        id: MatchId,
        competitor: CompetitorId,
        technique: &str,
        effective: bool,
        hold_seconds: Option<Seconds>,
    ) -> Result<RecordReceipt> {
        let slot = self.slot(id)?;
        let mut bout = slot.bout.write().await;
        if bout.state() != BoutState::Active {
            return Err(EngineError::MatchNotActive(id));
        }
        catalog::validate(technique, Family::NeWaza)?;
        let action_id = bout.record(Action::Ground {
            competitor,
            technique: technique.to_string(),
            effective,
            hold_seconds,
        })?;
        tracing::debug!(match_id = %id, %competitor, technique, effective, ?hold_seconds, "ground action recorded");
        let finished = self.after_append(&mut bout)?;
        Ok(RecordReceipt {
            action_id,
            finished,
        })
    }

    pub async fn record_penalty(
        &self,
        id: MatchId,
        competitor: CompetitorId,
        kind: PenaltyKind,
    ) -> Result<RecordReceipt> {
        let slot = self.slot(id)?;
        let mut bout = slot.bout.write().await;
        let action_id = bout.record(Action::Penalty { competitor, kind })?;
        tracing::debug!(match_id = %id, %competitor, %kind, "penalty recorded");
        let finished = self.after_append(&mut bout)?;
        Ok(RecordReceipt {
            action_id,
            finished,
        })
    }

    /// Record a combination of techniques as a single exchange. Returns the
    /// receipt together with the derived label, final score and counts.
    pub async fn record_combined(
        &self,
        id: MatchId,
        competitor: CompetitorId,
        sub_actions: Vec<SubAction>,
        observations: Option<String>,
    ) -> Result<(RecordReceipt, CombinationOutcome)> {
        if sub_actions.is_empty() {
            return Err(EngineError::EmptyCombination);
        }
        let slot = self.slot(id)?;
        let mut bout = slot.bout.write().await;
        if bout.state() != BoutState::Active {
            return Err(EngineError::MatchNotActive(id));
        }
        for sub in &sub_actions {
            if catalog::find(&sub.technique).is_none() {
                return Err(EngineError::InvalidTechnique(sub.technique.clone()));
            }
        }
        let outcome = classify(&sub_actions);
        let action_id = bout.record(Action::Combined {
            competitor,
            sub_actions,
            observations,
            label: outcome.label.clone(),
            detail: outcome.detail.clone(),
            final_score: outcome.final_score,
        })?;
        tracing::debug!(
            match_id = %id,
            %competitor,
            label = %outcome.label,
            final_score = %outcome.final_score,
            "combined action recorded"
        );
        let finished = self.after_append(&mut bout)?;
        Ok((
            RecordReceipt {
                action_id,
                finished,
            },
            outcome,
        ))
    }

    /// Current tallies, derived from the ledger
    pub async fn tally(&self, id: MatchId) -> Result<MatchTally> {
        let slot = self.slot(id)?;
        let bout = slot.bout.read().await;
        bout.tally()
    }

    /// Immutable view of the whole match record, ledger included
    pub async fn snapshot(&self, id: MatchId) -> Result<Bout> {
        let slot = self.slot(id)?;
        let bout = slot.bout.read().await;
        Ok(bout.clone())
    }

    /// Finish the match. With an explicit winner that choice is
    /// authoritative; without one the outcome resolver must settle it.
    pub async fn finalize_match(
        &self,
        id: MatchId,
        winner: Option<CompetitorId>,
    ) -> Result<Finalization> {
        let slot = self.slot(id)?;
        let finalization = {
            let mut bout = slot.bout.write().await;
            let finalization = bout.finalize(winner)?;
            self.repository.archive(&bout)?;
            finalization
        };
        if let Some(handle) = slot
            .clock_task
            .lock()
            .expect("clock task lock poisoned")
            .take()
        {
            handle.abort();
        }
        tracing::info!(
            match_id = %id,
            winner = %finalization.winner,
            reason = %finalization.reason,
            "match finalized"
        );
        Ok(finalization)
    }

    pub async fn pause_clock(&self, id: MatchId) -> Result<Seconds> {
        let slot = self.slot(id)?;
        let remaining = slot.bout.write().await.pause_clock()?;
        tracing::debug!(match_id = %id, remaining, "clock paused");
        Ok(remaining)
    }

    pub async fn resume_clock(&self, id: MatchId) -> Result<Seconds> {
        let slot = self.slot(id)?;
        let remaining = slot.bout.write().await.resume_clock()?;
        tracing::debug!(match_id = %id, remaining, "clock resumed");
        Ok(remaining)
    }

    /// The centrally owned timed event: consume one elapsed second on the
    /// match clock. The driver task calls this once a second; tests call
    /// it directly to make expiry deterministic.
    pub async fn tick_clock(&self, id: MatchId) -> Result<TickOutcome> {
        let slot = self.slot(id)?;
        let mut bout = slot.bout.write().await;
        tick_bout(&mut bout, self.repository.as_ref())
    }

    /// After an append, inside the same lock: finish the match if a
    /// terminal condition is met and archive the final record.
    fn after_append(&self, bout: &mut Bout) -> Result<Option<Finalization>> {
        let finished = bout.check_terminal()?;
        if let Some(finalization) = finished {
            self.repository.archive(bout)?;
            tracing::info!(
                match_id = %bout.id(),
                winner = %finalization.winner,
                reason = %finalization.reason,
                "match finished on terminal score"
            );
        }
        Ok(finished)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        let bouts = self.bouts.read().expect("match registry poisoned");
        for slot in bouts.values() {
            if let Some(handle) = slot
                .clock_task
                .lock()
                .expect("clock task lock poisoned")
                .take()
            {
                handle.abort();
            }
        }
    }
}

/// Apply one tick to a match. Runs inside the match's write lock, so a
/// tick and a simultaneously submitted action never interleave.
fn tick_bout(bout: &mut Bout, repository: &dyn BoutRepository) -> Result<TickOutcome> {
    if bout.state() == BoutState::Finished {
        return Ok(TickOutcome::Finished);
    }
    match bout.tick() {
        ClockTick::Idle => Ok(TickOutcome::Idle),
        ClockTick::Running(remaining) => Ok(TickOutcome::Ticked(remaining)),
        ClockTick::Expired => match bout.resolve()? {
            Resolution::Winner(_) => {
                let finalization = bout.finalize(None)?;
                repository.archive(bout)?;
                tracing::info!(
                    match_id = %bout.id(),
                    winner = %finalization.winner,
                    reason = %finalization.reason,
                    "time expired, match decided on the scores"
                );
                Ok(TickOutcome::Expired(Some(finalization)))
            }
            Resolution::Draw => {
                // Level on every rung: leave the match active and wait for
                // the referee to name a winner.
                tracing::warn!(
                    match_id = %bout.id(),
                    "time expired on level scores, awaiting manual decision"
                );
                Ok(TickOutcome::Expired(None))
            }
        },
    }
}

fn spawn_clock_driver(
    id: MatchId,
    bout: Arc<RwLock<Bout>>,
    repository: Arc<dyn BoutRepository>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let mut guard = bout.write().await;
            match tick_bout(&mut guard, repository.as_ref()) {
                Ok(TickOutcome::Idle) | Ok(TickOutcome::Ticked(_)) => {}
                Ok(TickOutcome::Expired(_)) | Ok(TickOutcome::Finished) => break,
                Err(error) => {
                    tracing::error!(match_id = %id, %error, "clock driver stopping");
                    break;
                }
            }
        }
    })
}

//! The match record and its state machine
//!
//! A `Bout` owns everything about one match: the two competitors, the
//! lifecycle state, the clock, and the append-only ledger. All mutation
//! goes through the transition methods here; the engine wraps each bout
//! in a lock so those transitions are serialized.

pub mod action;
pub mod clock;
pub mod ledger;

use serde::{Deserialize, Serialize};

use crate::bout::action::{Action, RecordedAction};
use crate::bout::clock::{BoutClock, ClockTick};
use crate::bout::ledger::ActionLedger;
use crate::core::error::{EngineError, Result};
use crate::core::types::{ActionId, Competitor, CompetitorId, MatchId, Seconds};
use crate::score::outcome::{resolve, Finalization, Resolution, WinReason};
use crate::score::tally::{aggregate, MatchTally};

/// Match lifecycle. `Finished` is terminal; there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoutState {
    Created,
    Active,
    Finished,
}

impl std::fmt::Display for BoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoutState::Created => write!(f, "created"),
            BoutState::Active => write!(f, "active"),
            BoutState::Finished => write!(f, "finished"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bout {
    id: MatchId,
    white: Competitor,
    blue: Competitor,
    state: BoutState,
    clock: BoutClock,
    ledger: ActionLedger,
    winner: Option<CompetitorId>,
    finalization_reason: Option<WinReason>,
}

impl Bout {
    /// Create a match between two distinct competitors with the clock
    /// holding `duration` seconds
    pub fn new(white: Competitor, blue: Competitor, duration: Seconds) -> Result<Self> {
        if white.id == blue.id {
            return Err(EngineError::MatchCreation(
                "a competitor cannot face themselves".into(),
            ));
        }
        Ok(Self {
            id: MatchId::new(),
            white,
            blue,
            state: BoutState::Created,
            clock: BoutClock::new(duration),
            ledger: ActionLedger::new(),
            winner: None,
            finalization_reason: None,
        })
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn white(&self) -> &Competitor {
        &self.white
    }

    pub fn blue(&self) -> &Competitor {
        &self.blue
    }

    pub fn state(&self) -> BoutState {
        self.state
    }

    pub fn clock(&self) -> &BoutClock {
        &self.clock
    }

    pub fn ledger(&self) -> &ActionLedger {
        &self.ledger
    }

    pub fn winner(&self) -> Option<CompetitorId> {
        self.winner
    }

    pub fn finalization_reason(&self) -> Option<WinReason> {
        self.finalization_reason
    }

    pub fn has_competitor(&self, id: CompetitorId) -> bool {
        self.white.id == id || self.blue.id == id
    }

    /// Display name of a registered competitor
    pub fn competitor_name(&self, id: CompetitorId) -> Option<&str> {
        if self.white.id == id {
            Some(&self.white.name)
        } else if self.blue.id == id {
            Some(&self.blue.name)
        } else {
            None
        }
    }

    /// `Created -> Active`; arms the clock
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            BoutState::Created => {
                self.state = BoutState::Active;
                self.clock.resume();
                Ok(())
            }
            BoutState::Active | BoutState::Finished => Err(EngineError::AlreadyStarted(self.id)),
        }
    }

    /// Append an action to the ledger, stamped with the current clock
    /// reading. Only legal while `Active`.
    pub fn record(&mut self, action: Action) -> Result<ActionId> {
        if self.state != BoutState::Active {
            return Err(EngineError::MatchNotActive(self.id));
        }
        let competitor = action.competitor();
        if !self.has_competitor(competitor) {
            return Err(EngineError::UnknownCompetitor(competitor, self.id));
        }
        let recorded = RecordedAction::new(self.clock.remaining(), action);
        Ok(self.ledger.append(recorded))
    }

    /// Fold the ledger into the current tallies
    pub fn tally(&self) -> Result<MatchTally> {
        aggregate(self.ledger.as_slice(), self.id, self.white.id, self.blue.id)
    }

    /// Run the outcome rule ladder over the current tallies
    pub fn resolve(&self) -> Result<Resolution> {
        Ok(resolve(&self.tally()?, self.white.id, self.blue.id))
    }

    /// After an append: finish the match on the spot if a terminal
    /// condition (ippon, two waza-ari, disqualification) is now met.
    /// Point advantages only decide the match when time runs out.
    pub fn check_terminal(&mut self) -> Result<Option<Finalization>> {
        if self.state != BoutState::Active {
            return Ok(None);
        }
        if let Resolution::Winner(finalization) = self.resolve()? {
            if finalization.reason.ends_match_immediately() {
                self.finalize_with(finalization);
                return Ok(Some(finalization));
            }
        }
        Ok(None)
    }

    /// `Active -> Finished`. An explicit winner is authoritative (manual
    /// tie-break); without one the outcome resolver decides, and a draw
    /// is an error the caller must break by supplying a winner.
    pub fn finalize(&mut self, explicit_winner: Option<CompetitorId>) -> Result<Finalization> {
        match self.state {
            BoutState::Finished => return Err(EngineError::AlreadyFinished(self.id)),
            BoutState::Created => return Err(EngineError::MatchNotActive(self.id)),
            BoutState::Active => {}
        }
        let finalization = match explicit_winner {
            Some(winner) => {
                if !self.has_competitor(winner) {
                    return Err(EngineError::UnknownCompetitor(winner, self.id));
                }
                Finalization {
                    winner,
                    reason: WinReason::RefereeDecision,
                }
            }
            None => self
                .resolve()?
                .winner()
                .ok_or(EngineError::UnresolvedDraw(self.id))?,
        };
        self.finalize_with(finalization);
        Ok(finalization)
    }

    fn finalize_with(&mut self, finalization: Finalization) {
        self.state = BoutState::Finished;
        self.clock.stop();
        self.winner = Some(finalization.winner);
        self.finalization_reason = Some(finalization.reason);
    }

    /// Feed one elapsed second to the clock. Only meaningful while
    /// `Active`; the caller decides what expiry means.
    pub fn tick(&mut self) -> ClockTick {
        if self.state != BoutState::Active {
            return ClockTick::Idle;
        }
        self.clock.tick()
    }

    pub fn pause_clock(&mut self) -> Result<Seconds> {
        if self.state != BoutState::Active {
            return Err(EngineError::MatchNotActive(self.id));
        }
        self.clock.pause();
        Ok(self.clock.remaining())
    }

    pub fn resume_clock(&mut self) -> Result<Seconds> {
        if self.state != BoutState::Active {
            return Err(EngineError::MatchNotActive(self.id));
        }
        self.clock.resume();
        Ok(self.clock.remaining())
    }
}

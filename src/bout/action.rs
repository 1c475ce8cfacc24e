//! The action data model: everything a table official can record
//!
//! Actions are immutable once recorded. Corrections are made by recording a
//! new action; nothing in the ledger is ever rewritten.

use serde::{Deserialize, Serialize};

use crate::core::types::{ActionId, CompetitorId, Seconds};
use crate::score::combination::SubAction;
use crate::score::value::ScoreValue;

/// Penalty kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    /// Minor penalty; they accumulate toward disqualification
    Shido,
    /// Direct disqualification
    HansokuMake,
}

impl std::fmt::Display for PenaltyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PenaltyKind::Shido => write!(f, "Shido"),
            PenaltyKind::HansokuMake => write!(f, "Hansoku-make"),
        }
    }
}

/// One recordable exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// A tachi-waza attempt with the score the referee awarded
    Throw {
        competitor: CompetitorId,
        technique: String,
        score: ScoreValue,
        effective: bool,
    },
    /// A ne-waza attempt; the score is derived, never supplied
    Ground {
        competitor: CompetitorId,
        technique: String,
        effective: bool,
        hold_seconds: Option<Seconds>,
    },
    Penalty {
        competitor: CompetitorId,
        #[serde(rename = "penalty_kind")]
        kind: PenaltyKind,
    },
    /// Techniques chained in a single exchange, scored as one unit
    Combined {
        competitor: CompetitorId,
        sub_actions: Vec<SubAction>,
        observations: Option<String>,
        label: String,
        detail: String,
        final_score: ScoreValue,
    },
}

impl Action {
    pub fn competitor(&self) -> CompetitorId {
        match self {
            Action::Throw { competitor, .. }
            | Action::Ground { competitor, .. }
            | Action::Penalty { competitor, .. }
            | Action::Combined { competitor, .. } => *competitor,
        }
    }
}

/// An action as it sits in the ledger: the action itself plus its id and
/// the clock reading when it was recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedAction {
    pub id: ActionId,
    /// Seconds remaining on the match clock at recording time
    pub clock_at_recording: Seconds,
    pub action: Action,
}

impl RecordedAction {
    pub fn new(clock_at_recording: Seconds, action: Action) -> Self {
        Self {
            id: ActionId::new(),
            clock_at_recording,
            action,
        }
    }
}

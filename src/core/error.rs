use thiserror::Error;

use crate::core::types::{CompetitorId, MatchId};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown match: {0}")]
    UnknownMatch(MatchId),

    #[error("Competitor {0} is not registered in match {1}")]
    UnknownCompetitor(CompetitorId, MatchId),

    #[error("Invalid technique: {0}")]
    InvalidTechnique(String),

    #[error("Match {0} is not active")]
    MatchNotActive(MatchId),

    #[error("Match {0} has already started")]
    AlreadyStarted(MatchId),

    #[error("Match {0} has already finished")]
    AlreadyFinished(MatchId),

    #[error("Match {0} is level on all scores; an explicit winner is required")]
    UnresolvedDraw(MatchId),

    #[error("Cannot create match: {0}")]
    MatchCreation(String),

    #[error("A combined action needs at least one sub-action")]
    EmptyCombination,

    #[error("Corrupt ledger in match {0}: {1}")]
    CorruptLedger(MatchId, String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

//! Scoring: score values, derived tallies, the outcome rule set, and the
//! combined-action classifier

pub mod combination;
pub mod outcome;
pub mod tally;
pub mod value;

pub use combination::{classify, CombinationOutcome, SubAction};
pub use outcome::{resolve, Finalization, Resolution, WinReason};
pub use tally::{aggregate, MatchTally, ScoreTally, PENALTY_DISQUALIFICATION};
pub use value::{ground_score, osaekomi_score, ScoreValue};

//! Derived per-competitor tallies
//!
//! The ledger is the single source of truth; a tally is always the result
//! of folding over it in recording order and is never stored back.

use serde::{Deserialize, Serialize};

use crate::bout::action::{Action, PenaltyKind, RecordedAction};
use crate::catalog::{self, Family};
use crate::core::error::{EngineError, Result};
use crate::core::types::{CompetitorId, MatchId};
use crate::score::value::{ground_score, ScoreValue};

/// Penalty count at which a competitor is disqualified
pub const PENALTY_DISQUALIFICATION: u32 = 4;

/// Running score counters for one competitor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTally {
    pub ippon: u32,
    pub waza_ari: u32,
    pub yuko: u32,
    pub penalties: u32,
    /// Whether a hansoku-make was recorded; pins `penalties` at the
    /// disqualification threshold
    pub hansoku_make: bool,
}

impl ScoreTally {
    pub fn apply_score(&mut self, value: ScoreValue) {
        match value {
            ScoreValue::None => {}
            ScoreValue::Yuko => self.yuko += 1,
            ScoreValue::WazaAri => self.waza_ari += 1,
            ScoreValue::Ippon => self.ippon += 1,
        }
    }

    pub fn apply_penalty(&mut self, kind: PenaltyKind) {
        match kind {
            // Shidos after a hansoku-make cannot move the pinned count.
            PenaltyKind::Shido if !self.hansoku_make => self.penalties += 1,
            PenaltyKind::Shido => {}
            PenaltyKind::HansokuMake => {
                self.hansoku_make = true;
                self.penalties = PENALTY_DISQUALIFICATION;
            }
        }
    }

    pub fn disqualified(&self) -> bool {
        self.penalties >= PENALTY_DISQUALIFICATION
    }

    /// Weighted sum for scoreboard display only; the outcome resolver
    /// reasons over the category counts, never this number
    pub fn total_points(&self) -> i64 {
        10 * i64::from(self.ippon) + 5 * i64::from(self.waza_ari) + 3 * i64::from(self.yuko)
            - i64::from(self.penalties)
    }
}

/// Both competitors' tallies, derived together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTally {
    pub white: ScoreTally,
    pub blue: ScoreTally,
}

/// Fold the ledger into a tally for the two registered competitors
///
/// An action referencing anyone else, or a ground technique the catalog
/// cannot place, is a corrupt ledger: reported, never repaired.
pub fn aggregate(
    actions: &[RecordedAction],
    match_id: MatchId,
    white: CompetitorId,
    blue: CompetitorId,
) -> Result<MatchTally> {
    let mut tally = MatchTally::default();
    for recorded in actions {
        let competitor = recorded.action.competitor();
        let side = if competitor == white {
            &mut tally.white
        } else if competitor == blue {
            &mut tally.blue
        } else {
            return Err(EngineError::CorruptLedger(
                match_id,
                format!("action {} references competitor {}", recorded.id, competitor),
            ));
        };

        match &recorded.action {
            Action::Throw {
                score, effective, ..
            } => {
                if *effective {
                    side.apply_score(*score);
                }
            }
            Action::Ground {
                technique,
                effective,
                hold_seconds,
                ..
            } => {
                let category = catalog::category_of(technique).ok_or_else(|| {
                    EngineError::CorruptLedger(
                        match_id,
                        format!("unknown technique {technique} in action {}", recorded.id),
                    )
                })?;
                if category.family() != Family::NeWaza {
                    return Err(EngineError::CorruptLedger(
                        match_id,
                        format!("{technique} is not ne-waza in action {}", recorded.id),
                    ));
                }
                side.apply_score(ground_score(category, *effective, *hold_seconds));
            }
            Action::Penalty { kind, .. } => side.apply_penalty(*kind),
            Action::Combined { final_score, .. } => side.apply_score(*final_score),
        }
    }
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::combination::SubAction;

    fn ids() -> (MatchId, CompetitorId, CompetitorId) {
        (MatchId::new(), CompetitorId::new(), CompetitorId::new())
    }

    fn throw(competitor: CompetitorId, score: ScoreValue, effective: bool) -> RecordedAction {
        RecordedAction::new(
            200,
            Action::Throw {
                competitor,
                technique: "uchi_mata".into(),
                score,
                effective,
            },
        )
    }

    #[test]
    fn test_ineffective_throws_contribute_nothing() {
        let (m, white, blue) = ids();
        let ledger = vec![
            throw(white, ScoreValue::Ippon, false),
            throw(white, ScoreValue::Yuko, true),
        ];
        let tally = aggregate(&ledger, m, white, blue).unwrap();
        assert_eq!(tally.white.ippon, 0);
        assert_eq!(tally.white.yuko, 1);
        assert_eq!(tally.blue, ScoreTally::default());
    }

    #[test]
    fn test_ground_scores_are_derived_from_hold() {
        let (m, white, blue) = ids();
        let hold = |secs| {
            RecordedAction::new(
                100,
                Action::Ground {
                    competitor: blue,
                    technique: "kesa_gatame".into(),
                    effective: true,
                    hold_seconds: Some(secs),
                },
            )
        };
        let tally = aggregate(&[hold(9), hold(10), hold(19), hold(20)], m, white, blue).unwrap();
        assert_eq!(tally.blue.waza_ari, 2);
        assert_eq!(tally.blue.ippon, 1);
        assert_eq!(tally.blue.yuko, 0);
    }

    #[test]
    fn test_effective_choke_is_ippon() {
        let (m, white, blue) = ids();
        let ledger = vec![RecordedAction::new(
            50,
            Action::Ground {
                competitor: white,
                technique: "hadaka_jime".into(),
                effective: true,
                hold_seconds: None,
            },
        )];
        let tally = aggregate(&ledger, m, white, blue).unwrap();
        assert_eq!(tally.white.ippon, 1);
    }

    #[test]
    fn test_hansoku_make_pins_penalties_at_threshold() {
        let (m, white, blue) = ids();
        let penalty = |kind| {
            RecordedAction::new(
                30,
                Action::Penalty {
                    competitor: white,
                    kind,
                },
            )
        };
        let ledger = vec![
            penalty(PenaltyKind::Shido),
            penalty(PenaltyKind::HansokuMake),
            penalty(PenaltyKind::Shido),
        ];
        let tally = aggregate(&ledger, m, white, blue).unwrap();
        assert_eq!(tally.white.penalties, PENALTY_DISQUALIFICATION);
        assert!(tally.white.hansoku_make);
        assert!(tally.white.disqualified());
    }

    #[test]
    fn test_combined_counts_only_its_final_score() {
        let (m, white, blue) = ids();
        let ledger = vec![RecordedAction::new(
            120,
            Action::Combined {
                competitor: white,
                sub_actions: vec![
                    SubAction {
                        technique: "kouchi_gari".into(),
                        effective: true,
                        score: Some(ScoreValue::Yuko),
                        hold_seconds: None,
                    },
                    SubAction {
                        technique: "harai_goshi".into(),
                        effective: true,
                        score: Some(ScoreValue::WazaAri),
                        hold_seconds: None,
                    },
                ],
                observations: None,
                label: "Ashi waza - Koshi waza (A-K)".into(),
                detail: "Techniques: Kouchi-gari, Harai-goshi | Effective: 2/2".into(),
                final_score: ScoreValue::WazaAri,
            },
        )];
        let tally = aggregate(&ledger, m, white, blue).unwrap();
        // One waza-ari for the whole exchange; the yuko sub-action is audit
        // trail only.
        assert_eq!(tally.white.waza_ari, 1);
        assert_eq!(tally.white.yuko, 0);
    }

    #[test]
    fn test_foreign_competitor_is_corrupt_ledger() {
        let (m, white, blue) = ids();
        let intruder = CompetitorId::new();
        let ledger = vec![throw(intruder, ScoreValue::Yuko, true)];
        assert!(matches!(
            aggregate(&ledger, m, white, blue),
            Err(EngineError::CorruptLedger(..))
        ));
    }

    #[test]
    fn test_total_points_weighting() {
        let mut tally = ScoreTally::default();
        tally.apply_score(ScoreValue::Ippon);
        tally.apply_score(ScoreValue::WazaAri);
        tally.apply_score(ScoreValue::Yuko);
        tally.apply_penalty(PenaltyKind::Shido);
        assert_eq!(tally.total_points(), 10 + 5 + 3 - 1);
    }
}

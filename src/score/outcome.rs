//! The automatic-winner decision algorithm
//!
//! A fixed priority ladder over the two tallies. The order of the rules is
//! the domain contract; do not reorder them.

use serde::{Deserialize, Serialize};

use crate::core::types::CompetitorId;
use crate::score::tally::{MatchTally, ScoreTally};

/// Why a competitor won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    /// The opponent reached the penalty threshold or received hansoku-make
    OpponentDisqualified,
    Ippon,
    /// Two waza-ari counted together as ippon
    WazaAriAwaseteIppon,
    /// More waza-ari at the decision point
    WazaAriAdvantage,
    /// More yuko at the decision point
    YukoAdvantage,
    FewerPenalties,
    /// Explicit winner supplied by the referee (manual tie-break)
    RefereeDecision,
}

impl WinReason {
    /// Whether this condition ends the match the moment it appears, as
    /// opposed to only deciding it when time runs out
    pub fn ends_match_immediately(&self) -> bool {
        matches!(
            self,
            WinReason::OpponentDisqualified | WinReason::Ippon | WinReason::WazaAriAwaseteIppon
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            WinReason::OpponentDisqualified => "opponent disqualified",
            WinReason::Ippon => "ippon",
            WinReason::WazaAriAwaseteIppon => "waza-ari awasete ippon",
            WinReason::WazaAriAdvantage => "waza-ari advantage",
            WinReason::YukoAdvantage => "yuko advantage",
            WinReason::FewerPenalties => "fewer penalties",
            WinReason::RefereeDecision => "referee decision",
        }
    }
}

impl std::fmt::Display for WinReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A settled winner together with the reason the match record keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finalization {
    pub winner: CompetitorId,
    pub reason: WinReason,
}

/// Outcome of running the rule ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Winner(Finalization),
    /// Level on every rung; a human must decide
    Draw,
}

impl Resolution {
    pub fn winner(&self) -> Option<Finalization> {
        match self {
            Resolution::Winner(finalization) => Some(*finalization),
            Resolution::Draw => None,
        }
    }
}

/// Decide the match from the tallies, in strict priority order:
/// disqualification, ippon, waza-ari awasete ippon, waza-ari count, yuko
/// count, fewer penalties, draw.
pub fn resolve(tally: &MatchTally, white: CompetitorId, blue: CompetitorId) -> Resolution {
    let win = |competitor, reason| Resolution::Winner(Finalization { winner: competitor, reason });
    let w: &ScoreTally = &tally.white;
    let b: &ScoreTally = &tally.blue;

    // 1. Disqualification overrides every score. Both sides disqualified
    //    leaves nobody to award the match to; that goes to the referee.
    match (w.disqualified(), b.disqualified()) {
        (true, true) => return Resolution::Draw,
        (true, false) => return win(blue, WinReason::OpponentDisqualified),
        (false, true) => return win(white, WinReason::OpponentDisqualified),
        (false, false) => {}
    }

    // 2. Ippon dominance. Equal nonzero counts fall through.
    if w.ippon != b.ippon {
        if w.ippon > b.ippon {
            return win(white, WinReason::Ippon);
        }
        return win(blue, WinReason::Ippon);
    }

    // 3. Two waza-ari count as ippon, checked before comparing waza-ari
    //    directly. Both at two or more falls through to the count.
    let w_awasete = w.waza_ari >= 2;
    let b_awasete = b.waza_ari >= 2;
    if w_awasete && !b_awasete {
        return win(white, WinReason::WazaAriAwaseteIppon);
    }
    if b_awasete && !w_awasete {
        return win(blue, WinReason::WazaAriAwaseteIppon);
    }

    // 4. Waza-ari count.
    if w.waza_ari != b.waza_ari {
        if w.waza_ari > b.waza_ari {
            return win(white, WinReason::WazaAriAdvantage);
        }
        return win(blue, WinReason::WazaAriAdvantage);
    }

    // 5. Yuko count.
    if w.yuko != b.yuko {
        if w.yuko > b.yuko {
            return win(white, WinReason::YukoAdvantage);
        }
        return win(blue, WinReason::YukoAdvantage);
    }

    // 6. Fewer penalties.
    if w.penalties != b.penalties {
        if w.penalties < b.penalties {
            return win(white, WinReason::FewerPenalties);
        }
        return win(blue, WinReason::FewerPenalties);
    }

    // 7. Level everywhere. Never silently pick a winner.
    Resolution::Draw
}

//! Score values and the derivation rules for ground techniques

use serde::{Deserialize, Serialize};

use crate::catalog::Category;
use crate::core::types::Seconds;

/// Minimum hold for waza-ari from osaekomi
pub const OSAEKOMI_WAZA_ARI_SECS: Seconds = 10;

/// Minimum hold for ippon from osaekomi
pub const OSAEKOMI_IPPON_SECS: Seconds = 20;

/// The score a single action can carry
///
/// The ordering is load-bearing: a higher value strictly dominates any
/// count of lower ones. The only accumulation rule is two waza-ari by the
/// same competitor, which the outcome resolver treats as ippon.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ScoreValue {
    #[default]
    None,
    Yuko,
    WazaAri,
    Ippon,
}

impl ScoreValue {
    /// Display weight; never consulted by the outcome resolver
    pub fn points(&self) -> i64 {
        match self {
            ScoreValue::None => 0,
            ScoreValue::Yuko => 3,
            ScoreValue::WazaAri => 5,
            ScoreValue::Ippon => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreValue::None => "no score",
            ScoreValue::Yuko => "Yuko",
            ScoreValue::WazaAri => "Waza-ari",
            ScoreValue::Ippon => "Ippon",
        }
    }
}

impl std::fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Score from an osaekomi hold, derived purely from how long the hold
/// was maintained
pub fn osaekomi_score(hold_seconds: Seconds) -> ScoreValue {
    if hold_seconds >= OSAEKOMI_IPPON_SECS {
        ScoreValue::Ippon
    } else if hold_seconds >= OSAEKOMI_WAZA_ARI_SECS {
        ScoreValue::WazaAri
    } else {
        ScoreValue::None
    }
}

/// Score of a ground action: osaekomi derives from hold duration, chokes
/// and joint locks score ippon when effective, nothing otherwise
pub fn ground_score(category: Category, effective: bool, hold_seconds: Option<Seconds>) -> ScoreValue {
    if !effective {
        return ScoreValue::None;
    }
    match category {
        Category::OsaekomiWaza => hold_seconds.map(osaekomi_score).unwrap_or(ScoreValue::None),
        Category::ShimeWaza | Category::KansetsuWaza => ScoreValue::Ippon,
        _ => ScoreValue::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_total() {
        assert!(ScoreValue::None < ScoreValue::Yuko);
        assert!(ScoreValue::Yuko < ScoreValue::WazaAri);
        assert!(ScoreValue::WazaAri < ScoreValue::Ippon);
    }

    #[test]
    fn test_osaekomi_boundaries() {
        assert_eq!(osaekomi_score(9), ScoreValue::None);
        assert_eq!(osaekomi_score(10), ScoreValue::WazaAri);
        assert_eq!(osaekomi_score(19), ScoreValue::WazaAri);
        assert_eq!(osaekomi_score(20), ScoreValue::Ippon);
        assert_eq!(osaekomi_score(0), ScoreValue::None);
        assert_eq!(osaekomi_score(25), ScoreValue::Ippon);
    }

    #[test]
    fn test_choke_and_lock_score_ippon_when_effective() {
        assert_eq!(
            ground_score(Category::ShimeWaza, true, None),
            ScoreValue::Ippon
        );
        assert_eq!(
            ground_score(Category::KansetsuWaza, true, None),
            ScoreValue::Ippon
        );
        assert_eq!(
            ground_score(Category::ShimeWaza, false, None),
            ScoreValue::None
        );
    }

    #[test]
    fn test_ineffective_hold_scores_nothing() {
        assert_eq!(
            ground_score(Category::OsaekomiWaza, false, Some(25)),
            ScoreValue::None
        );
        assert_eq!(
            ground_score(Category::OsaekomiWaza, true, Some(15)),
            ScoreValue::WazaAri
        );
        assert_eq!(
            ground_score(Category::OsaekomiWaza, true, None),
            ScoreValue::None
        );
    }
}

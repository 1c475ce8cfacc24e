//! Combined-action classifier
//!
//! A combination is several techniques chained in one exchange. The
//! classifier derives a label from the categories involved, the score the
//! exchange is worth, and the counts the operator display shows. It is a
//! pure function: identical input order gives identical output.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, Category, Family};
use crate::core::types::Seconds;
use crate::score::value::{ground_score, ScoreValue};

/// One technique inside a combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAction {
    pub technique: String,
    pub effective: bool,
    /// Referee-awarded score for a standing technique; ignored for ne-waza
    /// entries, whose score is derived
    pub score: Option<ScoreValue>,
    /// Hold duration for an osaekomi entry
    pub hold_seconds: Option<Seconds>,
}

impl SubAction {
    /// The score this sub-action actually carries once derivation rules
    /// are applied
    pub fn resolved_score(&self) -> ScoreValue {
        if !self.effective {
            return ScoreValue::None;
        }
        match catalog::category_of(&self.technique) {
            Some(category) if category.family() == Family::NeWaza => {
                ground_score(category, self.effective, self.hold_seconds)
            }
            _ => self.score.unwrap_or(ScoreValue::None),
        }
    }
}

/// What the classifier derives for a combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationOutcome {
    /// e.g. "Koshi waza - Ashi waza (K-A)"
    pub label: String,
    /// e.g. "Techniques: Harai-goshi, Osoto-gari | Effective: 1/2"
    pub detail: String,
    /// Highest score among effective sub-actions
    pub final_score: ScoreValue,
    pub total: usize,
    pub effective_count: usize,
    pub failed_count: usize,
}

/// Classify a combination. Callers must not pass an empty slice; the
/// engine rejects those before they reach the classifier.
pub fn classify(sub_actions: &[SubAction]) -> CombinationOutcome {
    // Distinct categories in the order the sub-actions were supplied.
    let mut categories: Vec<Category> = Vec::new();
    for sub in sub_actions {
        if let Some(category) = catalog::category_of(&sub.technique) {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
    }

    let names: Vec<&str> = sub_actions
        .iter()
        .map(|s| {
            catalog::find(&s.technique)
                .map(|t| t.display_name)
                .unwrap_or(s.technique.as_str())
        })
        .collect();

    let label = if categories.is_empty() {
        // No resolvable category at all: list the techniques directly.
        format!("Combination: {}", names.join(" + "))
    } else {
        let labels: Vec<&str> = categories.iter().map(|c| c.label()).collect();
        let codes: Vec<&str> = categories.iter().map(|c| c.code()).collect();
        format!("{} ({})", labels.join(" - "), codes.join("-"))
    };

    let final_score = sub_actions
        .iter()
        .map(SubAction::resolved_score)
        .max()
        .unwrap_or(ScoreValue::None);

    let effective_count = sub_actions
        .iter()
        .filter(|s| s.effective && s.resolved_score() != ScoreValue::None)
        .count();
    let total = sub_actions.len();

    let detail = format!(
        "Techniques: {} | Effective: {}/{}",
        names.join(", "),
        effective_count,
        total
    );

    CombinationOutcome {
        label,
        detail,
        final_score,
        total,
        effective_count,
        failed_count: total - effective_count,
    }
}

use crate::extractor::CategoryScore;
use crate::labels::{HERB_CLASSES, NOT_A_HERB};

/// Terminal outcome for one request.
///
/// Derived from a score list, never stored independently of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Herb(&'static str),
    NotAHerb,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Herb(label) => label,
            Decision::NotAHerb => NOT_A_HERB,
        }
    }
}

/// Reduces a canonical score list to a single label.
pub struct DecisionEngine {
    classification_threshold: f32,
}

impl DecisionEngine {
    pub fn new(classification_threshold: f32) -> Self {
        Self {
            classification_threshold,
        }
    }

    /// Three terminal outcomes, no state across requests:
    /// empty input rejects, a winner below the classification threshold
    /// rejects, anything else is the winning category's label.
    pub fn decide(&self, scores: &[CategoryScore]) -> Decision {
        let mut top: Option<&CategoryScore> = None;
        for score in scores {
            // Strict comparison keeps the first-seen entry on ties.
            if top.is_none_or(|t| score.confidence > t.confidence) {
                top = Some(score);
            }
        }

        match top {
            None => Decision::NotAHerb,
            Some(t) if t.confidence < self.classification_threshold => Decision::NotAHerb,
            Some(t) => HERB_CLASSES
                .get(t.class_id)
                .copied()
                .map(Decision::Herb)
                .unwrap_or(Decision::NotAHerb),
        }
    }
}

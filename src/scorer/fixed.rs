use crate::error::ScoreError;
use crate::traits::{TraitSet, TraitVector};

use super::TraitScorer;

const BIG_FIVE_DEMO: [f64; 5] = [70.0, 65.0, 55.0, 80.0, 35.0];
const ARCHETYPE_DEMO: [f64; 4] = [40.0, 20.0, 25.0, 15.0];

/// Demonstration scorer: returns the same values for any input.
///
/// Not predictive. Output is labelled as a demonstration wherever it is shown.
pub struct FixedScorer {
    set: TraitSet,
}

impl FixedScorer {
    pub fn new(set: TraitSet) -> Self {
        Self { set }
    }
}

impl TraitScorer for FixedScorer {
    fn trait_set(&self) -> TraitSet {
        self.set
    }

    fn score(&self, _text: &str) -> Result<TraitVector, ScoreError> {
        let values: &[f64] = match self.set {
            TraitSet::BigFive => &BIG_FIVE_DEMO,
            TraitSet::Archetype => &ARCHETYPE_DEMO,
        };
        Ok(TraitVector::from_scores(self.set, values)?)
    }

    fn is_predictive(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

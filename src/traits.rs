//! Trait sets and score vectors
//!
//! Two fixed trait sets are supported: the Big Five (OCEAN) model and the
//! four-way archetype model. The key set of a `TraitVector` always equals the
//! declared trait list of its set, in declared order.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::TraitError;

/// Upper bound of the score scale
pub const SCORE_MAX: f64 = 100.0;

/// A closed family of traits scored together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TraitSet {
    /// Openness, Conscientiousness, Extraversion, Agreeableness, Neuroticism
    BigFive,
    /// Extrovert, Introvert, Leader, Thinker
    Archetype,
}

impl TraitSet {
    /// Traits in declared order
    pub fn traits(&self) -> &'static [Trait] {
        match self {
            TraitSet::BigFive => &[
                Trait::Openness,
                Trait::Conscientiousness,
                Trait::Extraversion,
                Trait::Agreeableness,
                Trait::Neuroticism,
            ],
            TraitSet::Archetype => &[Trait::Extrovert, Trait::Introvert, Trait::Leader, Trait::Thinker],
        }
    }

    pub fn len(&self) -> usize {
        self.traits().len()
    }

    pub fn name(&self) -> &'static str {
        match self {
            TraitSet::BigFive => "big-five",
            TraitSet::Archetype => "archetype",
        }
    }
}

impl fmt::Display for TraitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
    Extrovert,
    Introvert,
    Leader,
    Thinker,
}

impl Trait {
    pub fn name(&self) -> &'static str {
        match self {
            Trait::Openness => "Openness",
            Trait::Conscientiousness => "Conscientiousness",
            Trait::Extraversion => "Extraversion",
            Trait::Agreeableness => "Agreeableness",
            Trait::Neuroticism => "Neuroticism",
            Trait::Extrovert => "Extrovert",
            Trait::Introvert => "Introvert",
            Trait::Leader => "Leader",
            Trait::Thinker => "Thinker",
        }
    }

    pub fn set(&self) -> TraitSet {
        match self {
            Trait::Openness
            | Trait::Conscientiousness
            | Trait::Extraversion
            | Trait::Agreeableness
            | Trait::Neuroticism => TraitSet::BigFive,
            Trait::Extrovert | Trait::Introvert | Trait::Leader | Trait::Thinker => TraitSet::Archetype,
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Trait {
    type Err = TraitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        [TraitSet::BigFive, TraitSet::Archetype]
            .iter()
            .flat_map(|set| set.traits())
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| TraitError::UnknownTrait(s.to_string()))
    }
}

/// Fixed-key mapping from trait to a score in [0, 100]
#[derive(Debug, Clone, PartialEq)]
pub struct TraitVector {
    set: TraitSet,
    scores: Vec<(Trait, f64)>,
}

impl TraitVector {
    /// Build from `(trait, score)` pairs that must follow the set's declared order
    pub fn new(set: TraitSet, scores: Vec<(Trait, f64)>) -> Result<Self, TraitError> {
        let expected = set.traits();
        if scores.len() != expected.len() {
            return Err(TraitError::WrongLength {
                set,
                expected: expected.len(),
                actual: scores.len(),
            });
        }

        for (index, ((actual, score), want)) in scores.iter().zip(expected).enumerate() {
            if actual.set() != set {
                return Err(TraitError::WrongSet {
                    trait_name: *actual,
                    set,
                });
            }
            if actual != want {
                return Err(TraitError::OutOfOrder {
                    index,
                    expected: *want,
                    actual: *actual,
                });
            }
            if !score.is_finite() || !(0.0..=SCORE_MAX).contains(score) {
                return Err(TraitError::OutOfRange {
                    trait_name: *actual,
                    score: *score,
                });
            }
        }

        Ok(Self { set, scores })
    }

    /// Build from scores listed in declared order
    pub fn from_scores(set: TraitSet, scores: &[f64]) -> Result<Self, TraitError> {
        if scores.len() != set.len() {
            return Err(TraitError::WrongLength {
                set,
                expected: set.len(),
                actual: scores.len(),
            });
        }
        Self::new(set, set.traits().iter().copied().zip(scores.iter().copied()).collect())
    }

    /// Build from class probabilities (declared order), scaled onto [0, 100]
    pub fn from_probabilities(set: TraitSet, probabilities: &[f64]) -> Result<Self, TraitError> {
        if probabilities.len() != set.len() {
            return Err(TraitError::WrongLength {
                set,
                expected: set.len(),
                actual: probabilities.len(),
            });
        }

        let mut scores = Vec::with_capacity(probabilities.len());
        for (t, p) in set.traits().iter().zip(probabilities) {
            if !p.is_finite() || !(0.0..=1.0).contains(p) {
                return Err(TraitError::BadProbability {
                    trait_name: *t,
                    probability: *p,
                });
            }
            scores.push((*t, (p * SCORE_MAX).min(SCORE_MAX)));
        }
        Self::new(set, scores)
    }

    /// Every trait gets an equal share; used when the scorer is unavailable
    pub fn uniform(set: TraitSet) -> Self {
        let share = SCORE_MAX / set.len() as f64;
        Self {
            set,
            scores: set.traits().iter().map(|t| (*t, share)).collect(),
        }
    }

    pub fn set(&self) -> TraitSet {
        self.set
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn get(&self, t: Trait) -> Option<f64> {
        self.scores.iter().find(|(k, _)| *k == t).map(|(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Trait, f64)> + '_ {
        self.scores.iter().copied()
    }

    /// Highest scoring trait; on ties the first trait in declared order wins
    pub fn dominant(&self) -> (Trait, f64) {
        let mut best = self.scores[0];
        for &(t, s) in &self.scores[1..] {
            if s > best.1 {
                best = (t, s);
            }
        }
        best
    }
}

impl Serialize for TraitVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.scores.len()))?;
        for (t, s) in &self.scores {
            map.serialize_entry(t.name(), s)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big_five(scores: [f64; 5]) -> TraitVector {
        TraitVector::from_scores(TraitSet::BigFive, &scores).unwrap()
    }

    #[test]
    fn test_declared_order() {
        assert_eq!(TraitSet::BigFive.traits()[0], Trait::Openness);
        assert_eq!(TraitSet::BigFive.traits()[4], Trait::Neuroticism);
        assert_eq!(
            TraitSet::Archetype.traits(),
            &[Trait::Extrovert, Trait::Introvert, Trait::Leader, Trait::Thinker]
        );
    }

    #[test]
    fn test_every_trait_belongs_to_its_set() {
        for set in [TraitSet::BigFive, TraitSet::Archetype] {
            for t in set.traits() {
                assert_eq!(t.set(), set);
            }
        }
    }

    #[test]
    fn test_parse_trait_case_insensitive() {
        assert_eq!("agreeableness".parse::<Trait>().unwrap(), Trait::Agreeableness);
        assert_eq!(" LEADER ".parse::<Trait>().unwrap(), Trait::Leader);
        assert!(matches!("Charisma".parse::<Trait>(), Err(TraitError::UnknownTrait(_))));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = TraitVector::from_scores(TraitSet::BigFive, &[10.0, 20.0, 101.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            TraitError::OutOfRange {
                trait_name: Trait::Extraversion,
                ..
            }
        ));
        assert!(TraitVector::from_scores(TraitSet::BigFive, &[f64::NAN, 0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(TraitVector::from_scores(TraitSet::BigFive, &[-1.0, 0.0, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = TraitVector::from_scores(TraitSet::Archetype, &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            TraitError::WrongLength {
                set: TraitSet::Archetype,
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn test_rejects_foreign_or_reordered_keys() {
        let foreign = vec![
            (Trait::Extrovert, 1.0),
            (Trait::Introvert, 1.0),
            (Trait::Leader, 1.0),
            (Trait::Openness, 1.0),
        ];
        assert!(matches!(
            TraitVector::new(TraitSet::Archetype, foreign),
            Err(TraitError::WrongSet { .. })
        ));

        let reordered = vec![
            (Trait::Introvert, 1.0),
            (Trait::Extrovert, 1.0),
            (Trait::Leader, 1.0),
            (Trait::Thinker, 1.0),
        ];
        assert!(matches!(
            TraitVector::new(TraitSet::Archetype, reordered),
            Err(TraitError::OutOfOrder { index: 0, .. })
        ));
    }

    #[test]
    fn test_from_probabilities_scales() {
        let v = TraitVector::from_probabilities(TraitSet::Archetype, &[0.5, 0.25, 0.125, 0.125]).unwrap();
        assert_eq!(v.get(Trait::Extrovert), Some(50.0));
        assert_eq!(v.get(Trait::Thinker), Some(12.5));
        assert!(TraitVector::from_probabilities(TraitSet::Archetype, &[1.5, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn test_uniform() {
        let v = TraitVector::uniform(TraitSet::Archetype);
        assert!(v.iter().all(|(_, s)| s == 25.0));
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn test_dominant_picks_max() {
        let v = big_five([70.0, 65.0, 55.0, 80.0, 35.0]);
        assert_eq!(v.dominant(), (Trait::Agreeableness, 80.0));
    }

    #[test]
    fn test_dominant_tie_prefers_declared_order() {
        let v = big_five([40.0, 90.0, 10.0, 90.0, 90.0]);
        assert_eq!(v.dominant().0, Trait::Conscientiousness);

        let all_equal = TraitVector::uniform(TraitSet::Archetype);
        assert_eq!(all_equal.dominant().0, Trait::Extrovert);
    }

    #[test]
    fn test_serializes_in_declared_order() {
        let v = big_five([1.0, 2.0, 3.0, 4.0, 5.0]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(
            json,
            r#"{"Openness":1.0,"Conscientiousness":2.0,"Extraversion":3.0,"Agreeableness":4.0,"Neuroticism":5.0}"#
        );
    }
}

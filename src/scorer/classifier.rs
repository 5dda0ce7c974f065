//! Linear text classifier loaded from an exported model file.
//!
//! The model file is JSON holding a TF-IDF vocabulary and the weights of a
//! multinomial logistic regression:
//!
//! ```json
//! {
//!   "classes": ["Extrovert", "Introvert", "Leader", "Thinker"],
//!   "vocabulary": {"team": 0, "alone": 1},
//!   "idf": [1.2, 1.5],
//!   "coef": [[0.9, -0.4], [-0.3, 1.1], [0.2, 0.0], [0.0, 0.1]],
//!   "intercept": [0.0, 0.0, 0.0, 0.0]
//! }
//! ```
//!
//! The model is treated as a black box: text in, class probabilities out.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use lazy_regex::regex;
use serde::{Deserialize, Serialize};

use super::TraitScorer;
use crate::error::{ModelError, ScoreError};
use crate::traits::{Trait, TraitSet, TraitVector};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearTextModel {
    pub classes: Vec<String>,
    pub vocabulary: IndexMap<String, usize>,
    pub idf: Vec<f64>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearTextModel {
    fn check_shape(&self) -> Result<(), ModelError> {
        let n_features = self.vocabulary.len();
        let n_classes = self.classes.len();

        if self.idf.len() != n_features {
            return Err(ModelError::Shape(format!(
                "idf has {} entries for {} vocabulary terms",
                self.idf.len(),
                n_features
            )));
        }
        if self.coef.len() != n_classes || self.intercept.len() != n_classes {
            return Err(ModelError::Shape(format!(
                "{} classes but {} coefficient rows and {} intercepts",
                n_classes,
                self.coef.len(),
                self.intercept.len()
            )));
        }
        if let Some((row, weights)) = self.coef.iter().enumerate().find(|(_, w)| w.len() != n_features) {
            return Err(ModelError::Shape(format!(
                "coefficient row {} has {} weights for {} features",
                row,
                weights.len(),
                n_features
            )));
        }
        if let Some((term, idx)) = self.vocabulary.iter().find(|(_, idx)| **idx >= n_features) {
            return Err(ModelError::Shape(format!(
                "vocabulary term '{}' maps to column {} of {}",
                term, idx, n_features
            )));
        }
        Ok(())
    }

    /// L2-normalised TF-IDF features, sparse
    fn features(&self, text: &str) -> HashMap<usize, f64> {
        let lowered = text.to_lowercase();
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in regex!(r"\b\w\w+\b").find_iter(&lowered) {
            if let Some(&col) = self.vocabulary.get(token.as_str()) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        for (col, value) in counts.iter_mut() {
            *value *= self.idf[*col];
        }
        let norm = counts.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in counts.values_mut() {
                *value /= norm;
            }
        }
        counts
    }

    /// Class probabilities in model class order
    pub fn predict_proba(&self, text: &str) -> Vec<f64> {
        let features = self.features(text);
        let logits: Vec<f64> = self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(weights, bias)| bias + features.iter().map(|(col, x)| weights[*col] * x).sum::<f64>())
            .collect();
        softmax(&logits)
    }
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

/// Scorer backed by a [`LinearTextModel`], loaded once and read-only afterwards
pub struct ClassifierScorer {
    set: TraitSet,
    model: LinearTextModel,
    /// For each trait in declared order, its class index in the model
    class_index: Vec<usize>,
}

impl ClassifierScorer {
    pub fn load(path: &Path, set: TraitSet) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: LinearTextModel = serde_json::from_str(&content).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "Loaded classifier from {} ({} classes, {} terms)",
            path.display(),
            model.classes.len(),
            model.vocabulary.len()
        );
        Self::from_model(model, set)
    }

    pub fn from_model(model: LinearTextModel, set: TraitSet) -> Result<Self, ModelError> {
        model.check_shape()?;

        let mut by_trait: HashMap<Trait, usize> = HashMap::new();
        for (i, class) in model.classes.iter().enumerate() {
            let t: Trait = class.parse().map_err(|_| ModelError::UnknownClass {
                class: class.clone(),
                set,
            })?;
            if t.set() != set || by_trait.insert(t, i).is_some() {
                return Err(ModelError::UnknownClass {
                    class: class.clone(),
                    set,
                });
            }
        }

        let class_index = set
            .traits()
            .iter()
            .map(|t| by_trait.get(t).copied().ok_or(ModelError::MissingClass(*t)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            set,
            model,
            class_index,
        })
    }
}

impl TraitScorer for ClassifierScorer {
    fn trait_set(&self) -> TraitSet {
        self.set
    }

    fn score(&self, text: &str) -> Result<TraitVector, ScoreError> {
        let proba = self.model.predict_proba(text);
        if proba.iter().any(|p| !p.is_finite()) {
            return Err(ScoreError::Classifier("non-finite class probability".to_string()));
        }
        let ordered: Vec<f64> = self.class_index.iter().map(|i| proba[*i]).collect();
        Ok(TraitVector::from_probabilities(self.set, &ordered)?)
    }

    fn is_predictive(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "classifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn archetype_model() -> LinearTextModel {
        LinearTextModel {
            // model order differs from declared order on purpose
            classes: vec![
                "Thinker".to_string(),
                "Extrovert".to_string(),
                "Introvert".to_string(),
                "Leader".to_string(),
            ],
            vocabulary: IndexMap::from([
                ("team".to_string(), 0),
                ("alone".to_string(), 1),
                ("lead".to_string(), 2),
                ("analyze".to_string(), 3),
            ]),
            idf: vec![1.0, 1.0, 1.0, 1.0],
            coef: vec![
                vec![0.0, 0.0, 0.0, 4.0],
                vec![4.0, -1.0, 0.5, 0.0],
                vec![-1.0, 4.0, 0.0, 0.0],
                vec![0.5, 0.0, 4.0, 0.0],
            ],
            intercept: vec![0.0, 0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn test_unknown_words_give_uniform() {
        let scorer = ClassifierScorer::from_model(archetype_model(), TraitSet::Archetype).unwrap();
        let v = scorer.score("zzz qqq").unwrap();
        for (_, s) in v.iter() {
            assert!((s - 25.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_scores_follow_declared_order() {
        let scorer = ClassifierScorer::from_model(archetype_model(), TraitSet::Archetype).unwrap();
        let v = scorer.score("I love my team, the TEAM is everything").unwrap();
        assert_eq!(v.dominant().0, Trait::Extrovert);
        let total: f64 = v.iter().map(|(_, s)| s).sum();
        assert!((total - 100.0).abs() < 1e-6);

        let v = scorer.score("I like to analyze").unwrap();
        assert_eq!(v.dominant().0, Trait::Thinker);
        assert!(scorer.is_predictive());
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let mut model = archetype_model();
        model.idf.pop();
        assert!(matches!(
            ClassifierScorer::from_model(model, TraitSet::Archetype),
            Err(ModelError::Shape(_))
        ));

        let mut model = archetype_model();
        model.coef[2].push(1.0);
        assert!(matches!(
            ClassifierScorer::from_model(model, TraitSet::Archetype),
            Err(ModelError::Shape(_))
        ));
    }

    #[test]
    fn test_rejects_classes_of_other_set() {
        assert!(matches!(
            ClassifierScorer::from_model(archetype_model(), TraitSet::BigFive),
            Err(ModelError::UnknownClass { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_and_missing_class() {
        let mut model = archetype_model();
        model.classes[0] = "Leader".to_string();
        assert!(matches!(
            ClassifierScorer::from_model(model, TraitSet::Archetype),
            Err(ModelError::UnknownClass { .. })
        ));

        let mut model = archetype_model();
        model.classes.pop();
        model.coef.pop();
        model.intercept.pop();
        assert!(matches!(
            ClassifierScorer::from_model(model, TraitSet::Archetype),
            Err(ModelError::MissingClass(Trait::Leader))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&archetype_model()).unwrap().as_bytes())
            .unwrap();
        let scorer = ClassifierScorer::load(file.path(), TraitSet::Archetype).unwrap();
        assert_eq!(scorer.trait_set(), TraitSet::Archetype);

        let mut bad = NamedTempFile::new().unwrap();
        bad.write_all(b"{not json").unwrap();
        assert!(matches!(
            ClassifierScorer::load(bad.path(), TraitSet::Archetype),
            Err(ModelError::Parse { .. })
        ));
        assert!(matches!(
            ClassifierScorer::load(Path::new("/nonexistent/model.json"), TraitSet::Archetype),
            Err(ModelError::Read { .. })
        ));
    }
}

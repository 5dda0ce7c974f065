//! The analysis pipeline
//!
//! validate -> score -> {profile, explanations, MBTI, roles} -> report + history
//!
//! Validation failures stop the run before the scorer is called and before
//! anything touches the filesystem. Scorer failures degrade to uniform scores
//! and are reported on the result. Persistence failures abort the run.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::{ExplainError, HistoryError, ReportError, RoleError, ValidationError};
use crate::explain::{ExplanationTable, Language};
use crate::history::{HistoryRecord, HistoryStore};
use crate::mbti::MbtiResult;
use crate::profile::TraitProfile;
use crate::report::{ReportArtifact, ReportInput, ReportRenderer};
use crate::roles::RoleRules;
use crate::scorer::TraitScorer;
use crate::traits::{Trait, TraitSet, TraitVector};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Explain(#[from] ExplainError),

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error("failed to write report: {0}")]
    Report(#[from] ReportError),

    #[error("failed to record history: {0}")]
    History(#[from] HistoryError),
}

pub struct AnalysisRequest<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub language: Language,
    pub chart_image: Option<&'a Path>,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub name: String,
    pub text: String,
    pub trait_set: TraitSet,
    pub scores: TraitVector,
    /// Scores came from a non-predictive placeholder scorer
    pub demonstration: bool,
    /// Why scoring fell back to uniform scores, if it did
    pub degraded: Option<String>,
    pub dominant: Trait,
    pub dominant_score: f64,
    pub profile: TraitProfile,
    pub explanations: Vec<String>,
    pub roles: Vec<String>,
    pub mbti: Option<MbtiResult>,
    pub report: Option<ReportArtifact>,
    pub history: Option<PathBuf>,
    pub created_at: DateTime<Local>,
}

/// Reject a request before any work is done
pub fn validate(name: &str, text: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if text.trim().is_empty() {
        return Err(ValidationError::BlankText);
    }
    Ok(())
}

pub struct Analyzer {
    scorer: Box<dyn TraitScorer>,
    explanations: ExplanationTable,
    roles: RoleRules,
    renderer: Option<ReportRenderer>,
    history: Option<HistoryStore>,
    precision: usize,
}

impl Analyzer {
    /// Build an analyzer; fails if the lookup tables do not cover the scorer's traits
    pub fn new(scorer: Box<dyn TraitScorer>, precision: usize) -> Result<Self, AnalysisError> {
        let set = scorer.trait_set();
        let explanations = ExplanationTable::standard();
        explanations.validate(set)?;
        let roles = RoleRules::standard();
        roles.validate(set)?;

        log::debug!("Analyzer ready: scorer={} set={}", scorer.name(), set);
        Ok(Self {
            scorer,
            explanations,
            roles,
            renderer: None,
            history: None,
            precision,
        })
    }

    pub fn with_report(mut self, renderer: ReportRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_history(mut self, store: HistoryStore) -> Self {
        self.history = Some(store);
        self
    }

    pub fn run(&self, request: &AnalysisRequest) -> Result<Analysis, AnalysisError> {
        validate(request.name, request.text)?;
        let name = request.name.trim();
        let text = request.text.trim();

        // fail before the report is written if the history cannot take the row
        if let Some(store) = &self.history {
            store.verify()?;
        }

        let set = self.scorer.trait_set();
        let (scores, degraded) = match self.scorer.score(text) {
            Ok(scores) => (scores, None),
            Err(e) => {
                log::warn!("Scorer '{}' failed, using uniform scores: {}", self.scorer.name(), e);
                (TraitVector::uniform(set), Some(e.to_string()))
            }
        };

        let explanations = self.explanations.generate(&scores, request.language, self.precision)?;
        let recommendation = self.roles.recommend(&scores)?;
        let profile = TraitProfile::of(recommendation.dominant);
        let mbti = MbtiResult::from_vector(&scores);

        let mut analysis = Analysis {
            name: name.to_string(),
            text: text.to_string(),
            trait_set: set,
            scores,
            demonstration: !self.scorer.is_predictive(),
            degraded,
            dominant: recommendation.dominant,
            dominant_score: recommendation.score,
            profile,
            explanations,
            roles: recommendation.roles,
            mbti,
            report: None,
            history: None,
            created_at: request.created_at,
        };

        if let Some(renderer) = &self.renderer {
            let artifact = renderer.render(&ReportInput {
                name: &analysis.name,
                text: &analysis.text,
                scores: &analysis.scores,
                dominant: analysis.dominant,
                profile: &analysis.profile,
                explanations: &analysis.explanations,
                roles: &analysis.roles,
                mbti: analysis.mbti.as_ref(),
                demonstration: analysis.demonstration,
                degraded: analysis.degraded.as_deref(),
                chart_image: request.chart_image,
                created_at: analysis.created_at,
            })?;
            analysis.report = Some(artifact);
        }

        if let Some(store) = &self.history {
            let record = HistoryRecord::new(
                &analysis.name,
                &analysis.text,
                analysis.scores.clone(),
                analysis.created_at.naive_local(),
            );
            store.append(&record)?;
            analysis.history = Some(store.path().to_path_buf());
        }

        log::info!(
            "Analysis for '{}': top trait {} ({:.2}), mbti {}",
            analysis.name,
            analysis.dominant,
            analysis.dominant_score,
            analysis.mbti.as_ref().map(|m| m.code.to_string()).unwrap_or_else(|| "-".to_string())
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoreError;
    use crate::scorer::FixedScorer;
    use std::cell::Cell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct CountingScorer {
        calls: Rc<Cell<usize>>,
    }

    impl TraitScorer for CountingScorer {
        fn trait_set(&self) -> TraitSet {
            TraitSet::BigFive
        }
        fn score(&self, _text: &str) -> Result<TraitVector, ScoreError> {
            self.calls.set(self.calls.get() + 1);
            Ok(TraitVector::from_scores(TraitSet::BigFive, &[70.0, 65.0, 55.0, 80.0, 35.0])?)
        }
        fn is_predictive(&self) -> bool {
            true
        }
        fn name(&self) -> &'static str {
            "counting"
        }
    }

    struct FailingScorer;

    impl TraitScorer for FailingScorer {
        fn trait_set(&self) -> TraitSet {
            TraitSet::Archetype
        }
        fn score(&self, _text: &str) -> Result<TraitVector, ScoreError> {
            Err(ScoreError::Classifier("model offline".to_string()))
        }
        fn is_predictive(&self) -> bool {
            true
        }
        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn request<'a>(name: &'a str, text: &'a str) -> AnalysisRequest<'a> {
        AnalysisRequest {
            name,
            text,
            language: Language::English,
            chart_image: None,
            created_at: Local::now(),
        }
    }

    #[test]
    fn test_validate() {
        assert_eq!(validate("", "text"), Err(ValidationError::MissingName));
        assert_eq!(validate("  ", "text"), Err(ValidationError::MissingName));
        assert_eq!(validate("Asha", " \n\t "), Err(ValidationError::BlankText));
        assert!(validate("Asha", "hello").is_ok());
    }

    #[test]
    fn test_blank_input_never_reaches_scorer_or_disk() {
        let dir = TempDir::new().unwrap();
        let calls = Rc::new(Cell::new(0));
        let analyzer = Analyzer::new(Box::new(CountingScorer { calls: calls.clone() }), 2)
            .unwrap()
            .with_report(ReportRenderer::new(dir.path().join("reports")))
            .with_history(HistoryStore::new(dir.path().join("history.csv"), TraitSet::BigFive));

        let err = analyzer.run(&request("Asha", "   ")).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(ValidationError::BlankText)));
        let err = analyzer.run(&request("", "hello")).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(ValidationError::MissingName)));

        assert_eq!(calls.get(), 0);
        assert!(!dir.path().join("reports").exists());
        assert!(!dir.path().join("history.csv").exists());
    }

    #[test]
    fn test_end_to_end_reference_scenario() {
        let dir = TempDir::new().unwrap();
        let history_path = dir.path().join("history.csv");
        let analyzer = Analyzer::new(Box::new(FixedScorer::new(TraitSet::BigFive)), 2)
            .unwrap()
            .with_report(ReportRenderer::new(dir.path().join("reports")))
            .with_history(HistoryStore::new(history_path.clone(), TraitSet::BigFive));

        let analysis = analyzer
            .run(&request("Asha", "I love working with teams and leading projects."))
            .unwrap();

        assert_eq!(analysis.mbti.as_ref().unwrap().code.to_string(), "ENFJ");
        assert_eq!(analysis.dominant, Trait::Agreeableness);
        assert_eq!(analysis.roles, vec!["Teacher", "Psychologist", "Nurse", "Social Worker"]);
        assert_eq!(analysis.explanations.len(), 5);
        assert!(analysis.demonstration);
        assert!(analysis.degraded.is_none());

        let report = analysis.report.unwrap();
        assert!(report.path.exists());
        assert!(report.path.to_string_lossy().ends_with(".pdf"));

        let store = HistoryStore::new(history_path.clone(), TraitSet::BigFive);
        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Asha");
        assert_eq!(records[0].top_trait, Trait::Agreeableness);
        assert_eq!(fs::read_to_string(&history_path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_scorer_failure_degrades_observably() {
        let analyzer = Analyzer::new(Box::new(FailingScorer), 1).unwrap();
        let analysis = analyzer.run(&request("Asha", "hello there")).unwrap();

        assert_eq!(analysis.degraded.as_deref(), Some("classifier failed: model offline"));
        assert_eq!(analysis.scores, TraitVector::uniform(TraitSet::Archetype));
        assert_eq!(analysis.dominant, Trait::Extrovert);
        assert!(analysis.mbti.is_none());
        assert!(!analysis.demonstration);
    }

    #[test]
    fn test_history_failure_is_surfaced() {
        let dir = TempDir::new().unwrap();
        let history_path = dir.path().join("history.csv");
        fs::write(&history_path, "Some,Other,Header\n").unwrap();

        let analyzer = Analyzer::new(Box::new(FixedScorer::new(TraitSet::BigFive)), 2)
            .unwrap()
            .with_history(HistoryStore::new(history_path, TraitSet::BigFive));
        let err = analyzer.run(&request("Asha", "text")).unwrap_err();
        assert!(matches!(err, AnalysisError::History(HistoryError::HeaderMismatch { .. })));
    }

    #[test]
    fn test_mismatched_history_set_writes_no_report() {
        let dir = TempDir::new().unwrap();
        let reports = dir.path().join("reports");
        let history_path = dir.path().join("history.csv");

        let big_five = Analyzer::new(Box::new(FixedScorer::new(TraitSet::BigFive)), 2)
            .unwrap()
            .with_report(ReportRenderer::new(reports.clone()))
            .with_history(HistoryStore::new(history_path.clone(), TraitSet::BigFive));
        big_five.run(&request("Asha", "first run")).unwrap();

        let archetype = Analyzer::new(Box::new(FixedScorer::new(TraitSet::Archetype)), 2)
            .unwrap()
            .with_report(ReportRenderer::new(reports.clone()))
            .with_history(HistoryStore::new(history_path.clone(), TraitSet::Archetype));
        let err = archetype.run(&request("Ravi", "second run")).unwrap_err();

        assert!(matches!(err, AnalysisError::History(HistoryError::HeaderMismatch { .. })));
        assert_eq!(fs::read_dir(&reports).unwrap().count(), 1);
        assert_eq!(fs::read_to_string(&history_path).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_input_is_trimmed() {
        let analyzer = Analyzer::new(Box::new(FixedScorer::new(TraitSet::Archetype)), 0).unwrap();
        let analysis = analyzer.run(&request("  Ravi ", "  quiet reader \n")).unwrap();
        assert_eq!(analysis.name, "Ravi");
        assert_eq!(analysis.text, "quiet reader");
        assert_eq!(analysis.dominant, Trait::Extrovert);
        assert_eq!(analysis.roles, vec!["Public Speaker", "Sales Manager", "Team Lead"]);
    }
}

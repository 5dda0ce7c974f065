//! Trait scorers
//!
//! A scorer turns validated input text into a [`TraitVector`]. Scorers are
//! constructed once at startup and passed into the analysis pipeline.

mod classifier;
mod fixed;

pub use classifier::ClassifierScorer;
pub use fixed::FixedScorer;

use crate::error::ScoreError;
use crate::traits::{TraitSet, TraitVector};

pub trait TraitScorer {
    /// The trait set every returned vector belongs to
    fn trait_set(&self) -> TraitSet;

    /// Score non-blank text
    fn score(&self, text: &str) -> Result<TraitVector, ScoreError>;

    /// False for placeholder scorers whose output ignores the input
    fn is_predictive(&self) -> bool;

    fn name(&self) -> &'static str;
}

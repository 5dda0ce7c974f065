//! Error types for the analysis pipeline.
//!
//! Each concern gets its own enum so callers can tell a rejected input apart
//! from a degraded external call or a failed write. Command handlers wrap these
//! in `eyre::Report` with context.

use std::path::PathBuf;

use thiserror::Error;

use crate::traits::{Trait, TraitSet};

/// Input rejected before any computation ran
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,

    #[error("description is empty")]
    BlankText,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraitError {
    #[error("unknown trait: {0}")]
    UnknownTrait(String),

    #[error("trait {trait_name} does not belong to the {set} set")]
    WrongSet { trait_name: Trait, set: TraitSet },

    #[error("expected {expected} scores for the {set} set, got {actual}")]
    WrongLength { set: TraitSet, expected: usize, actual: usize },

    #[error("scores must follow declared order: expected {expected} at position {index}, got {actual}")]
    OutOfOrder { index: usize, expected: Trait, actual: Trait },

    #[error("score for {trait_name} out of range [0, 100]: {score}")]
    OutOfRange { trait_name: Trait, score: f64 },

    #[error("probability for {trait_name} out of range [0, 1]: {probability}")]
    BadProbability { trait_name: Trait, probability: f64 },
}

/// The external scorer could not produce a result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("classifier produced an invalid vector: {0}")]
    InvalidOutput(#[from] TraitError),

    #[error("classifier failed: {0}")]
    Classifier(String),
}

/// Model artifact could not be loaded
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read model {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model shape mismatch: {0}")]
    Shape(String),

    #[error("model class {class} is not a {set} trait")]
    UnknownClass { class: String, set: TraitSet },

    #[error("model is missing class for {0}")]
    MissingClass(Trait),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplainError {
    #[error("no explanation template for {trait_name} in {language}")]
    MissingTemplate { trait_name: Trait, language: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    #[error("no role rule for {0}")]
    MissingRule(Trait),
}

/// Writing the report artifact failed
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to create report directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create report file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not allocate a unique report filename in {0}")]
    NoFreeName(PathBuf),

    #[error("failed to render PDF: {0}")]
    Pdf(String),

    #[error("failed to embed image {path}: {reason}")]
    Image { path: PathBuf, reason: String },

    #[error("failed to encode QR code: {0}")]
    Qr(String),

    #[error("I/O error while writing report: {0}")]
    Io(#[from] std::io::Error),
}

/// Reading or appending to the history store failed
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("history I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("history CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("history header mismatch in {path}: expected [{expected}], found [{found}]")]
    HeaderMismatch { path: PathBuf, expected: String, found: String },

    #[error("malformed history row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("failed to replace history file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! History storage and retrieval
//!
//! One CSV row per analysis run, appended in chronological order.
//! Columns: `Name, Text, Top Trait, Date, <one column per trait>`.
//!
//! Appends never modify the live file in place. The current contents plus the
//! new row are written to a temp file in the same directory, synced, and
//! renamed over the original.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::HistoryError;
use crate::traits::{Trait, TraitSet, TraitVector};

pub const DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

const FIXED_COLUMNS: [&str; 4] = ["Name", "Text", "Top Trait", "Date"];

/// A history row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub name: String,
    pub text: String,
    pub top_trait: Trait,
    pub date: NaiveDateTime,
    pub scores: TraitVector,
}

impl HistoryRecord {
    pub fn new(name: &str, text: &str, scores: TraitVector, date: NaiveDateTime) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
            top_trait: scores.dominant().0,
            date,
            scores,
        }
    }

    fn to_row(&self, precision: usize) -> Vec<String> {
        let mut row = vec![
            self.name.clone(),
            self.text.clone(),
            self.top_trait.name().to_string(),
            self.date.format(DATE_FORMAT).to_string(),
        ];
        row.extend(self.scores.iter().map(|(_, s)| format!("{:.*}", precision, s)));
        row
    }
}

/// History storage
pub struct HistoryStore {
    path: PathBuf,
    set: TraitSet,
    precision: usize,
}

impl HistoryStore {
    /// Create a new history store for one trait set
    pub fn new(path: PathBuf, set: TraitSet) -> Self {
        Self {
            path,
            set,
            precision: 2,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn header(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.set.traits().iter().map(|t| t.name().to_string()))
            .collect()
    }

    fn io_err(&self, source: io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn check_header(&self, found: &csv::StringRecord) -> Result<(), HistoryError> {
        let expected = self.header();
        if found.iter().ne(expected.iter().map(String::as_str)) {
            return Err(HistoryError::HeaderMismatch {
                path: self.path.clone(),
                expected: expected.join(", "),
                found: found.iter().collect::<Vec<_>>().join(", "),
            });
        }
        Ok(())
    }

    /// Check that an existing store holds this store's trait set
    pub fn verify(&self) -> Result<(), HistoryError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        self.check_header(reader.headers()?)
    }

    /// Append one record, creating the store with a header if needed
    pub fn append(&self, record: &HistoryRecord) -> Result<(), HistoryError> {
        if record.scores.set() != self.set {
            return Err(HistoryError::MalformedRow {
                row: 0,
                reason: format!("record scores are {} but the store holds {}", record.scores.set(), self.set),
            });
        }

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.io_err(e))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| self.io_err(e))?;
        let exists = self.path.exists();

        if exists {
            let mut reader = csv::Reader::from_path(&self.path)?;
            self.check_header(reader.headers()?)?;

            let mut existing = Vec::new();
            File::open(&self.path)
                .and_then(|mut f| f.read_to_end(&mut existing))
                .map_err(|e| self.io_err(e))?;
            temp.write_all(&existing).map_err(|e| self.io_err(e))?;
            if !existing.is_empty() && !existing.ends_with(b"\n") {
                temp.write_all(b"\n").map_err(|e| self.io_err(e))?;
            }
        }

        {
            let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(temp.as_file_mut());
            if !exists {
                writer.write_record(self.header())?;
            }
            writer.write_record(record.to_row(self.precision))?;
            writer.flush().map_err(|e| self.io_err(e))?;
        }
        temp.as_file().sync_all().map_err(|e| self.io_err(e))?;

        temp.persist(&self.path).map_err(|e| HistoryError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;

        log::info!("Appended history record for '{}' to {}", record.name, self.path.display());
        Ok(())
    }

    /// All records, most recent first
    pub fn load(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        self.check_header(reader.headers()?)?;

        let mut records = Vec::new();
        for (i, row) in reader.records().enumerate() {
            let row = row?;
            records.push(self.parse_row(i + 1, &row)?);
        }
        records.reverse();
        Ok(records)
    }

    /// At most `limit` records, most recent first
    pub fn load_limited(&self, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError> {
        let mut records = self.load()?;
        records.truncate(limit);
        Ok(records)
    }

    fn parse_row(&self, row_no: usize, row: &csv::StringRecord) -> Result<HistoryRecord, HistoryError> {
        let malformed = |reason: String| HistoryError::MalformedRow { row: row_no, reason };
        let field = |i: usize| row.get(i).ok_or_else(|| malformed(format!("missing column {}", i + 1)));

        let name = field(0)?.to_string();
        let text = field(1)?.to_string();
        let top_trait: Trait = field(2)?.parse().map_err(|e| malformed(format!("{}", e)))?;
        let date = NaiveDateTime::parse_from_str(field(3)?, DATE_FORMAT)
            .map_err(|e| malformed(format!("bad date '{}': {}", field(3).unwrap_or_default(), e)))?;

        let mut values = Vec::with_capacity(self.set.len());
        for i in 0..self.set.len() {
            let raw = field(FIXED_COLUMNS.len() + i)?;
            let value: f64 = raw
                .trim()
                .parse()
                .map_err(|_| malformed(format!("bad score '{}'", raw)))?;
            values.push(value);
        }
        let scores = TraitVector::from_scores(self.set, &values).map_err(|e| malformed(e.to_string()))?;

        Ok(HistoryRecord {
            name,
            text,
            top_trait,
            date,
            scores,
        })
    }
}

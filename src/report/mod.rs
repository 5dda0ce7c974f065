//! PDF report rendering
//!
//! Reports are written as `report_<name>_<YYYYmmddHHMMSS>.pdf`. A counter
//! suffix is added when that file already exists, and files are opened with
//! `create_new` so an existing report is never overwritten.

mod layout;
mod qr;

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::chart::RadarChart;
use crate::error::ReportError;
use crate::explain::format_score;
use crate::mbti::MbtiResult;
use crate::profile::TraitProfile;
use crate::sanitize::{to_report_line, to_report_text};
use crate::traits::{Trait, TraitVector};
use layout::{PageWriter, Style};

pub const EXTENSION: &str = "pdf";

/// Highest counter tried before giving up on a unique filename
const MAX_SUFFIX: u32 = 999;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 11.0;
const SMALL_SIZE: f32 = 9.0;
const CHART_SIZE_MM: f32 = 90.0;
const CHART_IMAGE_WIDTH_MM: f32 = 120.0;
const QR_WIDTH_MM: f32 = 35.0;

/// Everything one report shows
pub struct ReportInput<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub scores: &'a TraitVector,
    pub dominant: Trait,
    pub profile: &'a TraitProfile,
    pub explanations: &'a [String],
    pub roles: &'a [String],
    pub mbti: Option<&'a MbtiResult>,
    /// Scores came from a non-predictive placeholder
    pub demonstration: bool,
    /// Scores are a fallback because the scorer failed
    pub degraded: Option<&'a str>,
    pub chart_image: Option<&'a Path>,
    pub created_at: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub pages: usize,
}

pub struct ReportRenderer {
    dir: PathBuf,
    title: String,
    footer: Option<String>,
    precision: usize,
    qr_payload: Option<String>,
    draw_chart: bool,
}

impl ReportRenderer {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            title: "Personality Mix Analyzer Report".to_string(),
            footer: None,
            precision: 2,
            qr_payload: None,
            draw_chart: true,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_footer(mut self, footer: Option<String>) -> Self {
        self.footer = footer;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_qr_payload(mut self, payload: Option<String>) -> Self {
        self.qr_payload = payload.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_chart(mut self, draw_chart: bool) -> Self {
        self.draw_chart = draw_chart;
        self
    }

    /// Render and write the report, returning where it landed
    pub fn render(&self, input: &ReportInput) -> Result<ReportArtifact, ReportError> {
        fs::create_dir_all(&self.dir).map_err(|source| ReportError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let (path, file) = allocate(&self.dir, input.name, &input.created_at)?;
        match self.write(input, file) {
            Ok(pages) => {
                log::info!("Wrote {}-page report to {}", pages, path.display());
                Ok(ReportArtifact { path, pages })
            }
            Err(e) => {
                // do not leave a truncated report behind
                if let Err(rm) = fs::remove_file(&path) {
                    log::warn!("Failed to remove partial report {}: {}", path.display(), rm);
                }
                Err(e)
            }
        }
    }

    fn write(&self, input: &ReportInput, file: File) -> Result<usize, ReportError> {
        let mut page = PageWriter::new(&to_report_line(&self.title))?;

        page.centered(&to_report_line(&self.title), TITLE_SIZE, Style::Bold);
        page.gap(6.0);
        page.line(&format!("Name: {}", to_report_line(input.name)), BODY_SIZE, Style::Regular);
        page.line(
            &format!("Date: {}", input.created_at.format("%d-%m-%Y %H:%M")),
            BODY_SIZE,
            Style::Regular,
        );
        if input.demonstration {
            page.line(
                "Note: demonstration scores, not predicted from the input.",
                SMALL_SIZE,
                Style::Italic,
            );
        }
        if let Some(reason) = input.degraded {
            page.paragraph(
                &format!("Note: scoring failed ({}); equal default scores shown.", to_report_line(reason)),
                SMALL_SIZE,
                Style::Italic,
            );
        }
        page.gap(4.0);

        page.line("Input Summary:", HEADING_SIZE, Style::Bold);
        page.paragraph(&to_report_text(input.text), BODY_SIZE, Style::Regular);
        page.gap(4.0);

        page.line(&format!("Top Trait: {}", input.dominant.name()), HEADING_SIZE, Style::Bold);
        page.paragraph(
            &format!("Explanation: {}", to_report_line(input.profile.description)),
            BODY_SIZE,
            Style::Regular,
        );
        page.paragraph(&format!("Tip: {}", to_report_line(input.profile.tip)), BODY_SIZE, Style::Regular);
        page.paragraph(
            &format!("Quote: \"{}\"", to_report_line(input.profile.quote)),
            BODY_SIZE,
            Style::Italic,
        );
        page.paragraph(
            &format!("Recommended Roles: {}", to_report_line(&input.roles.join(", "))),
            BODY_SIZE,
            Style::Regular,
        );
        page.gap(4.0);

        if let Some(mbti) = input.mbti {
            page.line(&format!("MBTI Type: {}", mbti.code), HEADING_SIZE, Style::Bold);
            page.line(
                &format!("Share of population: {}", mbti.population_label()),
                BODY_SIZE,
                Style::Regular,
            );
            page.line(
                &format!("Famous example: {}", to_report_line(mbti.exemplar_label())),
                BODY_SIZE,
                Style::Regular,
            );
            page.gap(4.0);
        }

        page.line("Trait Explanations:", HEADING_SIZE, Style::Bold);
        for sentence in input.explanations {
            page.paragraph(&format!("- {}", to_report_line(sentence)), BODY_SIZE, Style::Regular);
        }
        page.gap(4.0);

        page.line("Confidence Scores:", HEADING_SIZE, Style::Bold);
        for (t, score) in input.scores.iter() {
            page.line(
                &format!("{}: {}", t.name(), format_score(score, self.precision)),
                BODY_SIZE,
                Style::Regular,
            );
        }

        if self.draw_chart {
            page.gap(4.0);
            page.radar(&RadarChart::new(input.scores), CHART_SIZE_MM);
        }

        if let Some(chart_path) = input.chart_image {
            page.gap(4.0);
            let image = qr::load_rgb(chart_path)?;
            page.image(&image, CHART_IMAGE_WIDTH_MM);
        }

        if let Some(payload) = &self.qr_payload {
            let temp = qr::to_temp_png(payload)?;
            let image = qr::load_rgb(temp.path())?;
            page.gap(6.0);
            page.image(&image, QR_WIDTH_MM);
            temp.close()?;
        }

        if let Some(footer) = &self.footer {
            page.gap(8.0);
            page.centered(&to_report_line(footer), SMALL_SIZE, Style::Italic);
        }

        let pages = page.pages();
        page.finish(file)?;
        Ok(pages)
    }
}

/// Filesystem-safe form of a user name
pub fn slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .filter_map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    if slug.is_empty() { "anonymous".to_string() } else { slug }
}

/// Create a fresh report file, adding a counter suffix on collision
fn allocate(dir: &Path, name: &str, at: &DateTime<Local>) -> Result<(PathBuf, File), ReportError> {
    let stem = format!("report_{}_{}", slug(name), at.format("%Y%m%d%H%M%S"));

    for n in 1..=MAX_SUFFIX {
        let filename = if n == 1 {
            format!("{}.{}", stem, EXTENSION)
        } else {
            format!("{}-{}.{}", stem, n, EXTENSION)
        };
        let path = dir.join(filename);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::debug!("Report {} exists, trying next suffix", path.display());
                continue;
            }
            Err(source) => return Err(ReportError::CreateFile { path, source }),
        }
    }

    Err(ReportError::NoFreeName(dir.to_path_buf()))
}

// src/analysis/mod.rs
//! Parser for the free-text reports returned by the resume analysis service.
//!
//! Parsing never fails visibly: any fault while reading a report degrades
//! to `AnalysisResult::default()` (score 50, empty lists).

pub mod normalize;
pub mod score;
pub mod sections;

use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::{debug, warn};

pub use normalize::clean_list;
pub use score::{extract_score, ScoreSource, DEFAULT_SCORE, MAX_SCORE};
pub use sections::{segment, Section};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReportError {
    #[error("Invalid score value: {raw}")]
    InvalidScore { raw: String },

    #[error("Section bounds out of range for label {label}")]
    SectionBounds { label: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_skills: Vec<String>,
    pub optimization_steps: Vec<String>,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            score: DEFAULT_SCORE,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            missing_skills: Vec::new(),
            optimization_steps: Vec::new(),
        }
    }
}

impl AnalysisResult {
    /// Unfilled part of the score gauge
    pub fn remaining(&self) -> u8 {
        MAX_SCORE.saturating_sub(self.score)
    }

    pub fn has_findings(&self) -> bool {
        Section::ALL.iter().any(|&s| !self.items(s).is_empty())
    }

    pub fn items(&self, section: Section) -> &[String] {
        match section {
            Section::Strengths => &self.strengths,
            Section::Weaknesses => &self.weaknesses,
            Section::MissingSkills => &self.missing_skills,
            Section::OptimizationStrategy => &self.optimization_steps,
        }
    }
}

/// Stateless; one instance can serve any number of concurrent callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportParser;

impl ReportParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, report: &str) -> AnalysisResult {
        recover(|| self.try_parse(report))
    }

    /// Fallible core of `parse`. Errors here never reach callers of `parse`.
    pub fn try_parse(&self, report: &str) -> Result<AnalysisResult, ReportError> {
        let (score, source) = extract_score(report)?;
        debug!("Score {} taken from {:?}", score, source);

        let bodies = segment(report)?;
        let list = |section: Section| bodies.get(section).map(clean_list).unwrap_or_default();

        Ok(AnalysisResult {
            score,
            strengths: list(Section::Strengths),
            weaknesses: list(Section::Weaknesses),
            missing_skills: list(Section::MissingSkills),
            optimization_steps: list(Section::OptimizationStrategy),
        })
    }
}

/// Parse a report with the default parser.
pub fn parse_report(report: &str) -> AnalysisResult {
    ReportParser::new().parse(report)
}

/// Run a parse step, turning an error or a panic into the default result.
pub fn recover<F>(f: F) -> AnalysisResult
where
    F: FnOnce() -> Result<AnalysisResult, ReportError>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            warn!("Report parsing failed, using default result: {}", e);
            AnalysisResult::default()
        }
        Err(_) => {
            warn!("Report parsing panicked, using default result");
            AnalysisResult::default()
        }
    }
}

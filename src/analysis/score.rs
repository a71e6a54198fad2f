// src/analysis/score.rs
//! Score extraction: an ordered rule table, first match wins

use once_cell::sync::Lazy;
use regex::Regex;
use std::num::IntErrorKind;

use super::ReportError;

pub const DEFAULT_SCORE: u8 = 50;
pub const MAX_SCORE: u8 = 100;

/// A labeled score pattern. The first capture group holds the number.
pub struct ScoreRule {
    pub name: &'static str,
    pattern: Regex,
}

impl ScoreRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    /// Raw captured number, if the rule matches anywhere in the text
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Labeled rules in priority order.
pub static SCORE_RULES: Lazy<Vec<ScoreRule>> = Lazy::new(|| {
    vec![
        ScoreRule::new("combat_rating_ranged", r"Combat Rating \(0-100\):\s*(-?\d+)"),
        ScoreRule::new("combat_rating", r"Combat Rating:\s*(-?\d+)"),
        ScoreRule::new("score", r"Score:\s*(-?\d+)"),
        ScoreRule::new("ats_score", r"ATS Score:\s*(-?\d+)"),
    ]
});

// A '-' only counts as a sign when it does not join the number to a word,
// so "Top-10" reads 10 while " -5" reads -5.
static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\w-])(-?\d+)|(\d+)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    Rule(&'static str),
    FirstNumber,
    Default,
}

/// Walk the rule table, then the bare-number fallback, then the default.
pub fn extract_score(text: &str) -> Result<(u8, ScoreSource), ReportError> {
    for rule in SCORE_RULES.iter() {
        if let Some(raw) = rule.capture(text) {
            return Ok((parse_clamped(raw)?, ScoreSource::Rule(rule.name)));
        }
    }

    if let Some(raw) = first_number(text) {
        return Ok((parse_clamped(raw)?, ScoreSource::FirstNumber));
    }

    Ok((DEFAULT_SCORE, ScoreSource::Default))
}

fn first_number(text: &str) -> Option<&str> {
    FIRST_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
}

/// Parse a signed integer and clamp it into 0..=100. Overflow saturates.
pub fn parse_clamped(raw: &str) -> Result<u8, ReportError> {
    let value = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => {
                return Err(ReportError::InvalidScore {
                    raw: raw.to_string(),
                })
            }
        },
    };

    Ok(value.clamp(0, MAX_SCORE as i64) as u8)
}

//! Complexity heuristics
//!
//! Every factor adds a non-negative weight, so the score only grows as a
//! request gets longer, deeper or more loaded with markers.

use super::config::RouterConfig;
use super::types::RoutingContext;
use crate::error::{Error, Result};
use regex::Regex;

const LENGTH_BANDS: [(usize, i32); 3] = [(500, 3), (200, 2), (80, 1)];
const DEPTH_BANDS: [(usize, i32); 2] = [(10, 2), (4, 1)];

const NUMERIC_WEIGHT: i32 = 1;
const FINANCIAL_WEIGHT: i32 = 2;
const AMBIGUOUS_WEIGHT: i32 = 2;
const MULTI_QUESTION_WEIGHT: i32 = 1;
const TOOLS_WEIGHT: i32 = 2;
const TENANT_WEIGHT: i32 = 1;

/// Scores a message and its context
#[derive(Debug, Clone)]
pub struct ComplexityScorer {
    numeric: Regex,
    financial: Option<Regex>,
    ambiguous: Option<Regex>,
}

impl ComplexityScorer {
    /// Compile the scorer from the configured vocabularies
    pub fn new(config: &RouterConfig) -> Result<Self> {
        Ok(Self {
            numeric: compile(r"\d")?,
            financial: vocabulary(&config.financial_terms, Some(r"[$€£¥%]"))?,
            ambiguous: vocabulary(&config.ambiguous_phrases, None)?,
        })
    }

    /// Compute the complexity score
    #[must_use]
    pub fn score(&self, message: &str, context: &RoutingContext) -> i32 {
        let mut score = 0;

        let chars = message.chars().count();
        score += LENGTH_BANDS
            .iter()
            .find(|(min, _)| chars > *min)
            .map_or(0, |(_, weight)| *weight);

        if self.numeric.is_match(message) {
            score += NUMERIC_WEIGHT;
        }
        if self.financial.as_ref().is_some_and(|re| re.is_match(message)) {
            score += FINANCIAL_WEIGHT;
        }
        if self.ambiguous.as_ref().is_some_and(|re| re.is_match(message)) {
            score += AMBIGUOUS_WEIGHT;
        }
        if message.matches('?').count() > 1 {
            score += MULTI_QUESTION_WEIGHT;
        }

        score += DEPTH_BANDS
            .iter()
            .find(|(min, _)| context.conversation_length >= *min)
            .map_or(0, |(_, weight)| *weight);

        if context.has_tools {
            score += TOOLS_WEIGHT;
        }
        if context.has_tenant {
            score += TENANT_WEIGHT;
        }

        score
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::NotConfigured(format!("router pattern: {e}")))
}

/// Case-insensitive word-boundary alternation; `extra` is OR-ed in unbounded
fn vocabulary(words: &[String], extra: Option<&str>) -> Result<Option<Regex>> {
    let alternation = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|");

    let pattern = match (alternation.is_empty(), extra) {
        (true, None) => return Ok(None),
        (true, Some(extra)) => extra.to_string(),
        (false, None) => format!(r"(?i)\b(?:{alternation})\b"),
        (false, Some(extra)) => format!(r"(?i)\b(?:{alternation})\b|{extra}"),
    };
    compile(&pattern).map(Some)
}

//! Static rules - fixed answers for common questions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Normalize a query for matching and cache keys
///
/// Lowercases, strips punctuation and collapses runs of whitespace.
///
/// # Examples
/// ```
/// use parley_core::normalize_query;
/// assert_eq!(normalize_query("  What are your   HOURS?! "), "what are your hours");
/// ```
#[must_use]
pub fn normalize_query(query: &str) -> String {
    let stripped: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One configured rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRule {
    /// Query to match; normalized before use
    pub pattern: String,
    /// Answer returned verbatim
    pub response: String,
}

impl StaticRule {
    /// Create a rule
    #[must_use]
    pub fn new(pattern: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            response: response.into(),
        }
    }
}

/// Lookup table of normalized query → answer
#[derive(Debug, Clone, Default)]
pub struct StaticRules {
    rules: HashMap<String, String>,
}

impl StaticRules {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from configured rules; later rules win on collisions
    #[must_use]
    pub fn from_rules(rules: &[StaticRule]) -> Self {
        let mut table = Self::new();
        for rule in rules {
            table.insert(&rule.pattern, &rule.response);
        }
        table
    }

    /// Add or replace a rule
    pub fn insert(&mut self, pattern: &str, response: &str) {
        let key = normalize_query(pattern);
        if key.is_empty() {
            debug!(pattern = %pattern, "Ignoring static rule with empty pattern");
            return;
        }
        self.rules.insert(key, response.to_string());
    }

    /// Exact match after normalization
    #[must_use]
    pub fn lookup(&self, query: &str) -> Option<&str> {
        self.rules.get(&normalize_query(query)).map(String::as_str)
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

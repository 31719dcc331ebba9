//! Quote wire types
//!
//! Quotes serialize as `{"text": ..., "category": ...}`. Extra fields on
//! imported entries are carried along untouched.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Category filter value that disables filtering
pub const ALL_CATEGORIES: &str = "all";

/// Message shown when a category has no quotes
pub const NO_QUOTES_MESSAGE: &str = "No quotes available in this category.";

/// A (text, category) pair. No identity; matched by exact text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    /// Unknown fields from imported documents
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Quote {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Whether this quote passes the given category filter
    pub fn matches_category(&self, category: &str) -> bool {
        category == ALL_CATEGORIES || self.category == category
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" — {}", self.text, self.category)
    }
}

/// Accept any JSON value where a string is expected.
///
/// `null` reads as empty, scalars as their literal text, and arrays or
/// objects as compact JSON.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// A quote together with its position in the full collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedQuote {
    pub index: usize,
    #[serde(flatten)]
    pub quote: Quote,
}

/// Category options plus the active selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOptions {
    pub categories: Vec<String>,
    pub selected: String,
}

/// Collection used when nothing usable is persisted
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new("Life is a circle", "Philosophy"),
        Quote::new("Code is poetry", "Programming"),
        Quote::new("Persistence beats resistance", "Motivation"),
    ]
}

/// Distinct categories in first-seen order
pub fn distinct_categories(quotes: &[Quote]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for quote in quotes {
        if !categories.iter().any(|c| c == &quote.category) {
            categories.push(quote.category.clone());
        }
    }
    categories
}

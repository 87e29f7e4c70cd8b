//! Parsing and validation of provider output into category → search-term mappings.
//!
//! Provider text is untrusted: it must parse as a JSON object, and for the initial
//! mapping every category must be present with a non-blank string value.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use super::Category;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    #[error("response is not valid JSON: {0}")]
    NotJson(String),
    #[error("response JSON is not an object")]
    NotObject,
    #[error("missing categories: {}", join_labels(.0))]
    MissingCategories(Vec<Category>),
    #[error("value for {0} is not a non-empty string")]
    InvalidValue(Category),
}

fn join_labels(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strips Markdown code fences and surrounding prose, returning the outermost `{...}` span.
///
/// Returns the trimmed input unchanged when no braces are found, so the JSON parser reports
/// the real error.
pub fn extract_json_object(text: &str) -> &str {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn parse_object(text: &str) -> Result<Map<String, Value>, SpecError> {
    let value: Value = serde_json::from_str(extract_json_object(text))
        .map_err(|e| SpecError::NotJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(SpecError::NotObject),
    }
}

fn term_of(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Complete mapping of every [`Category`] to a search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    terms: BTreeMap<Category, String>,
}

impl ComponentSpec {
    /// Parses provider text. Unknown keys are ignored; all categories are required.
    pub fn parse(text: &str) -> Result<Self, SpecError> {
        let object = parse_object(text)?;
        let mut terms = BTreeMap::new();
        for (key, value) in &object {
            let Some(category) = Category::from_label(key) else {
                debug!(key = %key, "ignoring unknown category in component spec");
                continue;
            };
            let term = term_of(value).ok_or(SpecError::InvalidValue(category))?;
            terms.insert(category, term);
        }
        Self::from_terms(terms)
    }

    /// Builds a spec from already-typed terms; fails if any category is missing.
    pub fn from_terms(
        terms: impl IntoIterator<Item = (Category, String)>,
    ) -> Result<Self, SpecError> {
        let terms: BTreeMap<Category, String> = terms.into_iter().collect();
        let missing: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| !terms.contains_key(c))
            .collect();
        if !missing.is_empty() {
            return Err(SpecError::MissingCategories(missing));
        }
        Ok(Self { terms })
    }

    pub fn get(&self, category: Category) -> Option<&str> {
        self.terms.get(&category).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        self.terms.iter().map(|(c, t)| (*c, t.as_str()))
    }

    /// Entries in the shape the bundle resolver consumes.
    pub fn entries(&self) -> Vec<(Category, Option<String>)> {
        self.terms
            .iter()
            .map(|(c, t)| (*c, Some(t.clone())))
            .collect()
    }
}

/// Partial mapping returned by the adjustment round.
///
/// Only the categories the provider chose to revise are present; a non-string (or blank)
/// value is kept as `None` and resolves to an absent listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdjustedSpec {
    terms: BTreeMap<Category, Option<String>>,
}

impl AdjustedSpec {
    pub fn parse(text: &str) -> Result<Self, SpecError> {
        let object = parse_object(text)?;
        let mut terms = BTreeMap::new();
        for (key, value) in &object {
            match Category::from_label(key) {
                Some(category) => {
                    terms.insert(category, term_of(value));
                }
                None => debug!(key = %key, "ignoring unknown category in adjusted spec"),
            }
        }
        Ok(Self { terms })
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.terms.keys().copied()
    }

    pub fn get(&self, category: Category) -> Option<Option<&str>> {
        self.terms.get(&category).map(|t| t.as_deref())
    }

    pub fn entries(&self) -> Vec<(Category, Option<String>)> {
        self.terms.iter().map(|(c, t)| (*c, t.clone())).collect()
    }
}

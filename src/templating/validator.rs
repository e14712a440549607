//! Pre-flight check of a template against resolved data.
//!
//! [`extract_tokens`] collects every token the template surface references,
//! raw-markup regions included. [`missing_tokens`] diffs that set against the
//! merged map and suggests close matches for each gap, so a typo such as
//! `@nomeClinete` points at `@nomeCliente`.
//!
//! Both are read-only: neither the document nor the map is touched.

use serde::Serialize;
use std::collections::BTreeSet;
use strsim::levenshtein;

use super::grammar::find_tokens;
use crate::constants::MAX_TOKEN_SUGGESTIONS;
use crate::core::DocfillError;
use crate::document::TextSurfaceProvider;
use crate::facts::FactMap;

/// Maximum allowed Levenshtein distance as a percentage of the token length.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// A token the template uses but the data does not define.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingToken {
    /// The token, marker included
    pub token: String,
    /// Closest defined keys, best first
    pub suggestions: Vec<String>,
}

/// Result of a pre-flight validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingTokenReport {
    /// Missing tokens, sorted
    pub missing: Vec<MissingToken>,
}

impl MissingTokenReport {
    /// Whether every referenced token has a value.
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    /// Number of missing tokens.
    pub fn len(&self) -> usize {
        self.missing.len()
    }

    /// The missing tokens without suggestions.
    pub fn tokens(&self) -> Vec<String> {
        self.missing.iter().map(|m| m.token.clone()).collect()
    }

    /// Typed error describing the gaps, or `None` when there are none.
    pub fn to_error(&self) -> Option<DocfillError> {
        (!self.is_empty()).then(|| DocfillError::MissingToken {
            tokens: self.tokens(),
        })
    }
}

/// Every token referenced anywhere on the template surface.
pub fn extract_tokens(document: &dyn TextSurfaceProvider) -> BTreeSet<String> {
    document
        .regions()
        .iter()
        .flat_map(|region| region.segment_texts())
        .flat_map(|text| find_tokens(&text))
        .map(|m| m.token)
        .collect()
}

/// Referenced tokens with no key in `facts`.
///
/// # Examples
///
/// ```rust
/// use docfill::facts::FactMap;
/// use docfill::templating::validator::missing_tokens;
/// use std::collections::BTreeSet;
///
/// let mut facts = FactMap::new();
/// facts.insert("@nomeCliente".into(), "Ana".into());
///
/// let referenced: BTreeSet<String> =
///     ["@nomeCliente", "@nomeClinete", "@endereco"].iter().map(|s| s.to_string()).collect();
///
/// let report = missing_tokens(&referenced, &facts);
/// assert_eq!(report.tokens(), vec!["@endereco", "@nomeClinete"]);
/// assert_eq!(report.missing[1].suggestions, vec!["@nomeCliente"]);
/// ```
pub fn missing_tokens(referenced: &BTreeSet<String>, facts: &FactMap) -> MissingTokenReport {
    let available: Vec<&String> = facts.keys().collect();

    let missing = referenced
        .iter()
        .filter(|token| !facts.contains_key(*token))
        .map(|token| MissingToken {
            token: token.clone(),
            suggestions: similar_keys(token, &available),
        })
        .collect();

    MissingTokenReport { missing }
}

/// Find similar keys using Levenshtein distance
fn similar_keys(target: &str, available: &[&String]) -> Vec<String> {
    let mut scored: Vec<_> = available
        .iter()
        .map(|key| (key.as_str(), levenshtein(target, key)))
        .collect();

    // Closest first; ties alphabetical
    scored.sort_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)));

    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(MAX_TOKEN_SUGGESTIONS)
        .map(|(key, _)| key.to_string())
        .collect()
}

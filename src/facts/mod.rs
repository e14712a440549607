//! Fact maps: loading, hierarchical merging and system variables.
//!
//! A *fact map* is a flat `token -> value` mapping such as
//! `{"@nome": "Ana", "@valor": "1000"}`. Fact maps come from three places:
//!
//! - [`loader`] - a single data file in one of three formats (object notation,
//!   `key;value` lines, or `key: value` heading-style markdown)
//! - [`context`] - the *context chain*: one versioned fact file per folder from
//!   the clients root down to the folder holding the document data
//! - [`system`] - values computed at generation time (`@DataAtual`, ...)
//!
//! Layers are folded with [`merge_layers`]: later layers overwrite earlier
//! ones, so the document's own data always wins over inherited context.
//!
//! # Data formats
//!
//! ```text
//! proposta.json   {"@nome": "Ana", "@qtd": 3}
//! proposta.txt    @nome;Ana
//! proposta.md     @nome: Ana
//! ```

pub mod context;
pub mod loader;
pub mod system;

pub use context::{ContextResolver, FactFileVersion};
pub use loader::load_fact_map;
pub use system::system_variables;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::DocfillError;

/// A single fact value.
///
/// Text loaders always produce [`FactValue::Text`]. Object notation passes
/// numbers and booleans through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    /// Boolean from object notation
    Bool(bool),
    /// Number from object notation
    Number(serde_json::Number),
    /// Plain text
    Text(String),
}

impl FactValue {
    /// Borrow the value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Bool(b) => write!(f, "{b}"),
            FactValue::Number(n) => write!(f, "{n}"),
            FactValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Text(value)
    }
}

/// `token -> value` mapping. Keys are unique; the last insert wins.
///
/// Iteration is in key order, not insertion order. Nothing downstream relies on
/// the position of a fact: expression resolution defers a field until its
/// dependencies are resolved, and substitution goes longest key first.
pub type FactMap = BTreeMap<String, FactValue>;

/// Fold fact maps in order; later maps overwrite earlier ones key by key.
///
/// # Examples
///
/// ```rust
/// use docfill::facts::{FactMap, merge_layers};
///
/// let mut parent = FactMap::new();
/// parent.insert("@cidade".into(), "Goiânia".into());
/// parent.insert("@nome".into(), "Cliente".into());
///
/// let mut leaf = FactMap::new();
/// leaf.insert("@nome".into(), "Ana".into());
///
/// let merged = merge_layers([parent, leaf]);
/// assert_eq!(merged["@nome"].to_string(), "Ana");
/// assert_eq!(merged["@cidade"].to_string(), "Goiânia");
/// ```
pub fn merge_layers<I>(layers: I) -> FactMap
where
    I: IntoIterator<Item = FactMap>,
{
    let mut merged = FactMap::new();
    for layer in layers {
        merged.extend(layer);
    }
    merged
}

/// On-disk format of a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// Object notation (`.json`)
    Object,
    /// `key;value` lines (`.txt`)
    Delimited,
    /// `key: value` lines in markdown (`.md`)
    Heading,
}

impl DataFormat {
    /// Infer the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        ext.parse().ok()
    }
}

impl FromStr for DataFormat {
    type Err = DocfillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(DataFormat::Object),
            "txt" => Ok(DataFormat::Delimited),
            "md" => Ok(DataFormat::Heading),
            other => Err(DocfillError::DataSourceInvalid {
                path: String::new(),
                reason: format!("unknown data format '{other}'"),
            }),
        }
    }
}

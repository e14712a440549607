//! Key-value loader for a single data file.
//!
//! [`load_fact_map`] picks the parser from the file extension. A missing file
//! is not an error: it yields an empty map and a warning, so generation can
//! proceed with whatever the other layers supplied.
//!
//! | format     | rule                                                            |
//! |------------|-----------------------------------------------------------------|
//! | `.json`    | one object; scalars pass through, nested values are flattened   |
//! | `.txt`     | `key;value` split on the first `;`, lines without it ignored     |
//! | `.md`      | `key: value` split on the first `:`, other lines are prose       |

use std::path::Path;
use tracing::{debug, warn};

use super::{DataFormat, FactMap, FactValue};
use crate::constants::FIELD_DELIMITER;
use crate::core::DocfillError;
use crate::core::file_error::read_text;

/// Load a data file into a [`FactMap`].
///
/// # Errors
///
/// Returns [`DocfillError::DataSourceInvalid`] when the file exists but cannot
/// be read or parsed. A missing file or an unknown extension yields `Ok` with
/// an empty map.
///
/// # Examples
///
/// ```rust,no_run
/// use docfill::facts::load_fact_map;
/// use std::path::Path;
///
/// # fn example() -> Result<(), docfill::core::DocfillError> {
/// let facts = load_fact_map(Path::new("clientes/acme/proposta.md"))?;
/// if let Some(nome) = facts.get("@nome") {
///     println!("cliente: {nome}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn load_fact_map(path: &Path) -> Result<FactMap, DocfillError> {
    if !path.exists() {
        warn!("{}", DocfillError::DataSourceMissing {
            path: path.display().to_string(),
        });
        return Ok(FactMap::new());
    }

    let Some(format) = DataFormat::from_path(path) else {
        warn!("Ignoring data file with unknown extension: {}", path.display());
        return Ok(FactMap::new());
    };

    let content = read_text(path, "key/value data").map_err(|e| DocfillError::DataSourceInvalid {
        path: path.display().to_string(),
        reason: e.user_message(),
    })?;
    // Editors on Windows like to prepend a byte-order mark
    let content = content.trim_start_matches('\u{feff}');

    let facts = match format {
        DataFormat::Object => parse_object(content).map_err(|reason| {
            DocfillError::DataSourceInvalid {
                path: path.display().to_string(),
                reason,
            }
        })?,
        DataFormat::Delimited => parse_delimited(content),
        DataFormat::Heading => parse_heading(content),
    };

    debug!("Loaded {} keys from {}", facts.len(), path.display());
    Ok(facts)
}

/// Parse `key;value` lines. Only the first delimiter splits; there is no escaping.
pub fn parse_delimited(content: &str) -> FactMap {
    let mut facts = FactMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((key, value)) = line.split_once(FIELD_DELIMITER) {
            let key = key.trim();
            if !key.is_empty() {
                facts.insert(key.to_string(), FactValue::from(value.trim()));
            }
        }
    }
    facts
}

/// Parse heading-style markdown: `key: value` on the first colon, prose ignored.
pub fn parse_heading(content: &str) -> FactMap {
    let mut facts = FactMap::new();
    for line in content.lines() {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                facts.insert(key.to_string(), FactValue::from(value.trim()));
            }
        }
    }
    facts
}

/// Parse object notation. The top level must be an object.
///
/// Nested objects and arrays are flattened with `_` joins, so
/// `{"@cliente": {"nome": "Ana"}}` becomes `@cliente_nome` and
/// `{"@itens": ["a", "b"]}` becomes `@itens_0`, `@itens_1`. `null` becomes
/// an empty string.
pub fn parse_object(content: &str) -> Result<FactMap, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let serde_json::Value::Object(object) = value else {
        return Err("top-level value must be an object".to_string());
    };

    let mut facts = FactMap::new();
    for (key, value) in object {
        flatten_into(&mut facts, key, value);
    }
    Ok(facts)
}

fn flatten_into(facts: &mut FactMap, key: String, value: serde_json::Value) {
    use serde_json::Value;

    match value {
        Value::Null => {
            facts.insert(key, FactValue::Text(String::new()));
        }
        Value::Bool(b) => {
            facts.insert(key, FactValue::Bool(b));
        }
        Value::Number(n) => {
            facts.insert(key, FactValue::Number(n));
        }
        Value::String(s) => {
            facts.insert(key, FactValue::Text(s));
        }
        Value::Array(items) => {
            for (index, item) in items.into_iter().enumerate() {
                flatten_into(facts, format!("{key}_{index}"), item);
            }
        }
        Value::Object(children) => {
            for (child, item) in children {
                flatten_into(facts, format!("{key}_{child}"), item);
            }
        }
    }
}

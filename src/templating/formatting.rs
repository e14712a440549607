//! Key-name driven value formatting.
//!
//! Runs after computed fields are resolved. A key is classified by its name:
//!
//! - **currency**: name contains `valor`, `custo`, `total`, `preco`, `cub` or
//!   `exec` (case-insensitive) -> `R$ 1.234,56`
//! - **decimal**: name contains `area` or `aceqv` and the value is a nonzero
//!   number -> `1.234,56`
//!
//! Only values that actually parse as numbers are rewritten. `@LinkCUB`
//! holding a URL matches the currency hint but stays a URL.

use tracing::trace;

use super::number::{format_currency, format_decimal, parse_number};
use crate::constants::{CURRENCY_KEY_HINTS, DECIMAL_KEY_HINTS};
use crate::facts::{FactMap, FactValue};

/// How a key's value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    /// Money, rendered with the currency symbol
    Currency,
    /// Quantity such as an area, rendered with two decimals
    Decimal,
    /// Left as-is
    Plain,
}

/// Classify a key by its name.
pub fn classify(key: &str) -> ValueClass {
    let lower = key.to_lowercase();
    if CURRENCY_KEY_HINTS.iter().any(|hint| lower.contains(hint)) {
        ValueClass::Currency
    } else if DECIMAL_KEY_HINTS.iter().any(|hint| lower.contains(hint)) {
        ValueClass::Decimal
    } else {
        ValueClass::Plain
    }
}

fn numeric(value: &FactValue) -> Option<f64> {
    match value {
        FactValue::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        FactValue::Text(s) => parse_number(s),
        FactValue::Bool(_) => None,
    }
}

/// Format a single value for `key`, or `None` when it stays unchanged.
pub fn format_value(key: &str, value: &FactValue) -> Option<String> {
    match classify(key) {
        ValueClass::Currency => numeric(value).map(format_currency),
        ValueClass::Decimal => numeric(value).filter(|n| *n != 0.0).map(format_decimal),
        ValueClass::Plain => None,
    }
}

/// Rewrite the values of `facts` in place.
///
/// Applying it twice gives the same result as applying it once.
///
/// # Examples
///
/// ```rust
/// use docfill::facts::FactMap;
/// use docfill::templating::formatting::apply_formatting;
///
/// let mut facts = FactMap::new();
/// facts.insert("@valorTotal".into(), "3000.00".into());
/// facts.insert("@areaConstruida".into(), "1250.5".into());
/// facts.insert("@nome".into(), "Ana".into());
///
/// apply_formatting(&mut facts);
/// assert_eq!(facts["@valorTotal"].to_string(), "R$ 3.000,00");
/// assert_eq!(facts["@areaConstruida"].to_string(), "1.250,50");
/// assert_eq!(facts["@nome"].to_string(), "Ana");
/// ```
pub fn apply_formatting(facts: &mut FactMap) {
    for (key, value) in facts.iter_mut() {
        if let Some(formatted) = format_value(key, value) {
            trace!("Formatted {key}: {value} -> {formatted}");
            *value = FactValue::Text(formatted);
        }
    }
}

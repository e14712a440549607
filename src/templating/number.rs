//! Locale bridge between Brazilian-formatted numbers and `f64`.
//!
//! Input may use either convention:
//!
//! | input          | value     |
//! |----------------|-----------|
//! | `R$ 1.234,56`  | 1234.56   |
//! | `1.234,56`     | 1234.56   |
//! | `1.000.000`    | 1000000.0 |
//! | `5000.00`      | 5000.0    |
//!
//! A comma always marks the decimal part. Without a comma, several dots are
//! thousands separators and a single dot is a decimal point. Output always
//! uses dot thousands and comma decimals with two places.

use crate::constants::{CURRENCY_SYMBOL, DECIMAL_SEPARATOR, THOUSANDS_SEPARATOR};

fn normalize(value: &str) -> String {
    let clean = value.replace(CURRENCY_SYMBOL, "");
    let clean = clean.trim();

    if clean.contains(DECIMAL_SEPARATOR) {
        clean.replace(THOUSANDS_SEPARATOR, "").replace(DECIMAL_SEPARATOR, ".")
    } else if clean.matches(THOUSANDS_SEPARATOR).count() > 1 {
        clean.replace(THOUSANDS_SEPARATOR, "")
    } else {
        clean.to_string()
    }
}

/// Parse a number in either convention; `None` when it is not a finite number.
///
/// # Examples
///
/// ```rust
/// use docfill::templating::number::parse_number;
///
/// assert_eq!(parse_number("R$ 1.234,56"), Some(1234.56));
/// assert_eq!(parse_number("5000.00"), Some(5000.0));
/// assert_eq!(parse_number("https://example.com"), None);
/// ```
pub fn parse_number(value: &str) -> Option<f64> {
    normalize(value).parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Lenient variant of [`parse_number`]: anything unparsable is `0.0`.
pub fn parse_number_or_zero(value: &str) -> f64 {
    parse_number(value).unwrap_or(0.0)
}

/// `1234.5` -> `1.234,50`
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(digit);
    }

    // -0.001 rounds to zero and must not print a sign
    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };

    format!("{sign}{grouped}{DECIMAL_SEPARATOR}{frac_part}")
}

/// `1234.5` -> `R$ 1.234,50`
pub fn format_currency(value: f64) -> String {
    format!("{CURRENCY_SYMBOL} {}", format_decimal(value))
}

//! Computed fields.
//!
//! A value such as `[calculo: @valor * @qtd]` is replaced by the result of the
//! arithmetic expression, formatted with two decimals (`3000.00`). Keys in the
//! expression are replaced by their numeric values before evaluation.
//!
//! Resolution runs a bounded number of passes over the map. A field whose
//! dependencies are themselves still pending is deferred to the next pass, so
//! a chain of dependent fields resolves one level per pass. A dependency that
//! has already failed for any other reason (unsafe text, bad arithmetic) counts
//! as zero, like any other non-numeric value. Anything still pending after the
//! last pass keeps its original text.
//!
//! Evaluation is a small recursive-descent parser over `+ - * / ( )`, unary
//! signs and decimal literals. Nothing else is accepted.

use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::number::parse_number_or_zero;
use crate::constants::{EXPRESSION_CLOSE, EXPRESSION_OPEN, MAX_EXPRESSION_PASSES};
use crate::core::DocfillError;
use crate::facts::{FactMap, FactValue};

/// Why an expression could not be evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Something other than digits, `.`, operators, parentheses or whitespace
    /// remained after key substitution.
    #[error("expression contains characters outside the arithmetic whitelist: {0}")]
    UnsafeCharacters(String),

    /// A token appeared where the grammar does not allow it.
    #[error("unexpected '{found}' at position {position}")]
    UnexpectedToken {
        /// Offending character
        found: char,
        /// Byte offset in the expression
        position: usize,
    },

    /// The expression ended in the middle of a term.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A numeric literal could not be parsed (e.g. `1.2.3`).
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The result overflowed to infinity or NaN.
    #[error("result is not a finite number")]
    NonFinite,

    /// The expression references a field that is itself still a pending expression.
    #[error("depends on unresolved field {0}")]
    PendingDependency(String),
}

/// A computed field that was left unresolved.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedExpression {
    /// Key of the computed field
    pub key: String,
    /// Expression text after key substitution
    pub expression: String,
    /// Why it could not be evaluated
    pub reason: ExpressionError,
}

impl UnresolvedExpression {
    /// Whether the field failed the arithmetic whitelist.
    pub fn is_unsafe(&self) -> bool {
        matches!(self.reason, ExpressionError::UnsafeCharacters(_))
    }

    /// The typed error reported for this field.
    pub fn to_error(&self) -> DocfillError {
        if self.is_unsafe() {
            DocfillError::UnsafeExpression {
                key: self.key.clone(),
                expression: self.expression.clone(),
            }
        } else {
            DocfillError::Other {
                message: format!("Cannot evaluate {} ({}): {}", self.key, self.expression, self.reason),
            }
        }
    }
}

/// Body of the first `[calculo: ...]` marker in `value`, if any.
pub fn extract_expression(value: &str) -> Option<&str> {
    let start = value.find(EXPRESSION_OPEN)? + EXPRESSION_OPEN.len();
    let rest = &value[start..];
    let end = rest.find(EXPRESSION_CLOSE)?;
    let body = rest[..end].trim_start();
    (!body.is_empty()).then_some(body)
}

fn is_pending(value: &FactValue) -> bool {
    value.as_text().is_some_and(|text| extract_expression(text).is_some())
}

fn numeric_value(value: &FactValue) -> f64 {
    match value {
        FactValue::Number(n) => n.as_f64().unwrap_or(0.0),
        FactValue::Bool(b) => f64::from(u8::from(*b)),
        FactValue::Text(s) => parse_number_or_zero(s),
    }
}

fn is_whitelisted(expression: &str) -> bool {
    expression
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || ".-+*/()".contains(c))
}

/// Substitute the other keys of `facts` into `expression`, longest key first.
///
/// Keys in `failed` will never resolve and are substituted as zero.
fn substitute_keys(
    key: &str,
    expression: &str,
    facts: &FactMap,
    keys_by_length: &[String],
    failed: &HashSet<String>,
) -> Result<String, ExpressionError> {
    let mut expression = expression.to_string();

    for other in keys_by_length {
        if other == key || !expression.contains(other.as_str()) {
            continue;
        }
        let Some(value) = facts.get(other) else {
            continue;
        };
        let number = if !is_pending(value) {
            numeric_value(value)
        } else if failed.contains(other) {
            trace!("{key}: failed dependency {other} counts as zero");
            0.0
        } else {
            return Err(ExpressionError::PendingDependency(other.clone()));
        };
        expression = expression.replace(other.as_str(), &number.to_string());
    }

    Ok(expression)
}

fn resolve_field(
    key: &str,
    body: &str,
    facts: &FactMap,
    keys_by_length: &[String],
    failed: &HashSet<String>,
) -> Result<f64, (String, ExpressionError)> {
    let expression = substitute_keys(key, body, facts, keys_by_length, failed)
        .map_err(|e| (body.to_string(), e))?;
    if !is_whitelisted(&expression) {
        return Err((expression.clone(), ExpressionError::UnsafeCharacters(expression)));
    }
    evaluate(&expression).map_err(|e| (expression, e))
}

/// Resolve every computed field of `facts` in place.
///
/// Returns the fields left unresolved after the last pass; each of them has
/// already been logged as a warning.
///
/// # Examples
///
/// ```rust
/// use docfill::facts::FactMap;
/// use docfill::templating::expression::resolve_expressions;
///
/// let mut facts = FactMap::new();
/// facts.insert("@valor".into(), "1000".into());
/// facts.insert("@qtd".into(), "3".into());
/// facts.insert("@total".into(), "[calculo: @valor * @qtd]".into());
///
/// let unresolved = resolve_expressions(&mut facts);
/// assert!(unresolved.is_empty());
/// assert_eq!(facts["@total"].to_string(), "3000.00");
/// ```
pub fn resolve_expressions(facts: &mut FactMap) -> Vec<UnresolvedExpression> {
    let mut keys_by_length: Vec<String> = facts.keys().cloned().collect();
    keys_by_length.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut unresolved = Vec::new();
    let mut failed = HashSet::new();
    for pass in 1..=MAX_EXPRESSION_PASSES {
        unresolved.clear();

        let pending: Vec<String> = facts
            .iter()
            .filter(|(_, value)| is_pending(value))
            .map(|(key, _)| key.clone())
            .collect();
        if pending.is_empty() {
            break;
        }
        trace!("Expression pass {pass}: {} pending field(s)", pending.len());

        for key in pending {
            let Some(body) = facts.get(&key).and_then(FactValue::as_text).and_then(extract_expression)
            else {
                continue;
            };
            let body = body.to_string();

            let outcome = resolve_field(&key, &body, facts, &keys_by_length, &failed);

            match outcome {
                Ok(result) => {
                    debug!("Resolved {key} = {result:.2}");
                    facts.insert(key, FactValue::Text(format!("{result:.2}")));
                }
                Err((expression, reason)) => {
                    if !matches!(reason, ExpressionError::PendingDependency(_)) {
                        failed.insert(key.clone());
                    }
                    unresolved.push(UnresolvedExpression {
                        key,
                        expression,
                        reason,
                    });
                }
            }
        }
    }

    for field in &unresolved {
        warn!("{}", field.to_error());
    }
    unresolved
}

/// Evaluate an arithmetic expression.
///
/// Supports `+ - * /`, parentheses, unary signs and decimal literals with a
/// `.` separator.
///
/// # Examples
///
/// ```rust
/// use docfill::templating::expression::evaluate;
///
/// assert_eq!(evaluate("(1 + 2) * -3").unwrap(), -9.0);
/// assert!(evaluate("1 / 0").is_err());
/// ```
pub fn evaluate(expression: &str) -> Result<f64, ExpressionError> {
    let mut parser = Parser {
        src: expression,
        pos: 0,
    };
    let value = parser.expr()?;
    parser.skip_whitespace();
    if let Some(c) = parser.peek() {
        return Err(ExpressionError::UnexpectedToken {
            found: c,
            position: parser.pos,
        });
    }
    if value.is_finite() { Ok(value) } else { Err(ExpressionError::NonFinite) }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn next_significant(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.peek()
    }

    fn bump(&mut self, c: char) {
        self.pos += c.len_utf8();
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.term()?;
        while let Some(op @ ('+' | '-')) = self.next_significant() {
            self.bump(op);
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64, ExpressionError> {
        let mut value = self.factor()?;
        while let Some(op @ ('*' | '/')) = self.next_significant() {
            self.bump(op);
            let rhs = self.factor()?;
            if op == '*' {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(ExpressionError::DivisionByZero);
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    // factor := ('+' | '-') factor | number | '(' expr ')'
    fn factor(&mut self) -> Result<f64, ExpressionError> {
        match self.next_significant() {
            None => Err(ExpressionError::UnexpectedEnd),
            Some('-') => {
                self.bump('-');
                Ok(-self.factor()?)
            }
            Some('+') => {
                self.bump('+');
                self.factor()
            }
            Some('(') => {
                self.bump('(');
                let value = self.expr()?;
                match self.next_significant() {
                    Some(')') => {
                        self.bump(')');
                        Ok(value)
                    }
                    Some(found) => Err(ExpressionError::UnexpectedToken {
                        found,
                        position: self.pos,
                    }),
                    None => Err(ExpressionError::UnexpectedEnd),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(found) => Err(ExpressionError::UnexpectedToken {
                found,
                position: self.pos,
            }),
        }
    }

    fn number(&mut self) -> Result<f64, ExpressionError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !(c.is_ascii_digit() || c == '.') {
                break;
            }
            self.bump(c);
        }
        let literal = &self.src[start..self.pos];
        if literal.matches('.').count() > 1 || literal == "." {
            return Err(ExpressionError::InvalidNumber(literal.to_string()));
        }
        literal.parse::<f64>().map_err(|_| ExpressionError::InvalidNumber(literal.to_string()))
    }
}

//! Token resolution and substitution for document templates.
//!
//! A template references values through `@` tokens: `@nomeCliente`,
//! `@taxa%`, `@Area.Total`. This module owns everything that happens between
//! a merged [`FactMap`](crate::facts::FactMap) and rewritten document text:
//!
//! - [`grammar`] - what a token is, and where one may start and end
//! - [`expression`] - computed fields (`[calculo: @valor * @qtd]`)
//! - [`number`] / [`formatting`] - regional number rendering (`R$ 1.234,56`)
//! - [`validator`] - which referenced tokens have no value
//! - [`substitution`] - writing values into run-fragmented text
//!
//! # Pipeline
//!
//! ```text
//! merged map -> resolve_expressions -> apply_formatting -> SubstitutionEngine
//!                                                       \-> missing_tokens
//! ```
//!
//! # Examples
//!
//! ```rust
//! use docfill::facts::FactMap;
//! use docfill::templating::{RunConsolidation, SubstitutionEngine, apply_formatting, resolve_expressions};
//!
//! let mut facts = FactMap::new();
//! facts.insert("@valor".into(), "100".into());
//! facts.insert("@qtd".into(), "3".into());
//! facts.insert("@total".into(), "[calculo: @valor * @qtd]".into());
//!
//! assert!(resolve_expressions(&mut facts).is_empty());
//! apply_formatting(&mut facts);
//!
//! let engine = SubstitutionEngine::new(&facts, RunConsolidation::Paragraph);
//! assert_eq!(engine.substitute_text("Total: @total").0, "Total: R$ 300,00");
//! ```

pub mod expression;
pub mod formatting;
pub mod grammar;
pub mod number;
pub mod substitution;
pub mod validator;

pub use expression::{ExpressionError, UnresolvedExpression, evaluate, resolve_expressions};
pub use formatting::{ValueClass, apply_formatting, format_value};
pub use grammar::{TokenMatch, find_tokens};
pub use number::{format_currency, format_decimal, parse_number};
pub use substitution::{RunConsolidation, SubstitutionEngine, SubstitutionStats};
pub use validator::{MissingToken, MissingTokenReport, extract_tokens, missing_tokens};

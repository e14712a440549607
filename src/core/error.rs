//! Error handling for docfill
//!
//! This module provides the error taxonomy of the generation engine and the
//! user-facing error reporting used by the CLI. The error system follows two
//! principles:
//! 1. **Strongly-typed errors** so callers can tell fatal container failures
//!    apart from degraded-data conditions
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Data sources**: [`DocfillError::DataSourceMissing`] (non-fatal, the
//!   layer contributes nothing) and [`DocfillError::DataSourceInvalid`]
//! - **Templates**: [`DocfillError::TemplateUnreadable`],
//!   [`DocfillError::TemplateNotFound`], [`DocfillError::UnsupportedDocumentKind`]
//! - **Resolution**: [`DocfillError::UnsafeExpression`],
//!   [`DocfillError::MissingToken`] (both reported, never fatal by default)
//! - **Output**: [`DocfillError::GenerationWriteFailure`],
//!   [`DocfillError::OutputConflict`]
//! - **Configuration**: [`DocfillError::ConfigError`], [`DocfillError::ConfigNotFound`]
//!
//! Use [`user_friendly_error`] to turn any error into an [`ErrorContext`]
//! with details and a suggestion.
//!
//! # Examples
//!
//! ```rust,no_run
//! use docfill::core::{DocfillError, ErrorContext};
//!
//! let context = ErrorContext::new(DocfillError::TemplateUnreadable {
//!     path: "modelos/proposta.docx".to_string(),
//!     reason: "invalid Zip archive".to_string(),
//! })
//! .with_suggestion("Open the template in Word and save it again as .docx");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for docfill operations.
///
/// Fatal variants abort a generation request. [`DocfillError::DataSourceMissing`],
/// [`DocfillError::UnsafeExpression`] and [`DocfillError::MissingToken`] describe
/// degraded conditions: the engine logs them and keeps going, but they are
/// still typed so callers can surface them.
#[derive(Error, Debug)]
pub enum DocfillError {
    /// A fact file or data file does not exist.
    ///
    /// Non-fatal during generation: the missing layer contributes an empty map.
    #[error("Data source not found: {path}")]
    DataSourceMissing {
        /// Path that was expected to hold key/value data
        path: String,
    },

    /// A data file exists but cannot be parsed.
    #[error("Invalid data source {path}: {reason}")]
    DataSourceInvalid {
        /// Path of the data file
        path: String,
        /// Parser message
        reason: String,
    },

    /// The template container cannot be opened or is not a valid package.
    #[error("Template not found or unreadable: {path}")]
    TemplateUnreadable {
        /// Path of the template container
        path: String,
        /// Underlying reason (I/O or archive error)
        reason: String,
    },

    /// A template referenced by name could not be located in the templates root.
    #[error("Template '{name}' not found in {searched}")]
    TemplateNotFound {
        /// Name as given by the caller
        name: String,
        /// Directory that was searched
        searched: String,
    },

    /// The requested document kind is not one of the supported container formats.
    #[error("Unsupported document kind: {kind}")]
    UnsupportedDocumentKind {
        /// The kind or extension that was requested
        kind: String,
    },

    /// A computed field failed the arithmetic whitelist and was left unresolved.
    #[error("Unsafe expression in {key}: {expression}")]
    UnsafeExpression {
        /// Key of the computed field
        key: String,
        /// Expression text after key substitution
        expression: String,
    },

    /// Tokens referenced by the template are absent from the merged data.
    #[error("Template references {} token(s) with no value: {}", .tokens.len(), .tokens.join(", "))]
    MissingToken {
        /// Missing tokens, in sorted order
        tokens: Vec<String>,
    },

    /// The generated document could not be written.
    #[error("Failed to write generated document {path}: {reason}")]
    GenerationWriteFailure {
        /// Target output path
        path: String,
        /// Underlying reason, verbatim
        reason: String,
    },

    /// Two requests in one batch target the same output file.
    #[error("More than one request writes to {path}")]
    OutputConflict {
        /// The shared output path
        path: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// Config file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to the configuration file that was not found
        path: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for DocfillError {
    fn clone(&self) -> Self {
        match self {
            Self::DataSourceMissing {
                path,
            } => Self::DataSourceMissing {
                path: path.clone(),
            },
            Self::DataSourceInvalid {
                path,
                reason,
            } => Self::DataSourceInvalid {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::TemplateUnreadable {
                path,
                reason,
            } => Self::TemplateUnreadable {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::TemplateNotFound {
                name,
                searched,
            } => Self::TemplateNotFound {
                name: name.clone(),
                searched: searched.clone(),
            },
            Self::UnsupportedDocumentKind {
                kind,
            } => Self::UnsupportedDocumentKind {
                kind: kind.clone(),
            },
            Self::UnsafeExpression {
                key,
                expression,
            } => Self::UnsafeExpression {
                key: key.clone(),
                expression: expression.clone(),
            },
            Self::MissingToken {
                tokens,
            } => Self::MissingToken {
                tokens: tokens.clone(),
            },
            Self::GenerationWriteFailure {
                path,
                reason,
            } => Self::GenerationWriteFailure {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::OutputConflict {
                path,
            } => Self::OutputConflict {
                path: path.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ConfigNotFound {
                path,
            } => Self::ConfigNotFound {
                path: path.clone(),
            },
            // io::Error is not Clone; keep kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that pairs a [`DocfillError`] with guidance for the user.
///
/// # Examples
///
/// ```rust,no_run
/// use docfill::core::{DocfillError, ErrorContext};
///
/// let context = ErrorContext::new(DocfillError::ConfigNotFound {
///     path: "/etc/docfill.toml".to_string(),
/// })
/// .with_details("The --config flag points at a file that does not exist");
///
/// let message = format!("{}", context);
/// assert!(message.contains("Details:"));
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying docfill error
    pub error: DocfillError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`DocfillError`] with no extra guidance.
    #[must_use]
    pub const fn new(error: DocfillError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error (shown in green).
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error (shown in yellow).
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`DocfillError`] variants, I/O errors and TOML parse errors; any
/// other error is wrapped as [`DocfillError::Other`] with its full cause chain.
///
/// # Examples
///
/// ```rust,no_run
/// use docfill::core::{DocfillError, user_friendly_error};
///
/// let error = anyhow::Error::from(DocfillError::OutputConflict {
///     path: "out/proposta.docx".to_string(),
/// });
/// user_friendly_error(error).display();
/// ```
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(docfill_error) = error.downcast_ref::<DocfillError>() {
        return create_error_context(docfill_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(DocfillError::IoError(std::io::Error::new(
                    io_error.kind(),
                    io_error.to_string(),
                )))
                .with_suggestion("Check file ownership, or close the document if another program has it open")
                .with_details("docfill could not read or write a file it needed");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(DocfillError::IoError(std::io::Error::new(
                    io_error.kind(),
                    io_error.to_string(),
                )))
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(DocfillError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of your docfill configuration file");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(DocfillError::Other {
        message,
    })
}

/// Map each [`DocfillError`] variant to a tailored [`ErrorContext`].
fn create_error_context(error: DocfillError) -> ErrorContext {
    match &error {
        DocfillError::TemplateUnreadable {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_details(reason)
                .with_suggestion("Make sure the template is a .docx or .pptx file saved by Word or PowerPoint")
        }
        DocfillError::TemplateNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run 'docfill templates' to list the templates that are available"),
        DocfillError::DataSourceInvalid {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "JSON data files must hold a single object of \"@token\": value pairs",
        ),
        DocfillError::DataSourceMissing {
            ..
        } => ErrorContext::new(error)
            .with_details("Missing data sources are skipped; the document is generated with the data that was found"),
        DocfillError::UnsupportedDocumentKind {
            ..
        } => ErrorContext::new(error).with_suggestion("Use --kind docx or --kind pptx"),
        DocfillError::MissingToken {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Add the tokens to the data file, or enable clean_missing_variables in the configuration",
        ),
        DocfillError::GenerationWriteFailure {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Close the output document if it is open in another program and try again"),
        DocfillError::OutputConflict {
            ..
        } => ErrorContext::new(error)
            .with_details("Concurrent generations must not race on the same output file"),
        DocfillError::ConfigNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass --config with an existing file or set DOCFILL_CONFIG_PATH"),
        DocfillError::ConfigError {
            ..
        } => ErrorContext::new(error).with_suggestion("Check the docfill configuration file"),
        _ => ErrorContext::new(error),
    }
}

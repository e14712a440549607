//! Core types for docfill
//!
//! This module holds the error taxonomy shared by every layer of the engine:
//!
//! - [`DocfillError`] - enumerated failure modes of a generation request
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for CLI display
//! - [`file_error`] - file operation errors that remember what was being read
//!
//! # Propagation policy
//!
//! Data-loading problems degrade gracefully: they are logged and the layer
//! contributes nothing. Template container I/O problems propagate as typed
//! failures. Save failures are never swallowed.

pub mod error;
pub mod file_error;

pub use error::{DocfillError, ErrorContext, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};

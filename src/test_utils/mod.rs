//! Test utilities for docfill
//!
//! Helpers shared by unit tests and the `tests/` suites:
//!
//! - [`init_test_logging`] - route `tracing` output to the test harness once
//! - [`fixtures`] - build minimal `.docx`/`.pptx` packages in temp directories
//!
//! # Example
//!
//! ```rust,no_run
//! use docfill::test_utils::fixtures::{w_paragraph, write_docx};
//! use tempfile::tempdir;
//!
//! let temp = tempdir().unwrap();
//! let template = temp.path().join("modelo.docx");
//! write_docx(&template, &w_paragraph(&["Cliente: @", "nome"]), &[]).unwrap();
//! ```

pub mod fixtures;

pub use fixtures::{read_part, write_package};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `None` the `RUST_LOG` environment
/// variable decides; when it is unset, nothing is logged.
///
/// ```bash
/// RUST_LOG=docfill=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

//! Progress reporting for batch generation
//!
//! A thin wrapper over `indicatif` so the generator can report how many
//! documents of a batch are done without caring whether a terminal is
//! attached.
//!
//! # Environment Variables
//!
//! - `DOCFILL_NO_PROGRESS`: set to any value to hide all progress bars
//!
//! # Examples
//!
//! ```rust
//! use docfill::utils::progress::BatchProgress;
//!
//! let progress = BatchProgress::hidden(3);
//! progress.set_message("proposta.docx");
//! progress.inc();
//! progress.finish("3 documents generated");
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};

/// Whether progress bars are suppressed through `DOCFILL_NO_PROGRESS`.
fn is_progress_disabled() -> bool {
    std::env::var_os("DOCFILL_NO_PROGRESS").is_some()
}

fn default_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map(|style| style.progress_chars("━╸━"))
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
}

/// Counts finished documents of a batch.
///
/// Cloning shares the underlying bar, so every task of a batch can hold one.
#[derive(Clone, Debug)]
pub struct BatchProgress {
    inner: IndicatifBar,
}

impl BatchProgress {
    /// A visible bar for `len` documents, unless disabled by the environment.
    pub fn new(len: usize) -> Self {
        if is_progress_disabled() {
            return Self::hidden(len);
        }
        let inner = IndicatifBar::new(len as u64);
        inner.set_style(default_style());
        inner.set_prefix("Generating");
        Self {
            inner,
        }
    }

    /// A bar that tracks position but never draws.
    pub fn hidden(len: usize) -> Self {
        let inner = IndicatifBar::hidden();
        inner.set_length(len as u64);
        Self {
            inner,
        }
    }

    /// Show the name of the document being worked on.
    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    /// Mark one document as done.
    pub fn inc(&self) {
        self.inner.inc(1);
    }

    /// Documents done so far.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Finish the bar with a closing message.
    pub fn finish(&self, msg: impl Into<String>) {
        self.inner.finish_with_message(msg.into());
    }
}

//! Generation history.
//!
//! Each successful generation appends one line to `history.log` in the
//! output's directory:
//!
//! ```text
//! [2026-01-29 14:03:11] Documento 'proposta.docx' (docx) gerado usando Template 'modelo.docx' e Dados 'dados.md'
//! ```

use anyhow::Result;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::constants::HISTORY_LOG_FILE;
use crate::document::DocumentKind;
use crate::utils::fs::append_line;

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// The history file for documents written to `output`.
pub fn history_path(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(HISTORY_LOG_FILE),
        _ => PathBuf::from(HISTORY_LOG_FILE),
    }
}

/// Format one history entry.
pub fn history_line(
    at: NaiveDateTime,
    output: &Path,
    kind: DocumentKind,
    template: &Path,
    data: &Path,
) -> String {
    format!(
        "[{}] Documento '{}' ({kind}) gerado usando Template '{}' e Dados '{}'",
        at.format("%Y-%m-%d %H:%M:%S"),
        file_name(output),
        file_name(template),
        file_name(data)
    )
}

/// Append an entry for a generated document.
pub fn record_generation(
    at: NaiveDateTime,
    output: &Path,
    kind: DocumentKind,
    template: &Path,
    data: &Path,
) -> Result<()> {
    append_line(&history_path(output), &history_line(at, output, kind, template, data))
}

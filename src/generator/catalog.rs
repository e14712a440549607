//! Template and data file discovery, and data file scaffolding.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::DATA_FILE_EXTENSIONS;
use crate::core::DocfillError;
use crate::document::DocumentKind;

/// Starter content of a scaffolded data file.
const DATA_FILE_STARTER: &str = "\
@TEMPLATE: nome do arquivo template a ser utilizado
# DADOS ESPECÍFICOS DO DOCUMENTO
@numeroProposta:
@detalhesProposta:
@valorProposta:
";

/// Version fields used when a scaffold request leaves them out.
pub const DEFAULT_VERSION: &str = "00";
/// Default revision field.
pub const DEFAULT_REVISION: &str = "R00";
/// Default description field.
pub const DEFAULT_DESCRIPTION: &str = "PROPOSTA";

fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase)
}

fn sorted_files(dir: &Path, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> =
        entries.flatten().map(|entry| entry.path()).filter(|p| p.is_file() && keep(p)).collect();
    files.sort();
    files
}

/// Template file names in `root`, optionally restricted to one kind.
///
/// Office lock files (`~$modelo.docx`) are skipped. A missing root yields an
/// empty list.
pub fn list_templates(root: &Path, kind: Option<DocumentKind>) -> Vec<String> {
    if !root.is_dir() {
        warn!("Templates directory not found: {}", root.display());
        return Vec::new();
    }

    sorted_files(root, |path| {
        let locked = path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with("~$"));
        let matches = match (extension_of(path), kind) {
            (Some(ext), Some(kind)) => ext == kind.extension(),
            (Some(ext), None) => ext.parse::<DocumentKind>().is_ok(),
            (None, _) => false,
        };
        matches && !locked
    })
    .into_iter()
    .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
    .collect()
}

/// Data files (`.md`, `.txt`, `.json`) directly inside `dir`.
pub fn list_data_files(dir: &Path) -> Vec<PathBuf> {
    sorted_files(dir, |path| {
        extension_of(path).is_some_and(|ext| DATA_FILE_EXTENSIONS.contains(&ext.as_str()))
    })
}

/// Locate a template by path or by name under `root`.
///
/// Tries `name` as a path, then `root/name`, then `root/name.docx` and
/// `root/name.pptx`.
///
/// # Errors
///
/// [`DocfillError::TemplateNotFound`] when no candidate exists.
pub fn resolve_template(root: &Path, name: &str) -> Result<PathBuf, DocfillError> {
    let direct = PathBuf::from(name);
    let candidates = [
        direct,
        root.join(name),
        root.join(format!("{name}.{}", DocumentKind::Docx.extension())),
        root.join(format!("{name}.{}", DocumentKind::Pptx.extension())),
    ];

    candidates.into_iter().find(|candidate| candidate.is_file()).ok_or_else(|| {
        DocfillError::TemplateNotFound {
            name: name.to_string(),
            searched: root.display().to_string(),
        }
    })
}

/// File name of a scaffolded data file: `02-{code}_DOC_PC_{ver}_{rev}_{desc}.md`.
pub fn data_file_name(code: &str, version: &str, revision: &str, description: &str) -> String {
    format!("02-{code}_DOC_PC_{version}_{revision}_{description}.md")
}

/// Create a starter data file in `dir`.
///
/// An existing file with the same name is left untouched and its path is
/// returned.
///
/// # Errors
///
/// Fails when `dir` does not exist, when a name field is empty or contains a
/// path separator, or when the file cannot be written.
pub fn scaffold_data_file(
    dir: &Path,
    code: &str,
    version: &str,
    revision: &str,
    description: &str,
) -> Result<PathBuf, DocfillError> {
    if !dir.is_dir() {
        return Err(DocfillError::Other {
            message: format!("Directory not found: {}", dir.display()),
        });
    }
    for (field, value) in [("code", code), ("version", version), ("revision", revision), ("description", description)] {
        if value.trim().is_empty() || value.contains(['/', '\\']) {
            return Err(DocfillError::Other {
                message: format!("Invalid {field} for a data file name: '{value}'"),
            });
        }
    }

    let path = dir.join(data_file_name(code, version, revision, description));
    if path.exists() {
        warn!("Data file already exists: {}", path.display());
        return Ok(path);
    }

    std::fs::write(&path, DATA_FILE_STARTER)?;
    info!("Created data file {}", path.display());
    Ok(path)
}

//! Zip packaging of `.docx` / `.pptx` containers.
//!
//! The whole template is read into memory on open, so the output may safely
//! replace the template itself. On save, untouched entries are copied raw
//! (compressed bytes and metadata unchanged); only replaced parts are
//! recompressed.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::core::DocfillError;
use crate::core::file_error::{FileOperation, FileResultExt};
use crate::utils::atomic_write;

/// An opened package.
pub struct Package {
    source: PathBuf,
    archive: ZipArchive<Cursor<Vec<u8>>>,
    replaced: BTreeMap<String, String>,
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("source", &self.source)
            .field("entries", &self.archive.len())
            .field("replaced", &self.replaced.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Package {
    /// Open a package from disk.
    ///
    /// # Errors
    ///
    /// [`DocfillError::TemplateUnreadable`] when the file cannot be read or is
    /// not a zip archive.
    pub fn open(path: &Path) -> Result<Self, DocfillError> {
        let unreadable = |reason: String| DocfillError::TemplateUnreadable {
            path: path.display().to_string(),
            reason,
        };

        let bytes = std::fs::read(path)
            .with_file_context(FileOperation::Read, path, "document template")
            .map_err(|e| unreadable(e.user_message()))?;
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| unreadable(e.to_string()))?;

        debug!("Opened {} ({} entries)", path.display(), archive.len());
        Ok(Self {
            source: path.to_path_buf(),
            archive,
            replaced: BTreeMap::new(),
        })
    }

    /// Path the package was opened from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Entry names in archive order.
    pub fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_owned).collect()
    }

    /// Whether an entry exists.
    pub fn contains(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Read an entry as UTF-8 text, honouring earlier replacements.
    pub fn read_part(&mut self, name: &str) -> Result<String, DocfillError> {
        if let Some(xml) = self.replaced.get(name) {
            return Ok(xml.clone());
        }

        let source = self.source.display().to_string();
        let mut entry = self.archive.by_name(name).map_err(|e| DocfillError::TemplateUnreadable {
            path: source.clone(),
            reason: format!("{name}: {e}"),
        })?;
        let mut xml = String::new();
        entry.read_to_string(&mut xml).map_err(|e| DocfillError::TemplateUnreadable {
            path: source,
            reason: format!("{name}: {e}"),
        })?;
        Ok(xml)
    }

    /// Replace an entry's content.
    pub fn replace_part(&mut self, name: &str, xml: String) {
        self.replaced.insert(name.to_string(), xml);
    }

    /// Serialize the package into memory.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, ZipError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for index in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(index)?;
            let Some(xml) = self.replaced.get(entry.name()) else {
                writer.raw_copy_file(entry)?;
                continue;
            };

            let method = match entry.compression() {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let name = entry.name().to_string();
            drop(entry);

            writer.start_file(name, SimpleFileOptions::default().compression_method(method))?;
            writer.write_all(xml.as_bytes())?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// Write the package to `output` atomically.
    ///
    /// # Errors
    ///
    /// [`DocfillError::GenerationWriteFailure`] carrying the underlying reason.
    pub fn save(&mut self, output: &Path) -> Result<(), DocfillError> {
        let failure = |reason: String| DocfillError::GenerationWriteFailure {
            path: output.display().to_string(),
            reason,
        };

        let bytes = self.to_bytes().map_err(|e| failure(e.to_string()))?;
        atomic_write(output, &bytes).map_err(|e| failure(format!("{e:#}")))?;

        debug!("Saved {} ({} bytes)", output.display(), bytes.len());
        Ok(())
    }
}

//! Document containers.
//!
//! Both supported formats are zip packages of XML parts:
//!
//! | kind   | parts scanned                                             |
//! |--------|-----------------------------------------------------------|
//! | `docx` | `word/document.xml`, `word/header*.xml`, `word/footer*.xml` |
//! | `pptx` | `ppt/slides/slide*.xml`, in slide order                   |
//!
//! [`open_document`] returns the container as a [`TextSurfaceProvider`]; the
//! validator and the substitution engine only ever see that trait.
//!
//! # Examples
//!
//! ```rust,no_run
//! use docfill::document::{DocumentKind, open_document};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), docfill::core::DocfillError> {
//! let document = open_document(DocumentKind::Docx, Path::new("modelos/proposta.docx"))?;
//! for region in document.regions() {
//!     println!("{}: {:?}", region.kind(), region.segment_texts());
//! }
//! # Ok(())
//! # }
//! ```

pub mod docx;
pub mod markup;
pub mod package;
pub mod part;
pub mod pptx;
pub mod surface;

pub use docx::DocxDocument;
pub use package::Package;
pub use pptx::PptxDocument;
pub use surface::{RegionId, RegionKind, Run, SurfaceRegion, TextSurfaceProvider};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::DocfillError;

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Word-processor document (`.docx`)
    Docx,
    /// Slide deck (`.pptx`)
    Pptx,
}

impl DocumentKind {
    /// File extension, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            DocumentKind::Docx => "docx",
            DocumentKind::Pptx => "pptx",
        }
    }

    /// Infer the kind from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, DocfillError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        ext.parse().map_err(|_| DocfillError::UnsupportedDocumentKind {
            kind: path.display().to_string(),
        })
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for DocumentKind {
    type Err = DocfillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "docx" => Ok(DocumentKind::Docx),
            "pptx" => Ok(DocumentKind::Pptx),
            other => Err(DocfillError::UnsupportedDocumentKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// Open a template as a text surface.
///
/// # Errors
///
/// [`DocfillError::TemplateUnreadable`] when the file is missing, is not a
/// zip package, lacks its main part, or holds malformed markup.
pub fn open_document(
    kind: DocumentKind,
    path: &Path,
) -> Result<Box<dyn TextSurfaceProvider>, DocfillError> {
    Ok(match kind {
        DocumentKind::Docx => Box::new(DocxDocument::open(path)?),
        DocumentKind::Pptx => Box::new(PptxDocument::open(path)?),
    })
}

/// Numeric suffix of a part's file stem: `word/header12.xml` -> 12.
pub(crate) fn part_number(name: &str) -> u32 {
    let stem = name.rsplit('/').next().unwrap_or(name);
    let stem = stem.split('.').next().unwrap_or(stem);
    let digits: String = stem.chars().rev().take_while(char::is_ascii_digit).collect();
    digits.chars().rev().collect::<String>().parse().unwrap_or(0)
}

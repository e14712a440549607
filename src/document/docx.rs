//! Word-processor documents.
//!
//! Region classification for a paragraph:
//!
//! - in a text box inside an inline drawing of the body -> inline shape
//! - in any other text box (anchored drawings, legacy VML fallbacks, any text
//!   box of a header or footer) -> raw markup
//! - in a header or footer part -> header/footer
//! - in a table cell -> table cell, otherwise body

use glob::Pattern;
use std::path::Path;
use tracing::debug;

use super::markup::{Ancestry, WORDPROCESSING};
use super::package::Package;
use super::part::{MarkupPart, PartSet};
use super::surface::{RegionId, RegionKind, SurfaceRegion, TextSurfaceProvider, runs_of};
use super::{DocumentKind, part_number};
use crate::core::DocfillError;

/// Main part of a word-processor package.
pub const MAIN_PART: &str = "word/document.xml";

const HEADER_PATTERN: &str = "word/header*.xml";
const FOOTER_PATTERN: &str = "word/footer*.xml";

/// An opened `.docx` template.
#[derive(Debug)]
pub struct DocxDocument {
    parts: PartSet,
}

impl DocxDocument {
    /// Open and scan a `.docx` file.
    pub fn open(path: &Path) -> Result<Self, DocfillError> {
        let package = Package::open(path)?;
        if !package.contains(MAIN_PART) {
            return Err(DocfillError::TemplateUnreadable {
                path: path.display().to_string(),
                reason: format!("missing {MAIN_PART}; not a word-processor document"),
            });
        }

        let mut names = vec![(MAIN_PART.to_string(), false)];
        names.extend(header_footer_parts(&package.part_names()).into_iter().map(|n| (n, true)));
        debug!("Scanning {} part(s) of {}", names.len(), path.display());

        Ok(Self {
            parts: PartSet::load(package, &names, &WORDPROCESSING)?,
        })
    }
}

/// Header and footer parts: by number, header before footer.
fn header_footer_parts(names: &[String]) -> Vec<String> {
    let (Ok(header), Ok(footer)) = (Pattern::new(HEADER_PATTERN), Pattern::new(FOOTER_PATTERN)) else {
        return Vec::new();
    };

    let mut parts: Vec<(u32, u8, String)> = names
        .iter()
        .filter_map(|name| {
            if header.matches(name) {
                Some((part_number(name), 0, name.clone()))
            } else if footer.matches(name) {
                Some((part_number(name), 1, name.clone()))
            } else {
                None
            }
        })
        .collect();
    parts.sort();
    parts.into_iter().map(|(_, _, name)| name).collect()
}

fn classify(part: &MarkupPart, ancestry: Ancestry) -> Option<RegionKind> {
    if ancestry.text_box {
        if !part.header_footer && ancestry.inline_drawing {
            return Some(RegionKind::InlineShape);
        }
        return None;
    }
    if part.header_footer {
        Some(RegionKind::HeaderFooter)
    } else if ancestry.table_cell {
        Some(RegionKind::TableCell)
    } else {
        Some(RegionKind::Body)
    }
}

impl TextSurfaceProvider for DocxDocument {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Docx
    }

    fn regions(&self) -> Vec<SurfaceRegion> {
        let mut regions = Vec::new();

        for (part_index, part) in self.parts.parts().iter().enumerate() {
            for (paragraph_index, paragraph) in part.paragraphs().iter().enumerate() {
                if paragraph.nodes.is_empty() {
                    continue;
                }
                let id = RegionId {
                    part: part_index,
                    paragraph: paragraph_index,
                };
                let runs = runs_of(paragraph);
                regions.push(match classify(part, paragraph.ancestry) {
                    Some(kind) => SurfaceRegion::Structured { id, kind, runs },
                    None => SurfaceRegion::RawMarkup {
                        id,
                        part: part.name.clone(),
                        runs,
                    },
                });
            }
        }

        regions.sort_by_key(|region| (region.kind(), region.id()));
        regions
    }

    fn rewrite(&mut self, id: RegionId, texts: Vec<String>) -> Result<(), DocfillError> {
        self.parts.rewrite(id.part, id.paragraph, texts)
    }

    fn save(&mut self, output: &Path) -> Result<(), DocfillError> {
        self.parts.save(output)
    }
}

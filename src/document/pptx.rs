//! Slide decks.
//!
//! Every slide's shape text frames are body regions; paragraphs inside a
//! table cell are table-cell regions. Slides are visited in slide number
//! order.

use glob::Pattern;
use std::path::Path;
use tracing::debug;

use super::markup::DRAWING;
use super::package::Package;
use super::part::PartSet;
use super::surface::{RegionId, RegionKind, SurfaceRegion, TextSurfaceProvider, runs_of};
use super::{DocumentKind, part_number};
use crate::core::DocfillError;

const SLIDE_PATTERN: &str = "ppt/slides/slide*.xml";

/// An opened `.pptx` template.
#[derive(Debug)]
pub struct PptxDocument {
    parts: PartSet,
}

impl PptxDocument {
    /// Open and scan a `.pptx` file.
    pub fn open(path: &Path) -> Result<Self, DocfillError> {
        let package = Package::open(path)?;
        if !package.contains("ppt/presentation.xml") {
            return Err(DocfillError::TemplateUnreadable {
                path: path.display().to_string(),
                reason: "missing ppt/presentation.xml; not a slide deck".to_string(),
            });
        }

        let names: Vec<(String, bool)> =
            slide_parts(&package.part_names()).into_iter().map(|n| (n, false)).collect();
        debug!("Scanning {} slide(s) of {}", names.len(), path.display());

        Ok(Self {
            parts: PartSet::load(package, &names, &DRAWING)?,
        })
    }
}

fn slide_parts(names: &[String]) -> Vec<String> {
    let Ok(pattern) = Pattern::new(SLIDE_PATTERN) else {
        return Vec::new();
    };
    let mut slides: Vec<(u32, String)> = names
        .iter()
        .filter(|name| pattern.matches(name))
        .map(|name| (part_number(name), name.clone()))
        .collect();
    slides.sort();
    slides.into_iter().map(|(_, name)| name).collect()
}

impl TextSurfaceProvider for PptxDocument {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pptx
    }

    fn regions(&self) -> Vec<SurfaceRegion> {
        let mut regions = Vec::new();

        for (part_index, part) in self.parts.parts().iter().enumerate() {
            for (paragraph_index, paragraph) in part.paragraphs().iter().enumerate() {
                if paragraph.nodes.is_empty() {
                    continue;
                }
                let kind = if paragraph.ancestry.table_cell {
                    RegionKind::TableCell
                } else {
                    RegionKind::Body
                };
                regions.push(SurfaceRegion::Structured {
                    id: RegionId {
                        part: part_index,
                        paragraph: paragraph_index,
                    },
                    kind,
                    runs: runs_of(paragraph),
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

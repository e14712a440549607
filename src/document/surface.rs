//! The template surface: every text-bearing region of a document.
//!
//! Containers expose their text through [`TextSurfaceProvider`]. Regions come
//! in two flavours:
//!
//! - [`SurfaceRegion::Structured`] - paragraphs reachable through the
//!   document's regular structure (body, tables, inline shapes, headers and
//!   footers)
//! - [`SurfaceRegion::RawMarkup`] - anchored text boxes, found only by walking
//!   the raw markup
//!
//! Consumers (the validator and the substitution engine) iterate the region
//! list without knowing which container produced it.

use std::fmt;
use std::path::Path;

use super::DocumentKind;
use super::markup::{ScannedParagraph, TextNode};
use crate::core::DocfillError;

/// Where a structured region lives. Ordering is traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegionKind {
    /// Body paragraph (slide shape text for slide decks)
    Body,
    /// Paragraph in a table cell
    TableCell,
    /// Paragraph in the text frame of an inline shape
    InlineShape,
    /// Paragraph or table cell of a header or footer
    HeaderFooter,
    /// Paragraph of an anchored (floating) text box
    Anchored,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionKind::Body => "body",
            RegionKind::TableCell => "table cell",
            RegionKind::InlineShape => "inline shape",
            RegionKind::HeaderFooter => "header/footer",
            RegionKind::Anchored => "anchored text box",
        };
        f.write_str(name)
    }
}

/// Stable handle of a region within its provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId {
    /// Index of the part in the provider
    pub part: usize,
    /// Index of the paragraph in the part
    pub paragraph: usize,
}

/// One formatting run's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Text of the run
    pub text: String,
    /// Runs separated by a tab or line break have different segments
    pub segment: usize,
}

/// A paragraph-like text region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceRegion {
    /// Reachable through the document structure
    Structured {
        /// Handle for rewriting
        id: RegionId,
        /// Location class
        kind: RegionKind,
        /// Runs in order
        runs: Vec<Run>,
    },
    /// Reachable only through raw markup
    RawMarkup {
        /// Handle for rewriting
        id: RegionId,
        /// Name of the part the region was found in
        part: String,
        /// Runs in order
        runs: Vec<Run>,
    },
}

impl SurfaceRegion {
    /// Handle for [`TextSurfaceProvider::rewrite`].
    pub fn id(&self) -> RegionId {
        match self {
            SurfaceRegion::Structured { id, .. } | SurfaceRegion::RawMarkup { id, .. } => *id,
        }
    }

    /// The region's runs.
    pub fn runs(&self) -> &[Run] {
        match self {
            SurfaceRegion::Structured { runs, .. } | SurfaceRegion::RawMarkup { runs, .. } => runs,
        }
    }

    /// Location class; raw-markup regions are always anchored.
    pub fn kind(&self) -> RegionKind {
        match self {
            SurfaceRegion::Structured { kind, .. } => *kind,
            SurfaceRegion::RawMarkup { .. } => RegionKind::Anchored,
        }
    }

    /// Text of each segment, runs concatenated.
    pub fn segment_texts(&self) -> Vec<String> {
        let mut segments: Vec<String> = Vec::new();
        let mut current = None;
        for run in self.runs() {
            if current != Some(run.segment) {
                segments.push(String::new());
                current = Some(run.segment);
            }
            if let Some(last) = segments.last_mut() {
                last.push_str(&run.text);
            }
        }
        segments
    }
}

/// A document container viewed as an ordered list of text regions.
pub trait TextSurfaceProvider: Send {
    /// Container format.
    fn kind(&self) -> DocumentKind;

    /// All regions, in traversal order.
    fn regions(&self) -> Vec<SurfaceRegion>;

    /// Replace the run texts of a region. `texts` has one entry per run.
    fn rewrite(&mut self, id: RegionId, texts: Vec<String>) -> Result<(), DocfillError>;

    /// Serialize the container to `output`, atomically.
    fn save(&mut self, output: &Path) -> Result<(), DocfillError>;
}

/// Build a region's run list from a scanned paragraph.
pub(crate) fn runs_of(paragraph: &ScannedParagraph) -> Vec<Run> {
    paragraph
        .nodes
        .iter()
        .map(|node: &TextNode| Run {
            text: node.text.clone(),
            segment: node.segment,
        })
        .collect()
}

//! A scanned part with staged text edits.

use std::collections::BTreeMap;

use super::markup::{Dialect, ScannedParagraph, scan, splice};
use super::package::Package;
use crate::core::DocfillError;

/// One markup part of a package, scanned and ready for edits.
#[derive(Debug)]
pub struct MarkupPart {
    /// Entry name, e.g. `word/header1.xml`
    pub name: String,
    /// Whether this part is a header or footer
    pub header_footer: bool,
    xml: String,
    paragraphs: Vec<ScannedParagraph>,
    edits: BTreeMap<usize, Vec<String>>,
}

impl MarkupPart {
    /// Read and scan `name` from `package`.
    pub fn load(
        package: &mut Package,
        name: &str,
        header_footer: bool,
        dialect: &Dialect,
    ) -> Result<Self, DocfillError> {
        let xml = package.read_part(name)?;
        let paragraphs = scan(&xml, dialect).map_err(|e| DocfillError::TemplateUnreadable {
            path: package.source().display().to_string(),
            reason: format!("{name}: {e}"),
        })?;

        Ok(Self {
            name: name.to_string(),
            header_footer,
            xml,
            paragraphs,
            edits: BTreeMap::new(),
        })
    }

    /// Scanned paragraphs.
    pub fn paragraphs(&self) -> &[ScannedParagraph] {
        &self.paragraphs
    }

    /// Stage new run texts for a paragraph.
    pub fn stage(&mut self, paragraph: usize, texts: Vec<String>) -> Result<(), DocfillError> {
        let expected = self.paragraphs.get(paragraph).map(|p| p.nodes.len());
        if expected != Some(texts.len()) {
            return Err(DocfillError::Other {
                message: format!(
                    "Rewrite of paragraph {paragraph} in {} has {} runs, expected {:?}",
                    self.name,
                    texts.len(),
                    expected
                ),
            });
        }
        self.edits.insert(paragraph, texts);
        Ok(())
    }

    /// Whether any edit is staged.
    pub fn is_dirty(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Apply staged edits to the markup and hand the result to `package`.
    pub fn commit(&mut self, package: &mut Package, dialect: &Dialect) {
        if self.edits.is_empty() {
            return;
        }

        let mut changes = Vec::new();
        for (&index, texts) in &self.edits {
            let Some(paragraph) = self.paragraphs.get(index) else {
                continue;
            };
            for (node, text) in paragraph.nodes.iter().zip(texts) {
                if node.text != *text {
                    changes.push((node, text.as_str()));
                }
            }
        }

        let xml = splice(&self.xml, &changes, dialect);
        package.replace_part(&self.name, xml);
    }
}

/// A package together with the parts that make up its text surface.
#[derive(Debug)]
pub struct PartSet {
    package: Package,
    parts: Vec<MarkupPart>,
    dialect: &'static Dialect,
}

impl PartSet {
    /// Load `names` from `package`; the flag marks header/footer parts.
    pub fn load(
        mut package: Package,
        names: &[(String, bool)],
        dialect: &'static Dialect,
    ) -> Result<Self, DocfillError> {
        let parts = names
            .iter()
            .map(|(name, header_footer)| MarkupPart::load(&mut package, name, *header_footer, dialect))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            package,
            parts,
            dialect,
        })
    }

    /// Loaded parts, in load order.
    pub fn parts(&self) -> &[MarkupPart] {
        &self.parts
    }

    /// Stage new run texts for a paragraph of a part.
    pub fn rewrite(&mut self, part: usize, paragraph: usize, texts: Vec<String>) -> Result<(), DocfillError> {
        let target = self.parts.get_mut(part).ok_or_else(|| DocfillError::Other {
            message: format!("No part with index {part}"),
        })?;
        target.stage(paragraph, texts)
    }

    /// Commit every staged edit and save the package to `output`.
    pub fn save(&mut self, output: &std::path::Path) -> Result<(), DocfillError> {
        for part in &mut self.parts {
            if part.is_dirty() {
                part.commit(&mut self.package, self.dialect);
            }
        }
        self.package.save(output)
    }
}

//! Minimal document packages for tests.
//!
//! The builders emit just enough package structure for the containers to
//! open: a content-types part, the main part and whatever parts the test adds.
//! Markup helpers return XML fragments so tests can compose bodies freely.

use anyhow::{Context, Result};
use quick_xml::escape::escape;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::document::{DocumentKind, open_document};

const W_NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape""#
);

const P_NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="xml" ContentType="application/xml"/></Types>"#
);

/// Write a zip package holding `parts` (name, content), deflated.
pub fn write_package(path: &Path, parts: &[(&str, &str)]) -> Result<()> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in parts {
        writer.start_file(*name, options)?;
        writer.write_all(content.as_bytes())?;
    }
    let bytes = writer.finish()?.into_inner();
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

/// Read one part of a package as text.
pub fn read_part(path: &Path, name: &str) -> Result<String> {
    let file = std::fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut archive = ZipArchive::new(file)?;
    let mut entry = archive.by_name(name)?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

/// Text of every region of a generated document, in traversal order.
pub fn region_texts(path: &Path) -> Result<Vec<String>> {
    let kind = DocumentKind::from_path(path)?;
    let document = open_document(kind, path)?;
    Ok(document
        .regions()
        .iter()
        .map(|region| region.runs().iter().map(|run| run.text.as_str()).collect())
        .collect())
}

/// A word-processor run.
pub fn w_run(text: &str) -> String {
    format!(r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#, escape(text))
}

/// A bold word-processor run.
pub fn w_bold_run(text: &str) -> String {
    format!(r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#, escape(text))
}

/// A paragraph with one run per entry of `runs`.
pub fn w_paragraph(runs: &[&str]) -> String {
    let runs: String = runs.iter().map(|text| w_run(text)).collect();
    format!("<w:p>{runs}</w:p>")
}

/// A table; each cell holds one single-run paragraph.
pub fn w_table(rows: &[&[&str]]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String =
                cells.iter().map(|text| format!("<w:tc>{}</w:tc>", w_paragraph(&[*text]))).collect();
            format!("<w:tr>{cells}</w:tr>")
        })
        .collect();
    format!("<w:tbl>{rows}</w:tbl>")
}

/// A paragraph carrying a drawing text box with `paragraphs` inside.
///
/// `anchored` selects a floating (`wp:anchor`) drawing over an inline one.
pub fn w_text_box(paragraphs: &str, anchored: bool) -> String {
    let frame = if anchored { "wp:anchor" } else { "wp:inline" };
    format!(
        concat!(
            "<w:p><w:r><w:drawing><{frame}><a:graphic><a:graphicData>",
            "<wps:wsp><wps:txbx><w:txbxContent>{paragraphs}</w:txbxContent></wps:txbx></wps:wsp>",
            "</a:graphicData></a:graphic></{frame}></w:drawing></w:r></w:p>"
        ),
        frame = frame,
        paragraphs = paragraphs
    )
}

/// `word/document.xml` with `body` inside `w:body`.
pub fn docx_document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {W_NAMESPACES}><w:body>{body}<w:sectPr/></w:body></w:document>"#
    )
}

/// A header part with `body` as its content.
pub fn docx_header(body: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:hdr {W_NAMESPACES}>{body}</w:hdr>"#)
}

/// A footer part with `body` as its content.
pub fn docx_footer(body: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:ftr {W_NAMESPACES}>{body}</w:ftr>"#)
}

/// Write a `.docx` with `body` as its document body plus `extra` parts.
pub fn write_docx(path: &Path, body: &str, extra: &[(&str, String)]) -> Result<()> {
    let document = docx_document(body);
    let mut parts: Vec<(&str, &str)> =
        vec![("[Content_Types].xml", CONTENT_TYPES), ("word/document.xml", document.as_str())];
    parts.extend(extra.iter().map(|(name, content)| (*name, content.as_str())));
    write_package(path, &parts)
}

/// A slide paragraph with one run per entry of `runs`.
pub fn a_paragraph(runs: &[&str]) -> String {
    let runs: String = runs
        .iter()
        .map(|text| format!(r#"<a:r><a:rPr lang="pt-BR"/><a:t>{}</a:t></a:r>"#, escape(*text)))
        .collect();
    format!("<a:p>{runs}</a:p>")
}

/// A shape whose text frame holds `paragraphs`.
pub fn p_shape(paragraphs: &str) -> String {
    format!("<p:sp><p:txBody><a:bodyPr/>{paragraphs}</p:txBody></p:sp>")
}

/// A slide table; each cell holds one single-run paragraph.
pub fn p_table(rows: &[&[&str]]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells
                .iter()
                .map(|text| format!("<a:tc><a:txBody><a:bodyPr/>{}</a:txBody></a:tc>", a_paragraph(&[*text])))
                .collect();
            format!("<a:tr>{cells}</a:tr>")
        })
        .collect();
    format!("<p:graphicFrame><a:graphic><a:graphicData><a:tbl>{rows}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>")
}

/// A slide part holding `shapes`.
pub fn pptx_slide(shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld {P_NAMESPACES}><p:cSld><p:spTree>{shapes}</p:spTree></p:cSld></p:sld>"#
    )
}

/// Write a `.pptx` with one slide per entry of `slides` (shape markup).
pub fn write_pptx(path: &Path, slides: &[&str]) -> Result<()> {
    let presentation =
        format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {P_NAMESPACES}/>"#);
    let slide_parts: Vec<(String, String)> = slides
        .iter()
        .enumerate()
        .map(|(i, shapes)| (format!("ppt/slides/slide{}.xml", i + 1), pptx_slide(shapes)))
        .collect();

    let mut parts: Vec<(&str, &str)> =
        vec![("[Content_Types].xml", CONTENT_TYPES), ("ppt/presentation.xml", presentation.as_str())];
    parts.extend(slide_parts.iter().map(|(name, content)| (name.as_str(), content.as_str())));
    write_package(path, &parts)
}

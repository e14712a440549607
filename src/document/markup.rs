//! Byte-faithful scanning and editing of document parts.
//!
//! A part such as `word/document.xml` is scanned once into paragraphs and
//! their text nodes (`w:t` / `a:t`), remembering byte ranges into the original
//! markup. Edits splice new text into those ranges; every other byte of the
//! part is carried over untouched.

use quick_xml::Reader;
use quick_xml::escape::{partial_escape, unescape};
use quick_xml::events::Event;
use std::ops::Range;

/// Element names that drive scanning for one markup vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    /// Paragraph element
    pub paragraph: &'static str,
    /// Text node element
    pub text: &'static str,
    /// Elements that break a paragraph's text into separate segments
    pub breaks: &'static [&'static str],
    /// Table cell element
    pub table_cell: &'static str,
    /// Text box content containers
    pub text_boxes: &'static [&'static str],
    /// Containers of inline (in-line with text) drawings
    pub inline_drawings: &'static [&'static str],
    /// Containers whose text nodes are not editable run text
    pub opaque: &'static [&'static str],
    /// Whether leading/trailing spaces need `xml:space="preserve"`
    pub preserve_space: bool,
}

/// WordprocessingML, used by `.docx` parts.
pub const WORDPROCESSING: Dialect = Dialect {
    paragraph: "w:p",
    text: "w:t",
    breaks: &["w:tab", "w:ptab", "w:br", "w:cr"],
    table_cell: "w:tc",
    text_boxes: &["w:txbxContent"],
    inline_drawings: &["wp:inline"],
    opaque: &[],
    preserve_space: true,
};

/// DrawingML, used by `.pptx` slide parts.
pub const DRAWING: Dialect = Dialect {
    paragraph: "a:p",
    text: "a:t",
    breaks: &["a:br"],
    table_cell: "a:tc",
    text_boxes: &[],
    inline_drawings: &[],
    opaque: &["a:fld"],
    preserve_space: false,
};

/// Containers a paragraph sits in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ancestry {
    /// Inside a table cell
    pub table_cell: bool,
    /// Inside a text box
    pub text_box: bool,
    /// Inside an inline drawing
    pub inline_drawing: bool,
}

/// A text node of a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    /// Byte range of the opening tag (the whole element when self-closing)
    pub open: Range<usize>,
    /// Byte range of the escaped content (empty when self-closing)
    pub content: Range<usize>,
    /// `<w:t/>`
    pub self_closing: bool,
    /// Index of the break-separated segment the node belongs to
    pub segment: usize,
    /// Unescaped text
    pub text: String,
}

/// A paragraph and the text nodes that belong directly to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScannedParagraph {
    /// Containers around the paragraph
    pub ancestry: Ancestry,
    /// Text nodes in document order
    pub nodes: Vec<TextNode>,
}

/// Failure while scanning a part.
#[derive(Debug, thiserror::Error)]
#[error("malformed markup at byte {position}: {message}")]
pub struct MarkupError {
    /// Approximate byte offset
    pub position: usize,
    /// Parser message
    pub message: String,
}

struct OpenParagraph {
    paragraph: ScannedParagraph,
    segment: usize,
}

fn contains(names: &[&str], name: &[u8]) -> bool {
    names.iter().any(|n| n.as_bytes() == name)
}

/// Scan `xml` into paragraphs, in order of their closing tags.
///
/// Nested paragraphs (text boxes inside a paragraph's run) are separate
/// entries; a text node belongs to the innermost open paragraph.
pub fn scan(xml: &str, dialect: &Dialect) -> Result<Vec<ScannedParagraph>, MarkupError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut open: Vec<OpenParagraph> = Vec::new();
    let mut done = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| MarkupError {
            position: reader.buffer_position() as usize,
            message: e.to_string(),
        })?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();

                if name == dialect.paragraph.as_bytes() {
                    open.push(OpenParagraph {
                        paragraph: ScannedParagraph {
                            ancestry: ancestry(&stack, dialect),
                            nodes: Vec::new(),
                        },
                        segment: 0,
                    });
                } else if name == dialect.text.as_bytes() && !inside_opaque(&stack, dialect) {
                    if let Some(current) = open.last_mut() {
                        let node = text_node(xml, after, dialect, current.segment)?;
                        current.paragraph.nodes.push(node);
                    }
                } else if contains(dialect.breaks, &name) {
                    if let Some(current) = open.last_mut() {
                        current.segment += 1;
                    }
                }

                stack.push(name);
            }
            Event::Empty(e) => {
                let name = e.name();
                let name = name.as_ref();

                if name == dialect.text.as_bytes() && !inside_opaque(&stack, dialect) {
                    if let Some(current) = open.last_mut() {
                        let start = tag_start(xml, after);
                        current.paragraph.nodes.push(TextNode {
                            open: start..after,
                            content: after..after,
                            self_closing: true,
                            segment: current.segment,
                            text: String::new(),
                        });
                    }
                } else if contains(dialect.breaks, name) {
                    if let Some(current) = open.last_mut() {
                        current.segment += 1;
                    }
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == dialect.paragraph.as_bytes() {
                    if let Some(finished) = open.pop() {
                        done.push(finished.paragraph);
                    }
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(done)
}

fn ancestry(stack: &[Vec<u8>], dialect: &Dialect) -> Ancestry {
    let mut ancestry = Ancestry::default();
    for name in stack {
        if name.as_slice() == dialect.table_cell.as_bytes() {
            ancestry.table_cell = true;
        }
        if contains(dialect.text_boxes, name) {
            ancestry.text_box = true;
        }
        if contains(dialect.inline_drawings, name) {
            ancestry.inline_drawing = true;
        }
    }
    ancestry
}

fn inside_opaque(stack: &[Vec<u8>], dialect: &Dialect) -> bool {
    stack.iter().any(|name| contains(dialect.opaque, name))
}

/// Start of the tag that ends right before `end`. Attribute values cannot
/// contain a raw `<`, so the last one is the tag's.
fn tag_start(xml: &str, end: usize) -> usize {
    xml[..end].rfind('<').unwrap_or(0)
}

fn text_node(
    xml: &str,
    content_start: usize,
    dialect: &Dialect,
    segment: usize,
) -> Result<TextNode, MarkupError> {
    let open = tag_start(xml, content_start)..content_start;

    // Text nodes hold character data only, so the next `<` closes them
    let content_end = xml[content_start..]
        .find('<')
        .map(|offset| content_start + offset)
        .ok_or_else(|| MarkupError {
            position: content_start,
            message: format!("unterminated <{}>", dialect.text),
        })?;

    let raw = &xml[content_start..content_end];
    let text = unescape(raw)
        .map_err(|e| MarkupError {
            position: content_start,
            message: e.to_string(),
        })?
        .into_owned();

    Ok(TextNode {
        open,
        content: content_start..content_end,
        self_closing: false,
        segment,
        text,
    })
}

fn needs_preserve(text: &str) -> bool {
    text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace)
}

fn with_preserve(open_tag: &str) -> String {
    if open_tag.contains("xml:space") {
        return open_tag.to_string();
    }
    let insert_at = open_tag.len() - 1;
    format!("{} xml:space=\"preserve\"{}", &open_tag[..insert_at], &open_tag[insert_at..])
}

/// Splice new texts into `xml`.
///
/// `edits` pairs a scanned node with its replacement text. Nodes must come
/// from a scan of this very `xml`.
pub fn splice(xml: &str, edits: &[(&TextNode, &str)], dialect: &Dialect) -> String {
    let mut ordered: Vec<_> = edits.iter().collect();
    ordered.sort_by_key(|(node, _)| node.open.start);

    let mut out = String::with_capacity(xml.len());
    let mut cursor = 0;

    for (node, new_text) in ordered {
        let preserve = dialect.preserve_space && needs_preserve(new_text);
        let escaped = partial_escape(new_text);

        if node.self_closing {
            if new_text.is_empty() {
                continue;
            }
            out.push_str(&xml[cursor..node.open.start]);
            let attr = if preserve { " xml:space=\"preserve\"" } else { "" };
            out.push_str(&format!("<{0}{attr}>{escaped}</{0}>", dialect.text));
            cursor = node.open.end;
        } else {
            out.push_str(&xml[cursor..node.open.start]);
            let open_tag = &xml[node.open.clone()];
            if preserve {
                out.push_str(&with_preserve(open_tag));
            } else {
                out.push_str(open_tag);
            }
            out.push_str(&escaped);
            cursor = node.content.end;
        }
    }

    out.push_str(&xml[cursor..]);
    out
}

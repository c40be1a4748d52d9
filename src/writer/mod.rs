//! Deterministic serialization
//!
//! Renders a document back to XML text. Attribute and child order are
//! written exactly as stored, escaping is minimal and fixed, and identical
//! trees always produce identical bytes. Serialization is iterative with
//! an explicit stack, so pathologically deep trees cannot overflow the
//! call stack.
//!
//! Options cover the embedding cases: a leading XML declaration (off by
//! default, since the sanitized fragment is usually embedded by the
//! caller), two-space indentation (only applied around element-only
//! content, so a re-parse yields the same tree up to whitespace), and the
//! output encoding.

use crate::core::encoding::{self, Encoding};
use crate::dom::{Document, NodeId, NodeKind, DOCUMENT_NODE};

/// Serialization options.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Emit `<?xml version="1.0" encoding="..."?>` first
    pub declaration: bool,
    /// Pretty-print element-only content with two-space indentation
    pub indent: bool,
    /// Byte encoding used by [`write_document_bytes`]
    pub encoding: Encoding,
}

/// Serialize a document to a string.
///
/// An empty document yields an empty string (or just the declaration).
pub fn write_document(doc: &Document, options: &WriteOptions) -> String {
    let mut buf = String::with_capacity(1024);

    let top: Vec<NodeId> = doc.children(DOCUMENT_NODE).collect();
    if options.declaration {
        buf.push_str("<?xml version=\"1.0\" encoding=\"");
        buf.push_str(options.encoding.name());
        buf.push_str("\"?>");
        if !top.is_empty() {
            buf.push('\n');
        }
    }

    for (i, &id) in top.iter().enumerate() {
        write_node(doc, id, options, i > 0 && options.indent, &mut buf);
    }
    buf
}

/// Serialize a document into bytes in the configured encoding. UTF-16
/// output carries a byte order mark.
pub fn write_document_bytes(doc: &Document, options: &WriteOptions) -> Vec<u8> {
    encoding::encode(&write_document(doc, options), options.encoding)
}

enum StackEntry {
    Enter(NodeId, u16, bool),
    Close(NodeId, u16, bool),
}

fn write_node(
    doc: &Document,
    node_id: NodeId,
    options: &WriteOptions,
    newline_before: bool,
    buf: &mut String,
) {
    let mut stack: Vec<StackEntry> = Vec::with_capacity(64);
    stack.push(StackEntry::Enter(node_id, 0, newline_before));

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Close(id, depth, indented) => {
                if indented {
                    indent(buf, depth);
                }
                buf.push_str("</");
                buf.push_str(doc.node_name(id).unwrap_or_default());
                buf.push('>');
            }
            StackEntry::Enter(id, depth, indent_before) => {
                let node = match doc.node(id) {
                    Some(node) => node,
                    None => continue,
                };
                if indent_before {
                    indent(buf, depth);
                }

                match node.kind {
                    NodeKind::Element => {
                        buf.push('<');
                        buf.push_str(doc.node_name(id).unwrap_or_default());
                        for (name, value) in doc.attribute_values(id) {
                            buf.push(' ');
                            buf.push_str(name);
                            buf.push_str("=\"");
                            escape_attribute(value, buf);
                            buf.push('"');
                        }

                        if !node.has_children() {
                            buf.push_str("/>");
                            continue;
                        }
                        buf.push('>');

                        // Indentation would perturb character data, so only
                        // element-only content is pretty-printed
                        let indent_children = options.indent
                            && doc.children(id).all(|c| {
                                !matches!(
                                    doc.node(c).map(|n| n.kind),
                                    Some(NodeKind::Text) | Some(NodeKind::CData)
                                )
                            });

                        stack.push(StackEntry::Close(id, depth, indent_children));
                        let children: Vec<NodeId> = doc.children(id).collect();
                        for &child in children.iter().rev() {
                            stack.push(StackEntry::Enter(child, depth + 1, indent_children));
                        }
                    }
                    NodeKind::Text => {
                        escape_text(doc.content(id).unwrap_or_default(), buf);
                    }
                    NodeKind::CData => {
                        buf.push_str("<![CDATA[");
                        buf.push_str(doc.content(id).unwrap_or_default());
                        buf.push_str("]]>");
                    }
                    NodeKind::Comment => {
                        buf.push_str("<!--");
                        buf.push_str(doc.content(id).unwrap_or_default());
                        buf.push_str("-->");
                    }
                    NodeKind::ProcessingInstruction => {
                        buf.push_str("<?");
                        buf.push_str(doc.node_name(id).unwrap_or_default());
                        let data = doc.content(id).unwrap_or_default();
                        if !data.is_empty() {
                            buf.push(' ');
                            buf.push_str(data);
                        }
                        buf.push_str("?>");
                    }
                    NodeKind::Document => {}
                }
            }
        }
    }
}

fn indent(buf: &mut String, depth: u16) {
    buf.push('\n');
    for _ in 0..depth {
        buf.push_str("  ");
    }
}

fn escape_text(s: &str, buf: &mut String) {
    for c in s.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            _ => buf.push(c),
        }
    }
}

fn escape_attribute(s: &str, buf: &mut String) {
    for c in s.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            _ => buf.push(c),
        }
    }
}

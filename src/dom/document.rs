//! Arena document
//!
//! A parsed or programmatically built tree:
//! - Arena allocation for nodes and attributes
//! - NodeId indices for traversal
//! - String interning for labels, names, and content
//!
//! Each document owns its arenas outright; nothing is shared between
//! documents, so a transform's output never aliases its input.

use super::node::{Attribute, Node, NodeId, NodeKind, DOCUMENT_NODE};
use super::strings::StringPool;
use crate::core::{encoding, scanner};
use crate::error::ScrubError;
use crate::reader::{SliceReader, XmlEvent};

/// An ordered, attributed, labeled tree.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    attributes: Vec<Attribute>,
    strings: StringPool,
    root_element: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document (just the document root node).
    pub fn new() -> Self {
        let mut doc = Document {
            nodes: Vec::with_capacity(256),
            attributes: Vec::with_capacity(64),
            strings: StringPool::new(),
            root_element: None,
        };
        doc.nodes.push(Node::document());
        doc
    }

    /// Parse a document from bytes. UTF-16 input is converted first.
    ///
    /// Fails fast on any well-formedness violation; no partial tree is ever
    /// returned. An input with no elements parses to an empty document.
    pub fn parse(input: &[u8]) -> Result<Self, ScrubError> {
        let text = encoding::to_utf8(input).map_err(|e| ScrubError::parse(e.message, 0))?;
        let mut doc = Document::new();
        doc.build(&text)?;
        Ok(doc)
    }

    fn build(&mut self, input: &[u8]) -> Result<(), ScrubError> {
        let mut reader = SliceReader::new(input);
        // Open elements, document node at the bottom
        let mut stack: Vec<NodeId> = vec![DOCUMENT_NODE];

        loop {
            let at = reader.offset();
            let event = match reader.next_event()? {
                Some(event) => event,
                None => break,
            };
            let parent = *stack.last().unwrap_or(&DOCUMENT_NODE);

            match event {
                XmlEvent::Start(tag) => {
                    let id = self.append_element(parent, &tag, at)?;
                    stack.push(id);
                }
                XmlEvent::Empty(tag) => {
                    self.append_element(parent, &tag, at)?;
                }
                XmlEvent::End { name } => {
                    if stack.len() == 1 {
                        return Err(ScrubError::parse("unexpected end tag", at));
                    }
                    let name_id = self.strings.intern(name);
                    if self.nodes[parent as usize].name_id != name_id {
                        return Err(ScrubError::parse("mismatched end tag", at));
                    }
                    stack.pop();
                }
                XmlEvent::Text(content) => {
                    if stack.len() == 1 {
                        // Inter-element whitespace in the prolog/epilog
                        if content.iter().all(|&b| scanner::is_whitespace(b)) {
                            continue;
                        }
                        return Err(ScrubError::parse(
                            "text content not allowed at document level",
                            at,
                        ));
                    }
                    let content_id = self.strings.intern(&content);
                    let depth = stack.len() as u16;
                    self.push_linked(parent, Node::text(content_id, parent, depth));
                }
                XmlEvent::CData(content) => {
                    if stack.len() == 1 {
                        return Err(ScrubError::parse(
                            "CDATA section not allowed at document level",
                            at,
                        ));
                    }
                    let content_id = self.strings.intern(content);
                    let depth = stack.len() as u16;
                    self.push_linked(parent, Node::cdata(content_id, parent, depth));
                }
                XmlEvent::Comment(content) => {
                    let content_id = self.strings.intern(content);
                    let depth = stack.len() as u16;
                    self.push_linked(parent, Node::comment(content_id, parent, depth));
                }
                XmlEvent::Pi { target, data } => {
                    let name_id = self.strings.intern(target);
                    let content_id = self.strings.intern(data.unwrap_or(b""));
                    let depth = stack.len() as u16;
                    self.push_linked(
                        parent,
                        Node::processing_instruction(name_id, content_id, parent, depth),
                    );
                }
                XmlEvent::Declaration | XmlEvent::DocType => {}
            }
        }

        if stack.len() > 1 {
            let name = self
                .node_name(*stack.last().unwrap_or(&DOCUMENT_NODE))
                .unwrap_or("?");
            return Err(ScrubError::parse(
                format!("unclosed element <{name}>"),
                reader.offset(),
            ));
        }
        Ok(())
    }

    fn append_element(
        &mut self,
        parent: NodeId,
        tag: &crate::reader::StartTag<'_>,
        at: usize,
    ) -> Result<NodeId, ScrubError> {
        if parent == DOCUMENT_NODE && self.root_element.is_some() {
            return Err(ScrubError::parse("document has multiple root elements", at));
        }

        let name_id = self.strings.intern(tag.name);
        let depth = self.nodes[parent as usize].depth + 1;
        let attr_start = self.attributes.len() as u32;

        let mut node = Node::element(name_id, parent, depth);
        node.attr_start = attr_start;
        node.attr_count = tag.attributes.len() as u16;
        for attr in &tag.attributes {
            let name_id = self.strings.intern(attr.name);
            let value_id = self.strings.intern(&attr.value);
            self.attributes.push(Attribute { name_id, value_id });
        }

        let id = self.push_linked(parent, node);
        if parent == DOCUMENT_NODE {
            self.root_element = Some(id);
        }
        Ok(id)
    }

    /// Link a new node under its parent and return its ID.
    fn push_linked(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);

        let last = self.nodes[parent as usize].last_child;
        if let Some(prev) = last {
            self.nodes[id as usize].prev_sibling = Some(prev);
            self.nodes[prev as usize].next_sibling = Some(id);
        } else {
            self.nodes[parent as usize].first_child = Some(id);
        }
        self.nodes[parent as usize].last_child = Some(id);
        id
    }

    // ------------------------------------------------------------------
    // Programmatic building (used by the transform engine and callers
    // constructing trees by hand). `parent` must be a valid ID in this
    // document.
    // ------------------------------------------------------------------

    /// Append an element under `parent`.
    pub fn push_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let name_id = self.strings.intern_str(name);
        let depth = self.nodes[parent as usize].depth + 1;
        let attr_start = self.attributes.len() as u32;

        let mut node = Node::element(name_id, parent, depth);
        node.attr_start = attr_start;

        let id = self.push_linked(parent, node);
        if parent == DOCUMENT_NODE && self.root_element.is_none() {
            self.root_element = Some(id);
        }
        id
    }

    /// Append an attribute to `element`. Attributes must be added before any
    /// later node is created, so each element's attributes stay contiguous
    /// in the arena.
    pub fn push_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        let name_id = self.strings.intern_str(name);
        let value_id = self.strings.intern_str(value);
        debug_assert_eq!(
            self.nodes[element as usize].attr_start as usize
                + self.nodes[element as usize].attr_count as usize,
            self.attributes.len(),
        );
        self.attributes.push(Attribute { name_id, value_id });
        self.nodes[element as usize].attr_count += 1;
    }

    /// Append a text node under `parent`.
    pub fn push_text(&mut self, parent: NodeId, content: &str) -> NodeId {
        let content_id = self.strings.intern_str(content);
        let depth = self.nodes[parent as usize].depth + 1;
        self.push_linked(parent, Node::text(content_id, parent, depth))
    }

    /// Append a CDATA node under `parent`.
    pub fn push_cdata(&mut self, parent: NodeId, content: &str) -> NodeId {
        let content_id = self.strings.intern_str(content);
        let depth = self.nodes[parent as usize].depth + 1;
        self.push_linked(parent, Node::cdata(content_id, parent, depth))
    }

    /// Append a comment node under `parent`.
    pub fn push_comment(&mut self, parent: NodeId, content: &str) -> NodeId {
        let content_id = self.strings.intern_str(content);
        let depth = self.nodes[parent as usize].depth + 1;
        self.push_linked(parent, Node::comment(content_id, parent, depth))
    }

    /// Append a processing instruction under `parent`.
    pub fn push_pi(&mut self, parent: NodeId, target: &str, data: &str) -> NodeId {
        let name_id = self.strings.intern_str(target);
        let content_id = self.strings.intern_str(data);
        let depth = self.nodes[parent as usize].depth + 1;
        self.push_linked(
            parent,
            Node::processing_instruction(name_id, content_id, parent, depth),
        )
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The root element, if the document has one.
    pub fn root_element_id(&self) -> Option<NodeId> {
        self.root_element
    }

    /// True when the document has no root element (e.g. a fully redacted
    /// output). An empty document is a valid result, not an error.
    pub fn is_empty(&self) -> bool {
        self.root_element.is_none()
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Element label or processing-instruction target.
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id)?;
        self.strings.get_str(node.name_id)
    }

    /// Content of a text, CDATA, comment, or processing-instruction node.
    pub fn content(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Text
            | NodeKind::CData
            | NodeKind::Comment
            | NodeKind::ProcessingInstruction => self.strings.get_str(node.content_id),
            _ => None,
        }
    }

    /// Attributes of an element, in document order.
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match self.node(id) {
            Some(node) => {
                let start = node.attr_start as usize;
                let end = start + node.attr_count as usize;
                &self.attributes[start..end]
            }
            None => &[],
        }
    }

    /// Attribute names and values of an element, in document order.
    pub fn attribute_values(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.attributes(id)
            .iter()
            .filter_map(|attr| {
                let name = self.strings.get_str(attr.name_id)?;
                let value = self.strings.get_str(attr.value_id)?;
                Some((name, value))
            })
            .collect()
    }

    /// Look up an attribute value by name.
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        for attr in self.attributes(id) {
            if self.strings.get_str(attr.name_id) == Some(name) {
                return self.strings.get_str(attr.value_id);
            }
        }
        None
    }

    /// Iterate over the children of a node.
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Iterate over all descendants of a node, depth-first.
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let mut stack = Vec::new();
        if let Some(node) = self.node(id) {
            let mut child = node.last_child;
            while let Some(cid) = child {
                stack.push(cid);
                child = self.node(cid).and_then(|n| n.prev_sibling);
            }
        }
        DescendantIter { doc: self, stack }
    }

    /// Total number of nodes, including the document node.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Verify the linked-arena invariants: every node reachable exactly once
    /// from the document node, with consistent parent and sibling links.
    ///
    /// Parsed documents satisfy this by construction; the check exists for
    /// hand-built trees and fails fast before any transform output is built.
    pub fn check_links(&self) -> Result<(), ScrubError> {
        let mut visited = vec![false; self.nodes.len()];
        visited[DOCUMENT_NODE as usize] = true;
        let mut reached = 1usize;
        let mut stack = vec![DOCUMENT_NODE];

        while let Some(id) = stack.pop() {
            let mut prev: Option<NodeId> = None;
            let mut child = self.nodes[id as usize].first_child;
            while let Some(cid) = child {
                let node = self.node(cid).ok_or_else(|| {
                    ScrubError::MalformedInput(format!("child id {cid} out of bounds"))
                })?;
                if visited[cid as usize] {
                    return Err(ScrubError::MalformedInput(format!(
                        "node {cid} is reachable more than once"
                    )));
                }
                visited[cid as usize] = true;
                reached += 1;

                if node.parent != Some(id) {
                    return Err(ScrubError::MalformedInput(format!(
                        "node {cid} has a parent link that does not match its actual parent {id}"
                    )));
                }
                if node.prev_sibling != prev {
                    return Err(ScrubError::MalformedInput(format!(
                        "node {cid} has an inconsistent sibling back-link"
                    )));
                }
                prev = Some(cid);
                stack.push(cid);
                child = node.next_sibling;
            }
            if self.nodes[id as usize].last_child != prev {
                return Err(ScrubError::MalformedInput(format!(
                    "node {id} has an inconsistent last-child link"
                )));
            }
        }

        if reached != self.nodes.len() {
            return Err(ScrubError::MalformedInput(format!(
                "{} of {} nodes are unreachable from the document node",
                self.nodes.len() - reached,
                self.nodes.len()
            )));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }
}

/// Iterator over child nodes.
pub struct ChildIter<'d> {
    doc: &'d Document,
    next: Option<NodeId>,
}

impl<'d> Iterator for ChildIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over descendant nodes, depth-first pre-order.
pub struct DescendantIter<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl<'d> Iterator for DescendantIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Some(node) = self.doc.node(current) {
            let mut child = node.last_child;
            while let Some(cid) = child {
                self.stack.push(cid);
                child = self.doc.node(cid).and_then(|n| n.prev_sibling);
            }
        }
        Some(current)
    }
}

//! Tree nodes
//!
//! Nodes live in an arena and reference each other through NodeId (u32)
//! indices, keeping traversal cache-friendly. Labels and content are string
//! pool IDs.

use super::strings::StringId;

/// Compact node identifier (index into the arena).
pub type NodeId = u32;

/// The arena index of the document root node.
pub const DOCUMENT_NODE: NodeId = 0;

/// Type of tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root (arena index 0, exactly one per tree)
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Element label or processing-instruction target
    pub name_id: StringId,
    /// Text/CDATA/comment content or processing-instruction data
    pub content_id: StringId,
    /// Start of this element's attributes in the attribute arena
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u16,
    /// Depth below the document node
    pub depth: u16,
}

impl Node {
    fn blank(kind: NodeKind, parent: Option<NodeId>, depth: u16) -> Self {
        Node {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id: 0,
            content_id: 0,
            attr_start: 0,
            attr_count: 0,
            depth,
        }
    }

    /// Create the document root node.
    pub fn document() -> Self {
        Self::blank(NodeKind::Document, None, 0)
    }

    /// Create an element node.
    pub fn element(name_id: StringId, parent: NodeId, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::Element, Some(parent), depth);
        node.name_id = name_id;
        node
    }

    /// Create a text node.
    pub fn text(content_id: StringId, parent: NodeId, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::Text, Some(parent), depth);
        node.content_id = content_id;
        node
    }

    /// Create a CDATA node.
    pub fn cdata(content_id: StringId, parent: NodeId, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::CData, Some(parent), depth);
        node.content_id = content_id;
        node
    }

    /// Create a comment node.
    pub fn comment(content_id: StringId, parent: NodeId, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::Comment, Some(parent), depth);
        node.content_id = content_id;
        node
    }

    /// Create a processing-instruction node.
    pub fn processing_instruction(
        name_id: StringId,
        content_id: StringId,
        parent: NodeId,
        depth: u16,
    ) -> Self {
        let mut node = Self::blank(NodeKind::ProcessingInstruction, Some(parent), depth);
        node.name_id = name_id;
        node.content_id = content_id;
        node
    }

    /// Check if this is an element node.
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this node has children.
    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }

    /// Check if this node has attributes.
    #[inline]
    pub fn has_attributes(&self) -> bool {
        self.attr_count > 0
    }
}

/// Stored attribute. Order in the arena is document order.
#[derive(Debug, Clone, Copy)]
pub struct Attribute {
    pub name_id: StringId,
    pub value_id: StringId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_node() {
        let doc = Node::document();
        assert_eq!(doc.kind, NodeKind::Document);
        assert!(doc.parent.is_none());
        assert_eq!(doc.depth, 0);
    }

    #[test]
    fn test_element_node() {
        let elem = Node::element(1, DOCUMENT_NODE, 1);
        assert_eq!(elem.kind, NodeKind::Element);
        assert_eq!(elem.parent, Some(DOCUMENT_NODE));
        assert_eq!(elem.name_id, 1);
        assert!(!elem.has_children());
        assert!(!elem.has_attributes());
    }

    #[test]
    fn test_content_nodes() {
        let text = Node::text(3, 1, 2);
        assert_eq!(text.kind, NodeKind::Text);
        assert_eq!(text.content_id, 3);
        assert_eq!(text.name_id, 0);

        let pi = Node::processing_instruction(4, 5, 1, 2);
        assert_eq!(pi.name_id, 4);
        assert_eq!(pi.content_id, 5);
    }
}

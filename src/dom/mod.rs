//! Arena-based document model:
//! - Arena allocation for nodes and attributes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for labels, names, and content

pub mod document;
pub mod node;
pub mod strings;

pub use document::{ChildIter, DescendantIter, Document};
pub use node::{Attribute, Node, NodeId, NodeKind, DOCUMENT_NODE};
pub use strings::{StringId, StringPool};

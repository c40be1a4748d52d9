//! Pull-parser events
//!
//! Borrowed views into the input slice. Text and attribute values are
//! entity-decoded (Cow keeps the zero-copy fast path); structural slices
//! (names, comment bodies) reference the input directly.

use crate::core::attributes::Attribute;
use std::borrow::Cow;

/// A start tag with its attribute list, shared by `Start` and `Empty`.
#[derive(Debug)]
pub struct StartTag<'a> {
    pub name: &'a [u8],
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> StartTag<'a> {
    /// Tag name as a string.
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name).ok()
    }
}

/// One parsing event.
#[derive(Debug)]
pub enum XmlEvent<'a> {
    /// `<name ...>`
    Start(StartTag<'a>),
    /// `<name .../>`
    Empty(StartTag<'a>),
    /// `</name>`
    End { name: &'a [u8] },
    /// Character data between tags, entities decoded
    Text(Cow<'a, [u8]>),
    /// `<![CDATA[...]]>` body, verbatim
    CData(&'a [u8]),
    /// `<!--...-->` body, verbatim
    Comment(&'a [u8]),
    /// `<?target data?>`
    Pi {
        target: &'a [u8],
        data: Option<&'a [u8]>,
    },
    /// `<?xml ...?>` prolog declaration
    Declaration,
    /// `<!DOCTYPE ...>` declaration
    DocType,
}

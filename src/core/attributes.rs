//! XML attribute parsing
//!
//! Parses the attribute list of a start tag (the bytes between the element
//! name and `>` or `/>`). Values must be quoted, entity references are
//! decoded, and duplicate names are rejected.

use super::entities;
use super::scanner::{is_name_start_char, scan_name, skip_whitespace};
use memchr::memchr;
use std::borrow::Cow;

/// A parsed attribute. The name borrows the input; the value is decoded.
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    pub name: &'a [u8],
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    /// Get the name as a string.
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name).ok()
    }

    /// Get the decoded value as a string.
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(self.value.as_ref()).ok()
    }
}

/// Parsing failure with an offset into the attribute slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrError {
    pub message: &'static str,
    pub at: usize,
}

/// Parse an attribute list.
pub fn parse(input: &[u8]) -> Result<Vec<Attribute<'_>>, AttrError> {
    let mut attrs: Vec<Attribute<'_>> = Vec::new();
    let mut pos = 0;

    loop {
        pos = skip_whitespace(input, pos);
        if pos >= input.len() {
            break;
        }

        if !is_name_start_char(input[pos]) {
            return Err(AttrError {
                message: "attribute name must start with a letter, '_' or ':'",
                at: pos,
            });
        }

        let name_start = pos;
        pos = scan_name(input, pos);
        let name = &input[name_start..pos];

        if attrs.iter().any(|a| a.name == name) {
            return Err(AttrError {
                message: "duplicate attribute",
                at: name_start,
            });
        }

        pos = skip_whitespace(input, pos);
        if pos >= input.len() || input[pos] != b'=' {
            return Err(AttrError {
                message: "attribute value required",
                at: pos.min(input.len()),
            });
        }
        pos = skip_whitespace(input, pos + 1);

        if pos >= input.len() || (input[pos] != b'"' && input[pos] != b'\'') {
            return Err(AttrError {
                message: "attribute value must be quoted",
                at: pos.min(input.len()),
            });
        }
        let quote = input[pos];
        pos += 1;

        let value_start = pos;
        let close = memchr(quote, &input[pos..]).ok_or(AttrError {
            message: "attribute value has no closing quote",
            at: value_start,
        })?;
        let raw = &input[value_start..value_start + close];

        if memchr(b'<', raw).is_some() {
            return Err(AttrError {
                message: "attribute value cannot contain '<'",
                at: value_start,
            });
        }

        let value = entities::decode(raw).map_err(|e| AttrError {
            message: e.message,
            at: value_start + e.at,
        })?;

        attrs.push(Attribute { name, value });
        pos = value_start + close + 1;
    }

    Ok(attrs)
}

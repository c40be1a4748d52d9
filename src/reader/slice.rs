//! Slice pull parser
//!
//! Single forward pass over a UTF-8 byte slice, producing events without
//! building any tree. Well-formedness violations that are visible at this
//! level (unterminated constructs, unquoted or duplicate attributes, bad
//! entity references) fail immediately with a byte offset; tag balance is
//! checked by the document builder, which owns the open-element stack.

use super::events::{StartTag, XmlEvent};
use crate::core::attributes;
use crate::core::entities;
use crate::core::scanner;
use crate::error::ScrubError;

/// Pull parser over a byte slice.
pub struct SliceReader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    /// Create a reader. The input must already be UTF-8.
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader { input, pos: 0 }
    }

    /// Current byte offset, for error reporting by the caller.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Produce the next event, or None at end of input.
    pub fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>, ScrubError> {
        if self.pos >= self.input.len() {
            return Ok(None);
        }

        if self.input[self.pos] != b'<' {
            return self.read_text().map(Some);
        }

        let rest = &self.input[self.pos..];
        if rest.starts_with(b"<!--") {
            self.read_comment().map(Some)
        } else if rest.starts_with(b"<![CDATA[") {
            self.read_cdata().map(Some)
        } else if rest.starts_with(b"<!") {
            self.read_doctype().map(Some)
        } else if rest.starts_with(b"<?") {
            self.read_pi().map(Some)
        } else if rest.starts_with(b"</") {
            self.read_end_tag().map(Some)
        } else {
            self.read_start_tag().map(Some)
        }
    }

    fn read_text(&mut self) -> Result<XmlEvent<'a>, ScrubError> {
        let start = self.pos;
        let end = scanner::find_markup(self.input, start).unwrap_or(self.input.len());
        self.pos = end;

        let decoded = entities::decode(&self.input[start..end])
            .map_err(|e| ScrubError::parse(e.message, start + e.at))?;
        Ok(XmlEvent::Text(decoded))
    }

    fn read_comment(&mut self) -> Result<XmlEvent<'a>, ScrubError> {
        let body_start = self.pos + 4;
        let end = scanner::find_terminator(self.input, body_start, b"-->")
            .ok_or_else(|| ScrubError::parse("unterminated comment", self.pos))?;
        self.pos = end + 3;
        Ok(XmlEvent::Comment(&self.input[body_start..end]))
    }

    fn read_cdata(&mut self) -> Result<XmlEvent<'a>, ScrubError> {
        let body_start = self.pos + 9;
        let end = scanner::find_terminator(self.input, body_start, b"]]>")
            .ok_or_else(|| ScrubError::parse("unterminated CDATA section", self.pos))?;
        self.pos = end + 3;
        Ok(XmlEvent::CData(&self.input[body_start..end]))
    }

    fn read_doctype(&mut self) -> Result<XmlEvent<'a>, ScrubError> {
        let end = scanner::find_doctype_end(self.input, self.pos + 2)
            .ok_or_else(|| ScrubError::parse("unterminated '<!' declaration", self.pos))?;
        self.pos = end + 1;
        Ok(XmlEvent::DocType)
    }

    fn read_pi(&mut self) -> Result<XmlEvent<'a>, ScrubError> {
        let body_start = self.pos + 2;
        let end = scanner::find_terminator(self.input, body_start, b"?>")
            .ok_or_else(|| ScrubError::parse("unterminated processing instruction", self.pos))?;

        let target_end = scanner::scan_name(self.input, body_start);
        if target_end == body_start {
            return Err(ScrubError::parse(
                "processing instruction requires a target",
                self.pos,
            ));
        }
        let target = &self.input[body_start..target_end];

        let data_start = scanner::skip_whitespace(self.input, target_end);
        let data = if data_start < end {
            Some(&self.input[data_start..end])
        } else {
            None
        };

        self.pos = end + 2;
        if target.eq_ignore_ascii_case(b"xml") {
            Ok(XmlEvent::Declaration)
        } else {
            Ok(XmlEvent::Pi { target, data })
        }
    }

    fn read_end_tag(&mut self) -> Result<XmlEvent<'a>, ScrubError> {
        let name_start = self.pos + 2;
        if name_start >= self.input.len() || !scanner::is_name_start_char(self.input[name_start]) {
            return Err(ScrubError::parse("expected element name in end tag", self.pos));
        }
        let name_end = scanner::scan_name(self.input, name_start);
        let gt = scanner::skip_whitespace(self.input, name_end);
        if gt >= self.input.len() || self.input[gt] != b'>' {
            return Err(ScrubError::parse("malformed end tag", self.pos));
        }

        let name = &self.input[name_start..name_end];
        self.pos = gt + 1;
        Ok(XmlEvent::End { name })
    }

    fn read_start_tag(&mut self) -> Result<XmlEvent<'a>, ScrubError> {
        let name_start = self.pos + 1;
        if name_start >= self.input.len() || !scanner::is_name_start_char(self.input[name_start]) {
            return Err(ScrubError::parse("expected element name after '<'", self.pos));
        }
        let name_end = scanner::scan_name(self.input, name_start);

        let gt = scanner::find_tag_end(self.input, name_end)
            .ok_or_else(|| ScrubError::parse("unterminated start tag", self.pos))?;
        let empty = gt > name_end && self.input[gt - 1] == b'/';
        let attr_end = if empty { gt - 1 } else { gt };

        let attrs = attributes::parse(&self.input[name_end..attr_end])
            .map_err(|e| ScrubError::parse(e.message, name_end + e.at))?;

        let tag = StartTag {
            name: &self.input[name_start..name_end],
            attributes: attrs,
        };
        self.pos = gt + 1;
        if empty {
            Ok(XmlEvent::Empty(tag))
        } else {
            Ok(XmlEvent::Start(tag))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &[u8]) -> Vec<String> {
        let mut reader = SliceReader::new(input);
        let mut out = Vec::new();
        while let Some(event) = reader.next_event().unwrap() {
            out.push(match event {
                XmlEvent::Start(tag) => format!("start:{}", tag.name_str().unwrap()),
                XmlEvent::Empty(tag) => format!("empty:{}", tag.name_str().unwrap()),
                XmlEvent::End { name } => {
                    format!("end:{}", std::str::from_utf8(name).unwrap())
                }
                XmlEvent::Text(t) => format!("text:{}", String::from_utf8_lossy(&t)),
                XmlEvent::CData(c) => format!("cdata:{}", String::from_utf8_lossy(c)),
                XmlEvent::Comment(c) => format!("comment:{}", String::from_utf8_lossy(c)),
                XmlEvent::Pi { target, .. } => {
                    format!("pi:{}", String::from_utf8_lossy(target))
                }
                XmlEvent::Declaration => "decl".to_string(),
                XmlEvent::DocType => "doctype".to_string(),
            });
        }
        out
    }

    #[test]
    fn test_simple_document() {
        let events = collect(b"<root><child>hi</child></root>");
        assert_eq!(
            events,
            vec!["start:root", "start:child", "text:hi", "end:child", "end:root"]
        );
    }

    #[test]
    fn test_empty_element() {
        let events = collect(b"<root><leaf/></root>");
        assert_eq!(events, vec!["start:root", "empty:leaf", "end:root"]);
    }

    #[test]
    fn test_declaration_and_comment() {
        let events = collect(b"<?xml version=\"1.0\"?><!-- note --><r/>");
        assert_eq!(events, vec!["decl", "comment: note ", "empty:r"]);
    }

    #[test]
    fn test_processing_instruction() {
        let mut reader = SliceReader::new(b"<?style href=\"x\"?><r/>");
        match reader.next_event().unwrap().unwrap() {
            XmlEvent::Pi { target, data } => {
                assert_eq!(target, b"style");
                assert_eq!(data, Some(b"href=\"x\"" as &[u8]));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_cdata() {
        let events = collect(b"<r><![CDATA[a < b & c]]></r>");
        assert_eq!(events, vec!["start:r", "cdata:a < b & c", "end:r"]);
    }

    #[test]
    fn test_doctype_skipped_as_event() {
        let events = collect(b"<!DOCTYPE metadata><r/>");
        assert_eq!(events, vec!["doctype", "empty:r"]);
    }

    #[test]
    fn test_text_entities_decoded() {
        let events = collect(b"<r>a &amp; b</r>");
        assert_eq!(events, vec!["start:r", "text:a & b", "end:r"]);
    }

    #[test]
    fn test_attributes_parsed() {
        let mut reader = SliceReader::new(b"<r a=\"1\" b=\"2\"/>");
        match reader.next_event().unwrap().unwrap() {
            XmlEvent::Empty(tag) => {
                assert_eq!(tag.attributes.len(), 2);
                assert_eq!(tag.attributes[0].name_str(), Some("a"));
                assert_eq!(tag.attributes[1].value_str(), Some("2"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_start_tag() {
        let mut reader = SliceReader::new(b"<root a=\"1\"");
        let err = reader.next_event().unwrap_err();
        assert!(err.to_string().contains("unterminated start tag"));
    }

    #[test]
    fn test_unterminated_comment() {
        let mut reader = SliceReader::new(b"<!-- never closed");
        let err = reader.next_event().unwrap_err();
        assert!(err.to_string().contains("unterminated comment"));
    }

    #[test]
    fn test_bad_entity_offset() {
        let mut reader = SliceReader::new(b"<r>x &nope; y</r>");
        reader.next_event().unwrap();
        let err = reader.next_event().unwrap_err();
        match err {
            ScrubError::Parse { offset, .. } => assert_eq!(offset, 5),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

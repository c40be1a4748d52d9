//! xmlscrub - Declarative subtree redaction for XML metadata
//!
//! Pipeline:
//! - Parse: slice pull parser into an arena DOM (dom, reader, core)
//! - Match: priority-ordered rules over element paths (rules)
//! - Transform: single-pass copy that drops matched subtrees (transform)
//! - Write: deterministic serialization with embedding options (writer)
//!
//! The common case is one call:
//!
//! ```
//! let cleaned = xmlscrub::scrub_fgdc(
//!     b"<metadata><idinfo><ptcontac>secret</ptcontac></idinfo></metadata>",
//! )
//! .unwrap();
//! assert_eq!(cleaned, "<metadata><idinfo/></metadata>");
//! ```

pub mod core;
pub mod dom;
pub mod error;
pub mod profiles;
pub mod reader;
pub mod rules;
pub mod transform;
pub mod writer;

pub use crate::core::encoding::Encoding;
pub use crate::dom::{Document, NodeId, NodeKind};
pub use crate::error::ScrubError;
pub use crate::rules::{Action, Pattern, PatternCache, Rule, RuleSet, RuleSetBuilder, RuleSpec};
pub use crate::transform::{scrub_batch, transform, transform_batch};
pub use crate::writer::{write_document, write_document_bytes, WriteOptions};

/// Parse, transform, and serialize in one step.
pub fn scrub(
    input: &[u8],
    rules: &RuleSet,
    options: &WriteOptions,
) -> Result<String, ScrubError> {
    let doc = Document::parse(input)?;
    let out = transform(&doc, rules)?;
    Ok(write_document(&out, options))
}

/// Scrub with the FGDC publication profile and default output options
/// (no declaration, no indentation).
pub fn scrub_fgdc(input: &[u8]) -> Result<String, ScrubError> {
    scrub(input, &profiles::fgdc_publication(), &WriteOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_end_to_end() {
        let rules = RuleSet::builder().remove("//secret").unwrap().build();
        let out = scrub(
            b"<r><secret>x</secret><open note=\"keep\">y</open></r>",
            &rules,
            &WriteOptions::default(),
        )
        .unwrap();
        assert_eq!(out, "<r><open note=\"keep\">y</open></r>");
    }

    #[test]
    fn test_scrub_full_round_trip_is_stable() {
        let rules = RuleSet::builder().remove("//drop").unwrap().build();
        let options = WriteOptions::default();
        let once = scrub(b"<r><drop/><a b=\"1\">t</a></r>", &rules, &options).unwrap();
        let twice = scrub(once.as_bytes(), &rules, &options).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_scrub_fgdc_removes_contacts() {
        let out = scrub_fgdc(
            b"<metadata><idinfo><ptcontac>p</ptcontac><title>T</title></idinfo>\
              <metainfo><metc>m</metc></metainfo></metadata>",
        )
        .unwrap();
        assert_eq!(
            out,
            "<metadata><idinfo><title>T</title></idinfo><metainfo/></metadata>"
        );
    }

    #[test]
    fn test_scrub_whole_document_removed() {
        let rules = RuleSet::builder().remove("//metadata").unwrap().build();
        let out = scrub(b"<metadata><a/></metadata>", &rules, &WriteOptions::default()).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_scrub_propagates_parse_errors() {
        let rules = RuleSet::builder().build();
        let err = scrub(b"<a><b></a>", &rules, &WriteOptions::default()).unwrap_err();
        assert!(matches!(err, ScrubError::Parse { .. }));
    }
}

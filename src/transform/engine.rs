//! The redaction engine
//!
//! Single-pass, pre-order copy of the input tree into a fresh arena. At
//! each element the matcher picks one action from the element's full
//! ancestor path: `Copy` reproduces the element (label and attributes
//! verbatim, children in order) and recurses; `Remove` skips the whole
//! subtree, so surviving siblings close the gap. Text, CDATA, comments,
//! and processing instructions travel with their parent's copy.
//!
//! The input is read-only and the output never aliases it. Well-formedness
//! of the input is a precondition (see [`Document::check_links`]); the
//! walk itself does not re-validate structure.

use crate::dom::{Document, NodeId, NodeKind, DOCUMENT_NODE};
use crate::error::ScrubError;
use crate::rules::{Action, RuleSet};
use tracing::{debug, trace};

/// Transform a document against a rule set, producing a new document.
///
/// A removed root yields an empty document, which is a valid result, not
/// an error. Identical inputs always produce identical outputs.
pub fn transform(input: &Document, rules: &RuleSet) -> Result<Document, ScrubError> {
    let mut out = Document::new();
    let mut path: Vec<&str> = Vec::with_capacity(16);
    let mut removed = 0usize;

    for child in input.children(DOCUMENT_NODE) {
        copy_node(input, child, rules, &mut out, DOCUMENT_NODE, &mut path, &mut removed)?;
    }

    debug!(
        removed_subtrees = removed,
        nodes_out = out.node_count(),
        "transform complete"
    );
    Ok(out)
}

fn copy_node<'a>(
    input: &'a Document,
    id: NodeId,
    rules: &RuleSet,
    out: &mut Document,
    out_parent: NodeId,
    path: &mut Vec<&'a str>,
    removed: &mut usize,
) -> Result<(), ScrubError> {
    let node = match input.node(id) {
        Some(node) => node,
        None => return Ok(()),
    };

    match node.kind {
        NodeKind::Element => {
            let label = input.node_name(id).unwrap_or_default();
            path.push(label);

            let action = match rules.select_action(path) {
                Ok(action) => action,
                Err(err) => {
                    path.pop();
                    return Err(err);
                }
            };

            if action == Action::Remove {
                trace!(label, depth = path.len(), "subtree removed");
                *removed += 1;
                path.pop();
                return Ok(());
            }

            let new_id = out.push_element(out_parent, label);
            for (name, value) in input.attribute_values(id) {
                out.push_attribute(new_id, name, value);
            }
            for child in input.children(id) {
                copy_node(input, child, rules, out, new_id, path, removed)?;
            }
            path.pop();
        }
        NodeKind::Text => {
            out.push_text(out_parent, input.content(id).unwrap_or_default());
        }
        NodeKind::CData => {
            out.push_cdata(out_parent, input.content(id).unwrap_or_default());
        }
        NodeKind::Comment => {
            out.push_comment(out_parent, input.content(id).unwrap_or_default());
        }
        NodeKind::ProcessingInstruction => {
            out.push_pi(
                out_parent,
                input.node_name(id).unwrap_or_default(),
                input.content(id).unwrap_or_default(),
            );
        }
        NodeKind::Document => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Pattern;
    use crate::writer::{write_document, WriteOptions};

    fn rules_removing(labels: &[&str]) -> RuleSet {
        let mut builder = RuleSet::builder();
        for label in labels {
            builder = builder.rule_default(Pattern::anywhere(label), Action::Remove);
        }
        builder.build()
    }

    fn names_of_children(doc: &Document, id: NodeId) -> Vec<String> {
        doc.children(id)
            .filter_map(|c| doc.node_name(c).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_contacts_removed_sibling_kept() {
        let input = Document::parse(
            b"<root><ptcontac name=\"A\"/><idinfo title=\"T\"/><metc name=\"B\"/></root>",
        )
        .unwrap();
        let out = transform(&input, &rules_removing(&["ptcontac", "metc"])).unwrap();

        let root = out.root_element_id().unwrap();
        assert_eq!(out.node_name(root), Some("root"));
        assert_eq!(names_of_children(&out, root), vec!["idinfo"]);
        let idinfo = out.children(root).next().unwrap();
        assert_eq!(out.attribute_values(idinfo), vec![("title", "T")]);
    }

    #[test]
    fn test_all_matches_removed_empty_root_retained() {
        let input = Document::parse(
            b"<root><onlink url=\"http://internal.local\"/><onlink url=\"http://public.example\"/></root>",
        )
        .unwrap();
        let out = transform(&input, &rules_removing(&["onlink"])).unwrap();

        let root = out.root_element_id().unwrap();
        assert_eq!(out.children(root).count(), 0);
    }

    #[test]
    fn test_nested_removal_spares_other_branches() {
        let input = Document::parse(
            b"<root><dataqual><lineage><procstep>step</procstep></lineage><attracc>ok</attracc></dataqual></root>",
        )
        .unwrap();
        let out = transform(&input, &rules_removing(&["lineage"])).unwrap();

        let root = out.root_element_id().unwrap();
        let dataqual = out.children(root).next().unwrap();
        assert_eq!(names_of_children(&out, dataqual), vec!["attracc"]);
        // The procstep descendant went with its lineage ancestor
        assert!(out
            .descendants(root)
            .all(|id| out.node_name(id) != Some("procstep")));
    }

    #[test]
    fn test_removed_root_yields_empty_document() {
        let input = Document::parse(b"<root><a/></root>").unwrap();
        let out = transform(&input, &rules_removing(&["root"])).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.node_count(), 1);
    }

    #[test]
    fn test_empty_element_is_kept_not_removed() {
        let input = Document::parse(b"<root><empty/></root>").unwrap();
        let out = transform(&input, &rules_removing(&["other"])).unwrap();
        let root = out.root_element_id().unwrap();
        assert_eq!(names_of_children(&out, root), vec!["empty"]);
    }

    #[test]
    fn test_structural_preservation_of_survivors() {
        let input = Document::parse(
            b"<r><keep a=\"1\" b=\"2\">x<sub/>y</keep><drop/><keep2/></r>",
        )
        .unwrap();
        let out = transform(&input, &rules_removing(&["drop"])).unwrap();

        let root = out.root_element_id().unwrap();
        assert_eq!(names_of_children(&out, root), vec!["keep", "keep2"]);
        let keep = out.children(root).next().unwrap();
        assert_eq!(out.attribute_values(keep), vec![("a", "1"), ("b", "2")]);
        let kinds: Vec<_> = out
            .children(keep)
            .map(|id| out.node(id).unwrap().kind)
            .collect();
        assert_eq!(kinds, vec![NodeKind::Text, NodeKind::Element, NodeKind::Text]);
    }

    #[test]
    fn test_exact_path_removal_only_hits_that_path() {
        let rules = RuleSet::builder()
            .remove("/r/a/secret")
            .unwrap()
            .build();
        let input =
            Document::parse(b"<r><a><secret/></a><b><secret/></b></r>").unwrap();
        let out = transform(&input, &rules).unwrap();

        let root = out.root_element_id().unwrap();
        let children: Vec<_> = out.children(root).collect();
        assert_eq!(out.children(children[0]).count(), 0);
        assert_eq!(out.children(children[1]).count(), 1);
    }

    #[test]
    fn test_idempotent_redaction() {
        let input = Document::parse(
            b"<metadata><idinfo><ptcontac>p</ptcontac><citation>c</citation></idinfo></metadata>",
        )
        .unwrap();
        let rules = rules_removing(&["ptcontac"]);
        let opts = WriteOptions::default();

        let once = transform(&input, &rules).unwrap();
        let twice = transform(&once, &rules).unwrap();
        assert_eq!(
            write_document(&once, &opts),
            write_document(&twice, &opts)
        );
    }

    #[test]
    fn test_deterministic_output() {
        let input = Document::parse(
            b"<metadata><ptcontac>p</ptcontac><idinfo t=\"1\">text</idinfo></metadata>",
        )
        .unwrap();
        let rules = rules_removing(&["ptcontac"]);
        let opts = WriteOptions::default();

        let first = write_document(&transform(&input, &rules).unwrap(), &opts);
        let second = write_document(&transform(&input, &rules).unwrap(), &opts);
        assert_eq!(first, second);
    }

    #[test]
    fn test_comments_and_pis_travel_with_parent() {
        let input =
            Document::parse(b"<r><!-- note --><?app hint?><x/></r>").unwrap();
        let out = transform(&input, &RuleSet::builder().build()).unwrap();

        let root = out.root_element_id().unwrap();
        let kinds: Vec<_> = out
            .children(root)
            .map(|id| out.node(id).unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Comment,
                NodeKind::ProcessingInstruction,
                NodeKind::Element
            ]
        );
    }

    #[test]
    fn test_output_never_aliases_input() {
        let input = Document::parse(b"<r><a/></r>").unwrap();
        let out = transform(&input, &RuleSet::builder().build()).unwrap();
        drop(input);
        // Output remains fully usable after the input is gone
        assert_eq!(out.node_name(out.root_element_id().unwrap()), Some("r"));
        out.check_links().unwrap();
    }
}

//! Built-in rule tables
//!
//! The publication profile mirrors what open-data harvesting pipelines
//! strip from FGDC CSDGM metadata before uploading to a public catalog:
//! agency contact identities, processing history, and links that point at
//! internal servers.

use crate::rules::{Action, Pattern, RuleSet};

/// Priority shared by the publication removal rules. Outranked only by
/// rules a caller registers above it.
pub const REDACTION_PRIORITY: i32 = 0;

/// Rule set for publishing FGDC CSDGM metadata to a public catalog.
///
/// Removes, anywhere in the document:
/// - `ptcontac`: point-of-contact identity for the dataset
/// - `lineage`: processing lineage, including every `procstep`
/// - `metc`: metadata contact identity
/// - `onlink`: online linkage URLs, which name internal servers
///
/// Everything else is copied unchanged by the identity fallback.
pub fn fgdc_publication() -> RuleSet {
    RuleSet::builder()
        .rule(Pattern::anywhere("ptcontac"), REDACTION_PRIORITY, Action::Remove)
        .rule(Pattern::anywhere("lineage"), REDACTION_PRIORITY, Action::Remove)
        .rule(Pattern::anywhere("metc"), REDACTION_PRIORITY, Action::Remove)
        .rule(Pattern::anywhere("onlink"), REDACTION_PRIORITY, Action::Remove)
        .build()
}

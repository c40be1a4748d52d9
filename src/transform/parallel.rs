//! Batch transforms
//!
//! Publishing jobs sanitize many datasets with one rule table. Each
//! document transform is independent and the rule set is read-only during
//! traversal, so batches fan out across a rayon pool sharing a single
//! `RuleSet`. Result order matches input order.

use super::engine::transform;
use crate::dom::Document;
use crate::error::ScrubError;
use crate::rules::RuleSet;
use crate::writer::WriteOptions;
use rayon::prelude::*;

/// Transform every document in parallel against one rule set.
pub fn transform_batch(
    docs: &[Document],
    rules: &RuleSet,
) -> Vec<Result<Document, ScrubError>> {
    docs.par_iter().map(|doc| transform(doc, rules)).collect()
}

/// Parse, transform, and serialize every input in parallel.
pub fn scrub_batch(
    inputs: &[&[u8]],
    rules: &RuleSet,
    options: &WriteOptions,
) -> Vec<Result<String, ScrubError>> {
    inputs
        .par_iter()
        .map(|input| crate::scrub(input, rules, options))
        .collect()
}

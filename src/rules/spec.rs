//! Serde rule specifications
//!
//! A rule table can be shipped as data (JSON alongside the publishing job
//! configuration) instead of being assembled in code. Each entry compiles
//! to one rule; priority defaults to the pattern's specificity rank.

use super::pattern::PatternCache;
use super::ruleset::{Action, RuleSet};
use crate::error::ScrubError;
use serde::{Deserialize, Serialize};

/// Declarative form of one rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Textual pattern (`*`, `name`, `//name`, or `/a/b/c`)
    pub pattern: String,
    /// Explicit priority; omitted means the pattern's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    pub action: Action,
}

impl RuleSet {
    /// Compile a rule table from declarative specs, in declaration order.
    pub fn from_specs(specs: &[RuleSpec]) -> Result<RuleSet, ScrubError> {
        let mut cache = PatternCache::default();
        Self::from_specs_with(specs, &mut cache)
    }

    /// Same as [`RuleSet::from_specs`], reusing a pattern cache across
    /// repeated rule-table loads.
    pub fn from_specs_with(
        specs: &[RuleSpec],
        cache: &mut PatternCache,
    ) -> Result<RuleSet, ScrubError> {
        let mut builder = RuleSet::builder();
        for spec in specs {
            let pattern = cache.get_or_compile(&spec.pattern)?;
            let priority = spec.priority.unwrap_or_else(|| pattern.default_priority());
            builder = builder.rule(pattern, priority, spec.action);
        }
        Ok(builder.build())
    }
}

//! Declarative redaction rules: path patterns, priorities, and the matcher.

pub mod pattern;
pub mod ruleset;
pub mod spec;

pub use pattern::{Pattern, PatternCache};
pub use ruleset::{Action, Rule, RuleSet, RuleSetBuilder};
pub use spec::RuleSpec;

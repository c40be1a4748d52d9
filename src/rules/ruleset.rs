//! Rule set and matcher
//!
//! A rule binds a pattern to a priority and an action. The set is built
//! once, is immutable afterwards, and always ends with an unconditional
//! identity-copy fallback at the lowest possible priority, so every path
//! resolves to exactly one rule: highest priority wins, ties go to the
//! rule registered first. Overlapping patterns are resolved by priority,
//! never rejected.

use super::pattern::Pattern;
use crate::error::ScrubError;
use serde::{Deserialize, Serialize};

/// What the transform does with a matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Reproduce the element and recurse into its subtree
    Copy,
    /// Drop the element and its entire subtree from the output
    Remove,
}

/// One (pattern, priority, action) record.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Pattern,
    priority: i32,
    action: Action,
}

impl Rule {
    pub fn new(pattern: Pattern, priority: i32, action: Action) -> Self {
        Rule {
            pattern,
            priority,
            action,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn action(&self) -> Action {
        self.action
    }
}

/// Immutable, priority-ordered rule collection.
///
/// Read-only during traversal, and `Send + Sync`, so one instance can be
/// shared across concurrent transforms.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Start building a rule set.
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder { rules: Vec::new() }
    }

    /// Select the winning rule for a path (root first, element last).
    ///
    /// The path must be non-empty: the document root element is a path of
    /// length 1. Deterministic for identical inputs, with no hidden state.
    pub fn select_rule(&self, path: &[&str]) -> Result<&Rule, ScrubError> {
        debug_assert!(!path.is_empty(), "element path cannot be empty");

        let mut winner: Option<&Rule> = None;
        for rule in &self.rules {
            if !rule.pattern.matches(path) {
                continue;
            }
            // Strict comparison keeps the earliest registration on ties
            match winner {
                Some(best) if rule.priority <= best.priority => {}
                _ => winner = Some(rule),
            }
        }
        winner.ok_or(ScrubError::UnresolvedMatch)
    }

    /// Select the winning action for a path.
    pub fn select_action(&self, path: &[&str]) -> Result<Action, ScrubError> {
        self.select_rule(path).map(Rule::action)
    }

    /// Rules in registration order, fallback last.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules, including the fallback.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// A rule set is never empty; the builder installs the fallback.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Builder for [`RuleSet`].
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
}

impl RuleSetBuilder {
    /// Register a rule with an explicit priority.
    pub fn rule(mut self, pattern: Pattern, priority: i32, action: Action) -> Self {
        self.rules.push(Rule::new(pattern, priority, action));
        self
    }

    /// Register a rule at the pattern's default (specificity) priority.
    pub fn rule_default(self, pattern: Pattern, action: Action) -> Self {
        let priority = pattern.default_priority();
        self.rule(pattern, priority, action)
    }

    /// Register a removal rule from a textual pattern.
    pub fn remove(self, pattern: &str) -> Result<Self, ScrubError> {
        let pattern = Pattern::parse(pattern)?;
        Ok(self.rule_default(pattern, Action::Remove))
    }

    /// Register a copy rule from a textual pattern.
    pub fn copy(self, pattern: &str) -> Result<Self, ScrubError> {
        let pattern = Pattern::parse(pattern)?;
        Ok(self.rule_default(pattern, Action::Copy))
    }

    /// Finish the set. The identity-copy fallback is appended at the lowest
    /// possible priority; registered rules always outrank it.
    pub fn build(mut self) -> RuleSet {
        self.rules
            .push(Rule::new(Pattern::Any, i32::MIN, Action::Copy));
        RuleSet { rules: self.rules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_always_present() {
        let rules = RuleSet::builder().build();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.select_action(&["anything"]).unwrap(), Action::Copy);
        assert_eq!(
            rules.select_action(&["a", "b", "c"]).unwrap(),
            Action::Copy
        );
    }

    #[test]
    fn test_remove_rule_outranks_fallback() {
        let rules = RuleSet::builder().remove("//secret").unwrap().build();
        assert_eq!(
            rules.select_action(&["root", "secret"]).unwrap(),
            Action::Remove
        );
        assert_eq!(rules.select_action(&["root", "open"]).unwrap(), Action::Copy);
    }

    #[test]
    fn test_higher_priority_wins() {
        let rules = RuleSet::builder()
            .rule(Pattern::anywhere("contact"), 0, Action::Remove)
            .rule(
                Pattern::Exact(vec!["root".into(), "contact".into()]),
                10,
                Action::Copy,
            )
            .build();
        // The exact-path rule keeps the top-level contact
        assert_eq!(
            rules.select_action(&["root", "contact"]).unwrap(),
            Action::Copy
        );
        // Deeper contacts still match only the removal rule
        assert_eq!(
            rules.select_action(&["root", "nested", "contact"]).unwrap(),
            Action::Remove
        );
    }

    #[test]
    fn test_tie_broken_by_registration_order() {
        let rules = RuleSet::builder()
            .rule(Pattern::anywhere("x"), 5, Action::Remove)
            .rule(Pattern::anywhere("x"), 5, Action::Copy)
            .build();
        assert_eq!(rules.select_action(&["x"]).unwrap(), Action::Remove);
    }

    #[test]
    fn test_overlap_is_not_an_error() {
        let rules = RuleSet::builder()
            .remove("//a")
            .unwrap()
            .remove("//a")
            .unwrap()
            .build();
        assert_eq!(rules.select_action(&["a"]).unwrap(), Action::Remove);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let rules = RuleSet::builder()
            .remove("//ptcontac")
            .unwrap()
            .remove("//metc")
            .unwrap()
            .build();
        let path = ["metadata", "idinfo", "ptcontac"];
        let first = rules.select_action(&path).unwrap();
        for _ in 0..10 {
            assert_eq!(rules.select_action(&path).unwrap(), first);
        }
    }

    #[test]
    fn test_empty_set_is_unresolved() {
        // Only constructible by hand; the builder always appends a fallback
        let rules = RuleSet { rules: Vec::new() };
        assert!(matches!(
            rules.select_rule(&["x"]),
            Err(ScrubError::UnresolvedMatch)
        ));
    }

    #[test]
    fn test_predicate_rule() {
        let rules = RuleSet::builder()
            .rule(
                Pattern::matching(|path| path.first() == Some(&"draft")),
                5,
                Action::Remove,
            )
            .build();
        assert_eq!(rules.select_action(&["draft"]).unwrap(), Action::Remove);
        assert_eq!(rules.select_action(&["final"]).unwrap(), Action::Copy);
    }

    #[test]
    fn test_rule_set_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<RuleSet>();
    }
}

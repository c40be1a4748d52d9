//! Path patterns
//!
//! A pattern is a predicate over an element's ancestor-inclusive label path
//! (root first, the element itself last). Compiled from a small textual
//! syntax:
//! - `*` matches every path
//! - `name` or `//name` matches any element with that label, at any depth
//! - `/a/b/c` matches exactly that root-to-element path
//!
//! `Pattern::matching` wraps an arbitrary closure for tests richer than
//! label equality. Compiled patterns are cached in an LRU keyed by their
//! source text, so rule tables rebuilt per run do not re-parse.

use crate::core::scanner::{is_name_char, is_name_start_char};
use crate::error::ScrubError;
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Predicate over a label path.
#[derive(Clone)]
pub enum Pattern {
    /// Matches every path (the fallback rule's pattern)
    Any,
    /// Matches a label at any depth
    Anywhere(String),
    /// Matches one exact root-to-element path
    Exact(Vec<String>),
    /// Arbitrary predicate over the path
    Where(Arc<dyn Fn(&[&str]) -> bool + Send + Sync>),
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Any => write!(f, "Any"),
            Pattern::Anywhere(label) => write!(f, "Anywhere({label:?})"),
            Pattern::Exact(path) => write!(f, "Exact({path:?})"),
            Pattern::Where(_) => write!(f, "Where(..)"),
        }
    }
}

impl Pattern {
    /// Compile a textual pattern.
    pub fn parse(text: &str) -> Result<Self, ScrubError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ScrubError::pattern(text, "pattern is empty"));
        }
        if trimmed == "*" {
            return Ok(Pattern::Any);
        }

        if let Some(label) = trimmed.strip_prefix("//") {
            if label.contains('/') {
                return Err(ScrubError::pattern(
                    text,
                    "'//' takes a single element name",
                ));
            }
            check_name(text, label)?;
            return Ok(Pattern::Anywhere(label.to_string()));
        }

        if let Some(path) = trimmed.strip_prefix('/') {
            let mut segments = Vec::new();
            for segment in path.split('/') {
                check_name(text, segment)?;
                segments.push(segment.to_string());
            }
            return Ok(Pattern::Exact(segments));
        }

        check_name(text, trimmed)?;
        Ok(Pattern::Anywhere(trimmed.to_string()))
    }

    /// Build an any-depth label pattern without going through the parser.
    pub fn anywhere(label: &str) -> Self {
        Pattern::Anywhere(label.to_string())
    }

    /// Build a predicate pattern.
    pub fn matching<F>(predicate: F) -> Self
    where
        F: Fn(&[&str]) -> bool + Send + Sync + 'static,
    {
        Pattern::Where(Arc::new(predicate))
    }

    /// Test the pattern against a path (root first, element last).
    pub fn matches(&self, path: &[&str]) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Anywhere(label) => path.last() == Some(&label.as_str()),
            Pattern::Exact(segments) => {
                path.len() == segments.len()
                    && segments.iter().zip(path).all(|(s, p)| s == p)
            }
            Pattern::Where(predicate) => predicate(path),
        }
    }

    /// Rank used when a rule carries no explicit priority: an exact path
    /// outranks an any-depth label, which outranks the catch-all.
    pub fn default_priority(&self) -> i32 {
        match self {
            Pattern::Any => -10,
            Pattern::Anywhere(_) | Pattern::Where(_) => 0,
            Pattern::Exact(_) => 10,
        }
    }
}

fn check_name(pattern: &str, name: &str) -> Result<(), ScrubError> {
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return Err(ScrubError::pattern(pattern, "empty element name"));
    }
    if !is_name_start_char(bytes[0]) {
        return Err(ScrubError::pattern(
            pattern,
            format!("invalid element name {name:?}"),
        ));
    }
    if !bytes.iter().all(|&b| is_name_char(b)) {
        return Err(ScrubError::pattern(
            pattern,
            format!("invalid element name {name:?}"),
        ));
    }
    Ok(())
}

/// LRU cache of compiled patterns keyed by source text.
pub struct PatternCache {
    cache: LruCache<String, Pattern>,
}

impl PatternCache {
    /// Create a cache holding up to `capacity` compiled patterns.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        PatternCache {
            cache: LruCache::new(capacity),
        }
    }

    /// Fetch a compiled pattern, compiling and caching on miss.
    pub fn get_or_compile(&mut self, text: &str) -> Result<Pattern, ScrubError> {
        if let Some(pattern) = self.cache.get(text) {
            return Ok(pattern.clone());
        }
        let pattern = Pattern::parse(text)?;
        self.cache.put(text.to_string(), pattern.clone());
        Ok(pattern)
    }

    /// Number of cached patterns.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        // Plenty for a publication profile's worth of rules
        PatternCache::new(64)
    }
}

//! String interning pool
//!
//! Deduplicated storage for element labels, attribute names, and content.
//! Entries are (offset, length) pairs into a single append-only buffer, with
//! hash-based lookup to avoid storing duplicates. ID 0 is reserved for the
//! empty string.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Interned string ID.
pub type StringId = u32;

#[derive(Debug, Clone, Copy)]
struct StringEntry {
    offset: u32,
    len: u32,
}

/// Append-only interning pool.
#[derive(Debug, Default)]
pub struct StringPool {
    entries: Vec<StringEntry>,
    data: Vec<u8>,
    /// Hash of string content -> IDs with that hash (handles rare collisions)
    hash_index: HashMap<u64, Vec<StringId>>,
}

impl StringPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(256),
            data: Vec::with_capacity(4096),
            hash_index: HashMap::new(),
        };
        // Entry 0 is the empty string
        pool.entries.push(StringEntry { offset: 0, len: 0 });
        pool
    }

    #[inline]
    fn compute_hash(s: &[u8]) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a byte string, returning its ID. Duplicates share one entry.
    pub fn intern(&mut self, s: &[u8]) -> StringId {
        if s.is_empty() {
            return 0;
        }

        let hash = Self::compute_hash(s);
        if let Some(ids) = self.hash_index.get(&hash) {
            for &id in ids {
                if self.get(id) == Some(s) {
                    return id;
                }
            }
        }

        let entry = StringEntry {
            offset: self.data.len() as u32,
            len: s.len() as u32,
        };
        self.data.extend_from_slice(s);

        let id = self.entries.len() as StringId;
        self.entries.push(entry);
        self.hash_index.entry(hash).or_default().push(id);
        id
    }

    /// Intern a string slice.
    pub fn intern_str(&mut self, s: &str) -> StringId {
        self.intern(s.as_bytes())
    }

    /// Get the bytes for an ID.
    pub fn get(&self, id: StringId) -> Option<&[u8]> {
        let entry = self.entries.get(id as usize)?;
        let start = entry.offset as usize;
        let end = start + entry.len as usize;
        self.data.get(start..end)
    }

    /// Get the string for an ID. Pool content is interned from validated
    /// UTF-8, so this only fails for unknown IDs.
    pub fn get_str(&self, id: StringId) -> Option<&str> {
        self.get(id).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Number of unique strings stored (including the reserved empty entry).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the pool holds nothing beyond the reserved empty entry.
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}

//! Byte-level plumbing shared by the reader and writer:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Entities: built-in entity and character reference decoding
//! - Attributes: start-tag attribute list parsing
//! - Encoding: UTF-16 detection and conversion

pub mod attributes;
pub mod encoding;
pub mod entities;
pub mod scanner;

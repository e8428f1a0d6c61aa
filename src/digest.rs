// src/digest.rs

//! Revision digest derivation
//!
//! A document's revision tag is `1-<md5-hex>` where the digest covers the
//! source body bytes followed by the document key's UTF-8 bytes. Folding
//! the key in guarantees that two documents with identical body content
//! but different keys still receive distinct tags.

use md5::{Digest, Md5};

/// Digest input for a document with no source body file.
///
/// A missing body is a normal state (attachment-only documents), hashed as
/// the two-byte empty-JSON-object literal.
pub const EMPTY_BODY: &[u8] = b"{}";

/// Compute the hex digest for a document's body bytes and key.
///
/// Deterministic: the same bytes and key always produce the same digest.
pub fn revision_digest(body: &[u8], key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(body);
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Format a digest as a first-generation revision tag.
pub fn revision_tag(digest: &str) -> String {
    format!("1-{digest}")
}

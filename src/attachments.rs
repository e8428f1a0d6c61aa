// src/attachments.rs

//! Attachment packing
//!
//! Walks a document's attachment directory tree and inlines every regular
//! file as a base64-encoded entry keyed by its path relative to the
//! attachment root. Content types are a best-effort guess from the file
//! extension; unrecognized extensions yield `null`.
//!
//! Every file is read fully into memory for encoding. That is fine for
//! small-to-medium corpora but is a known limit for large binary
//! attachment sets (no streaming encode).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;

/// One inlined attachment file
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentEntry {
    /// Revision position; always 1, this mirror stores a single revision
    pub revops: u32,
    /// Content type guessed from the filename extension, if recognized
    pub content_type: Option<String>,
    /// File bytes, base64-encoded
    pub data: String,
}

/// Attachment entries keyed by relative path, in deterministic order
pub type AttachmentMap = BTreeMap<String, AttachmentEntry>;

/// Inline every regular file under `dir` as an [`AttachmentEntry`].
///
/// The directory may not exist (documents without attachments), in which
/// case the result is an empty map.
pub fn pack_attachments(dir: &Path) -> Result<AttachmentMap> {
    let mut attachments = AttachmentMap::new();
    if !dir.is_dir() {
        return Ok(attachments);
    }

    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(dir).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        let content_type = mime_guess::from_path(path)
            .first_raw()
            .map(|m| m.to_string());

        let bytes = fs::read(path)?;
        debug!("packed attachment {} ({} bytes)", rel_str, bytes.len());

        attachments.insert(
            rel_str,
            AttachmentEntry {
                revops: 1,
                content_type,
                data: BASE64.encode(&bytes),
            },
        );
    }

    Ok(attachments)
}

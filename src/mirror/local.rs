// src/mirror/local.rs

//! Local source adapter
//!
//! Discovers document keys from a filesystem directory and drives the
//! digest → change feed → document assembly pipeline into the output
//! directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::changes::{ChangeRecord, write_change_feed};
use crate::digest::{EMPTY_BODY, revision_digest, revision_tag};
use crate::document::assemble_document;
use crate::error::Result;
use crate::mirror::{INDEX_FILE, MirrorBuilder};

/// Builds a mirror from a local directory of `<key>.json` bodies and
/// `<key>/**` attachment trees.
pub struct LocalMirror {
    src: PathBuf,
}

impl LocalMirror {
    pub fn new(src: PathBuf) -> Self {
        Self { src }
    }

    /// Discover document keys from the top level of the source directory.
    ///
    /// A `name.json` entry and an extension-less `name/` directory both
    /// contribute the key `name`; the two physical forms of the same name
    /// collapse to one. Keys are held in lexicographic order so that
    /// sequence assignment is reproducible across runs.
    fn discover_keys(&self) -> Result<BTreeSet<String>> {
        let mut keys = BTreeSet::new();
        for entry in fs::read_dir(&self.src)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(stem) = name.strip_suffix(".json") {
                if !stem.is_empty() {
                    keys.insert(stem.to_string());
                }
            } else if !name.contains('.') && entry.path().is_dir() {
                // Attachment-only document: a directory with no body file
                keys.insert(name.to_string());
            }
        }
        Ok(keys)
    }

    /// Body bytes for digest derivation. A missing or unreadable body is
    /// the empty-object placeholder, not a failure.
    fn body_bytes(&self, key: &str) -> Vec<u8> {
        fs::read(self.src.join(format!("{key}.json"))).unwrap_or_else(|_| EMPTY_BODY.to_vec())
    }
}

impl MirrorBuilder for LocalMirror {
    fn build(&self, out_dir: &Path) -> Result<()> {
        let keys = self.discover_keys()?;
        info!(
            "discovered {} document(s) in {}",
            keys.len(),
            self.src.display()
        );

        let mut records = Vec::with_capacity(keys.len());
        let mut digests = Vec::with_capacity(keys.len());
        for (i, key) in keys.iter().enumerate() {
            let digest = revision_digest(&self.body_bytes(key), key);
            records.push(ChangeRecord::new(
                (i + 1) as u64,
                key.as_str(),
                revision_tag(&digest),
            ));
            digests.push(digest);
        }
        write_change_feed(out_dir, &records)?;

        for (key, digest) in keys.iter().zip(&digests) {
            debug!("assembling {key}");
            assemble_document(key, digest, &self.src, out_dir)?;
        }

        write_index(out_dir, keys.len())?;
        info!("mirror complete: {} document(s)", keys.len());
        Ok(())
    }
}

/// Write the index descriptor, `{"update_seq": <document count>}`.
fn write_index(out_dir: &Path, count: usize) -> Result<()> {
    let mut rendered = serde_json::to_string(&serde_json::json!({ "update_seq": count }))?;
    rendered.push('\n');
    fs::write(out_dir.join(INDEX_FILE), rendered)?;
    Ok(())
}

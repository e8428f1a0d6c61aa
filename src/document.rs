// src/document.rs

//! Document assembly
//!
//! Merges a document's source body with the CouchDB-style metadata fields
//! (`_id`, `_rev`, `_revisions`, `_attachments`) and writes the result as
//! compact JSON, one file per document, named after the document key.
//!
//! Revision history is always a single entry: this mirror never stores
//! more than one revision per document, a deliberate simplification over a
//! full CouchDB revision tree.

use serde_json::{Map, Value, json};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

use crate::attachments::pack_attachments;
use crate::digest::revision_tag;
use crate::error::{Error, Result};

/// Load a document body from `path`, or an empty object when no body can
/// be read.
///
/// An absent or unreadable file is a normal state (attachment-only
/// documents). A file that reads but does not parse as a JSON object is
/// fatal.
pub fn load_body(path: &Path) -> Result<Map<String, Value>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            if err.kind() == ErrorKind::NotFound {
                debug!("no body at {}, using empty object", path.display());
            } else {
                warn!("unreadable body at {}: {}, using empty object", path.display(), err);
            }
            return Ok(Map::new());
        }
    };

    let value: Value = serde_json::from_slice(&bytes).map_err(|source| Error::MalformedBody {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::BodyNotObject(path.to_path_buf())),
    }
}

/// Assemble one document and write it to the output directory.
///
/// Loads `<src>/<key>.json` (empty object when absent), packs the
/// attachment tree at `<src>/<key>/`, and stamps the metadata fields.
/// Pre-existing fields with those names in the source body are replaced,
/// not merged.
pub fn assemble_document(key: &str, digest: &str, src: &Path, out_dir: &Path) -> Result<()> {
    let mut doc = load_body(&src.join(format!("{key}.json")))?;
    let attachments = pack_attachments(&src.join(key))?;

    doc.insert("_id".to_string(), json!(key));
    doc.insert("_rev".to_string(), json!(revision_tag(digest)));
    doc.insert("_revisions".to_string(), json!({"start": 1, "ids": [digest]}));
    doc.insert("_attachments".to_string(), serde_json::to_value(&attachments)?);

    let mut rendered = serde_json::to_string(&Value::Object(doc))?;
    rendered.push('\n');
    fs::write(out_dir.join(key), rendered)?;
    debug!("wrote document {key}");

    Ok(())
}

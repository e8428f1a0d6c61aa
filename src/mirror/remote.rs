// src/mirror/remote.rs

//! Remote source adapter
//!
//! Mirrors a live database over its HTTP API: the root endpoint, the
//! `_changes` feed, and every document listed in it (attachments inlined).
//! Response bodies are written to disk verbatim — the remote server
//! already supplies valid revisions, so no digest or assembly logic runs
//! on this path.
//!
//! The crawl is strictly sequential: no retries, no backoff, no
//! per-document recovery. Any transport failure aborts the build.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::changes::CHANGES_FILE;
use crate::error::{Error, Result};
use crate::mirror::{INDEX_FILE, MirrorBuilder};

/// Fixed timeout for every request; not user-configurable
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds a mirror by crawling a live database root URL.
pub struct RemoteMirror {
    base: Url,
    client: Client,
}

impl RemoteMirror {
    /// Create a mirror builder for a database root URL.
    ///
    /// The URL path is normalized to end with a trailing separator so
    /// that `_changes` and document ids append cleanly.
    pub fn new(mut base: Url) -> Result<Self> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { base, client })
    }

    /// Normalized base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Fetch a URL and return the raw response body.
    ///
    /// The status code is not inspected: responses are mirrored verbatim,
    /// whatever the server returned. Only transport failures are errors.
    fn fetch(&self, url: &str, accept_json: bool) -> Result<Vec<u8>> {
        debug!("GET {url}");
        let mut request = self.client.get(url);
        if accept_json {
            request = request.header(ACCEPT, "application/json");
        }
        let bytes = request.send()?.bytes()?;
        Ok(bytes.to_vec())
    }
}

impl MirrorBuilder for RemoteMirror {
    fn build(&self, out_dir: &Path) -> Result<()> {
        info!("mirroring {}", self.base);

        let index = self.fetch(self.base.as_str(), false)?;
        fs::write(out_dir.join(INDEX_FILE), &index)?;

        let changes = self.fetch(&format!("{}_changes", self.base), false)?;
        fs::write(out_dir.join(CHANGES_FILE), &changes)?;

        let ids = change_feed_ids(&changes)?;
        info!("change feed lists {} document(s)", ids.len());

        for id in &ids {
            let dest = checked_dest(out_dir, id)?;
            let doc = self.fetch(&format!("{}{id}?attachments=true", self.base), true)?;
            // Document ids may contain path separators
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, &doc)?;
            debug!("mirrored {id} ({} bytes)", doc.len());
        }

        info!("mirror complete: {} document(s)", ids.len());
        Ok(())
    }
}

/// Destination path for a document id, rejecting ids whose `..` segments
/// or absolute form would resolve outside the output root.
fn checked_dest(out_dir: &Path, id: &str) -> Result<std::path::PathBuf> {
    if id.starts_with('/') {
        return Err(Error::UnsafeDocumentId(id.to_string()));
    }
    let mut depth: i32 = 0;
    for segment in id.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                depth -= 1;
                if depth < 0 {
                    return Err(Error::UnsafeDocumentId(id.to_string()));
                }
            }
            _ => depth += 1,
        }
    }
    Ok(out_dir.join(id))
}

/// Extract the ordered document ids from a raw `_changes` response.
///
/// Failure to parse is fatal: the remote server did not return a valid
/// change feed.
fn change_feed_ids(raw: &[u8]) -> Result<Vec<String>> {
    let feed: serde_json::Value =
        serde_json::from_slice(raw).map_err(|e| Error::MalformedChangeFeed(e.to_string()))?;

    let results = feed
        .get("results")
        .and_then(|r| r.as_array())
        .ok_or_else(|| Error::MalformedChangeFeed("missing results array".to_string()))?;

    let mut ids = Vec::with_capacity(results.len());
    for entry in results {
        let id = entry
            .get("id")
            .and_then(|i| i.as_str())
            .ok_or_else(|| Error::MalformedChangeFeed("change record without string id".to_string()))?;
        ids.push(id.to_string());
    }
    Ok(ids)
}

// src/mirror/mod.rs

//! Mirror construction: one capability, two sources
//!
//! The local and remote paths are two implementations of the same
//! [`MirrorBuilder`] capability — given an output directory, populate it
//! with the full artifact set (per-document files, `_changes`,
//! `index.html`). The implementation is selected once at startup from the
//! source argument; the two never mix.

mod local;
mod remote;

pub use local::LocalMirror;
pub use remote::RemoteMirror;

use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{Error, Result};

/// Name of the index descriptor artifact inside the output directory
pub const INDEX_FILE: &str = "index.html";

/// A source that can populate an output directory with a complete mirror.
pub trait MirrorBuilder {
    /// Build the mirror into `out_dir`. The directory must already exist.
    ///
    /// Writes are not transactional: a build that fails partway through
    /// leaves a partially populated output directory.
    fn build(&self, out_dir: &Path) -> Result<()>;
}

/// Select the builder for a source argument.
///
/// HTTP(S) URLs crawl a live database; anything else is treated as a
/// local source directory.
pub fn builder_for_source(source: &str) -> Result<Box<dyn MirrorBuilder>> {
    match Url::parse(source) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Box::new(RemoteMirror::new(url)?))
        }
        _ => Ok(Box::new(LocalMirror::new(PathBuf::from(source)))),
    }
}

/// Prepare the output directory for a build.
///
/// A pre-existing output directory is an error unless `force` is given —
/// the build never silently overwrites. An absent directory is created
/// with its parents.
pub fn prepare_out_dir(out_dir: &Path, force: bool) -> Result<()> {
    if out_dir.exists() && !force {
        return Err(Error::OutputExists(out_dir.to_path_buf()));
    }
    fs::create_dir_all(out_dir)?;
    Ok(())
}

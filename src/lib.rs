// src/lib.rs

//! static-couch
//!
//! Materializes a read-only, static-file mirror of a CouchDB-style
//! document database: one compact-JSON file per document, a `_changes`
//! feed, and an `index.html` index descriptor, with attachments inlined
//! as base64. The mirror reproduces the database's external read surface
//! without running a database server.
//!
//! # Architecture
//!
//! - Local mode: derive deterministic `1-<md5>` revision tags from source
//!   bodies, render the change feed, assemble each document with its
//!   attachment tree
//! - Remote mode: crawl a live database over HTTP and write the raw
//!   responses verbatim
//! - Both modes implement the [`MirrorBuilder`] capability and populate
//!   the same on-disk artifact layout

pub mod attachments;
pub mod changes;
pub mod digest;
pub mod document;
mod error;
pub mod mirror;

pub use attachments::{AttachmentEntry, AttachmentMap, pack_attachments};
pub use changes::{CHANGES_FILE, ChangeRecord, RevRef, write_change_feed};
pub use digest::{revision_digest, revision_tag};
pub use error::{Error, Result};
pub use mirror::{
    INDEX_FILE, LocalMirror, MirrorBuilder, RemoteMirror, builder_for_source, prepare_out_dir,
};

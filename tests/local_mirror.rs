// tests/local_mirror.rs

//! End-to-end tests for the local source adapter: key discovery, change
//! feed rendering, document assembly, and the index descriptor.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use std::fs;
use std::path::Path;

use static_couch::{LocalMirror, MirrorBuilder};

fn build_mirror(src: &Path) -> tempfile::TempDir {
    let out = tempfile::tempdir().unwrap();
    LocalMirror::new(src.to_path_buf()).build(out.path()).unwrap();
    out
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_alpha_beta_scenario() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("alpha.json"), "{\"x\":1}").unwrap();
    fs::create_dir_all(src.path().join("beta")).unwrap();
    fs::write(src.path().join("beta/note.txt"), "hi").unwrap();

    let out = build_mirror(src.path());

    // Change feed: two documents, contiguous seqs, last_seq = 2
    let feed = read_json(&out.path().join("_changes"));
    let results = feed["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(feed["last_seq"], 2);
    assert_eq!(results[0]["seq"], 1);
    assert_eq!(results[0]["id"], "alpha");
    assert_eq!(results[1]["seq"], 2);
    assert_eq!(results[1]["id"], "beta");

    // alpha: body field preserved, metadata stamped, no attachments
    let alpha = read_json(&out.path().join("alpha"));
    assert_eq!(alpha["x"], 1);
    assert_eq!(alpha["_id"], "alpha");
    assert_eq!(alpha["_revisions"]["start"], 1);
    assert!(alpha["_attachments"].as_object().unwrap().is_empty());

    // beta: attachment-only document, body is {} plus metadata
    let beta = read_json(&out.path().join("beta"));
    assert_eq!(beta["_id"], "beta");
    let note = &beta["_attachments"]["note.txt"];
    assert_eq!(note["content_type"], "text/plain");
    assert_eq!(note["revops"], 1);
    assert_eq!(note["data"], BASE64.encode("hi"));

    // Revision tags in the feed match the documents
    assert_eq!(results[0]["changes"][0]["rev"], alpha["_rev"]);
    assert_eq!(results[1]["changes"][0]["rev"], beta["_rev"]);

    // Index descriptor
    let index = read_json(&out.path().join("index.html"));
    assert_eq!(index["update_seq"], 2);
}

#[test]
fn test_empty_source_directory() {
    let src = tempfile::tempdir().unwrap();
    let out = build_mirror(src.path());

    let feed = read_json(&out.path().join("_changes"));
    assert_eq!(feed["results"].as_array().unwrap().len(), 0);
    assert_eq!(feed["last_seq"], 0);

    let index = read_json(&out.path().join("index.html"));
    assert_eq!(index["update_seq"], 0);
}

#[test]
fn test_rebuild_is_deterministic() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("doc.json"), "{\"k\":\"v\"}").unwrap();
    fs::create_dir_all(src.path().join("doc/sub")).unwrap();
    fs::write(src.path().join("doc/sub/file.bin"), [1u8, 2, 3]).unwrap();

    let first = build_mirror(src.path());
    let second = build_mirror(src.path());

    assert_eq!(
        fs::read(first.path().join("doc")).unwrap(),
        fs::read(second.path().join("doc")).unwrap()
    );
    assert_eq!(
        fs::read(first.path().join("_changes")).unwrap(),
        fs::read(second.path().join("_changes")).unwrap()
    );
}

#[test]
fn test_identical_bodies_get_distinct_revisions() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("one.json"), "{\"same\":true}").unwrap();
    fs::write(src.path().join("two.json"), "{\"same\":true}").unwrap();

    let out = build_mirror(src.path());
    let one = read_json(&out.path().join("one"));
    let two = read_json(&out.path().join("two"));
    assert_ne!(one["_rev"], two["_rev"]);
}

#[test]
fn test_body_and_attachment_forms_collapse() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("doc.json"), "{\"x\":1}").unwrap();
    fs::create_dir_all(src.path().join("doc")).unwrap();
    fs::write(src.path().join("doc/a.txt"), "attached").unwrap();

    let out = build_mirror(src.path());

    let feed = read_json(&out.path().join("_changes"));
    assert_eq!(feed["last_seq"], 1);

    let doc = read_json(&out.path().join("doc"));
    assert_eq!(doc["x"], 1);
    assert_eq!(doc["_attachments"].as_object().unwrap().len(), 1);
}

#[test]
fn test_every_key_appears_in_feed_and_on_disk() {
    let src = tempfile::tempdir().unwrap();
    for name in ["a.json", "b.json", "c.json"] {
        fs::write(src.path().join(name), "{}").unwrap();
    }
    fs::create_dir_all(src.path().join("d")).unwrap();

    let out = build_mirror(src.path());

    let feed = read_json(&out.path().join("_changes"));
    let ids: Vec<&str> = feed["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);

    for id in ids {
        assert!(out.path().join(id).is_file(), "missing document file {id}");
    }
}

#[test]
fn test_document_files_are_compact_with_trailing_newline() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("doc.json"), "{\n  \"a\": 1\n}\n").unwrap();

    let out = build_mirror(src.path());
    let raw = fs::read_to_string(out.path().join("doc")).unwrap();
    assert!(raw.ends_with('\n'));
    assert_eq!(raw.matches('\n').count(), 1);
    assert!(!raw.contains(" :"));
}

#[test]
fn test_malformed_body_aborts_build() {
    let src = tempfile::tempdir().unwrap();
    fs::write(src.path().join("bad.json"), "{oops").unwrap();

    let out = tempfile::tempdir().unwrap();
    let result = LocalMirror::new(src.path().to_path_buf()).build(out.path());
    assert!(result.is_err());
}

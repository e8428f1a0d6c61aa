// src/changes.rs

//! Change feed rendering
//!
//! The `_changes` artifact is a single JSON object with one compact change
//! record per line inside a `results` array, terminated by a `last_seq`
//! equal to the number of documents. Sequence numbers are 1-based and
//! assigned by position in the build order supplied by the source adapter.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Name of the change feed artifact inside the output directory
pub const CHANGES_FILE: &str = "_changes";

/// One document-changed event in the feed
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    /// 1-based position in the build order
    pub seq: u64,
    /// Document key
    pub id: String,
    /// Revision references; always a single entry
    pub changes: Vec<RevRef>,
}

/// A revision reference inside a change record
#[derive(Debug, Clone, Serialize)]
pub struct RevRef {
    pub rev: String,
}

impl ChangeRecord {
    pub fn new(seq: u64, id: impl Into<String>, rev: impl Into<String>) -> Self {
        Self {
            seq,
            id: id.into(),
            changes: vec![RevRef { rev: rev.into() }],
        }
    }
}

/// Write the `_changes` artifact for an ordered list of change records.
///
/// An empty record list is legal and yields `results: []` with
/// `last_seq: 0` — the count of zero documents, not a special case.
pub fn write_change_feed(out_dir: &Path, records: &[ChangeRecord]) -> Result<()> {
    let mut out = BufWriter::new(File::create(out_dir.join(CHANGES_FILE))?);

    out.write_all(b"{\"results\":[\n")?;
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.write_all(b",\n")?;
        }
        out.write_all(serde_json::to_string(record)?.as_bytes())?;
    }
    out.write_all(b"\n],\n")?;
    writeln!(out, "\"last_seq\":{}}}", records.len())?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn read_feed(dir: &Path) -> Value {
        let raw = std::fs::read_to_string(dir.join(CHANGES_FILE)).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_empty_feed() {
        let dir = tempfile::tempdir().unwrap();
        write_change_feed(dir.path(), &[]).unwrap();

        let feed = read_feed(dir.path());
        assert_eq!(feed["results"].as_array().unwrap().len(), 0);
        assert_eq!(feed["last_seq"], 0);
    }

    #[test]
    fn test_sequential_records() {
        let dir = tempfile::tempdir().unwrap();
        let records: Vec<ChangeRecord> = ["alpha", "beta", "gamma"]
            .iter()
            .enumerate()
            .map(|(i, id)| ChangeRecord::new((i + 1) as u64, *id, format!("1-{i:032x}")))
            .collect();
        write_change_feed(dir.path(), &records).unwrap();

        let feed = read_feed(dir.path());
        let results = feed["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(feed["last_seq"], 3);

        // Contiguous 1..N sequence, no gaps or repeats
        for (i, record) in results.iter().enumerate() {
            assert_eq!(record["seq"], (i + 1) as u64);
        }
        assert_eq!(results[0]["id"], "alpha");
        assert_eq!(results[0]["changes"][0]["rev"], "1-00000000000000000000000000000000");
    }

    #[test]
    fn test_one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            ChangeRecord::new(1, "a", "1-x"),
            ChangeRecord::new(2, "b", "1-y"),
        ];
        write_change_feed(dir.path(), &records).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(CHANGES_FILE)).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines[0], "{\"results\":[");
        assert!(lines[1].starts_with("{\"seq\":1,\"id\":\"a\""));
        assert!(lines[2].starts_with("{\"seq\":2,\"id\":\"b\""));
    }
}

//! Shared fixtures for building small tables on disk.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::predict::PredictionEngine;
use crate::table::TableBuilder;

/// Serialize a table with explicit `(key, weight)` entries.
pub fn table_bytes(max_depth: u32, entries: &[(&str, f32)]) -> Vec<u8> {
    let mut builder = TableBuilder::new(max_depth).unwrap();
    for &(key, weight) in entries {
        builder.add_key(key, weight);
    }
    builder.to_bytes().unwrap()
}

pub fn write_table(dir: &Path, max_depth: u32, entries: &[(&str, f32)]) -> PathBuf {
    let path = dir.join("table.ngram");
    std::fs::write(&path, table_bytes(max_depth, entries)).unwrap();
    path
}

/// Engine over a temporary table. Keep the `TempDir` alive while querying.
pub fn engine_with(max_depth: u32, entries: &[(&str, f32)]) -> (TempDir, PredictionEngine) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(dir.path(), max_depth, entries);
    let engine = PredictionEngine::open(&path);
    assert!(engine.is_loaded(), "{:?}", engine.disabled_reason());
    (dir, engine)
}

/// The three-key table used throughout: depth 3, abc=10, bc=5, bd=3.
pub fn sample_engine() -> (TempDir, PredictionEngine) {
    engine_with(3, &[("abc", 10.0), ("bc", 5.0), ("bd", 3.0)])
}

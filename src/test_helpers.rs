//! Shared test utilities for the sfx-manifest test suite.
//!
//! Provides tree builders for temp audio roots, lookup helpers that panic
//! with the available keys on a miss, and tag assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_files(&tmp.path().join("Other"), &["RetroGames/bomb_jack_theme.ogg"]);
//!
//! let manifest = build_manifest(&builtin_library("Other"), tmp.path(), now).unwrap();
//! let record = find_record(&manifest, "audio/Other/RetroGames/bomb_jack_theme.ogg");
//! assert_tags_include(&record.tags, &["retro", "bomb jack"]);
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::{resolve_config, stock_defaults_value};
use crate::library::{self, Library};
use crate::manifest::Manifest;
use crate::types::AudioRecord;
use crate::walk::AudioFile;

// =========================================================================
// Tree setup
// =========================================================================

/// Create each `/`-separated path under `root` with a few bytes of content.
pub fn write_files(root: &Path, rel_paths: &[&str]) {
    for rel in rel_paths {
        write_file_with_size(root, rel, 4);
    }
}

/// Create a file of exactly `size` bytes, making parent folders as needed.
pub fn write_file_with_size(root: &Path, rel: &str, size: usize) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, vec![0u8; size]).unwrap();
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// A built-in library with stock settings. Panics if the name is unknown.
pub fn builtin_library(name: &str) -> Library {
    let config = resolve_config(stock_defaults_value(), None).unwrap();
    let all = library::libraries(&config);
    library::find(&all, name).cloned().unwrap_or_else(|| {
        let names: Vec<&str> = all.iter().map(|l| l.name.as_str()).collect();
        panic!("library '{name}' not found. Available: {names:?}")
    })
}

/// Find a walked file by its slash-separated relative path. Panics if not found.
pub fn find_file<'a>(files: &'a [AudioFile], rel: &str) -> &'a AudioFile {
    files
        .iter()
        .find(|f| f.rel_path_slash() == rel)
        .unwrap_or_else(|| panic!("file '{rel}' not found. Available: {:?}", rel_paths(files)))
}

/// Find a record by its manifest path. Panics if not found.
pub fn find_record<'a>(manifest: &'a Manifest, path: &str) -> &'a AudioRecord {
    manifest
        .records
        .iter()
        .find(|r| r.path == path)
        .unwrap_or_else(|| {
            let paths = record_paths(manifest);
            panic!("record '{path}' not found. Available: {paths:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Relative paths of walked files, in walk order.
pub fn rel_paths(files: &[AudioFile]) -> Vec<String> {
    files.iter().map(|f| f.rel_path_slash()).collect()
}

/// Record paths in id order.
pub fn record_paths(manifest: &Manifest) -> Vec<&str> {
    manifest.records.iter().map(|r| r.path.as_str()).collect()
}

// =========================================================================
// Tag assertions
// =========================================================================

/// Assert every expected tag is present, in any position.
pub fn assert_tags_include(tags: &[String], expected: &[&str]) {
    for tag in expected {
        assert!(
            tags.iter().any(|t| t == tag),
            "tag '{tag}' missing. Tags: {tags:?}"
        );
    }
}

pub fn assert_no_duplicate_tags(tags: &[String]) {
    let mut seen = HashSet::new();
    for tag in tags {
        assert!(seen.insert(tag), "tag '{tag}' repeated. Tags: {tags:?}");
    }
}

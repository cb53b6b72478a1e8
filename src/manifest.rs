//! Manifest assembly: walk, synthesize, number, write.
//!
//! A library's manifest is rebuilt from scratch on every run. Files are
//! walked in name order, each becomes a record, and ids are handed out
//! 1..=N in that order. Ids are positions, not identities: regenerating after
//! a file is added renumbers everything behind it. Only `path` survives
//! across runs as a key.
//!
//! ## Output
//!
//! ```text
//! audio/Other/
//! ├── RetroGames/
//! │   └── bomb_jack_theme.ogg
//! └── manifest.json        # [ { "id": 1, "path": "audio/Other/RetroGames/bomb_jack_theme.ogg", ... } ]
//! ```
//!
//! The full manifest is built in memory, written to `manifest.json.tmp` and
//! renamed into place, so an interrupted run leaves the previous manifest
//! intact. A missing library root still produces a manifest: `[]`.
//!
//! ## Fingerprints
//!
//! [`Manifest::fingerprint`] hashes the record content that depends only on
//! the files (everything except `id` and `dateAdded`). Two scans of an
//! unchanged tree give the same fingerprint, which is how `check` tells
//! whether a manifest on disk is stale.

use crate::library::Library;
use crate::synth::{SynthError, Synthesizer};
use crate::types::AudioRecord;
use crate::walk::{self, WalkError};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Name of the manifest file inside each library root.
pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Walk error: {0}")]
    Walk(#[from] WalkError),
    #[error("Synthesis error: {0}")]
    Synth(#[from] SynthError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown library: {0}")]
    UnknownLibrary(String),
}

/// The records of one library, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub records: Vec<AudioRecord>,
}

impl Manifest {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn fingerprint(&self) -> String {
        content_fingerprint(&self.records)
    }
}

/// SHA-256 over every record's file-derived fields, in record order.
///
/// `id` and `dateAdded` are left out: ids follow from the walk order and the
/// date changes on every run.
pub fn content_fingerprint(records: &[AudioRecord]) -> String {
    let mut hasher = Sha256::new();
    for record in records {
        hasher.update(record.path.as_bytes());
        hasher.update(b"\0");
        hasher.update(record.name.as_bytes());
        hasher.update(b"\0");
        hasher.update(record.category.as_bytes());
        hasher.update(b"\0");
        hasher.update(record.format.as_str().as_bytes());
        hasher.update(b"\0");
        hasher.update(record.size.to_le_bytes());
        for tag in &record.tags {
            hasher.update(tag.as_bytes());
            hasher.update(b"\x1f");
        }
        hasher.update(b"\0");
        hasher.update(record.description.as_bytes());
        hasher.update(b"\0");
        hasher.update(record.library.as_bytes());
        hasher.update(b"\x1e");
    }
    format!("{:x}", hasher.finalize())
}

/// Scan a library and build its manifest in memory.
///
/// Every record shares `generated_at` as its `dateAdded`.
pub fn build_manifest(
    library: &Library,
    audio_root: &Path,
    generated_at: DateTime<Utc>,
) -> Result<Manifest, ManifestError> {
    let root = library.root(audio_root);
    let files = walk::walk(&root, &library.walk_options())?;
    let synthesizer = Synthesizer::new(library);

    let mut records = Vec::with_capacity(files.len());
    for (file, id) in files.iter().zip(1u32..) {
        records.push(synthesizer.synthesize(file)?.into_record(id, generated_at));
    }
    Ok(Manifest { records })
}

/// Path of a library's manifest file.
pub fn manifest_path(library: &Library, audio_root: &Path) -> PathBuf {
    library.root(audio_root).join(MANIFEST_FILENAME)
}

/// Write pretty-printed JSON, replacing any previous manifest in one rename.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), ManifestError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read a manifest from disk. Returns `Ok(None)` if the file doesn't exist.
pub fn read_manifest(path: &Path) -> Result<Option<Manifest>, ManifestError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

/// Result of scanning one library.
#[derive(Debug)]
pub struct ScanOutcome {
    pub library: String,
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    /// Fingerprint of the manifest that was on disk before this run.
    pub previous_fingerprint: Option<String>,
    pub written: bool,
}

impl ScanOutcome {
    /// Whether the new manifest differs in content from the one on disk.
    pub fn changed(&self) -> bool {
        self.previous_fingerprint.as_deref() != Some(self.manifest.fingerprint().as_str())
    }
}

/// Build one library's manifest, compare it with the one on disk and,
/// when `write` is set, replace it.
pub fn scan_library(
    library: &Library,
    audio_root: &Path,
    generated_at: DateTime<Utc>,
    write: bool,
) -> Result<ScanOutcome, ManifestError> {
    let manifest_path = manifest_path(library, audio_root);
    let previous_fingerprint = match read_manifest(&manifest_path) {
        Ok(previous) => previous.map(|m| m.fingerprint()),
        Err(e) => {
            warn!(path = %manifest_path.display(), error = %e, "existing manifest unreadable");
            None
        }
    };

    let manifest = build_manifest(library, audio_root, generated_at)?;
    if write {
        write_manifest(&manifest_path, &manifest)?;
        info!(
            library = %library.name,
            records = manifest.len(),
            path = %manifest_path.display(),
            "manifest written"
        );
    }

    Ok(ScanOutcome {
        library: library.name.clone(),
        manifest_path,
        manifest,
        previous_fingerprint,
        written: write,
    })
}

/// Scan several libraries in parallel. Outcomes keep the input order; the
/// first failing library aborts the batch.
pub fn scan_libraries(
    libraries: &[Library],
    audio_root: &Path,
    generated_at: DateTime<Utc>,
    write: bool,
) -> Result<Vec<ScanOutcome>, ManifestError> {
    libraries
        .par_iter()
        .map(|library| scan_library(library, audio_root, generated_at, write))
        .collect()
}

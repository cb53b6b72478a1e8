//! Shared types written to (and read back from) `manifest.json`.
//!
//! The browsing app reads these records directly, so field names and order
//! are part of the contract: camelCase keys, `duration`/`rating` present as
//! zero placeholders, `tags` as an array of lowercase strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Audio container types that make it into a manifest.
///
/// A `.flac` or any other file sitting in a library folder is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Ogg,
    Wav,
    Mp3,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 3] = [AudioFormat::Ogg, AudioFormat::Wav, AudioFormat::Mp3];

    /// Match a bare extension (no dot), case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| ext.eq_ignore_ascii_case(f.as_str()))
    }

    /// Format of a file path, or `None` when the extension is missing or not allowed.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AudioFormat::Ogg => "ogg",
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a library manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRecord {
    /// 1-based position in the manifest. Not stable across regenerations.
    pub id: u32,
    /// `audio/<Library>/<relative path>`, always forward slashes.
    pub path: String,
    pub name: String,
    pub category: String,
    pub format: AudioFormat,
    /// File length in bytes at scan time.
    pub size: u64,
    /// Filled in by the browser at playback time.
    pub duration: u32,
    /// Filled in by the browser from user ratings.
    pub rating: u32,
    pub tags: Vec<String>,
    pub description: String,
    pub library: String,
    pub date_added: DateTime<Utc>,
}

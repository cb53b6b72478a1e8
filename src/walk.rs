//! Directory walking: find the audio files of one library.
//!
//! A library root holds one folder per category. Everything below a category
//! folder is walked recursively; folders below the category become the
//! file's subcategory.
//!
//! ```text
//! audio/Kenney/                    # library root
//! ├── Interface Sounds/            # category "Interface Sounds"
//! │   ├── click_001.ogg            # subcategory ""
//! │   └── Switches/                # subcategory "Switches"
//! │       └── switch_01.ogg
//! └── manifest.json                # not audio, ignored
//! ```
//!
//! ## Subcategories
//!
//! How the subcategory is picked for files nested more than one folder below
//! the category depends on the library ([`SubcategoryRule`]):
//!
//! - `immediate`: the file's own parent folder (each level overrides the last)
//! - `first_level`: the first folder below the category, kept for deeper files
//!
//! ## What is skipped
//!
//! Nothing here is an error except real I/O failures:
//! - a missing library root yields no files
//! - a missing folder from a fixed category list yields no files
//! - files directly in the library root have no category and are skipped
//! - files whose extension is not in [`AudioFormat`] are skipped
//!
//! Entries are visited in file-name order so manifests are identical across
//! hosts.

use crate::types::AudioFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf, StripPrefixError};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Path escaped the library root: {0}")]
    Prefix(#[from] StripPrefixError),
}

/// How nested folders map to a file's subcategory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubcategoryRule {
    #[default]
    Immediate,
    FirstLevel,
}

/// Which folders to walk and how to name subcategories.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions<'a> {
    /// Restrict the walk to these category folders, in this order.
    pub categories: Option<&'a [String]>,
    pub subcategory: SubcategoryRule,
}

/// One audio file found under a library root.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    pub abs_path: PathBuf,
    /// Path relative to the library root, category folder first.
    pub rel_path: PathBuf,
    /// Raw category folder name.
    pub category: String,
    /// Raw subcategory folder name, empty when the file sits in the category folder.
    pub subcategory: String,
    pub format: AudioFormat,
}

impl AudioFile {
    /// Build the file tuple from a path relative to the library root.
    ///
    /// Returns `None` when the path has no category folder or its extension
    /// is not an allowed audio format.
    pub fn from_relative(root: &Path, rel_path: &Path, rule: SubcategoryRule) -> Option<Self> {
        let format = AudioFormat::from_path(rel_path)?;
        let mut components = rel_path.components();
        let category = components.next()?.as_os_str().to_string_lossy().to_string();
        let within_category = components.as_path();
        if within_category.as_os_str().is_empty() {
            return None;
        }
        Some(Self {
            abs_path: root.join(rel_path),
            rel_path: rel_path.to_path_buf(),
            category,
            subcategory: subcategory_for(within_category, rule),
            format,
        })
    }

    /// Relative path joined with `/` regardless of host separator.
    pub fn rel_path_slash(&self) -> String {
        self.rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Walk a library root and collect its audio files.
pub fn walk(root: &Path, options: &WalkOptions<'_>) -> Result<Vec<AudioFile>, WalkError> {
    if !root.is_dir() {
        debug!(root = %root.display(), "library root missing, nothing to scan");
        return Ok(Vec::new());
    }

    let category_dirs = match options.categories {
        Some(names) => fixed_category_dirs(root, names),
        None => category_dirs(root)?,
    };

    let mut files = Vec::new();
    for dir in category_dirs {
        walk_category(root, &dir, options.subcategory, &mut files)?;
    }
    Ok(files)
}

/// Every folder directly under the root, by name.
fn category_dirs(root: &Path) -> Result<Vec<PathBuf>, WalkError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        } else {
            debug!(file = %path.display(), "file outside any category, skipped");
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn fixed_category_dirs(root: &Path, names: &[String]) -> Vec<PathBuf> {
    names
        .iter()
        .filter_map(|name| {
            let dir = root.join(name);
            if dir.is_dir() {
                Some(dir)
            } else {
                debug!(category = %name, "category folder missing, skipped");
                None
            }
        })
        .collect()
}

fn walk_category(
    root: &Path,
    category_dir: &Path,
    rule: SubcategoryRule,
    files: &mut Vec<AudioFile>,
) -> Result<(), WalkError> {
    for entry in WalkDir::new(category_dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let rel_path = entry.path().strip_prefix(root)?;
        match AudioFile::from_relative(root, rel_path, rule) {
            Some(file) => files.push(file),
            None => debug!(file = %entry.path().display(), "unsupported extension, skipped"),
        }
    }
    Ok(())
}

/// Pick the subcategory from a path relative to its category folder.
fn subcategory_for(within_category: &Path, rule: SubcategoryRule) -> String {
    let folders: Vec<String> = within_category
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();

    let picked = match rule {
        SubcategoryRule::Immediate => folders.last(),
        SubcategoryRule::FirstLevel => folders.first(),
    };
    picked.cloned().unwrap_or_default()
}

//! Record synthesis: turn one walked file into manifest fields.
//!
//! For each [`AudioFile`] the synthesizer:
//!
//! 1. runs the library's [`Hook`](crate::hooks::Hook)s over the raw category,
//!    subcategory and filename stem
//! 2. derives the display name from the (possibly stripped) stem
//! 3. builds the tag set in a fixed order:
//!    category, subcategory, library identity tags, then every matching
//!    rule in table order, lowercased and deduplicated
//! 4. reads the file size from the filesystem
//!
//! Everything except the size lookup is pure and available through
//! [`classify`], which the CLI uses to preview tags for a path that does not
//! exist yet.

use crate::hooks::{self, Labels};
use crate::library::Library;
use crate::naming;
use crate::rules::{self, MatchText, TagSet};
use crate::types::{AudioFormat, AudioRecord};
use crate::walk::AudioFile;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Cannot read metadata of {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Name, labels and tags of a file, before anything touches the filesystem.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub tags: Vec<String>,
}

/// Classify a file from its raw folder names and filename stem.
pub fn classify(library: &Library, category: &str, subcategory: &str, stem: &str) -> Classification {
    let mut labels = Labels {
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        name_stem: stem.to_string(),
    };
    hooks::apply_all(&library.hooks, &mut labels);

    let mut tags = TagSet::new();
    tags.insert(&labels.category);
    tags.insert(&labels.subcategory);
    tags.extend(library.identity_tags.iter().map(String::as_str));

    let filename = stem.to_lowercase();
    let category_lower = labels.category.to_lowercase();
    let subcategory_lower = labels.subcategory.to_lowercase();
    let text = MatchText {
        filename: &filename,
        category: &category_lower,
        subcategory: &subcategory_lower,
    };
    rules::apply_rules(&library.rules, &text, &mut tags);

    Classification {
        name: naming::display_name(&labels.name_stem),
        category: labels.category,
        subcategory: labels.subcategory,
        tags: tags.into_vec(),
    }
}

/// Classify a library-relative path without touching the filesystem.
///
/// `None` when the walker would never yield the path: no category folder,
/// a category outside the library's fixed list, or an unsupported extension.
pub fn classify_path(library: &Library, rel_path: &Path) -> Option<Classification> {
    let file = AudioFile::from_relative(Path::new(""), rel_path, library.subcategory)?;
    if let Some(categories) = &library.categories
        && !categories.contains(&file.category)
    {
        return None;
    }
    let stem = naming::file_stem(&file.rel_path);
    Some(classify(library, &file.category, &file.subcategory, &stem))
}

/// A record waiting for its id.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub path: String,
    pub name: String,
    pub category: String,
    pub format: AudioFormat,
    pub size: u64,
    pub tags: Vec<String>,
    pub description: String,
    pub library: String,
}

impl RecordDraft {
    pub fn into_record(self, id: u32, date_added: DateTime<Utc>) -> AudioRecord {
        AudioRecord {
            id,
            path: self.path,
            name: self.name,
            category: self.category,
            format: self.format,
            size: self.size,
            duration: 0,
            rating: 0,
            tags: self.tags,
            description: self.description,
            library: self.library,
            date_added,
        }
    }
}

/// `"<name> from <library> <category> collection."`
pub fn describe(name: &str, library: &str, category: &str) -> String {
    format!("{name} from {library} {category} collection.")
}

/// Builds record drafts for one library.
pub struct Synthesizer<'a> {
    library: &'a Library,
}

impl<'a> Synthesizer<'a> {
    pub fn new(library: &'a Library) -> Self {
        Self { library }
    }

    pub fn synthesize(&self, file: &AudioFile) -> Result<RecordDraft, SynthError> {
        let stem = naming::file_stem(&file.rel_path);
        let class = classify(self.library, &file.category, &file.subcategory, &stem);

        let size = fs::metadata(&file.abs_path)
            .map_err(|source| SynthError::Metadata {
                path: file.abs_path.clone(),
                source,
            })?
            .len();

        Ok(RecordDraft {
            path: format!("{}/{}", self.library.path_prefix, file.rel_path_slash()),
            description: describe(&class.name, &self.library.display_name, &class.category),
            name: class.name,
            category: class.category,
            format: file.format,
            size,
            tags: class.tags,
            library: self.library.display_name.clone(),
        })
    }
}

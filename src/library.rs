//! Library definitions.
//!
//! A library is one vendor collection living in its own folder under the
//! audio root, with its own manifest. Everything that differs between
//! libraries is data:
//!
//! | Field | Effect |
//! |-------|--------|
//! | `dir` | folder under the audio root |
//! | `display_name` | `library` field and description text |
//! | `path_prefix` | start of every manifest `path` |
//! | `categories` | fixed list of category folders to scan |
//! | `subcategory` | [`SubcategoryRule`] for nested folders |
//! | `identity_tags` | tags every record of the library gets |
//! | `hooks` | label rewrites ([`Hook`]) |
//! | `rules` | the tag rule table ([`TagRule`]) |
//!
//! The eight built-in libraries ship as TOML tables compiled into the
//! binary (`src/libraries/*.toml`) and form the `libraries` section of the
//! stock config, so a `catalog.toml` can override any part of them.

use crate::config::{CatalogConfig, LibraryConfig};
use crate::hooks::Hook;
use crate::rules::TagRule;
use crate::walk::{SubcategoryRule, WalkOptions};
use std::path::{Path, PathBuf};

/// Built-in library tables, keyed by library name.
const BUILTIN: &[(&str, &str)] = &[
    ("Adobe", include_str!("libraries/adobe.toml")),
    ("BoomLibrary", include_str!("libraries/boomlibrary.toml")),
    ("Foley", include_str!("libraries/foley.toml")),
    ("Kenney", include_str!("libraries/kenney.toml")),
    ("Musopen", include_str!("libraries/musopen.toml")),
    ("OpenGameArt", include_str!("libraries/opengameart.toml")),
    ("Other", include_str!("libraries/other.toml")),
    ("Sonniss", include_str!("libraries/sonniss.toml")),
];

/// The built-in library tables as one TOML table.
pub fn builtin_libraries_value() -> toml::Value {
    let table = BUILTIN
        .iter()
        .map(|(name, source)| {
            let value: toml::Value =
                toml::from_str(source).expect("built-in library tables must parse");
            (name.to_string(), value)
        })
        .collect();
    toml::Value::Table(table)
}

/// A library with every default resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Library {
    /// Config key, used on the command line.
    pub name: String,
    pub dir: String,
    pub display_name: String,
    pub path_prefix: String,
    pub categories: Option<Vec<String>>,
    pub subcategory: SubcategoryRule,
    pub identity_tags: Vec<String>,
    pub hooks: Vec<Hook>,
    pub rules: Vec<TagRule>,
}

impl Library {
    pub fn from_config(name: &str, config: &LibraryConfig, catalog_prefix: &str) -> Self {
        let dir = config.dir.clone().unwrap_or_else(|| name.to_string());
        let path_prefix = config.path_prefix.clone().unwrap_or_else(|| {
            let base = catalog_prefix.trim_end_matches('/');
            if base.is_empty() {
                dir.clone()
            } else {
                format!("{base}/{dir}")
            }
        });
        Self {
            name: name.to_string(),
            display_name: config
                .display_name
                .clone()
                .unwrap_or_else(|| name.to_string()),
            dir,
            path_prefix,
            categories: config.categories.clone(),
            subcategory: config.subcategory,
            identity_tags: config.identity_tags.clone(),
            hooks: config.hooks.clone(),
            rules: config.rules.clone(),
        }
    }

    /// The library's folder under the audio root.
    pub fn root(&self, audio_root: &Path) -> PathBuf {
        audio_root.join(&self.dir)
    }

    pub fn walk_options(&self) -> WalkOptions<'_> {
        WalkOptions {
            categories: self.categories.as_deref(),
            subcategory: self.subcategory,
        }
    }
}

/// Every configured library, in name order.
pub fn libraries(config: &CatalogConfig) -> Vec<Library> {
    config
        .libraries
        .iter()
        .map(|(name, lib)| Library::from_config(name, lib, &config.path_prefix))
        .collect()
}

/// Look a library up by name or folder, ignoring case.
pub fn find<'a>(libraries: &'a [Library], name: &str) -> Option<&'a Library> {
    libraries
        .iter()
        .find(|l| l.name.eq_ignore_ascii_case(name) || l.dir.eq_ignore_ascii_case(name))
}

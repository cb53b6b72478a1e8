//! Catalog configuration.
//!
//! Configuration is layered: the stock defaults (global settings plus the
//! built-in library tables from [`crate::library`]) are overridden by an
//! optional `catalog.toml` in the audio root.
//!
//! ```text
//! audio/
//! ├── catalog.toml        # optional overlay
//! ├── Kenney/             # one folder per library
//! ├── BoomLibrary/
//! └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! path_prefix = "audio"     # Manifest paths start with "<path_prefix>/<dir>/"
//!
//! [processing]
//! max_processes = 4         # Libraries scanned in parallel (omit for auto = CPU cores)
//!
//! [libraries.Kenney]        # Override one field of a built-in library...
//! identity_tags = ["kenney", "cc0"]
//!
//! [libraries.Field]         # ...or add a new one
//! dir = "FieldRecordings"
//! display_name = "Field Recordings"
//! subcategory = "first_level"
//!
//! [[libraries.Field.rules]]
//! match = "filename"        # "filename" | "category" | "subcategory"
//! contains = "rain"
//! tags = ["rain", "weather"]
//! ```
//!
//! Tables merge key by key, so an overlay only needs the keys it changes.
//! Arrays (`rules`, `hooks`, `categories`, `identity_tags`) are replaced
//! whole. Unknown keys are rejected to catch typos early.

use crate::hooks::Hook;
use crate::library;
use crate::rules::TagRule;
use crate::walk::SubcategoryRule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional overlay file in the audio root.
pub const CONFIG_FILENAME: &str = "catalog.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Catalog configuration loaded from `catalog.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// First segment of every manifest path (`audio/Kenney/...`).
    pub path_prefix: String,
    /// Parallel scanning settings.
    pub processing: ProcessingConfig,
    /// Library tables keyed by library name.
    pub libraries: BTreeMap<String, LibraryConfig>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path_prefix: "audio".to_string(),
            processing: ProcessingConfig::default(),
            libraries: BTreeMap::new(),
        }
    }
}

/// One library as written in TOML. See [`crate::library::Library`] for the
/// resolved form with defaults filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// Folder under the audio root. Defaults to the table key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Name used in descriptions and the `library` field. Defaults to the table key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Manifest path prefix. Defaults to `<path_prefix>/<dir>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,
    /// Scan only these category folders, in this order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    pub subcategory: SubcategoryRule,
    pub identity_tags: Vec<String>,
    pub hooks: Vec<Hook>,
    pub rules: Vec<TagRule>,
}

impl CatalogConfig {
    /// Validate values that deserialize fine but would produce broken manifests.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        if self.path_prefix.contains('\\') {
            return Err(ConfigError::Validation(
                "path_prefix must use forward slashes".into(),
            ));
        }
        let mut owners: BTreeMap<String, &str> = BTreeMap::new();
        for (name, lib) in &self.libraries {
            lib.validate(name)?;
            let dir = lib.dir.as_deref().unwrap_or(name);
            if let Some(other) = owners.insert(dir.to_ascii_lowercase(), name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "libraries.{other} and libraries.{name} both use the folder {dir:?}"
                )));
            }
        }
        Ok(())
    }
}

impl LibraryConfig {
    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> {
            Err(ConfigError::Validation(format!("libraries.{name}: {msg}")))
        };

        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "library names must not be empty".into(),
            ));
        }
        if self.dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return invalid("dir must not be empty".into());
        }
        if self.display_name.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return invalid("display_name must not be empty".into());
        }
        if let Some(categories) = &self.categories
            && categories.iter().any(|c| c.trim().is_empty())
        {
            return invalid("categories must not contain empty names".into());
        }
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.contains.is_empty() {
                return invalid(format!("rules[{i}].contains must not be empty"));
            }
            if rule.tags.is_empty() || rule.tags.iter().any(|t| t.trim().is_empty()) {
                return invalid(format!("rules[{i}] needs at least one non-empty tag"));
            }
        }
        for (i, hook) in self.hooks.iter().enumerate() {
            let empty = match hook {
                Hook::StripCategoryPrefix { prefix } | Hook::StripNamePrefix { prefix } => {
                    prefix.is_empty()
                }
                Hook::CategoryLabel { contains, label }
                | Hook::SubcategoryLabel { contains, label } => {
                    contains.is_empty() || label.trim().is_empty()
                }
                Hook::CategoryCase { .. } => false,
            };
            if empty {
                return invalid(format!("hooks[{i}] has an empty value"));
            }
        }
        Ok(())
    }
}

/// Parallel scanning settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of libraries scanned at once.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a TOML table: global defaults plus every built-in library.
pub fn stock_defaults_value() -> toml::Value {
    let mut value =
        toml::Value::try_from(CatalogConfig::default()).expect("default config must serialize");
    if let toml::Value::Table(table) = &mut value {
        table.insert("libraries".into(), library::builtin_libraries_value());
    }
    value
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `catalog.toml` from a directory as a raw TOML value, if present.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CatalogConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CatalogConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the catalog config for an audio root: stock defaults plus its
/// `catalog.toml`, if any.
pub fn load_config(audio_root: &Path) -> Result<CatalogConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(audio_root)?)
}

/// A commented `catalog.toml` documenting every option.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# sfx-manifest catalog configuration
# ==================================
# Place this file at <audio-root>/catalog.toml. Every setting is optional;
# values shown are the defaults. The built-in libraries (Kenney, Adobe,
# BoomLibrary, Sonniss, Other, OpenGameArt, Foley, Musopen) are always
# present; tables here are merged on top of them.
# Unknown keys will cause an error.

# First segment of every manifest path: "<path_prefix>/<library dir>/...".
path_prefix = "audio"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum number of libraries scanned at once by `build`.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Libraries
# ---------------------------------------------------------------------------
# Override part of a built-in library (arrays replace the built-in ones):
#
# [libraries.Kenney]
# identity_tags = ["kenney", "cc0"]
#
# Or add a new library:
#
# [libraries.Field]
# dir = "FieldRecordings"            # unshared folder under the audio root (default: table key)
# display_name = "Field Recordings"  # used in descriptions (default: table key)
# categories = ["Rain", "Wind"]      # only scan these folders (default: all)
# subcategory = "immediate"          # or "first_level"
# identity_tags = ["field recording"]
#
# [[libraries.Field.hooks]]
# kind = "category_label"            # strip_category_prefix | category_case |
# contains = "storm"                 # category_label | subcategory_label |
# label = "Weather"                  # strip_name_prefix
#
# [[libraries.Field.rules]]
# match = "filename"                 # filename | category | subcategory
# contains = "rain"
# tags = ["rain", "weather"]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = CatalogConfig::default();
        assert_eq!(config.path_prefix, "audio");
        assert_eq!(config.processing.max_processes, None);
        assert!(config.libraries.is_empty());
    }

    #[test]
    fn stock_defaults_include_builtin_libraries() {
        let val = stock_defaults_value();
        let libraries = val.get("libraries").unwrap().as_table().unwrap();
        for name in ["Kenney", "Adobe", "BoomLibrary", "Other"] {
            assert!(libraries.contains_key(name), "missing {name}");
        }
        assert_eq!(libraries.len(), 8);
    }

    #[test]
    fn load_config_without_file_has_builtins() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.libraries.len(), 8);
        assert_eq!(config.path_prefix, "audio");
    }

    #[test]
    fn overlay_overrides_one_library_field() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[libraries.Kenney]
identity_tags = ["kenney-only"]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        let kenney = &config.libraries["Kenney"];
        assert_eq!(kenney.identity_tags, vec!["kenney-only"]);
        // Rules come from the built-in table
        assert!(!kenney.rules.is_empty());
    }

    #[test]
    fn overlay_adds_library() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[libraries.Field]
dir = "FieldRecordings"
subcategory = "first_level"

[[libraries.Field.rules]]
contains = "rain"
tags = ["rain"]
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        let field = &config.libraries["Field"];
        assert_eq!(field.dir.as_deref(), Some("FieldRecordings"));
        assert_eq!(field.subcategory, SubcategoryRule::FirstLevel);
        assert_eq!(config.libraries.len(), 9);
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_top_level_key_rejected() {
        let result: Result<CatalogConfig, _> = toml::from_str("path_prefx = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_library_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[libraries.Kenney]
identity_tag = ["typo"]
"#,
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_rule_key_rejected() {
        let toml_str = r#"
[libraries.X]
[[libraries.X.rules]]
contains = "a"
tag = ["a"]
"#;
        let result: Result<CatalogConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    fn with_library(lib: LibraryConfig) -> CatalogConfig {
        let mut config = CatalogConfig::default();
        config.libraries.insert("Test".into(), lib);
        config
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(CatalogConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_stock_config_passes() {
        let config = resolve_config(stock_defaults_value(), None).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = CatalogConfig::default();
        config.processing.max_processes = Some(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_processes"));
    }

    #[test]
    fn validate_backslash_prefix() {
        let config = CatalogConfig {
            path_prefix: "audio\\sfx".into(),
            ..CatalogConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_rule_pattern() {
        let config = with_library(LibraryConfig {
            rules: vec![TagRule {
                scope: Default::default(),
                contains: String::new(),
                tags: vec!["x".into()],
            }],
            ..LibraryConfig::default()
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("libraries.Test"));
    }

    #[test]
    fn validate_rule_without_tags() {
        let config = with_library(LibraryConfig {
            rules: vec![TagRule {
                scope: Default::default(),
                contains: "door".into(),
                tags: vec![],
            }],
            ..LibraryConfig::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_hook_label() {
        let config = with_library(LibraryConfig {
            hooks: vec![Hook::CategoryLabel {
                contains: "voice".into(),
                label: " ".into(),
            }],
            ..LibraryConfig::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_dir() {
        let config = with_library(LibraryConfig {
            dir: Some(String::new()),
            ..LibraryConfig::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_shared_dir() {
        let mut config = with_library(LibraryConfig {
            dir: Some("Shared".into()),
            ..LibraryConfig::default()
        });
        config.libraries.insert(
            "Second".into(),
            LibraryConfig {
                dir: Some("shared".into()),
                ..LibraryConfig::default()
            },
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Shared"), "{err}");
    }

    #[test]
    fn validate_dir_matching_other_library_name() {
        let mut config = with_library(LibraryConfig::default());
        config.libraries.insert(
            "Alias".into(),
            LibraryConfig {
                dir: Some("TEST".into()),
                ..LibraryConfig::default()
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolve_config_rejects_overlay_reusing_builtin_folder() {
        let overlay: toml::Value = toml::from_str(
            r#"
[libraries.Dup]
dir = "Other"
"#,
        )
        .unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str(
            r#"
[processing]
max_processes = 0
"#,
        )
        .unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"path_prefix = "audio""#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"path_prefix = "sfx""#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("path_prefix").unwrap().as_str(), Some("sfx"));
    }

    #[test]
    fn merge_toml_nested_tables_keep_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
[libraries.A]
dir = "A"
identity_tags = ["a"]
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[libraries.A]
identity_tags = ["b"]
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let a = merged.get("libraries").unwrap().get("A").unwrap();
        assert_eq!(a.get("dir").unwrap().as_str(), Some("A"));
        assert_eq!(a.get("identity_tags").unwrap().as_array().unwrap().len(), 1);
        assert_eq!(
            a.get("identity_tags").unwrap().as_array().unwrap()[0].as_str(),
            Some("b")
        );
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str(r#"tags = ["a", "b", "c"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"tags = ["z"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("tags").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_is_valid_and_matches_defaults() {
        let config: CatalogConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.path_prefix, "audio");
        assert_eq!(config.processing.max_processes, None);
        assert!(config.libraries.is_empty());
    }

    #[test]
    fn stock_config_toml_documents_every_section() {
        let content = stock_config_toml();
        assert!(content.contains("path_prefix"));
        assert!(content.contains("[processing]"));
        assert!(content.contains("[libraries.Kenney]"));
        assert!(content.contains("[[libraries.Field.rules]]"));
        assert!(content.contains("[[libraries.Field.hooks]]"));
    }
}

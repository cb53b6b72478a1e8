//! Per-library label adjustments applied before a record is built.
//!
//! Vendor folder names are not always what the catalog should show. Hooks
//! rewrite the raw category, subcategory and name stem of each file, in the
//! order the library lists them:
//!
//! ```toml
//! [[libraries.Kenney.hooks]]
//! kind = "strip_category_prefix"
//! prefix = "kenney_"
//!
//! [[libraries.Kenney.hooks]]
//! kind = "category_label"
//! contains = "voiceover"
//! label = "Voices"
//! ```
//!
//! The category tag and category-scoped rules see the rewritten category.
//! Filename rules always see the original stem; only the display name uses
//! the stripped one.

use crate::naming;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryCase {
    Lower,
    Upper,
    /// Separators to spaces, first letter of each word uppercased.
    Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hook {
    StripCategoryPrefix { prefix: String },
    CategoryCase { case: CategoryCase },
    /// Replace the whole category when it contains `contains`.
    CategoryLabel { contains: String, label: String },
    /// Replace a non-empty subcategory when it contains `contains`.
    SubcategoryLabel { contains: String, label: String },
    StripNamePrefix { prefix: String },
}

/// The mutable labels of one file while hooks run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Labels {
    pub category: String,
    pub subcategory: String,
    pub name_stem: String,
}

impl Hook {
    pub fn apply(&self, labels: &mut Labels) {
        match self {
            Hook::StripCategoryPrefix { prefix } => {
                if let Some(rest) = strip_prefix_ignore_case(&labels.category, prefix) {
                    labels.category = rest;
                }
            }
            Hook::CategoryCase { case } => {
                labels.category = match case {
                    CategoryCase::Lower => labels.category.to_lowercase(),
                    CategoryCase::Upper => labels.category.to_uppercase(),
                    CategoryCase::Title => naming::display_name(&labels.category),
                };
            }
            Hook::CategoryLabel { contains, label } => {
                if contains_ignore_case(&labels.category, contains) {
                    labels.category = label.clone();
                }
            }
            Hook::SubcategoryLabel { contains, label } => {
                if !labels.subcategory.is_empty()
                    && contains_ignore_case(&labels.subcategory, contains)
                {
                    labels.subcategory = label.clone();
                }
            }
            Hook::StripNamePrefix { prefix } => {
                if let Some(rest) = strip_prefix_ignore_case(&labels.name_stem, prefix) {
                    labels.name_stem = rest;
                }
            }
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::StripCategoryPrefix { prefix } => write!(f, "strip category prefix {prefix:?}"),
            Hook::CategoryCase { case } => write!(f, "category case {case:?}"),
            Hook::CategoryLabel { contains, label } => {
                write!(f, "category containing {contains:?} → {label:?}")
            }
            Hook::SubcategoryLabel { contains, label } => {
                write!(f, "subcategory containing {contains:?} → {label:?}")
            }
            Hook::StripNamePrefix { prefix } => write!(f, "strip name prefix {prefix:?}"),
        }
    }
}

/// Run hooks in order over the labels.
pub fn apply_all(hooks: &[Hook], labels: &mut Labels) {
    for hook in hooks {
        hook.apply(labels);
    }
}

fn contains_ignore_case(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(&needle.to_lowercase())
}

const SEPARATORS: [char; 3] = [' ', '_', '-'];

/// Strip `prefix` (ASCII case-insensitive) and any separators after it.
/// The prefix must end at a word boundary: `kenney` strips `Kenney_UI` but
/// not `Kenneyland`. Returns `None` when the prefix is absent or nothing
/// would remain.
fn strip_prefix_ignore_case(text: &str, prefix: &str) -> Option<String> {
    let head = text.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let after = &text[prefix.len()..];
    let at_boundary = prefix.ends_with(SEPARATORS) || after.starts_with(SEPARATORS);
    if !at_boundary {
        return None;
    }
    let rest = after.trim_start_matches(SEPARATORS);
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

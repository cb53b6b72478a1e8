//! Substring tag rules.
//!
//! Each library carries its own ordered table of rules. A rule fires when its
//! `contains` text appears in one lowercased field of the file (the filename
//! stem by default, or the category/subcategory name) and then adds its tags.
//!
//! ```toml
//! [[libraries.Other.rules]]
//! contains = "bomb_jack"
//! tags = ["bomb jack", "arcade", "platformer", "mark cooksey"]
//!
//! [[libraries.BoomLibrary.rules]]
//! match = "category"
//! contains = "cinematic hits"
//! tags = ["hit", "impact", "cinematic"]
//! ```
//!
//! Rules never look at each other: a table may hold overlapping entries
//! (`sting` and `stinger`) and the [`TagSet`] drops the repeats. Evaluation
//! order only decides the order tags appear in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which field a rule's substring is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScope {
    #[default]
    Filename,
    Category,
    Subcategory,
}

impl fmt::Display for MatchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchScope::Filename => "filename",
            MatchScope::Category => "category",
            MatchScope::Subcategory => "subcategory",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagRule {
    #[serde(default, rename = "match")]
    pub scope: MatchScope,
    pub contains: String,
    pub tags: Vec<String>,
}

impl TagRule {
    pub fn matches(&self, text: &MatchText<'_>) -> bool {
        let haystack = match self.scope {
            MatchScope::Filename => text.filename,
            MatchScope::Category => text.category,
            MatchScope::Subcategory => text.subcategory,
        };
        !haystack.is_empty() && haystack.contains(&self.contains.to_lowercase())
    }
}

/// Lowercased fields a rule can match against.
#[derive(Debug, Clone, Default)]
pub struct MatchText<'a> {
    pub filename: &'a str,
    pub category: &'a str,
    pub subcategory: &'a str,
}

/// Lowercase tags in first-seen order, without repeats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag unless it is blank or already present.
    pub fn insert(&mut self, tag: &str) {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn extend<'a>(&mut self, tags: impl IntoIterator<Item = &'a str>) {
        for tag in tags {
            self.insert(tag);
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.tags
    }
}

/// Run every rule in order, adding the tags of those that match.
pub fn apply_rules(rules: &[TagRule], text: &MatchText<'_>, tags: &mut TagSet) {
    for rule in rules.iter().filter(|r| r.matches(text)) {
        tags.extend(rule.tags.iter().map(String::as_str));
    }
}

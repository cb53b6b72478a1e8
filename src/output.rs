//! CLI output formatting for every command.
//!
//! Output is **library-centric**: each block leads with the library (or the
//! file being classified) and shows paths and counts as indented context
//! lines, so a run reads as an inventory of what was catalogued.
//!
//! # Output Format
//!
//! ## Scan / Build
//!
//! ```text
//! 001 Other (3 records)
//!     Manifest: audio/Other/manifest.json
//!     Chiptune: 1
//!     RetroGames: 2
//!     Status: written, content changed
//!
//! Built 1 manifest, 3 records
//! ```
//!
//! ## Libraries
//!
//! ```text
//! 001 Adobe
//!     Root: Adobe
//!     Path prefix: audio/Adobe
//!     Categories: 15 fixed
//!     Rules: 32
//! ```
//!
//! ## Classify
//!
//! ```text
//! RetroGames/bomb_jack_theme.ogg
//!     Name: Bomb Jack Theme
//!     Category: RetroGames
//!     Tags: retrogames, retro, game music, ...
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Anything that needs the
//! filesystem (whether a root exists) is passed in by the caller.

use crate::library::Library;
use crate::manifest::{Manifest, ScanOutcome};
use crate::synth::Classification;
use std::collections::BTreeMap;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 record`, `2 records`.
fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Record count per category, in category name order.
fn category_counts(manifest: &Manifest) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for record in &manifest.records {
        *counts.entry(record.category.as_str()).or_insert(0) += 1;
    }
    counts
}

fn status_line(outcome: &ScanOutcome) -> String {
    let state = match (&outcome.previous_fingerprint, outcome.changed()) {
        (None, _) => "no previous manifest",
        (Some(_), true) => "content changed",
        (Some(_), false) => "up to date",
    };
    if outcome.written {
        format!("Status: written, {state}")
    } else {
        format!("Status: {state}")
    }
}

// ============================================================================
// Scan / Build / Check
// ============================================================================

/// Format one library's scan result.
pub fn format_scan_outcome(index: usize, outcome: &ScanOutcome) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} ({})",
        format_index(index),
        outcome.library,
        plural(outcome.manifest.len(), "record")
    )];
    lines.push(format!(
        "{}Manifest: {}",
        indent(1),
        outcome.manifest_path.display()
    ));
    for (category, count) in category_counts(&outcome.manifest) {
        lines.push(format!("{}{}: {}", indent(1), category, count));
    }
    lines.push(format!("{}{}", indent(1), status_line(outcome)));
    lines
}

/// Format a run over several libraries, followed by a totals line.
pub fn format_build_output(outcomes: &[ScanOutcome]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, outcome) in outcomes.iter().enumerate() {
        lines.extend(format_scan_outcome(i + 1, outcome));
    }

    let records: usize = outcomes.iter().map(|o| o.manifest.len()).sum();
    let written = outcomes.iter().filter(|o| o.written).count();
    let stale = outcomes.iter().filter(|o| o.changed()).count();
    lines.push(String::new());
    if written > 0 {
        lines.push(format!(
            "Built {}, {}",
            plural(written, "manifest"),
            plural(records, "record")
        ));
    } else {
        let noun = if outcomes.len() == 1 { "library" } else { "libraries" };
        lines.push(format!(
            "Checked {} {}, {} out of date",
            outcomes.len(),
            noun,
            stale
        ));
    }
    lines
}

/// Print scan, build or check output to stdout.
pub fn print_build_output(outcomes: &[ScanOutcome]) {
    for line in format_build_output(outcomes) {
        println!("{}", line);
    }
}

// ============================================================================
// Libraries
// ============================================================================

/// Format the configured libraries. `root_exists` is parallel to `libraries`.
pub fn format_libraries(libraries: &[Library], root_exists: &[bool]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (library, exists)) in libraries.iter().zip(root_exists).enumerate() {
        let header = if library.display_name == library.name {
            format!("{} {}", format_index(i + 1), library.name)
        } else {
            format!(
                "{} {} ({})",
                format_index(i + 1),
                library.name,
                library.display_name
            )
        };
        lines.push(header);
        let missing = if *exists { "" } else { " (missing)" };
        lines.push(format!("{}Root: {}{}", indent(1), library.dir, missing));
        lines.push(format!("{}Path prefix: {}", indent(1), library.path_prefix));
        if let Some(categories) = &library.categories {
            lines.push(format!("{}Categories: {} fixed", indent(1), categories.len()));
        }
        lines.push(format!("{}Rules: {}", indent(1), library.rules.len()));
    }
    lines
}

pub fn print_libraries(libraries: &[Library], root_exists: &[bool]) {
    for line in format_libraries(libraries, root_exists) {
        println!("{}", line);
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Format a library's identity tags, hooks and rule table.
pub fn format_rules(library: &Library) -> Vec<String> {
    let mut lines = vec![library.name.clone()];
    if !library.identity_tags.is_empty() {
        lines.push(format!(
            "{}Identity tags: {}",
            indent(1),
            library.identity_tags.join(", ")
        ));
    }
    lines.push(format!("{}Subcategory: {:?}", indent(1), library.subcategory));

    if !library.hooks.is_empty() {
        lines.push(format!("{}Hooks", indent(1)));
        for (i, hook) in library.hooks.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(2), format_index(i + 1), hook));
        }
    }

    lines.push(format!("{}Rules", indent(1)));
    for (i, rule) in library.rules.iter().enumerate() {
        lines.push(format!(
            "{}{} {} contains {:?} → {}",
            indent(2),
            format_index(i + 1),
            rule.scope,
            rule.contains,
            rule.tags.join(", ")
        ));
    }
    lines
}

pub fn print_rules(library: &Library) {
    for line in format_rules(library) {
        println!("{}", line);
    }
}

// ============================================================================
// Classify
// ============================================================================

/// Format what a file at `rel_path` would be catalogued as.
pub fn format_classification(rel_path: &str, class: Option<&Classification>) -> Vec<String> {
    let mut lines = vec![rel_path.to_string()];
    match class {
        Some(class) => {
            lines.push(format!("{}Name: {}", indent(1), class.name));
            lines.push(format!("{}Category: {}", indent(1), class.category));
            if !class.subcategory.is_empty() {
                lines.push(format!("{}Subcategory: {}", indent(1), class.subcategory));
            }
            lines.push(format!("{}Tags: {}", indent(1), class.tags.join(", ")));
        }
        None => lines.push(format!("{}Not catalogued", indent(1))),
    }
    lines
}

pub fn print_classification(rel_path: &str, class: Option<&Classification>) {
    for line in format_classification(rel_path, class) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

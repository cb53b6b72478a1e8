//! # sfx-manifest
//!
//! Catalogues sound-effect libraries into JSON manifests for a browsing
//! front end. The filesystem is the data source: each library is a folder
//! under the audio root, its first-level folders are categories, deeper
//! folders are subcategories, and every `.ogg`, `.wav` or `.mp3` becomes one
//! record with a display name, tags and a description.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Each library goes through the same three stages:
//!
//! ```text
//! 1. Walk        audio/<Library>/  →  Vec<AudioFile>   (folders → category/subcategory)
//! 2. Synthesize  AudioFile         →  RecordDraft      (name, tags, size, description)
//! 3. Assemble    Vec<RecordDraft>  →  manifest.json    (ids 1..=N, pretty JSON)
//! ```
//!
//! Libraries are independent: `build` runs them in parallel and each one
//! reads and writes only its own folder.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`walk`] | Stage 1: enumerates audio files under a library root in name order |
//! | [`synth`] | Stage 2: hooks, display name, tag set and file size for one file |
//! | [`manifest`] | Stage 3: numbering, atomic write, content fingerprint |
//! | [`naming`] | Filename stem to display name (`bomb_jack_theme` → `Bomb Jack Theme`) |
//! | [`rules`] | Substring tag rules and the ordered, deduplicated tag set |
//! | [`hooks`] | Per-library label rewrites: prefix stripping, relabelling, case |
//! | [`library`] | Resolved library definitions and the built-in rule tables |
//! | [`config`] | `catalog.toml` loading, merging over stock defaults, validation |
//! | [`types`] | The manifest record and audio format types |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Libraries Are Data
//!
//! Everything that differs between vendors (folder layout quirks, house tags,
//! the keyword table) lives in TOML, not in code. The eight built-in tables
//! are compiled in and a `catalog.toml` in the audio root can override any
//! field or add a library. Adding a vendor means writing a table.
//!
//! ## Deterministic Order
//!
//! Directory entries are sorted by name before descending, so the same tree
//! produces the same manifest on every host. Ids are positions in that order.
//!
//! ## Regenerate, Don't Patch
//!
//! A manifest is always rebuilt from the tree and replaced whole
//! (`manifest.json.tmp` then rename). There is no incremental update and no
//! id stability across runs; `path` is the only cross-run key.

pub mod config;
pub mod hooks;
pub mod library;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod rules;
pub mod synth;
pub mod types;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;

//! Display names derived from audio filenames.
//!
//! Library files are named by their vendors with underscores or dashes as
//! word separators (`bomb_jack_theme.ogg`, `Laser-Shot-03.wav`). The display
//! name replaces each separator with a space and uppercases the first letter
//! of every word, leaving the rest of each word as the vendor wrote it:
//!
//! - `bomb_jack_theme` → "Bomb Jack Theme"
//! - `Laser-Shot-03` → "Laser Shot 03"
//! - `UI_clickHQ` → "UI ClickHQ"
//!
//! Separator runs are not collapsed: `a__b` becomes "A  B". Casing only
//! touches ASCII letters.

use std::path::Path;

/// Replace `_` and `-` with spaces, then title-case.
pub fn display_name(stem: &str) -> String {
    title_case(&stem.replace(['_', '-'], " "))
}

/// Uppercase the first character of every whitespace-delimited word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

/// Filename without its extension. Non-UTF-8 names are converted lossily.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

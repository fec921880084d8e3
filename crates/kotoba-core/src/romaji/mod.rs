//! Kana ⇄ romaji transliteration.
//!
//! Forward conversion (kana → romaji) is total and deterministic. Reverse
//! conversion (romaji → kana) is ambiguous: a romanized string is segmented
//! into at most [`MAX_SEGMENTS`] syllables and every resolvable spelling is
//! returned.

mod config;
mod forward;
mod reverse;
mod table;

use std::collections::BTreeSet;

pub use config::{SyllableConfigError, SyllableTables, TableSizes};
pub use reverse::{MAX_SEGMENTS, THREE_PART_MIN_LEN};
pub use table::default_toml;

/// Romanize kana using the global tables.
pub fn romanize(kana: &str) -> String {
    SyllableTables::global().romanize(kana)
}

/// Kana spellings of a romanized string using the global tables.
pub fn kana_candidates(romaji: &str) -> BTreeSet<String> {
    SyllableTables::global().kana_candidates(romaji)
}

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

/// Separator between the values of a multi-valued column. A control
/// character, so a substring match never spans two values.
pub const FIELD_SEPARATOR: char = '\u{1F}';

/// One headword as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub kanji_forms: Vec<String>,
    /// Never empty.
    pub kana_forms: Vec<String>,
    /// True iff any kana reading is flagged common.
    pub is_common: bool,
}

/// One meaning group of an entry. Its ordinal is its position in the
/// entry's sense list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sense {
    pub parts_of_speech: Vec<String>,
    pub glosses: Vec<String>,
    pub notes: SenseNotes,
}

/// Secondary sense fields, kept as the source's JSON and never searched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SenseNotes {
    pub related: Value,
    pub antonym: Value,
    pub field: Value,
    pub dialect: Value,
    pub misc: Value,
    pub info: Value,
    pub language_source: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub sense_ordinal: i64,
    pub text: String,
}

/// An entry joined with its senses and examples, ready for display.
/// Every list is deduplicated, keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    pub id: i64,
    pub kanji: Vec<String>,
    pub kana: Vec<String>,
    pub common: bool,
    pub parts_of_speech: Vec<String>,
    pub meanings: Vec<String>,
    pub examples: Vec<String>,
}

pub(super) fn join_field(values: &[String]) -> String {
    let mut joined = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            joined.push(FIELD_SEPARATOR);
        }
        joined.push_str(value);
    }
    joined
}

pub(super) fn split_field(joined: &str) -> impl Iterator<Item = String> + '_ {
    joined
        .split(FIELD_SEPARATOR)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(super) fn dedup_ordered(values: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

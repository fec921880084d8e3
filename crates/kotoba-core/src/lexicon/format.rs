use super::assemble::AssemblyError;
use super::entry::EntryRecord;
use crate::settings::{settings, DisplaySettings};

/// Render a record as a text block using the global display settings.
pub fn format_entry(record: &EntryRecord) -> String {
    format_entry_with(record, &settings().display)
}

/// Render a record as a text block. Empty sections are left out.
pub fn format_entry_with(record: &EntryRecord, display: &DisplaySettings) -> String {
    let mut lines = Vec::new();

    if !record.kanji.is_empty() {
        lines.push(format!("Kanji: {}", record.kanji.join(" ")));
    }
    if !record.kana.is_empty() {
        lines.push(format!("Kana: {}", record.kana.join(" ")));
    }
    if record.common {
        lines.push("Common: yes".to_string());
    }
    if !record.parts_of_speech.is_empty() {
        let shown = &record.parts_of_speech
            [..record.parts_of_speech.len().min(display.max_parts_of_speech)];
        lines.push(format!("Part of speech: {}", shown.join(", ")));
    }
    if !record.meanings.is_empty() {
        let shown = &record.meanings[..record.meanings.len().min(display.max_meanings)];
        lines.push(format!("Meanings: {}", shown.join("; ")));
    }
    if let Some(example) = record.examples.first() {
        lines.push(format!("Example: {example}"));
    }

    lines.join("\n")
}

/// Render one slot of a search listing.
pub fn format_slot(slot: &Result<EntryRecord, AssemblyError>) -> String {
    match slot {
        Ok(record) => format_entry(record),
        Err(e) => format!("Error: {e}"),
    }
}

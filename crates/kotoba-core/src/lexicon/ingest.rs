use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rusqlite::{params, Connection, Transaction};
use serde_json::Value;
use tracing::{debug, debug_span, info, warn};

use super::entry::{join_field, Entry, Example, Sense};
use super::source::{convert_record, stream_words};
use super::{Lexicon, LexiconError};
use crate::settings::{settings, IngestSettings};

/// How a dump is ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Language tag of the example sentences to keep.
    pub example_language: String,
    /// Entries per committed transaction.
    pub batch_size: usize,
}

impl IngestOptions {
    pub fn from_settings(ingest: &IngestSettings) -> Self {
        Self {
            example_language: ingest.example_language.clone(),
            batch_size: ingest.batch_size,
        }
    }
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self::from_settings(&settings().ingest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    pub ingested: usize,
    pub skipped: usize,
}

/// Raw JSON text of a secondary sense field, or NULL when absent.
fn note_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Replace one entry and everything attached to it.
fn write_entry(
    conn: &Connection,
    entry: &Entry,
    senses: &[Sense],
    examples: &[Example],
) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM senses WHERE entry_id = ?1", params![entry.id])?;
    conn.execute("DELETE FROM examples WHERE entry_id = ?1", params![entry.id])?;
    conn.execute(
        "INSERT OR REPLACE INTO entries (id, kanji, kana, common) VALUES (?1, ?2, ?3, ?4)",
        params![
            entry.id,
            join_field(&entry.kanji_forms),
            join_field(&entry.kana_forms),
            entry.is_common,
        ],
    )?;

    let mut insert_sense = conn.prepare_cached(
        r#"
        INSERT INTO senses
        (entry_id, ordinal, parts_of_speech, glosses, related, antonym, field,
         dialect, misc, info, language_source)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )?;
    for (ordinal, sense) in senses.iter().enumerate() {
        let notes = &sense.notes;
        insert_sense.execute(params![
            entry.id,
            ordinal as i64,
            join_field(&sense.parts_of_speech),
            join_field(&sense.glosses),
            note_text(&notes.related),
            note_text(&notes.antonym),
            note_text(&notes.field),
            note_text(&notes.dialect),
            note_text(&notes.misc),
            note_text(&notes.info),
            note_text(&notes.language_source),
        ])?;
    }

    let mut insert_example = conn.prepare_cached(
        "INSERT INTO examples (entry_id, sense_ordinal, text) VALUES (?1, ?2, ?3)",
    )?;
    for example in examples {
        insert_example.execute(params![entry.id, example.sense_ordinal, example.text])?;
    }
    Ok(())
}

/// Writes converted words, committing every `batch_size` of them.
struct BatchWriter<'c> {
    conn: &'c Connection,
    tx: Option<Transaction<'c>>,
    pending: usize,
    batch_size: usize,
    report: IngestReport,
}

impl<'c> BatchWriter<'c> {
    fn new(conn: &'c Connection, batch_size: usize) -> Self {
        Self {
            conn,
            tx: None,
            pending: 0,
            batch_size,
            report: IngestReport::default(),
        }
    }

    fn write(&mut self, index: usize, word: Value, example_language: &str) -> rusqlite::Result<()> {
        match convert_record(index, word, example_language) {
            Ok(record) => {
                let tx = match self.tx.take() {
                    Some(tx) => tx,
                    None => self.conn.unchecked_transaction()?,
                };
                write_entry(&tx, &record.entry, &record.senses, &record.examples)?;
                self.tx = Some(tx);
                self.report.ingested += 1;
            }
            Err(e) => {
                warn!(error = %e, "skipping malformed record");
                self.report.skipped += 1;
            }
        }

        self.pending += 1;
        if self.pending >= self.batch_size {
            self.commit()?;
        }
        Ok(())
    }

    fn commit(&mut self) -> rusqlite::Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.commit()?;
            debug!(
                done = self.report.ingested + self.report.skipped,
                "batch committed"
            );
        }
        self.pending = 0;
        Ok(())
    }
}

impl Lexicon {
    /// Insert an entry, replacing any stored entry with the same id together
    /// with its senses and examples. Runs in one transaction.
    pub fn upsert_entry(
        &mut self,
        entry: &Entry,
        senses: &[Sense],
        examples: &[Example],
    ) -> Result<(), LexiconError> {
        let tx = self.conn.transaction()?;
        write_entry(&tx, entry, senses, examples)?;
        tx.commit()?;
        Ok(())
    }

    pub fn ingest_file(
        &mut self,
        path: &Path,
        options: &IngestOptions,
    ) -> Result<IngestReport, LexiconError> {
        let file = File::open(path)?;
        info!(path = %path.display(), "ingesting");
        self.ingest_reader(BufReader::new(file), options)
    }

    /// Ingest a jmdict-simplified document.
    ///
    /// Words are decoded and written one at a time. Malformed words are
    /// logged and skipped. Words are committed every `options.batch_size`
    /// records, so an interrupted run keeps the batches it finished and a
    /// rerun replaces them.
    pub fn ingest_reader<R: Read>(
        &mut self,
        reader: R,
        options: &IngestOptions,
    ) -> Result<IngestReport, LexiconError> {
        let _span = debug_span!("ingest").entered();

        let mut writer = BatchWriter::new(&self.conn, options.batch_size.max(1));
        let mut fault = None;
        let decoded = stream_words(reader, |index, word| {
            match writer.write(index, word, &options.example_language) {
                Ok(()) => true,
                Err(e) => {
                    fault = Some(e);
                    false
                }
            }
        });
        if let Some(e) = fault {
            return Err(e.into());
        }
        decoded?;
        writer.commit()?;

        let report = writer.report;
        info!(
            ingested = report.ingested,
            skipped = report.skipped,
            "ingestion complete"
        );
        Ok(report)
    }
}

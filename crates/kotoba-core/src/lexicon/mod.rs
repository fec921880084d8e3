//! SQLite-backed dictionary store.
//!
//! A [`Lexicon`] is a session handle that owns one connection. It is built
//! once by ingesting a jmdict-simplified JSON dump and queried afterwards by
//! kana, kanji, gloss, romanized input, or the common flag.

mod assemble;
mod entry;
mod format;
mod ingest;
mod schema;
mod search;
mod source;
#[cfg(test)]
mod tests;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

pub use assemble::AssemblyError;
pub use entry::{Entry, EntryRecord, Example, Sense, SenseNotes};
pub use format::{format_entry, format_entry_with, format_slot};
pub use ingest::{IngestOptions, IngestReport};
pub use schema::SCHEMA_VERSION;
pub use search::{ParseSearchKindError, SearchKind};
pub use source::SourceRecordError;

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("lexicon unavailable at {}: {reason}", path.display())]
    Unavailable { path: PathBuf, reason: String },

    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema version: {0}")]
    UnsupportedVersion(i64),
}

/// Row counts reported by `dictool info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexiconStats {
    pub entries: u64,
    pub common: u64,
    pub senses: u64,
    pub examples: u64,
}

pub struct Lexicon {
    conn: Connection,
}

impl Lexicon {
    /// Open an existing store. Fails with [`LexiconError::Unavailable`] when
    /// the file does not exist or cannot be opened.
    pub fn open(path: &Path) -> Result<Self, LexiconError> {
        let unavailable = |reason: String| LexiconError::Unavailable {
            path: path.to_path_buf(),
            reason,
        };
        if !path.is_file() {
            return Err(unavailable("no such file".to_string()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| unavailable(e.to_string()))?;
        debug!(path = %path.display(), "opened lexicon");
        Self::with_connection(conn)
    }

    /// Open a store, creating the file and its parent directories if needed.
    pub fn create(path: &Path) -> Result<Self, LexiconError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// A private in-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self, LexiconError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, LexiconError> {
        let lexicon = Self { conn };
        lexicon.create_schema()?;
        Ok(lexicon)
    }

    pub fn stats(&self) -> Result<LexiconStats, LexiconError> {
        let count = |sql: &str| -> Result<u64, LexiconError> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n.max(0) as u64)
        };
        Ok(LexiconStats {
            entries: count("SELECT COUNT(*) FROM entries")?,
            common: count("SELECT COUNT(*) FROM entries WHERE common = 1")?,
            senses: count("SELECT COUNT(*) FROM senses")?,
            examples: count("SELECT COUNT(*) FROM examples")?,
        })
    }

    /// Close the session, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<(), LexiconError> {
        self.conn.close().map_err(|(_, e)| LexiconError::Sql(e))
    }
}

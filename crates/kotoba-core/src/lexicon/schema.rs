use super::{Lexicon, LexiconError};

/// Stored in `PRAGMA user_version`. Stores written by a newer layout are
/// refused rather than misread.
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY,
    kanji TEXT NOT NULL,
    kana TEXT NOT NULL,
    common INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS senses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    entry_id INTEGER NOT NULL REFERENCES entries(id),
    ordinal INTEGER NOT NULL,
    parts_of_speech TEXT NOT NULL,
    glosses TEXT NOT NULL,
    related TEXT,
    antonym TEXT,
    field TEXT,
    dialect TEXT,
    misc TEXT,
    info TEXT,
    language_source TEXT
);

CREATE TABLE IF NOT EXISTS examples (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    entry_id INTEGER NOT NULL REFERENCES entries(id),
    sense_ordinal INTEGER NOT NULL,
    text TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_entries_common ON entries(common, id);
CREATE INDEX IF NOT EXISTS idx_senses_entry ON senses(entry_id);
CREATE INDEX IF NOT EXISTS idx_examples_entry ON examples(entry_id);
"#;

impl Lexicon {
    /// Create tables and indexes. Idempotent.
    pub fn create_schema(&self) -> Result<(), LexiconError> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(LexiconError::UnsupportedVersion(version));
        }

        self.conn.execute_batch(SCHEMA)?;
        if version != SCHEMA_VERSION {
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_version(lexicon: &Lexicon) -> i64 {
        lexicon
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn create_schema_is_idempotent() {
        let lexicon = Lexicon::open_in_memory().unwrap();
        lexicon.create_schema().unwrap();
        lexicon.create_schema().unwrap();
        assert_eq!(user_version(&lexicon), SCHEMA_VERSION);
    }

    #[test]
    fn newer_schema_is_refused() {
        let lexicon = Lexicon::open_in_memory().unwrap();
        lexicon
            .conn
            .pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
        let err = lexicon.create_schema().unwrap_err();
        assert!(matches!(err, LexiconError::UnsupportedVersion(v) if v == SCHEMA_VERSION + 1));
    }
}

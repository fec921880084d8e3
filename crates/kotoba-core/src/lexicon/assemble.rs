use rusqlite::{params, OptionalExtension};

use super::entry::{dedup_ordered, split_field, EntryRecord};
use super::Lexicon;

/// Why one id could not be turned into an [`EntryRecord`].
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("entry {id} not found")]
    DanglingReference { id: i64 },
    #[error("entry {id}: {source}")]
    Store {
        id: i64,
        #[source]
        source: rusqlite::Error,
    },
}

impl AssemblyError {
    pub fn id(&self) -> i64 {
        match self {
            AssemblyError::DanglingReference { id } | AssemblyError::Store { id, .. } => *id,
        }
    }
}

impl Lexicon {
    /// Join an entry with its senses (in source order) and examples (by
    /// sense ordinal).
    pub fn assemble(&self, id: i64) -> Result<EntryRecord, AssemblyError> {
        let store = |source: rusqlite::Error| AssemblyError::Store { id, source };

        let row = self
            .conn
            .query_row(
                "SELECT kanji, kana, common FROM entries WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, bool>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(store)?;
        let Some((kanji, kana, common)) = row else {
            return Err(AssemblyError::DanglingReference { id });
        };

        let mut parts_of_speech = Vec::new();
        let mut meanings = Vec::new();
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT parts_of_speech, glosses FROM senses WHERE entry_id = ?1 ORDER BY ordinal, id",
            )
            .map_err(store)?;
        let senses = stmt
            .query_map(params![id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(store)?;
        for sense in senses {
            let (pos, glosses) = sense.map_err(store)?;
            parts_of_speech.extend(split_field(&pos));
            meanings.extend(split_field(&glosses));
        }

        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT text FROM examples WHERE entry_id = ?1 ORDER BY sense_ordinal, id",
            )
            .map_err(store)?;
        let examples = stmt
            .query_map(params![id], |row| row.get::<_, String>(0))
            .map_err(store)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(store)?;

        Ok(EntryRecord {
            id,
            kanji: dedup_ordered(split_field(&kanji)),
            kana: dedup_ordered(split_field(&kana)),
            common,
            parts_of_speech: dedup_ordered(parts_of_speech),
            meanings: dedup_ordered(meanings),
            examples: dedup_ordered(examples),
        })
    }
}

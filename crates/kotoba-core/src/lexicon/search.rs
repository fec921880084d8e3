use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, debug_span, warn};

use super::assemble::AssemblyError;
use super::entry::EntryRecord;
use super::{Lexicon, LexiconError};
use crate::romaji::SyllableTables;
use crate::settings::settings;
use crate::unicode::{is_kana, is_kanji, is_latin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    /// Substring of any kana reading.
    Kana,
    /// Substring of any kanji spelling.
    Kanji,
    /// Case-insensitive substring of any gloss.
    Gloss,
    /// Latin input, expanded to kana candidates first.
    Romanized,
    /// Common entries only; the term is ignored.
    Common,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown search kind: {0} (expected kana, kanji, gloss, romaji or common)")]
pub struct ParseSearchKindError(String);

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Kana => "kana",
            SearchKind::Kanji => "kanji",
            SearchKind::Gloss => "gloss",
            SearchKind::Romanized => "romaji",
            SearchKind::Common => "common",
        }
    }

    /// Pick a kind from the script of `term`: kanji anywhere means kanji,
    /// all-kana means kana, a single run of Latin letters means romanized
    /// input. Anything else (spaces, digits, punctuation) is searched as an
    /// English gloss.
    pub fn infer(term: &str) -> Self {
        let term = term.trim();
        if term.chars().any(is_kanji) {
            SearchKind::Kanji
        } else if !term.is_empty() && term.chars().all(is_kana) {
            SearchKind::Kana
        } else if term.chars().all(is_latin) {
            SearchKind::Romanized
        } else {
            SearchKind::Gloss
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = ParseSearchKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kana" => Ok(SearchKind::Kana),
            "kanji" => Ok(SearchKind::Kanji),
            "gloss" | "meaning" => Ok(SearchKind::Gloss),
            "romaji" | "romanized" => Ok(SearchKind::Romanized),
            "common" => Ok(SearchKind::Common),
            _ => Err(ParseSearchKindError(s.to_string())),
        }
    }
}

/// `%term%` with LIKE wildcards in `term` escaped by `\`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

const KANA_LIKE: &str = r"kana LIKE ? ESCAPE '\'";

impl Lexicon {
    /// Ids of the entries matching `term`, common entries first, then by id,
    /// at most `max_results` of them.
    ///
    /// A storage fault is logged and reported as no matches. Use
    /// [`Lexicon::try_search_ids`] to see it.
    pub fn search_ids(&self, kind: SearchKind, term: &str, max_results: usize) -> Vec<i64> {
        match self.try_search_ids(kind, term, max_results) {
            Ok(ids) => ids,
            Err(e) => {
                warn!(%kind, term, error = %e, "search failed, returning no matches");
                Vec::new()
            }
        }
    }

    pub fn try_search_ids(
        &self,
        kind: SearchKind,
        term: &str,
        max_results: usize,
    ) -> Result<Vec<i64>, LexiconError> {
        let _span = debug_span!("search", %kind, term).entered();

        let (predicate, args): (String, Vec<String>) = match kind {
            SearchKind::Kana => (KANA_LIKE.to_string(), vec![like_pattern(term)]),
            SearchKind::Kanji => (
                r"kanji LIKE ? ESCAPE '\'".to_string(),
                vec![like_pattern(term)],
            ),
            SearchKind::Gloss => (
                r"EXISTS (SELECT 1 FROM senses s WHERE s.entry_id = entries.id AND s.glosses LIKE ? ESCAPE '\')"
                    .to_string(),
                vec![like_pattern(term)],
            ),
            SearchKind::Romanized => {
                let candidates = SyllableTables::global().kana_candidates(term);
                if candidates.is_empty() {
                    return Ok(Vec::new());
                }
                let predicate = vec![KANA_LIKE; candidates.len()].join(" OR ");
                let args = candidates.iter().map(|c| like_pattern(c)).collect();
                (predicate, args)
            }
            SearchKind::Common => ("common = 1".to_string(), Vec::new()),
        };

        let limit = i64::try_from(max_results).unwrap_or(i64::MAX);
        let sql = format!(
            "SELECT id FROM entries WHERE ({predicate}) ORDER BY common DESC, id ASC LIMIT {limit}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map(rusqlite::params_from_iter(args.iter()), |row| row.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        debug!(count = ids.len());
        Ok(ids)
    }

    /// Search and assemble each hit. A hit that fails to assemble keeps its
    /// slot as an error.
    pub fn search(
        &self,
        kind: SearchKind,
        term: &str,
        max_results: usize,
    ) -> Vec<Result<EntryRecord, AssemblyError>> {
        self.search_ids(kind, term, max_results)
            .into_iter()
            .map(|id| self.assemble(id))
            .collect()
    }

    /// A random entry whose kana contains `kana`, drawn from the first
    /// `search.random_pool` matches. Common entries are preferred when the
    /// pool has any.
    pub fn random_with_kana<R: Rng + ?Sized>(
        &self,
        kana: &str,
        rng: &mut R,
    ) -> Option<EntryRecord> {
        let pool: Vec<EntryRecord> = self
            .search(SearchKind::Kana, kana, settings().search.random_pool)
            .into_iter()
            .filter_map(|slot| {
                slot.map_err(|e| warn!(error = %e, "skipping unassembled entry"))
                    .ok()
            })
            .collect();

        let common: Vec<&EntryRecord> = pool.iter().filter(|r| r.common).collect();
        let picked = if common.is_empty() {
            pool.choose(rng)
        } else {
            common.choose(rng).copied()
        };
        picked.cloned()
    }
}

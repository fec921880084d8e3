use std::path::Path;
use std::process;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use unicode_width::UnicodeWidthStr;

use kotoba_core::lexicon::{format_entry, format_slot, Lexicon, SearchKind};
use kotoba_core::romaji;
use kotoba_core::settings::settings;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Parse a kind name; `auto` picks the kind from the script of `term`.
fn resolve_kind(kind: &str, term: &str) -> SearchKind {
    if kind.eq_ignore_ascii_case("auto") {
        return SearchKind::infer(term);
    }
    die!(kind.parse::<SearchKind>(), "Error: {}")
}

pub fn search_cmd(db: &Path, kind: &str, term: &str, n: Option<usize>, as_json: bool) {
    let kind = resolve_kind(kind, term);
    let n = n.unwrap_or(settings().search.max_results);
    let lexicon = die!(Lexicon::open(db), "Error opening lexicon: {}");
    let slots = lexicon.search(kind, term, n);

    if as_json {
        let values: Vec<serde_json::Value> = slots
            .iter()
            .map(|slot| match slot {
                Ok(record) => json!(record),
                Err(e) => json!({"id": e.id(), "error": e.to_string()}),
            })
            .collect();
        let text = die!(
            serde_json::to_string_pretty(&values),
            "Error encoding results: {}"
        );
        println!("{text}");
    } else if slots.is_empty() {
        eprintln!("No matches for {kind} \"{term}\"");
    } else {
        for (i, slot) in slots.iter().enumerate() {
            if i > 0 {
                println!();
            }
            println!("#{:>2}", i + 1);
            println!("{}", format_slot(slot));
        }
    }

    die!(lexicon.close(), "Error closing lexicon: {}");
}

pub fn random_cmd(db: &Path, kana: &str, seed: Option<u64>) {
    let lexicon = die!(Lexicon::open(db), "Error opening lexicon: {}");
    let picked = match seed {
        Some(seed) => lexicon.random_with_kana(kana, &mut StdRng::seed_from_u64(seed)),
        None => lexicon.random_with_kana(kana, &mut rand::thread_rng()),
    };
    match picked {
        Some(record) => println!("{}", format_entry(&record)),
        None => eprintln!("No entry contains \"{kana}\""),
    }
    die!(lexicon.close(), "Error closing lexicon: {}");
}

pub fn romanize_cmd(kana: &str) {
    println!("{}", romaji::romanize(kana));
}

/// Print every kana spelling of `romaji` next to its forward romanization.
pub fn candidates_cmd(input: &str) {
    let candidates = romaji::kana_candidates(input);
    if candidates.is_empty() {
        eprintln!(
            "No segmentation of \"{input}\" into at most {} syllables",
            romaji::MAX_SEGMENTS
        );
        return;
    }

    let width = candidates.iter().map(|c| c.width()).max().unwrap_or(0);
    for kana in &candidates {
        let pad = width - kana.width();
        println!("{kana}{:pad$}  {}", "", romaji::romanize(kana));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_named_kinds() {
        assert_eq!(resolve_kind("gloss", "cat"), SearchKind::Gloss);
        assert_eq!(resolve_kind("romaji", "neko"), SearchKind::Romanized);
    }

    #[test]
    fn resolve_auto_kind() {
        assert_eq!(resolve_kind("auto", "日本"), SearchKind::Kanji);
        assert_eq!(resolve_kind("AUTO", "ねこ"), SearchKind::Kana);
        assert_eq!(resolve_kind("auto", "neko"), SearchKind::Romanized);
        assert_eq!(resolve_kind("auto", "house cat"), SearchKind::Gloss);
    }
}

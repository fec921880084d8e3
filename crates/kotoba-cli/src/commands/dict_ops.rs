use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use kotoba_core::lexicon::{IngestOptions, Lexicon, SearchKind, SCHEMA_VERSION};
use kotoba_core::settings::settings;

use crate::source;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(format!("{home}/.local/share/kotoba/jmdict.db"))
}

pub fn fetch(output: &str) {
    die!(
        source::fetch(Path::new(output)),
        "Error fetching dictionary: {}"
    );
    let file_size = fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    eprintln!(
        "Wrote {output} ({:.1} MB)",
        file_size as f64 / 1_048_576.0
    );
}

pub fn ingest(json_file: &str, db: &Path, batch_size: Option<usize>) {
    let mut options = IngestOptions::default();
    if let Some(n) = batch_size {
        options.batch_size = n;
    }

    let mut lexicon = die!(Lexicon::create(db), "Error opening lexicon: {}");
    eprintln!("Ingesting {json_file} into {}...", db.display());
    let report = die!(
        lexicon.ingest_file(Path::new(json_file), &options),
        "Error ingesting dictionary: {}"
    );
    let stats = die!(lexicon.stats(), "Error reading lexicon: {}");
    die!(lexicon.close(), "Error closing lexicon: {}");

    eprintln!(
        "Ingested {} entries ({} skipped); lexicon now holds {} entries, {} common",
        report.ingested, report.skipped, stats.entries, stats.common
    );
}

pub fn info(db: &Path) {
    let lexicon = die!(Lexicon::open(db), "Error opening lexicon: {}");
    let stats = die!(lexicon.stats(), "Error reading lexicon: {}");
    let file_size = fs::metadata(db).map(|m| m.len()).unwrap_or(0);

    println!("Lexicon:   {}", db.display());
    println!("File size: {:.1} MB", file_size as f64 / 1_048_576.0);
    println!("Schema:    v{SCHEMA_VERSION}");
    println!("Entries:   {}", stats.entries);
    println!("Common:    {}", stats.common);
    println!("Senses:    {}", stats.senses);
    println!("Examples:  {}", stats.examples);

    let sample_keys = ["にほん", "ねこ", "たべる", "とうきょう"];
    println!();
    println!("Sample lookups:");
    for key in &sample_keys {
        let records = lexicon.search(SearchKind::Kana, key, settings().search.max_results.min(3));
        let shown: Vec<String> = records
            .iter()
            .filter_map(|slot| slot.as_ref().ok())
            .map(|r| {
                let head = r.kanji.first().or(r.kana.first()).map_or("?", String::as_str);
                let meaning = r.meanings.first().map_or("", String::as_str);
                format!("{head} ({meaning})")
            })
            .collect();
        if shown.is_empty() {
            println!("  {key}: (none)");
        } else {
            println!("  {key}: {}", shown.join(", "));
        }
    }

    die!(lexicon.close(), "Error closing lexicon: {}");
}

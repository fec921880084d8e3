use std::fs;
use std::process;

use kotoba_core::romaji::SyllableTables;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn tables_export() {
    print!("{}", kotoba_core::romaji::default_toml());
}

pub fn tables_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let tables = die!(SyllableTables::from_toml(&content), "Error: {}");
    let sizes = tables.sizes();
    println!(
        "OK: {} kana, {} hiragana, {} katakana, {} particles",
        sizes.kana, sizes.hiragana, sizes.katakana, sizes.particles
    );
}

pub fn settings_export() {
    print!("{}", kotoba_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        kotoba_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: search.max_results={}, search.random_pool={}, ingest.example_language={}, ingest.batch_size={}",
        s.search.max_results, s.search.random_pool, s.ingest.example_language, s.ingest.batch_size
    );
}

/// Install a custom settings file before anything reads the settings.
pub fn load_settings(file: Option<&str>) {
    let Some(file) = file else {
        return;
    };
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(
        kotoba_core::settings::init_custom(content),
        "Error in {file}: {}"
    );
}

/// Install custom syllable tables before the first transliteration.
pub fn load_tables(file: Option<&str>) {
    let Some(file) = file else {
        return;
    };
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(SyllableTables::init_custom(content), "Error in {file}: {}");
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kotoba_cli::commands::{config_ops, dict_ops, search_ops};
use kotoba_cli::trace_init::{init_tracing, LogOptions};

#[derive(Parser)]
#[command(name = "kotoba", about = "Japanese dictionary search")]
struct Cli {
    /// Lexicon file (default: ~/.local/share/kotoba/jmdict.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Custom settings TOML
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Custom syllable tables TOML
    #[arg(long, global = true)]
    tables: Option<String>,
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the lexicon
    Search {
        /// kana, kanji, gloss, romaji, common, or auto
        kind: String,
        /// Search term (ignored for common)
        #[arg(default_value = "")]
        term: String,
        /// Maximum number of results (default: search.max_results)
        #[arg(short, long)]
        n: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a random entry containing the given kana
    Random {
        /// Kana substring
        kana: String,
        /// Seed for a reproducible pick
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Romanize kana
    Romanize {
        /// Kana input
        kana: String,
    },
    /// List the kana spellings of a romanized string
    Candidates {
        /// Romanized input
        romaji: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let _guard = init_tracing(&LogOptions {
        json: cli.log_json,
        file: cli.log_file.as_deref(),
        verbose: cli.verbose,
    });
    config_ops::load_settings(cli.settings.as_deref());
    config_ops::load_tables(cli.tables.as_deref());

    let db = cli.db.unwrap_or_else(dict_ops::default_db_path);
    match cli.command {
        Command::Search {
            kind,
            term,
            n,
            json,
        } => search_ops::search_cmd(&db, &kind, &term, n, json),
        Command::Random { kana, seed } => search_ops::random_cmd(&db, &kana, seed),
        Command::Romanize { kana } => search_ops::romanize_cmd(&kana),
        Command::Candidates { romaji } => search_ops::candidates_cmd(&romaji),
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kotoba_cli::commands::{config_ops, dict_ops};
use kotoba_cli::trace_init::{init_tracing, LogOptions};

#[derive(Parser)]
#[command(name = "dictool", about = "Kotoba lexicon build tool")]
struct Cli {
    /// Custom settings TOML
    #[arg(long, global = true)]
    settings: Option<String>,
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
    /// Download the latest jmdict-simplified English dump
    Fetch {
        /// Output JSON file
        output: String,
    },
    /// Ingest a jmdict-simplified JSON dump into the lexicon
    Ingest {
        /// JSON dump
        json_file: String,
        /// Lexicon file (default: ~/.local/share/kotoba/jmdict.db)
        #[arg(long)]
        db: Option<PathBuf>,
        /// Entries per transaction (default: ingest.batch_size)
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Show lexicon statistics and sample lookups
    Info {
        /// Lexicon file (default: ~/.local/share/kotoba/jmdict.db)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Export default syllable tables as TOML
    TablesExport,
    /// Validate a custom syllable tables TOML file
    TablesValidate {
        /// Path to the TOML file
        file: String,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
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

    match cli.command {
        Command::Fetch { output } => dict_ops::fetch(&output),
        Command::Ingest {
            json_file,
            db,
            batch_size,
        } => {
            let db = db.unwrap_or_else(dict_ops::default_db_path);
            dict_ops::ingest(&json_file, &db, batch_size);
        }
        Command::Info { db } => {
            let db = db.unwrap_or_else(dict_ops::default_db_path);
            dict_ops::info(&db);
        }
        Command::TablesExport => config_ops::tables_export(),
        Command::TablesValidate { file } => config_ops::tables_validate(&file),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Where and how log events are written.
#[derive(Debug, Clone, Default)]
pub struct LogOptions<'a> {
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
    /// Append to this file instead of stderr.
    pub file: Option<&'a Path>,
    /// Default to debug level for the kotoba crates.
    pub verbose: bool,
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole process.
pub fn init_tracing(opts: &LogOptions<'_>) -> Option<WorkerGuard> {
    let default_filter = if opts.verbose {
        "kotoba=debug"
    } else {
        "kotoba=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (writer, guard) = match opts.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path.file_name().unwrap_or(path.as_os_str());
            let file_appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(io::stderr), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(opts.file.is_none())
        .with_env_filter(filter);
    if opts.json {
        builder.json().init();
    } else {
        builder.init();
    }
    guard
}

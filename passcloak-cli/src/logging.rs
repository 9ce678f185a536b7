use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build log shared by every wrapper process of a build
pub const LOG_FILE_NAME: &str = "obfuscator_build.log";

const DEFAULT_FILE_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// Records go to an append-only JSON log in the working directory, so
/// parallel compiler processes can share one file. When `debug` is set, a
/// human-readable copy at DEBUG level goes to stdout as well. A log file
/// that cannot be opened is skipped.
pub fn init_logging(log_file: &Path, file_filter: Option<&str>, debug: bool) {
    let filter = file_filter
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILE_FILTER));

    let file_layer = open_append(log_file).map(|file| {
        fmt::layer()
            .json()
            .with_target(false)
            .with_writer(Mutex::new(file))
            .with_filter(filter)
    });

    let stdout_layer = debug.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stdout)
            .with_filter(LevelFilter::DEBUG)
    });

    // Another subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .try_init();
}

fn open_append(path: &Path) -> Option<File> {
    OpenOptions::new().create(true).append(true).open(path).ok()
}

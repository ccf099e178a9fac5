//! Logging setup on top of `tracing-subscriber`.
//!
//! Library crates only emit `tracing` events; this module decides where they
//! go and how they look.
//!
//! # Log Levels
//!
//! - `error`: unreadable source files, validation failures
//! - `warn`: (default) problems that do not stop a run
//! - `info`: skipped files, per-run summaries
//! - `debug`: every imported table, registered codenames
//! - `trace`: unused by the tablec crates
//!
//! # Usage
//!
//! ```ignore
//! use tablec_cli::logging::{LogConfig, LogFormat, init_logging};
//!
//! init_logging(&LogConfig::default().with_format(LogFormat::Json))?;
//! ```

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Crates whose events pass the configured level; everything else stays at `warn`.
const TABLEC_CRATES: &[&str] = &[
    "tablec",
    "tablec_cli",
    "tablec_common",
    "tablec_ingest",
    "tablec_model",
    "tablec_validate",
];

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the level filter when it is set.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    /// Include the module path of each event.
    pub with_target: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-field human-readable output.
    #[default]
    Pretty,
    /// Single line per event.
    Compact,
    /// One JSON object per event.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    #[must_use]
    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.with_timestamps = enable;
        self
    }

    #[must_use]
    pub fn with_target(mut self, enable: bool) -> Self {
        self.with_target = enable;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }
}

/// Install the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_logging_with_writer(config, SharedFileWriter::new(file));
    } else {
        init_logging_with_writer(config, io::stderr);
    }
    Ok(())
}

/// Install the global subscriber writing to `writer`.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(format_layer(config, writer))
        .with(build_env_filter(config.level_filter, config.use_env_filter))
        .init();
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn format_layer<W>(config: &LogConfig, writer: W) -> BoxedLayer
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);
    match (config.format, config.with_timestamps) {
        (LogFormat::Json, _) => layer.json().boxed(),
        (LogFormat::Compact, true) => layer.compact().with_ansi(config.with_ansi).boxed(),
        (LogFormat::Compact, false) => layer
            .compact()
            .with_ansi(config.with_ansi)
            .without_time()
            .boxed(),
        (LogFormat::Pretty, true) => layer.with_ansi(config.with_ansi).boxed(),
        (LogFormat::Pretty, false) => layer.with_ansi(config.with_ansi).without_time().boxed(),
    }
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl SharedFileWriter {
    fn new(file: std::fs::File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct SharedFileGuard {
    file: Arc<Mutex<std::fs::File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}

/// Directive string for the tablec crates at `level_filter`.
pub fn default_directives(level_filter: LevelFilter) -> String {
    let level = level_filter.to_string().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        TABLEC_CRATES
            .iter()
            .map(|krate| format!("{krate}={level}")),
    );
    directives.join(",")
}

fn build_env_filter(level_filter: LevelFilter, use_env_filter: bool) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directives(level_filter));
    if use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}

//! CLI argument definitions for the `tablec` binary.

use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "tablec",
    version,
    about = "Table compiler front end - discover data tables and list record validators",
    long_about = "Discover data tables under a data directory and describe them.\n\n\
                  Table names, namespaces and record types are derived from file paths,\n\
                  file names or sheet names according to the selected importer."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Discover the tables under a data directory.
    Import(ImportArgs),

    /// List the registered record validators.
    Validators,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Root of the data directory to scan.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Option as `namespace.key=value`, e.g. `tableImporter.filePattern=#(.*)`.
    ///
    /// May be repeated. Later values override earlier ones and the options
    /// file.
    #[arg(short = 'x', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// TOML file with importer options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Importer strategy (shorthand for `-x tableImporter.name=<NAME>`).
    #[arg(long = "importer", value_name = "NAME")]
    pub importer: Option<String>,

    /// Print the import outcome as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

impl Cli {
    /// Logging setup for this invocation.
    ///
    /// `--log-level` beats `-v/-q`, and either one disables `RUST_LOG`.
    /// Colors follow `--color`; `auto` means colors only when logging to a
    /// terminal.
    pub fn log_config(&self, stderr_is_terminal: bool) -> LogConfig {
        let explicit = self.log_level.map(LevelFilter::from);
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && stderr_is_terminal,
        };
        LogConfig {
            level_filter: explicit.unwrap_or_else(|| self.verbosity.tracing_level_filter()),
            use_env_filter: explicit.is_none() && !self.verbosity.is_present(),
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn defaults_defer_to_rust_log() {
        let config = parse(&["tablec", "validators"]).log_config(true);
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert!(config.with_ansi);
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn explicit_level_beats_verbosity() {
        let config = parse(&["tablec", "-vv", "--log-level", "error", "validators"]).log_config(true);
        assert_eq!(config.level_filter, LevelFilter::ERROR);
        assert!(!config.use_env_filter);
    }

    #[test]
    fn verbosity_flag_disables_rust_log() {
        let config = parse(&["tablec", "-v", "validators"]).log_config(false);
        assert_eq!(config.level_filter, LevelFilter::INFO);
        assert!(!config.use_env_filter);
        assert!(!config.with_ansi);
    }

    #[test]
    fn log_file_turns_off_auto_colors() {
        let config = parse(&[
            "tablec",
            "--log-file",
            "tablec.log",
            "--log-format",
            "json",
            "validators",
        ])
        .log_config(true);
        assert!(!config.with_ansi);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_file.as_deref(), Some(std::path::Path::new("tablec.log")));
    }

    #[test]
    fn color_always_wins() {
        let config = parse(&["tablec", "--color", "always", "--log-file", "x.log", "validators"])
            .log_config(false);
        assert!(config.with_ansi);
    }
}

//! Error types for table import.

use std::path::PathBuf;

use tablec_common::TemplateError;
use thiserror::Error;

/// Errors that can occur while importing tables.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Configuration Errors ===
    /// An option could not be parsed.
    #[error("invalid option '{raw}': {reason}")]
    InvalidOption { raw: String, reason: String },

    /// The filename pattern is not a valid regular expression.
    #[error("invalid {key} pattern '{pattern}': {source}")]
    InvalidPattern {
        key: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The filename pattern has no capture group to take the table name from.
    #[error("{key} pattern '{pattern}' needs at least one capture group")]
    PatternWithoutGroup { key: String, pattern: String },

    /// A naming template is malformed.
    #[error("invalid {key} template: {source}")]
    InvalidTemplate {
        key: String,
        #[source]
        source: TemplateError,
    },

    /// No importer is registered under the configured name.
    #[error("unknown table importer '{name}' (known: {known})")]
    UnknownImporter { name: String, known: String },

    /// The options file is not valid TOML.
    #[error("failed to parse options file {path}: {message}")]
    OptionsFile { path: PathBuf, message: String },

    // === File System Errors ===
    /// Data root not found or not a directory.
    #[error("data directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Source Errors ===
    /// Failed to read a tabular file or its sub-unit list.
    #[error("failed to read {path}: {message}")]
    SourceRead { path: PathBuf, message: String },

    /// No reader is available for this file format.
    #[error("no sheet reader for '.{extension}' files: {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Two sources resolved to the same `(namespace, name)`.
    #[error("table {table} already imported from {first}")]
    DuplicateTable { table: String, first: String },
}

impl IngestError {
    /// Configuration problems abort the whole import.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidOption { .. }
                | Self::InvalidPattern { .. }
                | Self::PatternWithoutGroup { .. }
                | Self::InvalidTemplate { .. }
                | Self::UnknownImporter { .. }
                | Self::OptionsFile { .. }
        )
    }
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, IngestError>;

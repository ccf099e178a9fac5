//! Table discovery for the tablec front end.
//!
//! This crate turns a data directory plus naming conventions into
//! [`RawTable`](tablec_model::RawTable) descriptors for the schema compiler.
//!
//! # Features
//!
//! - **Options**: `namespace.key` string options from `key=value` pairs or TOML
//! - **Discovery**: recursive, deterministic scan with an ignore policy and an
//!   extension allow-list
//! - **Sheet Enumeration**: pluggable sub-unit listing, CSV built in
//! - **Importers**: filename-pattern (`default`) and sheet-per-table (`sheet`)
//!   strategies behind a registry
//!
//! # Example
//!
//! ```ignore
//! use tablec_ingest::{EnvOptions, ImportConfig, create_importer};
//!
//! let options = EnvOptions::from_pairs(["tableImporter.filePattern=#(.*)"])?;
//! let config = ImportConfig::new("Datas").with_options(options);
//! let outcome = create_importer(&config)?.import()?;
//! for table in &outcome.tables {
//!     println!("{} -> {}", table.full_name(), table.value_type);
//! }
//! ```

mod discovery;
mod error;
mod ignore;
mod importer;
mod options;
mod sheets;

// === Error Types ===
pub use error::{IngestError, Result};

// === Configuration ===
pub use options::{
    EnvOptions, IMPORTER_NAMESPACE, ImportConfig, KEY_FILE_PATTERN, KEY_IMPORTER_NAME,
    KEY_NAME_FORMAT, KEY_NAMESPACE_FORMAT, KEY_VALUE_TYPE_NAME_FORMAT,
};

// === File Discovery ===
pub use discovery::{
    DiscoveryOutcome, FileListing, SkipReason, SkippedFile, SourceFile, TABLE_EXTENSIONS,
    UnreadableDirectory, discover_table_files, has_table_extension, list_files_recursive,
};
pub use ignore::{DefaultIgnore, IgnorePolicy};

// === Sheet Enumeration ===
pub use sheets::{CsvSheetReader, DefaultSheetReader, SheetReader};

// === Importers ===
pub use importer::{
    DefaultTableImporter, FailedFile, ImportOutcome, ImporterFactory, ImporterRegistry,
    ImporterServices, NamingDefaults, SheetTableImporter, TableImporter, TableNaming,
    create_importer, create_importer_with, default_registry,
};

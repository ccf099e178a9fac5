//! Table importers.
//!
//! An importer turns the data-root layout into [`RawTable`] descriptors. Two
//! strategies are built in:
//!
//! | Name | Importer | One table per |
//! |------|----------|---------------|
//! | `default` | [`DefaultTableImporter`] | file whose stem matches `tableImporter.filePattern` |
//! | `sheet` | [`SheetTableImporter`] | sheet inside every table file |
//!
//! Both read the naming templates `tableImporter.tableNamespaceFormat`,
//! `tableImporter.tableNameFormat` and `tableImporter.valueTypeNameFormat`.
//! The strategy is picked by `tableImporter.name` through the
//! [`ImporterRegistry`].
//!
//! # Usage
//!
//! ```ignore
//! use tablec_ingest::{ImportConfig, create_importer};
//!
//! let config = ImportConfig::new("Datas");
//! let importer = create_importer(&config)?;
//! let tables = importer.load_import_tables()?;
//! ```

mod default;
mod sheet;

pub use default::DefaultTableImporter;
pub use sheet::SheetTableImporter;

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tablec_common::FormatTemplate;
use tablec_model::RawTable;
use tracing::{debug, error};

use crate::discovery::{SkippedFile, SourceFile, UnreadableDirectory};
use crate::error::{IngestError, Result};
use crate::ignore::{DefaultIgnore, IgnorePolicy};
use crate::options::{
    ImportConfig, KEY_NAMESPACE_FORMAT, KEY_NAME_FORMAT, KEY_VALUE_TYPE_NAME_FORMAT,
};
use crate::sheets::{DefaultSheetReader, SheetReader};

/// Produces raw table descriptors from the configured data root.
pub trait TableImporter: Send + Sync {
    /// Registry name of the strategy.
    fn name(&self) -> &'static str;

    /// Scan the data root.
    ///
    /// # Errors
    ///
    /// Only a missing or unreadable data root fails the whole import.
    /// Per-file problems end up in [`ImportOutcome::failed`].
    fn import(&self) -> Result<ImportOutcome>;

    /// The tables of [`TableImporter::import`], diagnostics dropped.
    fn load_import_tables(&self) -> Result<Vec<RawTable>> {
        Ok(self.import()?.tables)
    }
}

/// A file (or directory) whose import failed; it produced no tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Result of one import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportOutcome {
    pub tables: Vec<RawTable>,
    pub skipped: Vec<SkippedFile>,
    pub failed: Vec<FailedFile>,
}

impl ImportOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Parsed naming templates.
#[derive(Debug, Clone)]
pub struct TableNaming {
    pub namespace: FormatTemplate,
    pub name: FormatTemplate,
    pub value_type: FormatTemplate,
}

/// Template defaults of one strategy.
#[derive(Debug, Clone, Copy)]
pub struct NamingDefaults {
    pub namespace: &'static str,
    pub name: &'static str,
    pub value_type: &'static str,
}

impl TableNaming {
    /// Read the three templates, falling back to `defaults`.
    pub fn from_config(config: &ImportConfig, defaults: NamingDefaults) -> Result<Self> {
        let parse = |key: &str, default: &str| {
            let raw = config.importer_option(key, default);
            FormatTemplate::parse(raw).map_err(|source| IngestError::InvalidTemplate {
                key: format!("tableImporter.{key}"),
                source,
            })
        };
        Ok(Self {
            namespace: parse(KEY_NAMESPACE_FORMAT, defaults.namespace)?,
            name: parse(KEY_NAME_FORMAT, defaults.name)?,
            value_type: parse(KEY_VALUE_TYPE_NAME_FORMAT, defaults.value_type)?,
        })
    }
}

/// Collects tables and enforces `(namespace, name)` uniqueness.
#[derive(Debug, Default)]
pub(crate) struct TableCollector {
    outcome: ImportOutcome,
    seen: HashMap<(String, String), String>,
}

impl TableCollector {
    pub(crate) fn new(skipped: Vec<SkippedFile>, unreadable: Vec<UnreadableDirectory>) -> Self {
        let failed = unreadable
            .into_iter()
            .map(|dir| FailedFile {
                path: dir.path,
                error: dir.error.to_string(),
            })
            .collect();
        Self {
            outcome: ImportOutcome {
                skipped,
                failed,
                ..ImportOutcome::default()
            },
            seen: HashMap::new(),
        }
    }

    pub(crate) fn add(&mut self, table: RawTable, source: &SourceFile) {
        let key = (table.namespace.clone(), table.name.clone());
        if let Some(first) = self.seen.get(&key) {
            let err = IngestError::DuplicateTable {
                table: table.full_name(),
                first: first.clone(),
            };
            self.fail(source, &err);
            return;
        }
        debug!(table = %table.full_name(), value_type = %table.value_type, input = ?table.input_files, "import table");
        self.seen.insert(key, source.relative_path.clone());
        self.outcome.tables.push(table);
    }

    pub(crate) fn skip(&mut self, skipped: SkippedFile) {
        self.outcome.skipped.push(skipped);
    }

    pub(crate) fn fail(&mut self, source: &SourceFile, err: &IngestError) {
        error!(path = %source.relative_path, error = %err, "failed to import table file");
        self.outcome.failed.push(FailedFile {
            path: source.path.clone(),
            error: err.to_string(),
        });
    }

    pub(crate) fn finish(self) -> ImportOutcome {
        self.outcome
    }
}

/// Collaborators an importer needs besides the configuration.
#[derive(Clone)]
pub struct ImporterServices {
    pub ignore: Arc<dyn IgnorePolicy>,
    pub sheets: Arc<dyn SheetReader>,
}

impl Default for ImporterServices {
    fn default() -> Self {
        Self {
            ignore: Arc::new(DefaultIgnore),
            sheets: Arc::new(DefaultSheetReader::new()),
        }
    }
}

impl ImporterServices {
    pub fn with_ignore(mut self, ignore: Arc<dyn IgnorePolicy>) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_sheets(mut self, sheets: Arc<dyn SheetReader>) -> Self {
        self.sheets = sheets;
        self
    }
}

/// Builds an importer from configuration.
pub type ImporterFactory = fn(&ImportConfig, &ImporterServices) -> Result<Box<dyn TableImporter>>;

/// Importer strategies by name.
pub struct ImporterRegistry {
    factories: BTreeMap<&'static str, ImporterFactory>,
}

impl ImporterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registers a strategy. An existing entry with the same name is replaced.
    pub fn register(&mut self, name: &'static str, factory: ImporterFactory) {
        self.factories.insert(name, factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Instantiate the strategy named `name`.
    pub fn create(
        &self,
        name: &str,
        config: &ImportConfig,
        services: &ImporterServices,
    ) -> Result<Box<dyn TableImporter>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| IngestError::UnknownImporter {
                name: name.to_string(),
                known: self.names().collect::<Vec<_>>().join(", "),
            })?;
        factory(config, services)
    }
}

impl Default for ImporterRegistry {
    fn default() -> Self {
        build_default_registry()
    }
}

static DEFAULT_REGISTRY: OnceLock<ImporterRegistry> = OnceLock::new();

/// Registry with the built-in strategies, cached on first access.
pub fn default_registry() -> &'static ImporterRegistry {
    DEFAULT_REGISTRY.get_or_init(build_default_registry)
}

fn build_default_registry() -> ImporterRegistry {
    let mut registry = ImporterRegistry::new();
    registry.register(DefaultTableImporter::NAME, |config, services| {
        Ok(Box::new(
            DefaultTableImporter::from_config(config)?.with_ignore(Arc::clone(&services.ignore)),
        ))
    });
    registry.register(SheetTableImporter::NAME, |config, services| {
        Ok(Box::new(
            SheetTableImporter::from_config(config)?
                .with_ignore(Arc::clone(&services.ignore))
                .with_sheet_reader(Arc::clone(&services.sheets)),
        ))
    });
    registry
}

/// Create the importer selected by `tableImporter.name` with default services.
pub fn create_importer(config: &ImportConfig) -> Result<Box<dyn TableImporter>> {
    create_importer_with(config, &ImporterServices::default())
}

/// Create the importer selected by `tableImporter.name`.
pub fn create_importer_with(
    config: &ImportConfig,
    services: &ImporterServices,
) -> Result<Box<dyn TableImporter>> {
    default_registry().create(config.importer_name(), config, services)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::EnvOptions;

    #[test]
    fn unreadable_directories_are_failed_entries() {
        let unreadable = vec![UnreadableDirectory {
            path: PathBuf::from("data/locked"),
            error: IngestError::DirectoryRead {
                path: PathBuf::from("data/locked"),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            },
        }];
        let outcome = TableCollector::new(Vec::new(), unreadable).finish();
        assert!(outcome.has_failures());
        assert_eq!(outcome.failed[0].path, PathBuf::from("data/locked"));
        assert!(outcome.failed[0].error.starts_with("failed to read directory data/locked"));
    }

    #[test]
    fn default_registry_has_builtin_strategies() {
        let names: Vec<_> = default_registry().names().collect();
        assert_eq!(names, vec!["default", "sheet"]);
    }

    #[test]
    fn unknown_importer_is_configuration_error() {
        let options = EnvOptions::from_pairs(["tableImporter.name=next-custom"]).unwrap();
        let config = ImportConfig::new("data").with_options(options);
        let err = create_importer(&config).err().expect("unknown importer");
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "unknown table importer 'next-custom' (known: default, sheet)"
        );
    }

    #[test]
    fn naming_reports_the_bad_key() {
        let options = EnvOptions::from_pairs(["tableImporter.tableNameFormat=Tb{1}"]).unwrap();
        let config = ImportConfig::new("data").with_options(options);
        let defaults = NamingDefaults {
            namespace: "{0}",
            name: "Tb{0}",
            value_type: "{0}",
        };
        let err = TableNaming::from_config(&config, defaults).unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidTemplate { ref key, .. } if key == "tableImporter.tableNameFormat"
        ));
    }

    #[test]
    fn selects_strategy_by_name() {
        let options = EnvOptions::from_pairs(["tableImporter.name=sheet"]).unwrap();
        let config = ImportConfig::new("data").with_options(options);
        let importer = create_importer(&config).expect("sheet importer");
        assert_eq!(importer.name(), "sheet");
    }
}

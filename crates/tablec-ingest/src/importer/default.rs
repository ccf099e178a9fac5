//! Filename-pattern importer.

use std::path::PathBuf;
use std::sync::Arc;

use regex::Regex;
use tablec_common::{make_full_name, name_of, namespace_of};
use tablec_model::{RawTable, TableMode};
use tracing::info;

use super::{ImportOutcome, NamingDefaults, TableCollector, TableImporter, TableNaming};
use crate::discovery::{SkipReason, SkippedFile, SourceFile, discover_table_files};
use crate::error::{IngestError, Result};
use crate::ignore::{DefaultIgnore, IgnorePolicy};
use crate::options::{IMPORTER_NAMESPACE, ImportConfig, KEY_FILE_PATTERN};

/// One table per file whose stem matches `tableImporter.filePattern`.
///
/// The first capture group is the raw table identifier. A dotted identifier
/// (`item.Weapon`) carries its own namespace, which is appended to the
/// directory namespace.
pub struct DefaultTableImporter {
    data_root: PathBuf,
    pattern: Regex,
    naming: TableNaming,
    ignore: Arc<dyn IgnorePolicy>,
}

impl DefaultTableImporter {
    pub const NAME: &'static str = "default";
    pub const DEFAULT_FILE_PATTERN: &'static str = "(.*)";
    pub const NAMING_DEFAULTS: NamingDefaults = NamingDefaults {
        namespace: "{0}",
        name: "Tb{0}",
        value_type: "{0}",
    };

    /// Parse pattern and templates from the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the pattern does not compile, has
    /// no capture group, or a template is malformed.
    pub fn from_config(config: &ImportConfig) -> Result<Self> {
        let raw_pattern = config.importer_option(KEY_FILE_PATTERN, Self::DEFAULT_FILE_PATTERN);
        let key = format!("{IMPORTER_NAMESPACE}.{KEY_FILE_PATTERN}");
        let pattern = Regex::new(raw_pattern).map_err(|source| IngestError::InvalidPattern {
            key: key.clone(),
            pattern: raw_pattern.to_string(),
            source,
        })?;
        // Group 0 is the whole match.
        if pattern.captures_len() < 2 {
            return Err(IngestError::PatternWithoutGroup {
                key,
                pattern: raw_pattern.to_string(),
            });
        }
        Ok(Self {
            data_root: config.data_root.clone(),
            pattern,
            naming: TableNaming::from_config(config, Self::NAMING_DEFAULTS)?,
            ignore: Arc::new(DefaultIgnore),
        })
    }

    pub fn with_ignore(mut self, ignore: Arc<dyn IgnorePolicy>) -> Self {
        self.ignore = ignore;
        self
    }

    /// Raw identifier captured from the file stem, if any.
    fn table_identifier<'a>(&self, stem: &'a str) -> Option<&'a str> {
        let captures = self.pattern.captures(stem)?;
        captures
            .get(1)
            .as_ref()
            .map(regex::Match::as_str)
            .filter(|identifier| !identifier.is_empty())
    }

    fn build_table(&self, file: &SourceFile, identifier: &str) -> RawTable {
        let raw_namespace = namespace_of(identifier);
        let raw_name = name_of(identifier);
        let namespace = make_full_name(
            &file.directory_namespace,
            &self.naming.namespace.apply(raw_namespace),
        );
        let name = self.naming.name.apply(raw_name);
        let value_type = make_full_name(&namespace, &self.naming.value_type.apply(raw_name));
        RawTable {
            namespace,
            name,
            value_type,
            mode: TableMode::Map,
            read_schema_from_file: true,
            input_files: vec![file.relative_path.clone()],
            ..RawTable::default()
        }
    }
}

impl TableImporter for DefaultTableImporter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn import(&self) -> Result<ImportOutcome> {
        let discovery = discover_table_files(&self.data_root, self.ignore.as_ref())?;
        let mut collector = TableCollector::new(discovery.skipped, discovery.unreadable);

        for file in &discovery.files {
            let Some(identifier) = self.table_identifier(file.stem()) else {
                info!(path = %file.relative_path, pattern = %self.pattern, "file name does not match pattern");
                collector.skip(SkippedFile::new(file.path.clone(), SkipReason::NameMismatch));
                continue;
            };
            collector.add(self.build_table(file, identifier), file);
        }

        Ok(collector.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::EnvOptions;

    fn importer(pairs: &[&str]) -> Result<DefaultTableImporter> {
        let options = EnvOptions::from_pairs(pairs.iter().copied())?;
        DefaultTableImporter::from_config(&ImportConfig::new("data").with_options(options))
    }

    fn source(relative: &str, namespace: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from("data").join(relative),
            relative_path: relative.to_string(),
            directory_namespace: namespace.to_string(),
        }
    }

    #[test]
    fn hash_prefixed_files() {
        let importer = importer(&["tableImporter.filePattern=#(.*)"]).unwrap();
        let file = source("path/to/#Hero.xlsx", "path.to");
        let identifier = importer.table_identifier(file.stem()).unwrap();
        let table = importer.build_table(&file, identifier);

        assert_eq!(table.namespace, "path.to");
        assert_eq!(table.name, "TbHero");
        assert_eq!(table.value_type, "path.to.Hero");
        assert_eq!(table.input_files, vec!["path/to/#Hero.xlsx"]);
        assert_eq!(table.mode, TableMode::Map);
        assert!(table.read_schema_from_file);
        assert!(table.index.is_empty());
    }

    #[test]
    fn identifier_namespace_is_appended() {
        let importer = importer(&["tableImporter.tableNamespaceFormat=cfg.{0}"]).unwrap();
        let file = source("game/item.Weapon.csv", "game");
        let table = importer.build_table(&file, "item.Weapon");

        assert_eq!(table.namespace, "game.cfg.item");
        assert_eq!(table.name, "TbWeapon");
        assert_eq!(table.value_type, "game.cfg.item.Weapon");
    }

    #[test]
    fn non_matching_stems_yield_nothing() {
        let importer = importer(&["tableImporter.filePattern=#(.*)"]).unwrap();
        assert_eq!(importer.table_identifier("Hero"), None);
        assert_eq!(importer.table_identifier("#"), None);
        assert_eq!(importer.table_identifier("#Hero"), Some("Hero"));
    }

    #[test]
    fn pattern_errors_are_configuration_errors() {
        let err = importer(&["tableImporter.filePattern=#(.*"]).err().unwrap();
        assert!(matches!(err, IngestError::InvalidPattern { .. }));
        assert!(err.is_configuration());

        let err = importer(&["tableImporter.filePattern=#.*"]).err().unwrap();
        assert!(matches!(err, IngestError::PatternWithoutGroup { .. }));
    }
}

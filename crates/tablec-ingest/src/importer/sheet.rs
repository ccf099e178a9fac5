//! Sheet-per-table importer.

use std::path::PathBuf;
use std::sync::Arc;

use tablec_common::{format_namespace, make_full_name};
use tablec_model::{InputFileRef, RawTable, TableMode};
use tracing::{debug, info};

use super::{ImportOutcome, NamingDefaults, TableCollector, TableImporter, TableNaming};
use crate::discovery::{SkipReason, SkippedFile, SourceFile, discover_table_files};
use crate::error::Result;
use crate::ignore::{DefaultIgnore, IgnorePolicy};
use crate::options::ImportConfig;
use crate::sheets::{DefaultSheetReader, SheetReader};

/// One table per sheet of every table file.
///
/// Sheet names are normalized with [`format_namespace`] before the name
/// templates are applied; the input reference keeps the raw sheet name.
pub struct SheetTableImporter {
    data_root: PathBuf,
    naming: TableNaming,
    ignore: Arc<dyn IgnorePolicy>,
    sheets: Arc<dyn SheetReader>,
}

impl SheetTableImporter {
    pub const NAME: &'static str = "sheet";
    pub const NAMING_DEFAULTS: NamingDefaults = NamingDefaults {
        namespace: "{0}",
        name: "{0}",
        value_type: "{0}Config",
    };

    pub fn from_config(config: &ImportConfig) -> Result<Self> {
        Ok(Self {
            data_root: config.data_root.clone(),
            naming: TableNaming::from_config(config, Self::NAMING_DEFAULTS)?,
            ignore: Arc::new(DefaultIgnore),
            sheets: Arc::new(DefaultSheetReader::new()),
        })
    }

    pub fn with_ignore(mut self, ignore: Arc<dyn IgnorePolicy>) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_sheet_reader(mut self, sheets: Arc<dyn SheetReader>) -> Self {
        self.sheets = sheets;
        self
    }

    fn build_table(&self, file: &SourceFile, sheet: &str, formatted: &str) -> RawTable {
        let namespace = self.naming.namespace.apply(&file.directory_namespace);
        let name = self.naming.name.apply(formatted);
        let value_type = make_full_name(&namespace, &self.naming.value_type.apply(formatted));
        RawTable {
            namespace,
            name,
            value_type,
            mode: TableMode::Map,
            read_schema_from_file: true,
            input_files: vec![InputFileRef::sub_unit(sheet, file.relative_path.as_str()).to_string()],
            ..RawTable::default()
        }
    }
}

impl TableImporter for SheetTableImporter {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn import(&self) -> Result<ImportOutcome> {
        let discovery = discover_table_files(&self.data_root, self.ignore.as_ref())?;
        let mut collector = TableCollector::new(discovery.skipped, discovery.unreadable);

        for file in &discovery.files {
            let sheets = match self.sheets.sheet_names(&file.path) {
                Ok(sheets) => sheets,
                Err(err) => {
                    collector.fail(file, &err);
                    continue;
                }
            };
            debug!(path = %file.relative_path, sheets = sheets.len(), "read sheet list");

            for sheet in sheets {
                let formatted = format_namespace(&sheet);
                if formatted.is_empty() {
                    info!(path = %file.relative_path, sheet = %sheet, "sheet name yields no table name");
                    collector.skip(SkippedFile {
                        sub_unit: Some(sheet),
                        ..SkippedFile::new(file.path.clone(), SkipReason::NameMismatch)
                    });
                    continue;
                }
                collector.add(self.build_table(file, &sheet, &formatted), file);
            }
        }

        Ok(collector.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(relative: &str, namespace: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from("data").join(relative),
            relative_path: relative.to_string(),
            directory_namespace: namespace.to_string(),
        }
    }

    #[test]
    fn sheet_table_naming() {
        let importer = SheetTableImporter::from_config(&ImportConfig::new("data")).unwrap();
        let file = source("game/items.xlsx", "game");
        let table = importer.build_table(&file, "weapon_list", &format_namespace("weapon_list"));

        assert_eq!(table.namespace, "game");
        assert_eq!(table.name, "WeaponList");
        assert_eq!(table.value_type, "game.WeaponListConfig");
        assert_eq!(table.input_files, vec!["weapon_list@game/items.xlsx"]);
        assert!(table.index.is_empty());
        assert_eq!(table.mode, TableMode::Map);
    }

    #[test]
    fn root_files_have_no_namespace() {
        let importer = SheetTableImporter::from_config(&ImportConfig::new("data")).unwrap();
        let table = importer.build_table(&source("items.xlsx", ""), "Armor", "Armor");

        assert_eq!(table.namespace, "");
        assert_eq!(table.value_type, "ArmorConfig");
        assert_eq!(table.full_name(), "Armor");
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// How records of a table are keyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableMode {
    /// Records keyed by the index field.
    #[default]
    Map,
    /// Ordered records, optionally with a composite index.
    List,
    /// Exactly one record.
    One,
}

impl TableMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableMode::Map => "MAP",
            TableMode::List => "LIST",
            TableMode::One => "ONE",
        }
    }
}

impl fmt::Display for TableMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table descriptor produced by an importer, before any type checking.
///
/// `(namespace, name)` is unique within one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTable {
    pub namespace: String,
    pub name: String,
    /// Primary-key field; blank means "resolve to the first field".
    pub index: String,
    /// Full name of the record type.
    pub value_type: String,
    pub mode: TableMode,
    /// Ask the schema compiler to infer the record type from the data file.
    pub read_schema_from_file: bool,
    pub comment: String,
    pub groups: Vec<String>,
    /// Never empty for imported tables; see [`InputFileRef`] for the syntax.
    pub input_files: Vec<String>,
    pub output_file: String,
    pub tags: BTreeMap<String, String>,
}

impl RawTable {
    /// `namespace.name`, or just `name` at the root namespace.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Parsed input file references.
    pub fn input_refs(&self) -> Result<Vec<InputFileRef>, ModelError> {
        self.input_files.iter().map(|raw| raw.parse()).collect()
    }
}

/// Reference to a data file, optionally narrowed to one named sub-unit.
///
/// Written as `relative/path.xlsx` or `SheetName@relative/path.xlsx`. The
/// text is split at the last `@`, so sub-unit names may contain `@` but
/// paths may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFileRef {
    pub sub_unit: Option<String>,
    pub path: String,
}

impl InputFileRef {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            sub_unit: None,
            path: path.into(),
        }
    }

    pub fn sub_unit(sub_unit: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            sub_unit: Some(sub_unit.into()),
            path: path.into(),
        }
    }
}

impl fmt::Display for InputFileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_unit {
            Some(sub_unit) => write!(f, "{sub_unit}@{}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

impl FromStr for InputFileRef {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ModelError::InvalidInputFile {
            raw: s.to_string(),
            reason: reason.to_string(),
        };
        match s.rsplit_once('@') {
            Some((sub_unit, path)) => {
                if sub_unit.is_empty() {
                    return Err(invalid("empty sub-unit name before '@'"));
                }
                if path.is_empty() {
                    return Err(invalid("empty path after '@'"));
                }
                Ok(Self::sub_unit(sub_unit, path))
            }
            None if s.is_empty() => Err(invalid("empty path")),
            None => Ok(Self::file(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_qualified_refs() {
        let plain: InputFileRef = "path/to/#Hero.xlsx".parse().unwrap();
        assert_eq!(plain, InputFileRef::file("path/to/#Hero.xlsx"));

        let sheet: InputFileRef = "Weapon@items.xlsx".parse().unwrap();
        assert_eq!(sheet.sub_unit.as_deref(), Some("Weapon"));
        assert_eq!(sheet.path, "items.xlsx");
        assert_eq!(sheet.to_string(), "Weapon@items.xlsx");
    }

    #[test]
    fn sub_unit_names_may_contain_at_sign() {
        let original = InputFileRef::sub_unit("drops@boss", "loot/tables.xlsx");
        let text = original.to_string();
        assert_eq!(text, "drops@boss@loot/tables.xlsx");
        assert_eq!(text.parse::<InputFileRef>().unwrap(), original);
    }

    #[test]
    fn rejects_empty_parts() {
        assert!("".parse::<InputFileRef>().is_err());
        assert!("@items.xlsx".parse::<InputFileRef>().is_err());
        assert!("Weapon@".parse::<InputFileRef>().is_err());
    }

    #[test]
    fn full_name_skips_empty_namespace() {
        let table = RawTable {
            name: "TbHero".to_string(),
            ..RawTable::default()
        };
        assert_eq!(table.full_name(), "TbHero");

        let table = RawTable {
            namespace: "path.to".to_string(),
            ..table
        };
        assert_eq!(table.full_name(), "path.to.TbHero");
    }
}

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::data::Record;
use crate::raw_table::TableMode;
use crate::schema::RecordType;

/// A second record tried to claim a normalized codename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodenameConflict {
    pub codename: String,
    /// Primary key of the record that already owns the codename.
    pub existing_key: String,
    /// Primary key of the record that lost.
    pub rejected_key: String,
}

impl fmt::Display for CodenameConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "codename '{}' already belongs to key {} (rejected key {})",
            self.codename, self.existing_key, self.rejected_key
        )
    }
}

/// Normalized codename -> primary key, shared by every record of one table.
///
/// Inserts are first-wins: once a codename is taken the mapping never
/// changes for the rest of the validation phase.
#[derive(Debug, Default)]
pub struct CodenameMap {
    entries: Mutex<HashMap<String, String>>,
}

impl CodenameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert if absent. The check and the insert happen under one lock.
    pub fn try_insert(
        &self,
        codename: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<(), CodenameConflict> {
        let codename = codename.into();
        let key = key.into();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = entries.get(&codename) {
            return Err(CodenameConflict {
                codename,
                existing_key: existing.clone(),
                rejected_key: key,
            });
        }
        entries.insert(codename, key);
        Ok(())
    }

    pub fn get(&self, codename: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(codename)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted copy of the current mapping, for code emitters.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(codename, key)| (codename.clone(), key.clone()))
            .collect()
    }
}

/// A table after schema compilation: descriptor, record type and the state
/// validators share across its records.
#[derive(Debug)]
pub struct CompiledTable {
    pub namespace: String,
    pub name: String,
    /// Index field name; blank resolves to the first field.
    pub index: String,
    pub mode: TableMode,
    pub value_type: Arc<RecordType>,
    pub codenames: CodenameMap,
}

impl CompiledTable {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        value_type: Arc<RecordType>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            index: String::new(),
            mode: TableMode::Map,
            value_type,
            codenames: CodenameMap::new(),
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    pub fn with_mode(mut self, mode: TableMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Field position holding the primary key.
    pub fn index_position(&self) -> Option<usize> {
        if self.index.is_empty() {
            (!self.value_type.fields.is_empty()).then_some(0)
        } else {
            self.value_type.field_index(&self.index)
        }
    }

    /// Primary key of a record as unquoted text.
    pub fn primary_key(&self, record: &Record) -> Option<String> {
        let position = self.index_position()?;
        record.value(position).map(crate::data::DataValue::as_key)
    }
}

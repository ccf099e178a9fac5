//! Per-value validation context.

use tablec_model::{CodenameMap, CompiledTable, DataValue, FieldDef, Record};

use crate::diagnostics::Diagnostics;
use crate::error::{FailureKind, ValidationFailure};

/// What a validator can see while checking one value: the record under
/// inspection, its table (including table-owned state) and a diagnostics sink.
///
/// Built by the engine for every call; never stored.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    table: &'a CompiledTable,
    record: &'a Record,
    record_index: usize,
    field: &'a FieldDef,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        table: &'a CompiledTable,
        record: &'a Record,
        record_index: usize,
        field: &'a FieldDef,
        diagnostics: &'a dyn Diagnostics,
    ) -> Self {
        Self {
            table,
            record,
            record_index,
            field,
            diagnostics,
        }
    }

    pub fn table(&self) -> &'a CompiledTable {
        self.table
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }

    /// Position of the record within its table.
    pub fn record_index(&self) -> usize {
        self.record_index
    }

    /// Field being validated.
    pub fn field(&self) -> &'a FieldDef {
        self.field
    }

    /// Input file the record came from.
    pub fn source(&self) -> &'a str {
        &self.record.source
    }

    pub fn diagnostics(&self) -> &'a dyn Diagnostics {
        self.diagnostics
    }

    /// Codename state shared by all records of the table.
    pub fn codenames(&self) -> &'a CodenameMap {
        &self.table.codenames
    }

    /// Value of a sibling field of the current record.
    pub fn field_value(&self, name: &str) -> Option<&'a DataValue> {
        let position = self.table.value_type.field_index(name)?;
        self.record.value(position)
    }

    /// Primary key of the current record as unquoted text.
    pub fn primary_key(&self) -> Option<String> {
        self.table.primary_key(self.record)
    }

    /// `Namespace.TbName[key]`, or `[#index]` when the record has no key.
    pub fn record_path(&self) -> String {
        match self.primary_key() {
            Some(key) => format!("{}[{key}]", self.table.full_name()),
            None => format!("{}[#{}]", self.table.full_name(), self.record_index),
        }
    }

    /// Failure for the current field, filled with location details.
    pub fn failure(
        &self,
        validator: &str,
        kind: FailureKind,
        value: &DataValue,
        message: impl Into<String>,
    ) -> ValidationFailure {
        ValidationFailure {
            kind,
            validator: validator.to_string(),
            table: self.table.full_name(),
            record_path: self.record_path(),
            source_file: self.record.source.clone(),
            field: self.field.name.clone(),
            value: value.to_string(),
            existing: None,
            message: message.into(),
        }
    }
}

//! Validation engine.
//!
//! Two phases, both driven from here:
//!
//! 1. **Compile**: every validator declaration of a record type is resolved
//!    through the registry and bound to its field. The first failure aborts
//!    the record type.
//! 2. **Validate**: the compiled validators run against every record of a
//!    table. Failures are collected into a [`TableReport`]; with
//!    [`FailurePolicy::Escalate`] the first failure aborts instead.

use std::sync::Arc;

use tablec_model::{CompiledTable, FieldDef, Record, RecordType, ValidatorDecl};
use tracing::{debug, info};

use crate::context::ValidationContext;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::{CompileError, Result, ValidateError, ValidationFailure};
use crate::registry::{ValidatorRegistry, default_registry};
use crate::report::{TableReport, ValidationReport};
use crate::validator::{DataValidator, ValidatorTarget};

/// What happens when a record fails a check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure, keep going, return it in the report.
    #[default]
    Report,
    /// Abort the run with [`ValidateError::Escalated`].
    Escalate,
}

/// A validator bound to a field position.
#[derive(Debug)]
pub struct FieldValidator {
    pub field_index: usize,
    pub decl: ValidatorDecl,
    pub validator: Box<dyn DataValidator>,
}

/// A record type with all of its validators compiled.
#[derive(Debug)]
pub struct CompiledRecordType {
    pub record_type: Arc<RecordType>,
    pub validators: Vec<FieldValidator>,
}

impl CompiledRecordType {
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Whether the validators were compiled against `record_type`. A type
    /// with the same name but other fields does not match.
    pub fn is_for(&self, record_type: &Arc<RecordType>) -> bool {
        Arc::ptr_eq(&self.record_type, record_type) || *self.record_type == **record_type
    }
}

fn describe_record_type(record_type: &RecordType) -> String {
    let fields: Vec<&str> = record_type.fields.iter().map(|f| f.name.as_str()).collect();
    format!("{}({})", record_type.full_name, fields.join(", "))
}

/// Drives compile and validate over a registry.
pub struct ValidationEngine<'a> {
    registry: &'a ValidatorRegistry,
    diagnostics: &'a dyn Diagnostics,
    policy: FailurePolicy,
}

impl Default for ValidationEngine<'static> {
    fn default() -> Self {
        Self::new(default_registry())
    }
}

impl<'a> ValidationEngine<'a> {
    /// Engine logging through `tracing`.
    pub fn new(registry: &'a ValidatorRegistry) -> Self {
        Self {
            registry,
            diagnostics: &TracingDiagnostics,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: &'a dyn Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Compile every validator declared on the record type's fields.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`]: an unknown tag, or a validator
    /// rejecting its arguments or the field type.
    pub fn compile_record_type(
        &self,
        record_type: &Arc<RecordType>,
    ) -> std::result::Result<CompiledRecordType, CompileError> {
        let mut validators = Vec::new();
        for (field_index, field) in record_type.fields.iter().enumerate() {
            for decl in &field.validators {
                let validator = self.compile_decl(record_type, field, decl)?;
                validators.push(FieldValidator {
                    field_index,
                    decl: decl.clone(),
                    validator,
                });
            }
        }
        debug!(
            record_type = %record_type.full_name,
            validators = validators.len(),
            "compiled record type"
        );
        Ok(CompiledRecordType {
            record_type: Arc::clone(record_type),
            validators,
        })
    }

    fn compile_decl(
        &self,
        record_type: &RecordType,
        field: &FieldDef,
        decl: &ValidatorDecl,
    ) -> std::result::Result<Box<dyn DataValidator>, CompileError> {
        let target = ValidatorTarget::new(record_type, field);
        let compiled = match self.registry.get(&decl.tag) {
            Some(factory) => factory.compile(&target, &decl.args),
            None => {
                let known = self.registry.tags().collect::<Vec<_>>().join(", ");
                Err(target.error(&decl.tag, format!("unknown validator (known: {known})")))
            }
        };
        compiled.inspect_err(|err| {
            self.diagnostics.error(
                "validator compile failed",
                &[
                    ("record_type", &err.record_type),
                    ("field", &err.field),
                    ("validator", &err.tag),
                    ("reason", &err.reason),
                ],
            );
        })
    }

    /// Run compiled validators over every record of `table`.
    ///
    /// # Errors
    ///
    /// Fails when `compiled` belongs to another record type, when a record
    /// is shorter than its record type, or on the first failure under
    /// [`FailurePolicy::Escalate`].
    pub fn validate_table(
        &self,
        table: &CompiledTable,
        compiled: &CompiledRecordType,
        records: &[Record],
    ) -> Result<TableReport> {
        let table_name = table.full_name();
        if !compiled.is_for(&table.value_type) {
            return Err(ValidateError::RecordTypeMismatch {
                table: table_name,
                expected: describe_record_type(&table.value_type),
                actual: describe_record_type(&compiled.record_type),
            });
        }

        let mut report = TableReport::new(table_name.clone());
        for (record_index, record) in records.iter().enumerate() {
            let expected = table.value_type.fields.len();
            if record.values.len() < expected {
                return Err(ValidateError::RecordArity {
                    table: table_name,
                    record: record_index,
                    source_file: record.source.clone(),
                    expected,
                    actual: record.values.len(),
                });
            }
            for bound in &compiled.validators {
                let (Some(field), Some(value)) = (
                    table.value_type.fields.get(bound.field_index),
                    record.values.get(bound.field_index),
                ) else {
                    self.diagnostics.error(
                        "validator bound to a missing field",
                        &[
                            ("table", &table_name),
                            ("validator", &bound.decl.tag),
                            ("field_index", &bound.field_index),
                            ("record_index", &record_index),
                        ],
                    );
                    continue;
                };
                let ctx = ValidationContext::new(table, record, record_index, field, self.diagnostics);
                if let Err(failure) = bound.validator.validate(&ctx, &field.field_type, value) {
                    self.report_failure(&failure);
                    if self.policy == FailurePolicy::Escalate {
                        return Err(ValidateError::Escalated(Box::new(failure)));
                    }
                    report.failures.push(failure);
                }
            }
            report.records_checked += 1;
        }

        info!(
            table = %table_name,
            records = report.records_checked,
            failures = report.failures.len(),
            "validated table"
        );
        Ok(report)
    }

    /// Compile and validate several tables. Tables whose record types are
    /// equal (same name and same fields) reuse one compiled record type.
    pub fn validate_tables<'t, I>(&self, tables: I) -> Result<ValidationReport>
    where
        I: IntoIterator<Item = (&'t CompiledTable, &'t [Record])>,
    {
        let mut compiled: Vec<CompiledRecordType> = Vec::new();
        let mut report = ValidationReport::default();
        for (table, records) in tables {
            let position = match compiled.iter().position(|c| c.is_for(&table.value_type)) {
                Some(position) => position,
                None => {
                    compiled.push(self.compile_record_type(&table.value_type)?);
                    compiled.len() - 1
                }
            };
            report
                .tables
                .push(self.validate_table(table, &compiled[position], records)?);
        }
        Ok(report)
    }

    fn report_failure(&self, failure: &ValidationFailure) {
        let existing = failure.existing.as_deref().unwrap_or("");
        self.diagnostics.error(
            &failure.message,
            &[
                ("table", &failure.table),
                ("validator", &failure.validator),
                ("record", &failure.record_path),
                ("source", &failure.source_file),
                ("field", &failure.field),
                ("value", &failure.value),
                ("existing", &existing),
            ],
        );
    }
}

//! Validator traits.
//!
//! A [`ValidatorFactory`] is registered once per tag. Compiling a field's
//! declaration through it yields a [`DataValidator`], which is then reused for
//! every record of the table. A validator value only exists after a
//! successful compile, so there is no uninitialized state to guard against.

use std::fmt;

use tablec_model::{DataValue, FieldDef, FieldType, RecordType};

use crate::context::ValidationContext;
use crate::error::{CompileError, ValidationFailure};

/// The field a declaration is attached to.
#[derive(Debug, Clone, Copy)]
pub struct ValidatorTarget<'a> {
    pub record_type: &'a RecordType,
    pub field: &'a FieldDef,
}

impl<'a> ValidatorTarget<'a> {
    pub fn new(record_type: &'a RecordType, field: &'a FieldDef) -> Self {
        Self { record_type, field }
    }

    /// Declared type of the field.
    pub fn field_type(&self) -> &'a FieldType {
        &self.field.field_type
    }

    /// Compile error naming this field.
    pub fn error(&self, tag: &str, reason: impl Into<String>) -> CompileError {
        CompileError {
            record_type: self.record_type.full_name.clone(),
            field: self.field.name.clone(),
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }
}

/// Builds validators for one tag.
pub trait ValidatorFactory: Send + Sync {
    /// Declaration tag, e.g. `codename`.
    fn tag(&self) -> &'static str;

    /// One-line summary for listings.
    fn description(&self) -> &'static str {
        "Record validator"
    }

    /// Parse `raw_args` and check the declared type.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] naming the field when the arguments are
    /// malformed or the declared type is not supported.
    fn compile(
        &self,
        target: &ValidatorTarget<'_>,
        raw_args: &str,
    ) -> Result<Box<dyn DataValidator>, CompileError>;
}

/// A compiled validator bound to one field.
pub trait DataValidator: Send + Sync + fmt::Debug {
    fn tag(&self) -> &'static str;

    /// Check one value.
    ///
    /// May update table-owned state reachable through `ctx`.
    fn validate(
        &self,
        ctx: &ValidationContext<'_>,
        field_type: &FieldType,
        value: &DataValue,
    ) -> Result<(), ValidationFailure>;
}

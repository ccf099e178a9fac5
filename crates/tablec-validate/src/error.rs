//! Error types for validator compilation and record validation.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A validator could not be bound to its field. Fatal for the record type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validator '{tag}' on field {record_type}.{field}: {reason}")]
pub struct CompileError {
    pub record_type: String,
    pub field: String,
    pub tag: String,
    pub reason: String,
}

/// What a failed runtime check was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The normalized codename is already owned by another record.
    CodenameCollision,
    /// The record has no primary key to register.
    MissingKey,
    /// Numeric value outside the declared bounds.
    OutOfRange,
    /// Value not among the allowed literals.
    NotInSet,
    /// Value shape does not fit the validator.
    TypeMismatch,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::CodenameCollision => "codename collision",
            FailureKind::MissingKey => "missing key",
            FailureKind::OutOfRange => "out of range",
            FailureKind::NotInSet => "not in set",
            FailureKind::TypeMismatch => "type mismatch",
        }
    }
}

/// A record failed a validator's runtime check. Reported, never fatal by
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{record_path} ({source_file}) field '{field}' value {value}: {message}")]
pub struct ValidationFailure {
    pub kind: FailureKind,
    /// Validator tag that produced the failure.
    pub validator: String,
    pub table: String,
    /// `Namespace.TbName[key]`.
    pub record_path: String,
    pub source_file: String,
    pub field: String,
    /// Offending value as rendered in reports (strings quoted).
    pub value: String,
    /// Key of the record already holding a conflicting entry, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing: Option<String>,
    pub message: String,
}

/// Errors that abort a validation run.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Records were compiled against a different record type.
    #[error("table {table} stores {expected} records, validators were compiled for {actual}")]
    RecordTypeMismatch {
        table: String,
        expected: String,
        actual: String,
    },

    /// A record has fewer values than its record type has fields.
    #[error("record #{record} of {table} ({source_file}) has {actual} values, expected {expected}")]
    RecordArity {
        table: String,
        record: usize,
        source_file: String,
        expected: usize,
        actual: usize,
    },

    /// A failure under [`FailurePolicy::Escalate`](crate::FailurePolicy::Escalate).
    #[error("validation failed: {0}")]
    Escalated(Box<ValidationFailure>),

    #[error("failed to write report {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),
}

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidateError>;

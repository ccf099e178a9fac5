//! Record validation for the tablec front end.
//!
//! Validators are declared on schema fields as `tag(args)`. The
//! [`ValidationEngine`] resolves each declaration through a
//! [`ValidatorRegistry`], compiles it against the field's declared type, and
//! then runs it over every record of the owning table.
//!
//! # Example
//!
//! ```ignore
//! use tablec_validate::ValidationEngine;
//!
//! let engine = ValidationEngine::default();
//! let compiled = engine.compile_record_type(&table.value_type)?;
//! let report = engine.validate_table(&table, &compiled, &records)?;
//! for failure in &report.failures {
//!     eprintln!("{failure}");
//! }
//! ```

pub mod args;
pub mod context;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod registry;
pub mod report;
pub mod validator;
pub mod validators;

pub use args::{parse_args, strip_brackets};
pub use context::ValidationContext;
pub use diagnostics::{
    CollectingDiagnostics, DiagnosticEntry, DiagnosticLevel, Diagnostics, Fields,
    TracingDiagnostics,
};
pub use engine::{
    CompiledRecordType, FailurePolicy, FieldValidator, ValidationEngine,
};
pub use error::{CompileError, FailureKind, Result, ValidateError, ValidationFailure};
pub use registry::{ValidatorRegistry, default_registry};
pub use report::{TableReport, ValidationReport, report_to_json, write_report_json};
pub use validator::{DataValidator, ValidatorFactory, ValidatorTarget};

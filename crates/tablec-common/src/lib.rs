//! Shared utilities for tablec crates.
//!
//! This crate provides the identifier helpers used by both the table importer
//! and the validators: namespace-style casing, single-placeholder format
//! templates and full-name splitting.

pub mod naming;
pub mod template;
pub mod type_name;

// Re-export commonly used functions at crate root for convenience
pub use naming::{format_namespace, to_pascal_case};
pub use template::{FormatTemplate, TemplateError};
pub use type_name::{make_full_name, name_of, namespace_of};

//! Validation reports and their JSON form.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, ValidateError, ValidationFailure};

const REPORT_SCHEMA: &str = "tablec.validation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

/// Outcome of validating one table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableReport {
    pub table: String,
    pub records_checked: usize,
    pub failures: Vec<ValidationFailure>,
}

impl TableReport {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of a whole validation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub tables: Vec<TableReport>,
}

impl ValidationReport {
    pub fn records_checked(&self) -> usize {
        self.tables.iter().map(|t| t.records_checked).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.tables.iter().map(|t| t.failures.len()).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.tables.iter().any(|t| !t.is_clean())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.tables.iter().flat_map(|t| t.failures.iter())
    }
}

#[derive(Debug, Serialize)]
struct ReportPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    records_checked: usize,
    failure_count: usize,
    tables: &'a [TableReport],
}

/// Render the report as pretty JSON.
pub fn report_to_json(report: &ValidationReport) -> Result<String> {
    let payload = ReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        records_checked: report.records_checked(),
        failure_count: report.failure_count(),
        tables: &report.tables,
    };
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Write `validation_report.json` into `output_dir`, creating it if needed.
pub fn write_report_json(output_dir: &Path, report: &ValidationReport) -> Result<PathBuf> {
    let write_error = |source| ValidateError::ReportWrite {
        path: output_dir.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(output_dir).map_err(write_error)?;
    let output_path = output_dir.join("validation_report.json");
    let json = report_to_json(report)?;
    std::fs::write(&output_path, format!("{json}\n")).map_err(|source| {
        ValidateError::ReportWrite {
            path: output_path.clone(),
            source,
        }
    })?;
    Ok(output_path)
}

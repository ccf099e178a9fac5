//! Sub-unit (sheet) enumeration.
//!
//! Workbook parsing lives outside this crate. Importers only need the list of
//! named sub-units inside a file, which is what [`SheetReader`] provides.

use std::path::Path;
use std::sync::Arc;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// Lists the named sub-units of a tabular file.
pub trait SheetReader: Send + Sync {
    /// Sheet names in file order.
    ///
    /// # Errors
    ///
    /// Returns an error when the file or its sheet list cannot be read. The
    /// caller must not produce tables for that file.
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>>;
}

/// CSV files have exactly one sheet, named after the file stem.
///
/// The whole file is parsed once so malformed content is reported here
/// instead of later in the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSheetReader;

impl SheetReader for CsvSheetReader {
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        let source_error = |e: csv::Error| IngestError::SourceRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(source_error)?;
        for record in reader.records() {
            record.map_err(source_error)?;
        }
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| IngestError::SourceRead {
                path: path.to_path_buf(),
                message: "file name is not valid UTF-8".to_string(),
            })?;
        Ok(vec![stem.to_string()])
    }
}

/// Dispatches by extension: CSV is read directly, workbook formats go to an
/// injected reader.
#[derive(Clone, Default)]
pub struct DefaultSheetReader {
    csv: CsvSheetReader,
    workbook: Option<Arc<dyn SheetReader>>,
}

impl DefaultSheetReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader for `xlsx`/`xls`/`xlsm` files.
    pub fn with_workbook_reader(mut self, reader: Arc<dyn SheetReader>) -> Self {
        self.workbook = Some(reader);
        self
    }
}

impl std::fmt::Debug for DefaultSheetReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultSheetReader")
            .field("workbook", &self.workbook.is_some())
            .finish()
    }
}

impl SheetReader for DefaultSheetReader {
    fn sheet_names(&self, path: &Path) -> Result<Vec<String>> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if extension == "csv" {
            return self.csv.sheet_names(path);
        }
        match &self.workbook {
            Some(reader) => reader.sheet_names(path),
            None => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

//! Data-root scanning.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{IngestError, Result};
use crate::ignore::IgnorePolicy;

/// Tabular formats picked up by the importers (compared case-insensitively).
pub const TABLE_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "csv"];

/// A tabular file found under the data root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    /// Absolute (or root-joined) path used for reading.
    pub path: PathBuf,
    /// Path relative to the data root, `/`-separated on every platform.
    pub relative_path: String,
    /// Containing directory as a dotted namespace (`path/to` -> `path.to`).
    pub directory_namespace: String,
}

impl SourceFile {
    /// File name without its extension.
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("")
    }

    /// Lower-cased extension without the dot.
    pub fn extension(&self) -> String {
        file_extension(&self.path)
    }
}

/// Why a file produced no tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Rejected by the ignore policy.
    Ignored,
    /// Extension outside [`TABLE_EXTENSIONS`].
    UnsupportedExtension,
    /// Filename (or sheet name) did not yield a table name.
    NameMismatch,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Ignored => "ignored",
            SkipReason::UnsupportedExtension => "not a table file",
            SkipReason::NameMismatch => "name does not match pattern",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    /// Set when only one sheet of the file was skipped.
    pub sub_unit: Option<String>,
    pub reason: SkipReason,
}

impl SkippedFile {
    pub fn new(path: impl Into<PathBuf>, reason: SkipReason) -> Self {
        Self {
            path: path.into(),
            sub_unit: None,
            reason,
        }
    }
}

/// A directory below the data root whose entries could not be listed.
#[derive(Debug)]
pub struct UnreadableDirectory {
    pub path: PathBuf,
    pub error: IngestError,
}

/// Files found by [`list_files_recursive`].
#[derive(Debug, Default)]
pub struct FileListing {
    pub files: Vec<PathBuf>,
    /// Subdirectories that were left out; their siblings are still listed.
    pub unreadable: Vec<UnreadableDirectory>,
}

#[derive(Debug, Default)]
pub struct DiscoveryOutcome {
    pub files: Vec<SourceFile>,
    pub skipped: Vec<SkippedFile>,
    pub unreadable: Vec<UnreadableDirectory>,
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}

/// Check for one of the [`TABLE_EXTENSIONS`].
pub fn has_table_extension(path: &Path) -> bool {
    let ext = file_extension(path);
    TABLE_EXTENSIONS.contains(&ext.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
    Other,
}

type DirEntries = Vec<(PathBuf, EntryKind)>;

/// Recursively lists all files below `dir`.
///
/// Entries are sorted by name within each directory so repeated scans of an
/// unchanged tree return the same order. Links to files are listed; links to
/// directories are not followed.
///
/// # Errors
///
/// Only a missing or unreadable `dir` fails. Unreadable subdirectories end up
/// in [`FileListing::unreadable`].
pub fn list_files_recursive(dir: &Path) -> Result<FileListing> {
    list_files_with(dir, &read_sorted_entries)
}

fn list_files_with(
    dir: &Path,
    read_entries: &dyn Fn(&Path) -> Result<DirEntries>,
) -> Result<FileListing> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let mut listing = FileListing::default();
    walk(read_entries(dir)?, read_entries, &mut listing);
    Ok(listing)
}

fn walk(
    entries: DirEntries,
    read_entries: &dyn Fn(&Path) -> Result<DirEntries>,
    listing: &mut FileListing,
) {
    for (path, kind) in entries {
        match kind {
            EntryKind::Directory => match read_entries(&path) {
                Ok(children) => walk(children, read_entries, listing),
                Err(error) => {
                    error!(path = %path.display(), error = %error, "skipping unreadable directory");
                    listing.unreadable.push(UnreadableDirectory { path, error });
                }
            },
            EntryKind::File => listing.files.push(path),
            EntryKind::Other => debug!(path = %path.display(), "not following entry"),
        }
    }
}

fn read_sorted_entries(dir: &Path) -> Result<DirEntries> {
    let read_error = |source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry_result in std::fs::read_dir(dir).map_err(read_error)? {
        let entry = entry_result.map_err(read_error)?;
        let file_type = entry.file_type().map_err(read_error)?;
        let path = entry.path();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        entries.push((path, kind));
    }
    entries.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(entries)
}

/// `/`-joined relative path and the dotted namespace of its directory.
fn relative_parts(data_root: &Path, file: &Path) -> (String, String) {
    let relative = file.strip_prefix(data_root).unwrap_or(file);
    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    let namespace = match parts.split_last() {
        Some((_, directories)) => directories.join("."),
        None => String::new(),
    };
    (parts.join("/"), namespace)
}

/// Scan the data root for tabular files.
///
/// Ignored files and files with other extensions are reported in
/// [`DiscoveryOutcome::skipped`]; neither is an error. Neither are
/// unreadable subdirectories, see [`list_files_recursive`].
pub fn discover_table_files(
    data_root: &Path,
    ignore: &dyn IgnorePolicy,
) -> Result<DiscoveryOutcome> {
    let listing = list_files_recursive(data_root)?;
    let mut outcome = DiscoveryOutcome {
        unreadable: listing.unreadable,
        ..DiscoveryOutcome::default()
    };

    for path in listing.files {
        if ignore.is_ignored(data_root, &path) {
            info!(path = %path.display(), "skipping ignored file");
            outcome.skipped.push(SkippedFile::new(path, SkipReason::Ignored));
            continue;
        }
        if !has_table_extension(&path) {
            info!(path = %path.display(), "skipping non-table file");
            outcome
                .skipped
                .push(SkippedFile::new(path, SkipReason::UnsupportedExtension));
            continue;
        }
        let (relative_path, directory_namespace) = relative_parts(data_root, &path);
        debug!(relative_path = %relative_path, namespace = %directory_namespace, "table file");
        outcome.files.push(SourceFile {
            path,
            relative_path,
            directory_namespace,
        });
    }

    Ok(outcome)
}

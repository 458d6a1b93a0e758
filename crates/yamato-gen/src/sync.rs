//! Writing generated pipeline files to disk.

use serde::Serialize;
use similar::TextDiff;
use std::path::Path;
use yamato_core::{Error, Result};

/// Status of a file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// File was newly created.
    Created,
    /// File existed and was updated with new content.
    Updated,
    /// File existed and content was unchanged.
    Unchanged,
    /// Would be created (dry-run mode).
    WouldCreate,
    /// Would be updated (dry-run mode).
    WouldUpdate,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Updated => write!(f, "Updated"),
            Self::Unchanged => write!(f, "Unchanged"),
            Self::WouldCreate => write!(f, "Would create"),
            Self::WouldUpdate => write!(f, "Would update"),
        }
    }
}

fn read_existing(filepath: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(filepath) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(e, filepath, "read")),
    }
}

/// Determine what would happen to a file in dry-run mode.
///
/// # Errors
///
/// Returns an I/O error if an existing file cannot be read.
pub fn dry_run_status(filepath: &Path, content: &str) -> Result<FileStatus> {
    Ok(match read_existing(filepath)? {
        None => FileStatus::WouldCreate,
        Some(existing) if existing == content => FileStatus::Unchanged,
        Some(_) => FileStatus::WouldUpdate,
    })
}

/// Write a file, creating parent directories, and return the status.
///
/// An unchanged file is not rewritten.
///
/// # Errors
///
/// Returns an I/O error if reading, creating directories, or writing fails.
pub fn write_file(filepath: &Path, content: &str) -> Result<FileStatus> {
    let status = match read_existing(filepath)? {
        Some(existing) if existing == content => return Ok(FileStatus::Unchanged),
        Some(_) => FileStatus::Updated,
        None => FileStatus::Created,
    };

    if let Some(parent) = filepath.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(e, parent, "create directory"))?;
    }
    std::fs::write(filepath, content).map_err(|e| Error::io(e, filepath, "write"))?;
    Ok(status)
}

/// Compare a file against the expected content.
///
/// Returns `None` when in sync, otherwise a unified diff from the file on
/// disk (empty if missing) to `expected`, labelled with `display_path`.
///
/// # Errors
///
/// Returns an I/O error if an existing file cannot be read.
pub fn check_file(filepath: &Path, display_path: &str, expected: &str) -> Result<Option<String>> {
    let current = read_existing(filepath)?.unwrap_or_default();
    if current == expected {
        return Ok(None);
    }
    Ok(Some(format_unified_diff(display_path, &current, expected)))
}

fn format_unified_diff(path: &str, current: &str, expected: &str) -> String {
    let diff = TextDiff::from_lines(current, expected);
    let from = format!("a/{path}");
    let to = format!("b/{path}");
    diff.unified_diff().header(&from, &to).to_string()
}

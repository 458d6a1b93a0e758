//! `generate` command: write or check the ABV pipeline file.

use super::Workspace;
use crate::cli::{CliError, OkEnvelope};
use crate::sync::{FileStatus, check_file, dry_run_status, write_file};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use yamato_jobs::AbvFileEmitter;
use yamato_naming::Namer;

/// Options for the `generate` command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Repository root; defaults to [`Workspace::repository_root`]
    pub root: Option<PathBuf>,
    /// Report what would change without writing
    pub dry_run: bool,
    /// Fail if the file on disk differs from the generated content
    pub check: bool,
}

/// Result of a successful `generate` run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutcome {
    /// Generated file, relative to the repository root
    pub path: String,
    /// What happened to the file; `None` in check mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FileStatus>,
    /// Number of jobs in the file
    pub jobs: usize,
}

impl GenerateOutcome {
    /// Human or JSON output for this outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, json: bool) -> Result<String, CliError> {
        if json {
            return serde_json::to_string(&OkEnvelope::new(self))
                .map_err(|e| CliError::other(format!("failed to serialize output: {e}")));
        }
        Ok(match self.status {
            Some(status) => format!("{status}: {}", self.path),
            None => format!("Up to date: {}", self.path),
        })
    }
}

/// Generate the ABV pipeline file for the workspace.
///
/// # Errors
///
/// Returns a configuration error if job assembly fails, an I/O error if the
/// file cannot be read or written, or [`CliError::OutOfSync`] in check mode
/// when the file differs.
pub fn execute_generate(
    workspace: &Workspace,
    options: &GenerateOptions,
) -> Result<GenerateOutcome, CliError> {
    let namer = workspace.namer();
    let emitter = AbvFileEmitter::new();
    let file = emitter.generate(&workspace.config, &namer)?;
    let content = emitter.render(&file)?;

    let relative = namer.abv_filepath();
    let root = options
        .root
        .clone()
        .unwrap_or_else(|| workspace.repository_root());
    let target = root.join(&relative);

    let status = if options.check {
        if let Some(diff) = check_file(&target, &relative, &content)? {
            return Err(CliError::OutOfSync {
                path: relative,
                diff,
            });
        }
        None
    } else if options.dry_run {
        Some(dry_run_status(&target, &content)?)
    } else {
        Some(write_file(&target, &content)?)
    };

    info!(
        path = %target.display(),
        status = ?status,
        jobs = file.len(),
        "generate finished"
    );

    Ok(GenerateOutcome {
        path: relative,
        status,
        jobs: file.len(),
    })
}

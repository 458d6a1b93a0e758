//! Subcommand implementations.

mod generate;
mod show;

pub use generate::{GenerateOptions, GenerateOutcome, execute_generate};
pub use show::execute_show;

use crate::cli::{CliError, Commands};
use std::path::{Path, PathBuf};
use tracing::debug;
use yamato_core::config::{METAFILE_PATH, load_config, load_config_from_dir};
use yamato_core::{AbvConfig, Error};
use yamato_naming::YamatoNamer;

/// Loaded configuration and where it came from.
#[derive(Debug)]
pub struct Workspace {
    /// Parsed and validated configuration
    pub config: AbvConfig,
    /// File the configuration was read from
    pub config_path: PathBuf,
}

impl Workspace {
    /// Load configuration from `config_path`, or search upwards from `cwd`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no file is found or it is invalid.
    pub fn load(config_path: Option<&Path>, cwd: &Path) -> Result<Self, CliError> {
        let (config, config_path) = match config_path {
            Some(path) if !path.is_file() => {
                return Err(CliError::config_with_help(
                    format!("configuration file not found: {}", path.display()),
                    "Pass an existing file with --config, or omit it to search upwards",
                ));
            }
            Some(path) => (load_config(path)?, path.to_path_buf()),
            None => load_config_from_dir(cwd)?,
        };
        debug!(path = %config_path.display(), "using configuration");
        Ok(Self {
            config,
            config_path,
        })
    }

    /// The repository root the configuration belongs to.
    ///
    /// For `.yamato/config/abv.metafile` this is the directory containing
    /// `.yamato`; otherwise the directory holding the config file.
    #[must_use]
    pub fn repository_root(&self) -> PathBuf {
        let depth = if self.config_path.ends_with(METAFILE_PATH) {
            Path::new(METAFILE_PATH).components().count()
        } else {
            1
        };
        self.config_path
            .ancestors()
            .nth(depth)
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    /// Namer configured from the naming section, restricted to the
    /// configured editors and projects.
    #[must_use]
    pub fn namer(&self) -> YamatoNamer {
        YamatoNamer::from_config(&self.config.naming)
            .with_editors(self.config.editors.iter().map(|e| e.version()))
            .with_projects(self.config.projects.iter().map(|p| p.name()))
    }
}

/// Run a parsed subcommand and return the text to print on success.
///
/// # Errors
///
/// Returns the [`CliError`] the command failed with.
pub fn run(command: &Commands, config: Option<&Path>, json: bool) -> Result<String, CliError> {
    let cwd = std::env::current_dir()
        .map_err(|e| CliError::from(Error::io(e, ".", "read current directory")))?;
    let workspace = Workspace::load(config, &cwd)?;

    match command {
        Commands::Generate {
            root,
            dry_run,
            check,
        } => {
            let options = GenerateOptions {
                root: root.clone(),
                dry_run: *dry_run,
                check: *check,
            };
            execute_generate(&workspace, &options)?.render(json)
        }
        Commands::Show { editor } => execute_show(&workspace, editor, json),
    }
}

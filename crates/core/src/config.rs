//! Generator configuration: which editors and projects make up the matrix,
//! and which editors run automatically on pull requests.

use crate::descriptor::{EditorDescriptor, ProjectDescriptor, RawEditor, RawProject};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory holding pipeline definitions, relative to the repository root.
pub const DEFAULT_YAMATO_DIR: &str = ".yamato";

/// Branch that pull requests must target to trigger ABV jobs.
pub const DEFAULT_TARGET_BRANCH: &str = "master";

/// Pull requests touching only files matching these globs do not trigger ABV jobs.
pub const DOCUMENTATION_GLOBS: [&str; 3] = ["**/*.md", "doc/**/*", "**/Documentation*/**/*"];

/// Configuration file names searched for, in order of preference.
#[must_use]
pub const fn config_file_names() -> &'static [&'static str] {
    &["yamato-gen.yml", "yamato-gen.yaml"]
}

/// Metafile location used when no dedicated config file exists.
pub const METAFILE_PATH: &str = ".yamato/config/abv.metafile";

/// Validated generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbvConfig {
    /// Editors to generate jobs for, in output order
    pub editors: Vec<EditorDescriptor>,
    /// Projects in the all-project sweep, in dependency order
    pub projects: Vec<ProjectDescriptor>,
    /// Editor versions whose ABV job triggers on pull requests
    pub abv_trigger_editors: BTreeSet<String>,
    /// Naming settings
    pub naming: NamingConfig,
    /// Pull-request trigger settings
    pub trigger: TriggerConfig,
}

/// Settings for the naming service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Directory holding pipeline files
    pub yamato_dir: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            yamato_dir: DEFAULT_YAMATO_DIR.to_string(),
        }
    }
}

/// Settings for the pull-request trigger expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Target branch of triggering pull requests
    pub target_branch: String,
    /// Globs whose exclusive modification skips the trigger
    pub skip_if_all_changes_match: Vec<String>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            target_branch: DEFAULT_TARGET_BRANCH.to_string(),
            skip_if_all_changes_match: DOCUMENTATION_GLOBS
                .iter()
                .map(|g| (*g).to_string())
                .collect(),
        }
    }
}

/// Configuration as written on disk, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    editors: Vec<RawEditor>,
    #[serde(default)]
    projects: Vec<RawProject>,
    #[serde(default)]
    abv_trigger_editors: Vec<String>,
    #[serde(default)]
    naming: NamingConfig,
    #[serde(default)]
    trigger: TriggerConfig,
}

impl AbvConfig {
    /// Parse and validate configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for malformed YAML,
    /// [`Error::MissingField`] for descriptors lacking required keys, and
    /// [`Error::Config`] for duplicates or an empty yamato directory.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(content)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let editors = raw
            .editors
            .into_iter()
            .map(EditorDescriptor::try_from)
            .collect::<Result<Vec<_>>>()?;
        let projects = raw
            .projects
            .into_iter()
            .map(ProjectDescriptor::try_from)
            .collect::<Result<Vec<_>>>()?;

        ensure_unique(editors.iter().map(|e| e.version()), "editor version")?;
        ensure_unique(projects.iter().map(|p| p.name()), "project name")?;

        if raw.naming.yamato_dir.trim().is_empty() {
            return Err(Error::config("naming.yamato_dir must not be empty"));
        }
        if raw.trigger.target_branch.trim().is_empty() {
            return Err(Error::config("trigger.target_branch must not be empty"));
        }

        let abv_trigger_editors: BTreeSet<String> = raw.abv_trigger_editors.into_iter().collect();
        for version in &abv_trigger_editors {
            if !editors.iter().any(|e| e.version() == version) {
                warn!(
                    version = %version,
                    "abv trigger editor is not among the configured editors; it will never match"
                );
            }
        }

        Ok(Self {
            editors,
            projects,
            abv_trigger_editors,
            naming: raw.naming,
            trigger: raw.trigger,
        })
    }

    /// Find an editor by version.
    #[must_use]
    pub fn editor(&self, version: &str) -> Option<&EditorDescriptor> {
        self.editors.iter().find(|e| e.version() == version)
    }
}

fn ensure_unique<'a>(values: impl Iterator<Item = &'a str>, what: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(Error::config(format!("duplicate {what} '{value}'")));
        }
    }
    Ok(())
}

/// Load configuration from a file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or any error from
/// [`AbvConfig::from_yaml_str`]. Config errors carry the file path.
pub fn load_config(path: &Path) -> Result<AbvConfig> {
    info!(path = %path.display(), "loading config");

    let content = std::fs::read_to_string(path).map_err(|e| Error::io(e, path, "read"))?;
    let config = AbvConfig::from_yaml_str(&content).map_err(|err| match err {
        Error::Config { message, .. } => Error::config_at(message, path),
        Error::Serialization { message } => {
            Error::config_at(format!("invalid YAML: {message}"), path)
        }
        other => other,
    })?;

    debug!(
        path = %path.display(),
        editors = config.editors.len(),
        projects = config.projects.len(),
        "config loaded and validated"
    );
    Ok(config)
}

/// Find a configuration file in `start_dir` or its parents.
///
/// At each directory level the search checks the names from
/// [`config_file_names`], then [`METAFILE_PATH`]. The first match wins.
#[must_use]
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let candidate = current.join(name);
            if candidate.is_file() {
                info!(path = %candidate.display(), "found config file");
                return Some(candidate);
            }
        }

        let metafile = current.join(METAFILE_PATH);
        if metafile.is_file() {
            info!(path = %metafile.display(), "found abv metafile");
            return Some(metafile);
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration by searching from `dir` upwards.
///
/// Returns the configuration together with the path it was read from.
///
/// # Errors
///
/// Returns [`Error::Config`] if no configuration file exists, or any load error.
pub fn load_config_from_dir(dir: &Path) -> Result<(AbvConfig, PathBuf)> {
    let path = find_config(dir).ok_or_else(|| {
        Error::config_at(
            format!(
                "no configuration found (looked for {} or {METAFILE_PATH})",
                config_file_names().join(", ")
            ),
            dir,
        )
    })?;
    let config = load_config(&path)?;
    Ok((config, path))
}

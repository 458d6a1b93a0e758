//! Naming service for generated pipeline files.
//!
//! Every job identifier and pipeline file path in the generated YAML comes
//! from a [`Namer`]. Job assembly receives the namer as a parameter, so tests
//! and alternative repository layouts can substitute their own.
//!
//! # Example
//!
//! ```rust
//! use yamato_naming::{Namer, YamatoNamer};
//!
//! let namer = YamatoNamer::new();
//! assert_eq!(namer.packages_filepath(), ".yamato/_packages.yml");
//! assert_eq!(
//!     namer.project_job_id_all("Boat", "2022.3")?,
//!     "All_Boat_2022.3"
//! );
//! # Ok::<(), yamato_core::Error>(())
//! ```
//!
//! # Default layout
//!
//! | Function | Result |
//! |----------|--------|
//! | `abv_filepath()` | `.yamato/_abv.yml` |
//! | `abv_job_id_all_project_ci(v)` | `all_project_ci_<v>` |
//! | `packages_filepath()` | `.yamato/_packages.yml` |
//! | `package_job_id_test_all(v)` | `all_package_ci_<v>` |
//! | `project_filepath_all(p)` | `.yamato/all-<p lowercased>.yml` |
//! | `project_job_id_all(p, v)` | `All_<p>_<v>` |

use std::collections::BTreeSet;
use yamato_core::config::{DEFAULT_YAMATO_DIR, NamingConfig};
use yamato_core::{Error, Result};

const EDITOR_VERSION: &str = "editor version";
const PROJECT_NAME: &str = "project name";

/// Deterministic identifiers and paths for pipeline jobs.
///
/// Implementations must be pure: the same key always yields the same name.
pub trait Namer {
    /// Path of the ABV pipeline file.
    fn abv_filepath(&self) -> String;

    /// Job id of the all-project CI job for an editor version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNamingKey`] if the version cannot be resolved.
    fn abv_job_id_all_project_ci(&self, editor_version: &str) -> Result<String>;

    /// Path of the pipeline file holding package test jobs.
    fn packages_filepath(&self) -> String;

    /// Job id of the "test all packages" job for an editor version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNamingKey`] if the version cannot be resolved.
    fn package_job_id_test_all(&self, editor_version: &str) -> Result<String>;

    /// Path of the pipeline file holding a project's "all" jobs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNamingKey`] if the project cannot be resolved.
    fn project_filepath_all(&self, project_name: &str) -> Result<String>;

    /// Job id of a project's "all" job for an editor version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNamingKey`] if either key cannot be resolved.
    fn project_job_id_all(&self, project_name: &str, editor_version: &str) -> Result<String>;
}

/// The standard `.yamato` directory layout.
///
/// By default any well-formed key resolves. After [`with_editors`] or
/// [`with_projects`], keys outside the registered set fail with
/// [`Error::UnknownNamingKey`].
///
/// [`with_editors`]: YamatoNamer::with_editors
/// [`with_projects`]: YamatoNamer::with_projects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamatoNamer {
    yamato_dir: String,
    editors: Option<BTreeSet<String>>,
    projects: Option<BTreeSet<String>>,
}

impl Default for YamatoNamer {
    fn default() -> Self {
        Self::new()
    }
}

impl YamatoNamer {
    /// Create a namer rooted at `.yamato`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            yamato_dir: DEFAULT_YAMATO_DIR.to_string(),
            editors: None,
            projects: None,
        }
    }

    /// Create a namer from the `naming` section of the configuration.
    #[must_use]
    pub fn from_config(config: &NamingConfig) -> Self {
        Self::new().with_yamato_dir(&config.yamato_dir)
    }

    /// Set the directory holding pipeline files.
    ///
    /// Trailing slashes are dropped.
    #[must_use]
    pub fn with_yamato_dir(mut self, dir: impl AsRef<str>) -> Self {
        self.yamato_dir = dir.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Restrict editor versions to a known set.
    #[must_use]
    pub fn with_editors(mut self, versions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.editors = Some(versions.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict project names to a known set.
    #[must_use]
    pub fn with_projects(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.projects = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// The directory holding pipeline files.
    #[must_use]
    pub fn yamato_dir(&self) -> &str {
        &self.yamato_dir
    }

    fn file(&self, name: &str) -> String {
        format!("{}/{name}", self.yamato_dir)
    }

    fn editor<'a>(&self, version: &'a str) -> Result<&'a str> {
        resolve(version, EDITOR_VERSION, self.editors.as_ref())
    }

    fn project<'a>(&self, name: &'a str) -> Result<&'a str> {
        resolve(name, PROJECT_NAME, self.projects.as_ref())
    }
}

/// Check a key is usable inside job ids and file names.
///
/// `#` separates file path from job anchor in dependency paths, and `/`
/// would escape the pipeline directory.
fn resolve<'a>(
    key: &'a str,
    kind: &'static str,
    known: Option<&BTreeSet<String>>,
) -> Result<&'a str> {
    if key.is_empty() {
        return Err(Error::unknown_naming_key(kind, key, "empty key"));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(Error::unknown_naming_key(kind, key, "contains whitespace"));
    }
    if let Some(c) = key.chars().find(|c| matches!(c, '#' | '/' | '\\')) {
        let reason = format!("contains reserved character '{c}'");
        return Err(Error::unknown_naming_key(kind, key, reason));
    }
    if let Some(known) = known
        && !known.contains(key)
    {
        tracing::debug!(kind, key, "naming key not registered");
        return Err(Error::unknown_naming_key(kind, key, "not registered"));
    }
    Ok(key)
}

impl Namer for YamatoNamer {
    fn abv_filepath(&self) -> String {
        self.file("_abv.yml")
    }

    fn abv_job_id_all_project_ci(&self, editor_version: &str) -> Result<String> {
        let version = self.editor(editor_version)?;
        Ok(format!("all_project_ci_{version}"))
    }

    fn packages_filepath(&self) -> String {
        self.file("_packages.yml")
    }

    fn package_job_id_test_all(&self, editor_version: &str) -> Result<String> {
        let version = self.editor(editor_version)?;
        Ok(format!("all_package_ci_{version}"))
    }

    fn project_filepath_all(&self, project_name: &str) -> Result<String> {
        let name = self.project(project_name)?;
        Ok(self.file(&format!("all-{}.yml", name.to_lowercase())))
    }

    fn project_job_id_all(&self, project_name: &str, editor_version: &str) -> Result<String> {
        let name = self.project(project_name)?;
        let version = self.editor(editor_version)?;
        Ok(format!("All_{name}_{version}"))
    }
}

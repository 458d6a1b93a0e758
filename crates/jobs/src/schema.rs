//! Yamato Pipeline Schema Types
//!
//! Data structures for the job definitions written to `.yamato/*.yml` files.
//! A pipeline file is a top-level mapping from job id to job definition.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use yamato_core::{Error, Result};

/// Variable carrying the editor revision that downstream tooling should pin.
pub const CUSTOM_REVISION_VAR: &str = "CUSTOM_REVISION";

/// A single job definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescription {
    /// Display name of the job
    pub name: String,

    /// Job variables
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, String>,

    /// Upstream jobs gating this one, in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyReference>,

    /// Automatic trigger configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Triggers>,
}

impl JobDescription {
    /// The custom revision variable, if set.
    #[must_use]
    pub fn custom_revision(&self) -> Option<&str> {
        self.variables.get(CUSTOM_REVISION_VAR).map(String::as_str)
    }

    /// The trigger expression, if the job triggers on its own.
    #[must_use]
    pub fn trigger_expression(&self) -> Option<&str> {
        self.triggers.as_ref().and_then(|t| t.expression.as_deref())
    }

    /// Serialize this job to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if YAML serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Error::from)
    }
}

/// Reference to another job whose completion gates this one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReference {
    /// `<pipeline file>#<job id>`
    pub path: String,

    /// When the upstream job is rerun
    pub rerun: RerunPolicy,
}

impl DependencyReference {
    /// Reference `job_id` in pipeline file `file`.
    pub fn new(file: impl AsRef<str>, job_id: impl AsRef<str>, rerun: RerunPolicy) -> Self {
        Self {
            path: format!("{}#{}", file.as_ref(), job_id.as_ref()),
            rerun,
        }
    }

    /// Reference a job that is always rerun.
    pub fn always(file: impl AsRef<str>, job_id: impl AsRef<str>) -> Self {
        Self::new(file, job_id, RerunPolicy::Always)
    }

    /// The pipeline file part of the path.
    #[must_use]
    pub fn file(&self) -> &str {
        self.path
            .split_once('#')
            .map_or(&self.path, |(file, _)| file)
    }

    /// The job id part of the path.
    #[must_use]
    pub fn job_id(&self) -> Option<&str> {
        self.path.split_once('#').map(|(_, job)| job)
    }
}

/// Rerun policy of a dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RerunPolicy {
    /// Rerun the upstream job every time
    #[default]
    Always,
    /// Rerun only when the revision changed
    OnNewRevision,
}

impl std::fmt::Display for RerunPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => write!(f, "always"),
            Self::OnNewRevision => write!(f, "on-new-revision"),
        }
    }
}

/// Automatic trigger configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Triggers {
    /// Condition evaluated by the CI orchestrator on repository events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl Triggers {
    /// Trigger on the given expression.
    pub fn on_expression(expression: impl Into<String>) -> Self {
        Self {
            expression: Some(expression.into()),
        }
    }
}

/// An ordered set of jobs making up one pipeline file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobFile {
    jobs: IndexMap<String, JobDescription>,
}

impl JobFile {
    /// Create an empty pipeline file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateJob`] if `job_id` is already present.
    pub fn insert(&mut self, job_id: impl Into<String>, job: JobDescription) -> Result<()> {
        let job_id = job_id.into();
        if self.jobs.contains_key(&job_id) {
            return Err(Error::DuplicateJob { job_id });
        }
        self.jobs.insert(job_id, job);
        Ok(())
    }

    /// Look up a job by id.
    #[must_use]
    pub fn get(&self, job_id: &str) -> Option<&JobDescription> {
        self.jobs.get(job_id)
    }

    /// Iterate over `(job id, job)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JobDescription)> {
        self.jobs.iter().map(|(id, job)| (id.as_str(), job))
    }

    /// Number of jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the file holds no jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Serialize the whole file to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if YAML serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Error::from)
    }
}

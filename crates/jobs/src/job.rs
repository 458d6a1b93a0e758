//! Builder for [`JobDescription`].

use crate::schema::{CUSTOM_REVISION_VAR, DependencyReference, JobDescription, Triggers};
use indexmap::IndexMap;
use yamato_core::{Error, Result};

/// Builder for a single pipeline job.
///
/// # Example
///
/// ```rust
/// use yamato_jobs::{DependencyReference, YmlJob};
///
/// let job = YmlJob::new()
///     .name("_ABV for SRP repository - trunk")
///     .dependency(DependencyReference::always(".yamato/_packages.yml", "all_package_ci_trunk"))
///     .custom_revision_variable("trunk")
///     .build()?;
///
/// assert_eq!(job.custom_revision(), Some("trunk"));
/// # Ok::<(), yamato_core::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct YmlJob {
    name: Option<String>,
    variables: IndexMap<String, String>,
    dependencies: Vec<DependencyReference>,
    trigger_expression: Option<String>,
}

impl YmlJob {
    /// Create an empty job builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append one dependency.
    #[must_use]
    pub fn dependency(mut self, dependency: DependencyReference) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Append dependencies, keeping their order.
    #[must_use]
    pub fn dependencies(
        mut self,
        dependencies: impl IntoIterator<Item = DependencyReference>,
    ) -> Self {
        self.dependencies.extend(dependencies);
        self
    }

    /// Set a job variable.
    #[must_use]
    pub fn variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Pin the editor revision for downstream tooling.
    #[must_use]
    pub fn custom_revision_variable(self, revision: impl Into<String>) -> Self {
        self.variable(CUSTOM_REVISION_VAR, revision)
    }

    /// Trigger the job automatically when `expression` holds.
    #[must_use]
    pub fn trigger_expression(mut self, expression: impl Into<String>) -> Self {
        self.trigger_expression = Some(expression.into());
        self
    }

    /// Set or clear the trigger expression.
    #[must_use]
    pub fn trigger_expression_opt(mut self, expression: Option<impl Into<String>>) -> Self {
        self.trigger_expression = expression.map(Into::into);
        self
    }

    /// Finish the job.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if no name was set.
    pub fn build(self) -> Result<JobDescription> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| Error::missing_field("job", "name"))?;

        Ok(JobDescription {
            name,
            variables: self.variables,
            dependencies: self.dependencies,
            triggers: self.trigger_expression.map(Triggers::on_expression),
        })
    }
}

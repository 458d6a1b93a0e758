//! Editor and project descriptors.
//!
//! Configuration files describe editors and projects as loose mappings that
//! may carry extra keys. The `Raw*` types mirror that shape; converting them
//! into descriptors is the validation boundary where absent keys fail with
//! [`Error::MissingField`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// An editor release that parameterizes job identifiers and revision variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EditorDescriptor {
    version: String,
}

impl EditorDescriptor {
    /// Create a descriptor for the given editor version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if the version is blank.
    pub fn new(version: impl Into<String>) -> Result<Self> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(Error::missing_field("editor", "version"));
        }
        Ok(Self { version })
    }

    /// The editor version string (e.g. `2022.3`, `trunk`).
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// A project taking part in the all-project test sweep.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectDescriptor {
    name: String,
}

impl ProjectDescriptor {
    /// Create a descriptor for the given project name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if the name is blank.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::missing_field("project", "name"));
        }
        Ok(Self { name })
    }

    /// The project name (e.g. `Universal`, `Boat`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Editor entry as it appears in a configuration file.
///
/// Plain scalars keep their source text, so an unquoted `2021.10` stays
/// `"2021.10"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEditor {
    /// Editor version; required
    #[serde(default)]
    pub version: Option<String>,
}

/// Project entry as it appears in a configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProject {
    /// Project name; required
    #[serde(default)]
    pub name: Option<String>,
}

impl TryFrom<RawEditor> for EditorDescriptor {
    type Error = Error;

    fn try_from(raw: RawEditor) -> Result<Self> {
        let version = raw
            .version
            .ok_or_else(|| Error::missing_field("editor", "version"))?;
        Self::new(version)
    }
}

impl TryFrom<RawProject> for ProjectDescriptor {
    type Error = Error;

    fn try_from(raw: RawProject) -> Result<Self> {
        let name = raw
            .name
            .ok_or_else(|| Error::missing_field("project", "name"))?;
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_editor(yaml: &str) -> RawEditor {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_editor_from_raw() {
        let editor = EditorDescriptor::try_from(raw_editor("version: '2022.3'")).unwrap();
        assert_eq!(editor.version(), "2022.3");
    }

    #[test]
    fn test_editor_extra_keys_ignored() {
        let editor =
            EditorDescriptor::try_from(raw_editor("version: trunk\neditor_pinning: true")).unwrap();
        assert_eq!(editor.version(), "trunk");
    }

    #[test]
    fn test_editor_missing_version() {
        let err = EditorDescriptor::try_from(raw_editor("rerun: always")).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                entity: "editor",
                field: "version"
            }
        ));
    }

    #[test]
    fn test_editor_null_version() {
        let err = EditorDescriptor::try_from(raw_editor("version: ~")).unwrap_err();
        assert!(matches!(err, Error::MissingField { .. }));
    }

    #[test]
    fn test_editor_unquoted_number_keeps_text() {
        let editor = EditorDescriptor::try_from(raw_editor("version: 2021.10")).unwrap();
        assert_eq!(editor.version(), "2021.10");
    }

    #[test]
    fn test_blank_values_are_missing() {
        assert!(matches!(
            EditorDescriptor::new("  "),
            Err(Error::MissingField { .. })
        ));
        assert!(matches!(
            ProjectDescriptor::new(""),
            Err(Error::MissingField {
                entity: "project",
                field: "name"
            })
        ));
    }

    #[test]
    fn test_project_from_raw() {
        let raw: RawProject = serde_yaml::from_str("name: Boat").unwrap();
        let project = ProjectDescriptor::try_from(raw).unwrap();
        assert_eq!(project.name(), "Boat");
    }

    #[test]
    fn test_project_missing_name() {
        let raw = RawProject::default();
        let err = ProjectDescriptor::try_from(raw).unwrap_err();
        assert_eq!(err.to_string(), "project is missing required field 'name'");
    }
}

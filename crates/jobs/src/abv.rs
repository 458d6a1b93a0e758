//! ABV (Automated Build Verification) jobs.
//!
//! The all-project CI job for an editor version depends on the "test all
//! packages" job and on every project's "all" job for that version. Editors
//! listed as ABV trigger editors additionally run it on pull requests.

use crate::job::YmlJob;
use crate::schema::{DependencyReference, JobDescription};
use crate::trigger::TriggerExpression;
use std::collections::BTreeSet;
use tracing::debug;
use yamato_core::{EditorDescriptor, ProjectDescriptor, Result, TriggerConfig};
use yamato_naming::Namer;

/// Display name of the all-project CI job for `editor_version`.
#[must_use]
pub fn all_project_ci_name(editor_version: &str) -> String {
    format!("_ABV for SRP repository - {editor_version}")
}

/// An assembled all-project CI job together with its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbvAllProjectCiJob {
    /// Job id within the ABV pipeline file
    pub job_id: String,
    /// The job definition
    pub job: JobDescription,
}

/// Assembles all-project CI jobs.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeSet;
/// use yamato_core::{EditorDescriptor, ProjectDescriptor};
/// use yamato_jobs::AllProjectCiAssembler;
/// use yamato_naming::YamatoNamer;
///
/// let namer = YamatoNamer::new();
/// let assembler = AllProjectCiAssembler::new(&namer);
/// let editor = EditorDescriptor::new("2022.3")?;
/// let projects = [ProjectDescriptor::new("Boat")?];
/// let triggers = BTreeSet::from(["2022.3".to_string()]);
///
/// let abv = assembler.build(&editor, &projects, &triggers)?;
/// assert_eq!(abv.job_id, "all_project_ci_2022.3");
/// assert_eq!(abv.job.dependencies.len(), 2);
/// assert!(abv.job.trigger_expression().is_some());
/// # Ok::<(), yamato_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AllProjectCiAssembler<'a, N: Namer + ?Sized> {
    namer: &'a N,
    trigger: TriggerExpression,
}

impl<'a, N: Namer + ?Sized> AllProjectCiAssembler<'a, N> {
    /// Create an assembler using the default ABV trigger expression.
    pub fn new(namer: &'a N) -> Self {
        Self {
            namer,
            trigger: TriggerExpression::abv_default(),
        }
    }

    /// Use branch and skip globs from configuration for the trigger expression.
    #[must_use]
    pub fn with_trigger_config(mut self, config: &TriggerConfig) -> Self {
        self.trigger = TriggerExpression::from_config(config);
        self
    }

    /// Build the all-project CI job for `editor`.
    ///
    /// Dependencies are the package test job first, then one entry per
    /// project in the given order. The trigger expression is set iff the
    /// editor version is in `trigger_editors`.
    ///
    /// # Errors
    ///
    /// Propagates [`yamato_core::Error::UnknownNamingKey`] from the namer.
    /// No job is produced on error.
    pub fn build(
        &self,
        editor: &EditorDescriptor,
        projects: &[ProjectDescriptor],
        trigger_editors: &BTreeSet<String>,
    ) -> Result<AbvAllProjectCiJob> {
        let version = editor.version();
        let job_id = self.namer.abv_job_id_all_project_ci(version)?;

        let mut dependencies = Vec::with_capacity(projects.len() + 1);
        dependencies.push(DependencyReference::always(
            self.namer.packages_filepath(),
            self.namer.package_job_id_test_all(version)?,
        ));
        for project in projects {
            dependencies.push(DependencyReference::always(
                self.namer.project_filepath_all(project.name())?,
                self.namer.project_job_id_all(project.name(), version)?,
            ));
        }

        let triggered = trigger_editors.contains(version);
        let job = YmlJob::new()
            .name(all_project_ci_name(version))
            .dependencies(dependencies)
            .custom_revision_variable(version)
            .trigger_expression_opt(triggered.then(|| self.trigger.to_string()))
            .build()?;

        debug!(
            job_id = %job_id,
            dependencies = job.dependencies.len(),
            triggered,
            "assembled all-project CI job"
        );

        Ok(AbvAllProjectCiJob { job_id, job })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use yamato_core::Error;
    use yamato_naming::YamatoNamer;

    fn projects(names: &[&str]) -> Vec<ProjectDescriptor> {
        names
            .iter()
            .map(|n| ProjectDescriptor::new(*n).unwrap())
            .collect()
    }

    fn triggers(versions: &[&str]) -> BTreeSet<String> {
        versions.iter().map(|v| (*v).to_string()).collect()
    }

    fn dependency_paths(job: &JobDescription) -> Vec<&str> {
        job.dependencies.iter().map(|d| d.path.as_str()).collect()
    }

    #[test]
    fn test_boat_example_with_trigger() {
        let namer = YamatoNamer::new();
        let editor = EditorDescriptor::new("2022.3").unwrap();
        let abv = AllProjectCiAssembler::new(&namer)
            .build(&editor, &projects(&["Boat"]), &triggers(&["2022.3"]))
            .unwrap();

        assert_eq!(abv.job_id, "all_project_ci_2022.3");
        assert_eq!(abv.job.name, "_ABV for SRP repository - 2022.3");
        assert_eq!(
            dependency_paths(&abv.job),
            [
                ".yamato/_packages.yml#all_package_ci_2022.3",
                ".yamato/all-boat.yml#All_Boat_2022.3",
            ]
        );
        assert_eq!(abv.job.custom_revision(), Some("2022.3"));

        let expression = abv.job.trigger_expression().unwrap();
        assert!(expression.contains(r#"pull_request.target eq "master""#));
        assert!(expression.contains("NOT pull_request.draft"));
        assert!(expression.contains(r#""**/*.md""#));
        assert!(expression.contains("Documentation"));
    }

    #[test]
    fn test_boat_example_without_trigger() {
        let namer = YamatoNamer::new();
        let editor = EditorDescriptor::new("2022.3").unwrap();
        let assembler = AllProjectCiAssembler::new(&namer);

        let with = assembler
            .build(&editor, &projects(&["Boat"]), &triggers(&["2022.3"]))
            .unwrap();
        let without = assembler
            .build(&editor, &projects(&["Boat"]), &BTreeSet::new())
            .unwrap();

        assert!(without.job.triggers.is_none());
        let mut expected = with.job;
        expected.triggers = None;
        assert_eq!(without.job, expected);
    }

    #[test]
    fn test_all_dependencies_rerun_always() {
        let namer = YamatoNamer::new();
        let editor = EditorDescriptor::new("trunk").unwrap();
        let abv = AllProjectCiAssembler::new(&namer)
            .build(&editor, &projects(&["Universal", "HDRP"]), &BTreeSet::new())
            .unwrap();

        assert!(
            abv.job
                .dependencies
                .iter()
                .all(|d| d.rerun == crate::schema::RerunPolicy::Always)
        );
    }

    #[test]
    fn test_project_order_is_preserved() {
        let namer = YamatoNamer::new();
        let editor = EditorDescriptor::new("trunk").unwrap();
        let assembler = AllProjectCiAssembler::new(&namer);
        let none = BTreeSet::new();

        let ab = assembler
            .build(&editor, &projects(&["A", "B"]), &none)
            .unwrap();
        let ba = assembler
            .build(&editor, &projects(&["B", "A"]), &none)
            .unwrap();

        assert_eq!(
            dependency_paths(&ab.job),
            [
                ".yamato/_packages.yml#all_package_ci_trunk",
                ".yamato/all-a.yml#All_A_trunk",
                ".yamato/all-b.yml#All_B_trunk",
            ]
        );
        assert_eq!(
            dependency_paths(&ba.job),
            [
                ".yamato/_packages.yml#all_package_ci_trunk",
                ".yamato/all-b.yml#All_B_trunk",
                ".yamato/all-a.yml#All_A_trunk",
            ]
        );
    }

    #[test]
    fn test_no_projects() {
        let namer = YamatoNamer::new();
        let editor = EditorDescriptor::new("trunk").unwrap();
        let abv = AllProjectCiAssembler::new(&namer)
            .build(&editor, &[], &BTreeSet::new())
            .unwrap();
        assert_eq!(
            dependency_paths(&abv.job),
            [".yamato/_packages.yml#all_package_ci_trunk"]
        );
    }

    #[test]
    fn test_trigger_config_override() {
        let namer = YamatoNamer::new();
        let editor = EditorDescriptor::new("trunk").unwrap();
        let config = TriggerConfig {
            target_branch: "main".to_string(),
            skip_if_all_changes_match: vec![],
        };
        let abv = AllProjectCiAssembler::new(&namer)
            .with_trigger_config(&config)
            .build(&editor, &[], &triggers(&["trunk"]))
            .unwrap();
        assert_eq!(
            abv.job.trigger_expression(),
            Some(r#"pull_request.target eq "main" AND NOT pull_request.draft"#)
        );
    }

    #[test]
    fn test_unknown_naming_key_propagates() {
        let namer = YamatoNamer::new().with_projects(["Boat"]);
        let editor = EditorDescriptor::new("trunk").unwrap();
        let err = AllProjectCiAssembler::new(&namer)
            .build(&editor, &projects(&["Boat", "Ship"]), &BTreeSet::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownNamingKey { ref key, .. } if key == "Ship"));
    }

    #[test]
    fn test_works_with_dyn_namer() {
        let namer: Box<dyn Namer> = Box::new(YamatoNamer::new().with_yamato_dir("ci"));
        let editor = EditorDescriptor::new("trunk").unwrap();
        let abv = AllProjectCiAssembler::new(namer.as_ref())
            .build(&editor, &[], &BTreeSet::new())
            .unwrap();
        assert_eq!(
            dependency_paths(&abv.job),
            ["ci/_packages.yml#all_package_ci_trunk"]
        );
    }

    #[test]
    fn test_serialized_form() {
        let namer = YamatoNamer::new();
        let editor = EditorDescriptor::new("trunk").unwrap();
        let abv = AllProjectCiAssembler::new(&namer)
            .build(&editor, &projects(&["Boat"]), &triggers(&["trunk"]))
            .unwrap();

        let yaml = abv.job.to_yaml().unwrap();
        assert!(yaml.starts_with("name: _ABV for SRP repository - trunk\n"));
        assert!(yaml.contains("CUSTOM_REVISION: trunk"));
        assert!(yaml.contains("- path: .yamato/all-boat.yml#All_Boat_trunk"));
        assert!(yaml.contains("triggers:\n  expression:"));
    }

    proptest! {
        #[test]
        fn prop_trigger_iff_member(
            version in "[a-z0-9.]{1,8}",
            others in proptest::collection::btree_set("[a-z0-9.]{1,8}", 0..4),
            include in any::<bool>(),
        ) {
            let namer = YamatoNamer::new();
            let editor = EditorDescriptor::new(version.clone()).unwrap();
            let mut trigger_editors = others;
            if include {
                trigger_editors.insert(version.clone());
            }
            let abv = AllProjectCiAssembler::new(&namer)
                .build(&editor, &[], &trigger_editors)
                .unwrap();
            prop_assert_eq!(abv.job.triggers.is_some(), trigger_editors.contains(&version));
        }

        #[test]
        fn prop_dependency_count_and_head(
            names in proptest::collection::vec("[A-Za-z][A-Za-z0-9]{0,8}", 0..8),
        ) {
            let namer = YamatoNamer::new();
            let editor = EditorDescriptor::new("trunk").unwrap();
            let projects: Vec<_> = names
                .iter()
                .map(|n| ProjectDescriptor::new(n.clone()).unwrap())
                .collect();
            let abv = AllProjectCiAssembler::new(&namer)
                .build(&editor, &projects, &BTreeSet::new())
                .unwrap();

            prop_assert_eq!(abv.job.dependencies.len(), names.len() + 1);
            prop_assert_eq!(
                abv.job.dependencies[0].path.as_str(),
                ".yamato/_packages.yml#all_package_ci_trunk"
            );
            for (dep, name) in abv.job.dependencies[1..].iter().zip(&names) {
                let expected_job = format!("All_{name}_trunk");
                prop_assert_eq!(dep.job_id(), Some(expected_job.as_str()));
            }
        }

        #[test]
        fn prop_idempotent(
            version in "[a-z0-9.]{1,8}",
            names in proptest::collection::vec("[A-Za-z]{1,8}", 0..5),
            triggered in any::<bool>(),
        ) {
            let namer = YamatoNamer::new();
            let editor = EditorDescriptor::new(version.clone()).unwrap();
            let projects: Vec<_> = names
                .iter()
                .map(|n| ProjectDescriptor::new(n.clone()).unwrap())
                .collect();
            let trigger_editors: BTreeSet<String> = if triggered {
                BTreeSet::from([version])
            } else {
                BTreeSet::new()
            };
            let assembler = AllProjectCiAssembler::new(&namer);

            let first = assembler.build(&editor, &projects, &trigger_editors).unwrap();
            let second = assembler.build(&editor, &projects, &trigger_editors).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}

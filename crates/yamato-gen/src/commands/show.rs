//! `show` command: print one editor's all-project CI job.

use super::Workspace;
use crate::cli::{CliError, OkEnvelope};
use serde::Serialize;
use yamato_jobs::{AllProjectCiAssembler, JobDescription, JobFile};

#[derive(Serialize)]
struct ShownJob<'a> {
    job_id: &'a str,
    job: &'a JobDescription,
}

/// Assemble the all-project CI job for `editor` and render it.
///
/// Text output is a YAML mapping with the job id as its only key.
///
/// # Errors
///
/// Returns a configuration error if the editor is not configured or the job
/// cannot be assembled.
pub fn execute_show(workspace: &Workspace, editor: &str, json: bool) -> Result<String, CliError> {
    let config = &workspace.config;
    let descriptor = config.editor(editor).ok_or_else(|| {
        let known: Vec<_> = config.editors.iter().map(|e| e.version()).collect();
        CliError::config_with_help(
            format!("editor '{editor}' is not configured"),
            format!("Configured editors: {}", known.join(", ")),
        )
    })?;

    let namer = workspace.namer();
    let abv = AllProjectCiAssembler::new(&namer)
        .with_trigger_config(&config.trigger)
        .build(descriptor, &config.projects, &config.abv_trigger_editors)?;

    if json {
        let shown = ShownJob {
            job_id: &abv.job_id,
            job: &abv.job,
        };
        return serde_json::to_string(&OkEnvelope::new(shown))
            .map_err(|e| CliError::other(format!("failed to serialize output: {e}")));
    }

    let mut file = JobFile::new();
    file.insert(abv.job_id, abv.job)?;
    Ok(file.to_yaml()?.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use yamato_core::AbvConfig;

    fn workspace() -> Workspace {
        let config = AbvConfig::from_yaml_str(
            r#"
editors:
  - version: "2022.3"
  - version: trunk
projects:
  - name: Boat
abv_trigger_editors: ["trunk"]
"#,
        )
        .unwrap();
        Workspace {
            config,
            config_path: PathBuf::from("yamato-gen.yml"),
        }
    }

    #[test]
    fn test_show_yaml() {
        let out = execute_show(&workspace(), "2022.3", false).unwrap();
        assert!(out.starts_with("all_project_ci_2022.3:\n"));
        assert!(!out.contains("triggers"));

        let file: JobFile = serde_yaml::from_str(&out).unwrap();
        let job = file.get("all_project_ci_2022.3").unwrap();
        assert_eq!(job.name, "_ABV for SRP repository - 2022.3");
        assert_eq!(job.custom_revision(), Some("2022.3"));
        let paths: Vec<_> = job.dependencies.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                ".yamato/_packages.yml#all_package_ci_2022.3",
                ".yamato/all-boat.yml#All_Boat_2022.3",
            ]
        );
    }

    #[test]
    fn test_show_trigger_editor() {
        let out = execute_show(&workspace(), "trunk", false).unwrap();
        assert!(out.contains("triggers:"));
        assert!(out.contains(r#"pull_request.target eq "master" AND NOT pull_request.draft"#));
    }

    #[test]
    fn test_show_json() {
        let out = execute_show(&workspace(), "trunk", true).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["data"]["job_id"], "all_project_ci_trunk");
        assert_eq!(json["data"]["job"]["variables"]["CUSTOM_REVISION"], "trunk");
    }

    #[test]
    fn test_show_unknown_editor() {
        let err = execute_show(&workspace(), "6000.0", false).unwrap_err();
        match err {
            CliError::Config { message, help } => {
                assert!(message.contains("'6000.0'"));
                assert_eq!(help.as_deref(), Some("Configured editors: 2022.3, trunk"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

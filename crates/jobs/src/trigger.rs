//! Trigger expressions.
//!
//! The CI orchestrator evaluates trigger expressions on repository events.
//! This module only produces them; the output is an opaque string. The subset
//! of the expression language generated here is:
//!
//! ```text
//! expr    := clause (" AND " clause)*
//! clause  := "pull_request.target eq " quoted
//!          | "NOT pull_request.draft"
//!          | "NOT pull_request.push.changes.all match " list
//! list    := "[" quoted (", " quoted)* "]"
//! quoted  := '"' text '"'        ; `"` and `\` escaped with `\`
//! ```

use std::fmt;
use yamato_core::TriggerConfig;

pub use yamato_core::config::{DEFAULT_TARGET_BRANCH, DOCUMENTATION_GLOBS};

/// Builder for a pull-request trigger expression.
///
/// ```rust
/// use yamato_jobs::trigger::{TriggerExpression, DOCUMENTATION_GLOBS};
///
/// let expr = TriggerExpression::pull_request_to("master")
///     .exclude_drafts()
///     .skip_if_all_changes_match(DOCUMENTATION_GLOBS);
/// assert!(expr.to_string().starts_with(r#"pull_request.target eq "master" AND"#));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerExpression {
    clauses: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    TargetBranch(String),
    NotDraft,
    NotAllChangesMatch(Vec<String>),
}

impl TriggerExpression {
    /// Fire on pull requests targeting `branch`.
    #[must_use]
    pub fn pull_request_to(branch: impl Into<String>) -> Self {
        Self {
            clauses: vec![Clause::TargetBranch(branch.into())],
        }
    }

    /// Do not fire on draft pull requests.
    #[must_use]
    pub fn exclude_drafts(mut self) -> Self {
        self.clauses.push(Clause::NotDraft);
        self
    }

    /// Do not fire when every changed file matches one of `globs`.
    ///
    /// An empty glob list adds nothing.
    #[must_use]
    pub fn skip_if_all_changes_match(
        mut self,
        globs: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let globs: Vec<String> = globs.into_iter().map(Into::into).collect();
        if !globs.is_empty() {
            self.clauses.push(Clause::NotAllChangesMatch(globs));
        }
        self
    }

    /// The ABV trigger: non-draft pull requests to `master` that touch more
    /// than documentation.
    #[must_use]
    pub fn abv_default() -> Self {
        Self::from_config(&TriggerConfig::default())
    }

    /// The ABV trigger with branch and skip globs taken from configuration.
    #[must_use]
    pub fn from_config(config: &TriggerConfig) -> Self {
        Self::pull_request_to(config.target_branch.clone())
            .exclude_drafts()
            .skip_if_all_changes_match(config.skip_if_all_changes_match.iter().cloned())
    }
}

impl fmt::Display for TriggerExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            match clause {
                Clause::TargetBranch(branch) => {
                    write!(f, "pull_request.target eq {}", Quoted(branch))?;
                }
                Clause::NotDraft => f.write_str("NOT pull_request.draft")?,
                Clause::NotAllChangesMatch(globs) => {
                    f.write_str("NOT pull_request.push.changes.all match [")?;
                    for (j, glob) in globs.iter().enumerate() {
                        if j > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", Quoted(glob))?;
                    }
                    f.write_str("]")?;
                }
            }
        }
        Ok(())
    }
}

struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            if matches!(c, '"' | '\\') {
                f.write_str("\\")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABV_EXPRESSION: &str = r#"pull_request.target eq "master" AND NOT pull_request.draft AND NOT pull_request.push.changes.all match ["**/*.md", "doc/**/*", "**/Documentation*/**/*"]"#;

    #[test]
    fn test_abv_default_expression() {
        assert_eq!(TriggerExpression::abv_default().to_string(), ABV_EXPRESSION);
    }

    #[test]
    fn test_builder_matches_default() {
        let expr = TriggerExpression::pull_request_to(DEFAULT_TARGET_BRANCH)
            .exclude_drafts()
            .skip_if_all_changes_match(DOCUMENTATION_GLOBS);
        assert_eq!(expr, TriggerExpression::abv_default());
    }

    #[test]
    fn test_branch_only() {
        let expr = TriggerExpression::pull_request_to("main");
        assert_eq!(expr.to_string(), r#"pull_request.target eq "main""#);
    }

    #[test]
    fn test_empty_globs_skipped() {
        let expr = TriggerExpression::pull_request_to("main")
            .exclude_drafts()
            .skip_if_all_changes_match(Vec::<String>::new());
        assert_eq!(
            expr.to_string(),
            r#"pull_request.target eq "main" AND NOT pull_request.draft"#
        );
    }

    #[test]
    fn test_quotes_escaped() {
        let expr = TriggerExpression::pull_request_to(r#"we"ird\branch"#);
        assert_eq!(
            expr.to_string(),
            r#"pull_request.target eq "we\"ird\\branch""#
        );
    }

    #[test]
    fn test_from_config() {
        let config = TriggerConfig {
            target_branch: "release/2022.3".to_string(),
            skip_if_all_changes_match: vec!["**/*.txt".to_string()],
        };
        assert_eq!(
            TriggerExpression::from_config(&config).to_string(),
            r#"pull_request.target eq "release/2022.3" AND NOT pull_request.draft AND NOT pull_request.push.changes.all match ["**/*.txt"]"#
        );
    }
}

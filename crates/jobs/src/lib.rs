//! Yamato job model and ABV job assembly.
//!
//! This crate turns editor and project descriptors into Yamato job
//! definitions and serializes them to pipeline YAML.
//!
//! # Example
//!
//! ```rust
//! use yamato_core::AbvConfig;
//! use yamato_jobs::AbvFileEmitter;
//! use yamato_naming::YamatoNamer;
//!
//! let config = AbvConfig::from_yaml_str(
//!     "editors: [{version: trunk}]\nprojects: [{name: Boat}]\nabv_trigger_editors: [trunk]\n",
//! )?;
//! let yaml = AbvFileEmitter::new().emit(&config, &YamatoNamer::new())?;
//! assert!(yaml.contains("all_project_ci_trunk:"));
//! # Ok::<(), yamato_core::Error>(())
//! ```
//!
//! # Job to YAML Mapping
//!
//! | Job field | Yamato YAML |
//! |-----------|-------------|
//! | job id | top-level key |
//! | `name` | `name` |
//! | custom revision | `variables: { CUSTOM_REVISION: <version> }` |
//! | dependencies | `dependencies: [{ path: <file>#<job>, rerun: always }]` |
//! | trigger expression | `triggers: { expression: ... }` |

pub mod abv;
pub mod emitter;
pub mod job;
pub mod schema;
pub mod trigger;

pub use abv::{AbvAllProjectCiJob, AllProjectCiAssembler};
pub use emitter::AbvFileEmitter;
pub use job::YmlJob;
pub use schema::{DependencyReference, JobDescription, JobFile, RerunPolicy, Triggers};
pub use trigger::TriggerExpression;

//! Core types for yamato-gen.
//!
//! - [`error`]: the error taxonomy shared by every crate in the workspace
//! - [`descriptor`]: editor and project descriptors, validated at construction
//! - [`config`]: the generator configuration file and its loader

pub mod config;
pub mod descriptor;
pub mod error;

pub use config::{AbvConfig, NamingConfig, TriggerConfig};
pub use descriptor::{EditorDescriptor, ProjectDescriptor};
pub use error::{Error, Result};

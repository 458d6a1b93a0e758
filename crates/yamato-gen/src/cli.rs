//! Command line parsing, error mapping and output envelopes.

use crate::logging::LogLevel;
use clap::{Parser, Subcommand};
use miette::{Diagnostic, Report};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Generated files differ from what is on disk (`--check`)
pub const EXIT_OUT_OF_SYNC: i32 = 1;
/// Configuration or input error exit code
pub const EXIT_CONFIG: i32 = 2;
/// Any other error
pub const EXIT_OTHER: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// Configuration or input error (exit code 2)
    #[error("Configuration error: {message}")]
    #[diagnostic(code(yamato::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Generated output differs from the file on disk (exit code 1)
    #[error("{path} is out of date")]
    #[diagnostic(
        code(yamato::cli::out_of_sync),
        help("Run `yamato-gen generate` and commit the result")
    )]
    OutOfSync {
        /// The stale file
        path: String,
        /// Unified diff from the file on disk to the expected content
        diff: String,
    },
    /// Other unexpected error (exit code 3)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(yamato::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new other error with help text
    #[must_use]
    pub fn other_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

/// Convert `yamato_core::Error` to the appropriate `CliError` variant.
///
/// Input problems (missing fields, unresolvable names, bad config, duplicate
/// jobs) map to `Config`; I/O and serialization failures map to `Other`.
impl From<yamato_core::Error> for CliError {
    fn from(err: yamato_core::Error) -> Self {
        let help = err.help().map(|h| h.to_string());
        let is_input = err.is_input_error();
        let message = match err {
            yamato_core::Error::Config { message, path } => match path {
                Some(path) => format!("{}: {message}", path.display()),
                None => message,
            },
            other => other.to_string(),
        };
        match (is_input, help) {
            (true, Some(help)) => Self::config_with_help(message, help),
            (true, None) => Self::config(message),
            (false, Some(help)) => Self::other_with_help(message, help),
            (false, None) => Self::other(message),
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::OutOfSync { .. } => EXIT_OUT_OF_SYNC,
        CliError::Config { .. } => EXIT_CONFIG,
        CliError::Other { .. } => EXIT_OTHER,
    }
}

/// JSON error payload: a stable `code`, the `message`, and for
/// `OutOfSync` the unified `diff`.
#[must_use]
pub fn error_payload(err: &CliError) -> serde_json::Value {
    let code = match err {
        CliError::Config { .. } => "config",
        CliError::OutOfSync { .. } => "out_of_sync",
        CliError::Other { .. } => "other",
    };
    let mut payload = serde_json::json!({
        "code": code,
        "message": err.to_string()
    });
    if let CliError::OutOfSync { diff, .. } = err {
        payload["diff"] = serde_json::Value::String(diff.clone());
    }
    payload
}

/// Render error appropriately based on JSON flag
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let error_envelope = ErrorEnvelope::new(error_payload(err));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        if let CliError::OutOfSync { diff, .. } = err {
            eprint!("{diff}");
        }
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        let _ = io::stderr().flush();
    }
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error"
    pub status: &'static str,
    /// The error payload
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Command line interface.
#[derive(Parser, Debug)]
#[command(name = "yamato-gen")]
#[command(about = "Generate Yamato CI pipeline definitions for a multi-project editor matrix")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Emit JSON envelopes for results and errors.
    #[arg(long, global = true, help = "Emit JSON results and errors")]
    pub json: bool,

    /// Configuration file; searched for from the current directory if absent.
    #[arg(
        long,
        short = 'c',
        global = true,
        env = "YAMATO_GEN_CONFIG",
        help = "Path to the configuration file"
    )]
    pub config: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the ABV pipeline file.
    #[command(about = "Generate the ABV pipeline file")]
    Generate {
        /// Repository root that pipeline paths are relative to.
        #[arg(
            long,
            short = 'r',
            help = "Repository root (defaults to the config file's repository)"
        )]
        root: Option<PathBuf>,
        /// Show what would be generated without writing files.
        #[arg(long, help = "Show what would be generated without writing files")]
        dry_run: bool,
        /// Check if files are in sync without making changes.
        #[arg(
            long,
            help = "Check if files are in sync without making changes",
            conflicts_with = "dry_run"
        )]
        check: bool,
    },
    /// Print the all-project CI job for one editor.
    #[command(about = "Print the all-project CI job for one editor")]
    Show {
        /// Editor version to print the job for.
        #[arg(long, short = 'e', help = "Editor version")]
        editor: String,
    },
}

/// Parse command line arguments into a CLI structure.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

//! yamato-gen
//!
//! Generates the Yamato ABV pipeline file for a repository's editor and
//! project matrix. The binary is a thin wrapper around this library:
//! [`cli`] parses arguments and maps errors to exit codes, [`commands`]
//! runs the subcommands, and [`sync`] writes or checks generated files.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod sync;

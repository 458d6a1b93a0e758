//! yamato-gen CLI
//!
//! Generates the Yamato ABV pipeline file from a repository's editor and
//! project configuration.

// CLI binary needs to output to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

use yamato_gen::cli::{EXIT_OK, exit_code_for, parse, render_error};
use yamato_gen::{commands, logging};

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = parse();
    logging::init(cli.level, cli.json);

    match commands::run(&cli.command, cli.config.as_deref(), cli.json) {
        Ok(output) => {
            println!("{output}");
            std::process::exit(EXIT_OK);
        }
        Err(err) => {
            render_error(&err, cli.json);
            std::process::exit(exit_code_for(&err));
        }
    }
}

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! rpaasctl: stream pod logs and manage autoscale policies of RPaaS instances.

mod cli;
mod commands;
mod config;
mod errors;
mod rpaas;
mod schedule;
#[cfg(test)]
mod testing;
mod types;

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, OutputCtx, write_error};
use config::AppConfig;
use errors::RpaasError;
use types::ErrorOutput;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let ctx = OutputCtx::new(cli.command.output_format());

    if let Err(err) = run(&cli, &ctx) {
        let error_output = ErrorOutput::from_error(&err);
        write_error(&error_output, ctx.format);
        std::process::exit(err.exit_code());
    }
}

fn run(cli: &Cli, ctx: &OutputCtx) -> Result<(), RpaasError> {
    let config = AppConfig::from_cli(cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::dispatch(&cli.command, &config, ctx, &mut out)
}

/// Diagnostics go to stderr so stdout stays clean for command output.
/// `RUST_LOG` overrides the level chosen by `--debug`.
fn init_tracing(debug: bool) {
    let default = if debug { "rpaasctl=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

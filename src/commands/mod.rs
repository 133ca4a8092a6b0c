/// Command dispatch: routes `Command` enum variants to their implementations.
pub mod autoscale;
pub mod logs;

use std::io::Write;

use crate::cli::OutputCtx;
use crate::cli::args::{AutoscaleCommand, Command};
use crate::config::AppConfig;
use crate::errors::RpaasError;

/// Dispatch a parsed `Command` to its handler. All output goes to `out`.
///
/// # Errors
///
/// Returns `RpaasError` on any command failure.
pub fn dispatch(
    command: &Command,
    config: &AppConfig,
    ctx: &OutputCtx,
    out: &mut dyn Write,
) -> Result<(), RpaasError> {
    match command {
        Command::Logs(args) => logs::run(args, config, ctx, out),
        Command::Autoscale(args) => match &args.command {
            AutoscaleCommand::Info(args) => autoscale::info(args, config, ctx, out),
            AutoscaleCommand::Remove(args) => autoscale::remove(args, config, ctx, out),
            AutoscaleCommand::Update(args) => autoscale::update(args, config, ctx, out),
        },
    }
}

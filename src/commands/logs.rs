/// `logs` command: stream log entries of an instance's pods to stdout.
use std::io::Write;

use crate::cli::OutputCtx;
use crate::cli::args::LogsArgs;
use crate::config::AppConfig;
use crate::errors::{Operation, RpaasError};
use crate::rpaas::{LogArgs, RpaasClient};

/// Run `rpaasctl logs`.
///
/// With `--follow` the body is copied to `out` until the server closes it.
///
/// # Errors
///
/// Returns `RpaasError::Upstream` if the request fails or the stream breaks.
pub fn run(
    args: &LogsArgs,
    config: &AppConfig,
    ctx: &OutputCtx,
    out: &mut dyn Write,
) -> Result<(), RpaasError> {
    let client = RpaasClient::new(config, args.target.service.as_deref())?;

    let _t_log = ctx.timer("log");
    client
        .log(&log_args(args), out)
        .map_err(RpaasError::upstream(Operation::Log))
}

fn log_args(args: &LogsArgs) -> LogArgs {
    LogArgs {
        instance: args.target.instance.clone(),
        pod: args.pod.clone(),
        container: args.container.clone(),
        lines: args.lines,
        since: args.since.map(Into::into),
        follow: args.follow,
        color: !args.without_color,
    }
}

/// CLI argument definitions via clap derive.
use clap::{Args, Parser, Subcommand};

use super::output::OutputFormat;

/// rpaasctl: manage RPaaS reverse-proxy instances.
#[derive(Debug, Parser)]
#[command(
    name = "rpaasctl",
    about = "Stream pod logs and manage autoscale policies of RPaaS instances",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Address of the RPaaS API. Takes precedence over the Tsuru target.
    #[arg(long, global = true, env = "RPAAS_URL", value_name = "URL")]
    pub rpaas_url: Option<String>,

    /// Basic auth user for the RPaaS API.
    #[arg(long, global = true, env = "RPAAS_USER", value_name = "USER")]
    pub rpaas_user: Option<String>,

    /// Basic auth password for the RPaaS API.
    #[arg(
        long,
        global = true,
        env = "RPAAS_PASSWORD",
        value_name = "PASSWORD",
        hide_env_values = true
    )]
    pub rpaas_password: Option<String>,

    /// Tsuru API address; requests go through the Tsuru service proxy.
    #[arg(long, global = true, env = "TSURU_TARGET", value_name = "URL")]
    pub tsuru_target: Option<String>,

    /// Tsuru authentication token.
    #[arg(
        long,
        global = true,
        env = "TSURU_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true
    )]
    pub tsuru_token: Option<String>,

    /// Connect timeout and overall timeout of non-streaming requests (e.g. 30s, 2m).
    #[arg(
        long,
        global = true,
        env = "RPAASCTL_TIMEOUT",
        value_name = "DURATION",
        default_value = "60s"
    )]
    pub timeout: humantime::Duration,

    /// Log HTTP requests and timings to stderr.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// All subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the log entries from instance pods.
    #[command(visible_alias = "log")]
    Logs(LogsArgs),
    /// Inspect, update or remove the autoscale policy of an instance.
    Autoscale(AutoscaleArgs),
}

impl Command {
    /// The rendering strategy for this invocation.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        match self {
            Self::Autoscale(AutoscaleArgs {
                command: AutoscaleCommand::Info(args),
            }) if args.json => OutputFormat::Json,
            _ => OutputFormat::Table,
        }
    }
}

/// Service and instance that identify an RPaaS instance.
#[derive(Debug, Clone, Args)]
pub struct InstanceArgs {
    /// The Tsuru service name.
    #[arg(
        long,
        short = 's',
        visible_alias = "tsuru-service",
        value_name = "SERVICE"
    )]
    pub service: Option<String>,

    /// The reverse proxy instance name.
    #[arg(
        long,
        short = 'i',
        visible_alias = "tsuru-service-instance",
        value_name = "INSTANCE"
    )]
    pub instance: String,
}

impl InstanceArgs {
    /// `SERVICE/INSTANCE`, as shown in confirmation messages.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!(
            "{}/{}",
            self.service.as_deref().unwrap_or_default(),
            self.instance
        )
    }
}

/// Arguments for `rpaasctl logs`.
#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(flatten)]
    pub target: InstanceArgs,

    /// Specific pod to log from (default: all pods from instance).
    #[arg(long, short = 'p', value_name = "POD")]
    pub pod: Option<String>,

    /// Specific container to log from (default: all containers from pods).
    #[arg(long, short = 'c', value_name = "CONTAINER")]
    pub container: Option<String>,

    /// Number of earlier log lines to show.
    #[arg(long, short = 'l', value_name = "N")]
    pub lines: Option<u32>,

    /// Only return logs newer than a relative duration like 5s, 2m, or 3h.
    #[arg(long, value_name = "DURATION")]
    pub since: Option<humantime::Duration>,

    /// Stream new entries as they are written.
    #[arg(long, short = 'f')]
    pub follow: bool,

    /// Disable colorful output.
    #[arg(long, visible_alias = "no-color")]
    pub without_color: bool,
}

/// Arguments for `rpaasctl autoscale`.
#[derive(Debug, Args)]
pub struct AutoscaleArgs {
    #[command(subcommand)]
    pub command: AutoscaleCommand,
}

/// `autoscale` subcommands.
#[derive(Debug, Subcommand)]
pub enum AutoscaleCommand {
    /// Show the autoscale policy of an instance.
    #[command(visible_alias = "get")]
    Info(AutoscaleInfoArgs),
    /// Remove the autoscale policy of an instance.
    #[command(visible_alias = "delete")]
    Remove(AutoscaleRemoveArgs),
    /// Create or update the autoscale policy of an instance.
    #[command(visible_alias = "set")]
    Update(AutoscaleUpdateArgs),
}

/// Arguments for `rpaasctl autoscale info`.
#[derive(Debug, Args)]
pub struct AutoscaleInfoArgs {
    #[command(flatten)]
    pub target: InstanceArgs,

    /// Show as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `rpaasctl autoscale remove`.
#[derive(Debug, Args)]
pub struct AutoscaleRemoveArgs {
    #[command(flatten)]
    pub target: InstanceArgs,
}

/// Arguments for `rpaasctl autoscale update`.
#[derive(Debug, Args)]
pub struct AutoscaleUpdateArgs {
    #[command(flatten)]
    pub target: InstanceArgs,

    /// Minimum number of replicas.
    #[arg(long = "min", value_name = "N", required = true)]
    pub min_replicas: u32,

    /// Maximum number of replicas.
    #[arg(long = "max", value_name = "N", required = true)]
    pub max_replicas: u32,

    /// Target CPU utilization, in percent.
    #[arg(long, value_name = "PERCENT")]
    pub cpu: Option<u32>,

    /// Target memory utilization, in percent.
    #[arg(long, value_name = "PERCENT")]
    pub memory: Option<u32>,

    /// Target requests per second per replica.
    #[arg(long, value_name = "N")]
    pub rps: Option<u32>,

    /// Scheduled window as JSON, e.g. '{"minReplicas": 1, "start": "00 08 * * 1-5",
    /// "end": "00 20 * * 1-5", "timezone": "America/Sao_Paulo"}'. Repeatable.
    #[arg(long = "schedule", value_name = "JSON")]
    pub schedules: Vec<String>,
}

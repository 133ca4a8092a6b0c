/// Command-level errors and their exit codes.
use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::rpaas::ClientError;
use crate::schedule::ScheduleError;

/// The upstream call an API failure belongs to; renders as the message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetAutoscale,
    UpdateAutoscale,
    RemoveAutoscale,
    Log,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GetAutoscale => "could not get autoscale from RPaaS API",
            Self::UpdateAutoscale => "could not update the autoscale on RPaaS API",
            Self::RemoveAutoscale => "could not delete the autoscale on RPaaS API",
            Self::Log => "could not fetch logs from RPaaS API",
        })
    }
}

/// Flag input rejected before any request is made.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("max replicas ({max}) must be greater than min replicas ({min})")]
    ReplicaBounds { min: u32, max: u32 },

    /// A `--schedule` value that is not a valid window object.
    #[error("invalid schedule '{fragment}': {reason}")]
    MalformedSchedule { fragment: String, reason: String },

    #[error("invalid {boundary} cron expression in schedule '{fragment}': {source}")]
    InvalidCron {
        fragment: String,
        /// `start` or `end`.
        boundary: &'static str,
        source: ScheduleError,
    },

    #[error("schedule '{fragment}' sets {min_replicas} min replicas, above max replicas ({max})")]
    WindowAboveMax {
        fragment: String,
        min_replicas: u32,
        max: u32,
    },
}

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum RpaasError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Client setup failures, before any operation is attempted.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// An API call failed; the upstream error text is kept verbatim.
    #[error("{operation}: {source}")]
    Upstream {
        operation: Operation,
        source: ClientError,
    },

    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("could not encode output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RpaasError {
    /// Adapter for `map_err` that tags a client error with its operation.
    pub fn upstream(operation: Operation) -> impl FnOnce(ClientError) -> Self {
        move |source| Self::Upstream { operation, source }
    }

    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Config(_) | Self::Client(_) => 2,
            Self::Upstream { .. } | Self::Output(_) | Self::Serialization(_) => 1,
        }
    }
}

/// Wire types of the RPaaS autoscale and log endpoints.
///
/// Field names follow the API's camelCase JSON. Optional fields that are
/// unset never serialize, so an absent trigger is distinguishable from zero.
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Autoscale policy of an instance, as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Autoscale {
    /// Lower replica bound.
    #[serde(default)]
    pub min_replicas: u32,
    /// Upper replica bound.
    #[serde(default)]
    pub max_replicas: u32,
    /// Target CPU utilization (percent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u32>,
    /// Target memory utilization (percent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u32>,
    /// Target requests per second per replica.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rps: Option<u32>,
    /// Scheduled minimum-replica overrides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedules: Vec<ScheduledWindow>,
}

/// A time-bounded override of the minimum replica count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledWindow {
    /// Minimum replicas while the window is active.
    pub min_replicas: u32,
    /// Cron expression opening the window.
    pub start: String,
    /// Cron expression closing the window.
    pub end: String,
    /// IANA timezone; the platform default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

/// Autoscale update. Replica bounds are always sent; triggers and
/// schedules only when the caller set them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscalePatch {
    pub min_replicas: u32,
    pub max_replicas: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedules: Option<Vec<ScheduledWindow>>,
}

/// Parameters of a log request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogArgs {
    pub instance: String,
    /// Restrict to one pod; all pods of the instance otherwise.
    pub pod: Option<String>,
    /// Restrict to one container; treated as an opaque name.
    pub container: Option<String>,
    /// Number of earlier lines to show.
    pub lines: Option<u32>,
    /// Only entries newer than this.
    pub since: Option<Duration>,
    /// Keep the stream open for new entries.
    pub follow: bool,
    /// Ask the server for colorized output.
    pub color: bool,
}

/// Error body returned by the API on non-2xx responses.
///
/// The API uses `Msg`; `message` and `error` are accepted from proxies in front of it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(rename = "Msg", alias = "msg", alias = "message", alias = "error", default)]
    pub msg: Option<String>,
}

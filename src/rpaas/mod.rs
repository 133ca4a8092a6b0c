/// RPaaS API layer: wire models, typed errors and the blocking HTTP client.
pub mod client;
pub mod errors;
pub mod models;

pub use client::RpaasClient;
pub use errors::ClientError;
pub use models::{Autoscale, AutoscalePatch, LogArgs, ScheduledWindow};

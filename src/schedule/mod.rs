/// Cron schedules of autoscale windows: parsing, validation and humanized rendering.
pub mod cron;
pub mod describe;
pub mod errors;

pub use cron::CronExpr;
pub use describe::describe;
pub use errors::ScheduleError;

/// Parse `expr` and describe it in English.
///
/// # Errors
///
/// Returns `ScheduleError` if `expr` is not a valid cron expression.
pub fn humanize(expr: &str) -> Result<String, ScheduleError> {
    expr.parse::<CronExpr>().map(|cron| describe(&cron))
}

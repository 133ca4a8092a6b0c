/// Errors from cron expression parsing.
use thiserror::Error;

/// A cron expression could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The expression is empty or whitespace only.
    #[error("empty cron expression")]
    Empty,

    /// A `@macro` shorthand that is not recognised.
    #[error("unknown cron macro '{0}'")]
    UnknownMacro(String),

    /// Wrong number of whitespace-separated fields.
    #[error("expected 5 fields in cron expression '{expr}', found {found}")]
    FieldCount {
        /// The full expression.
        expr: String,
        /// How many fields were present.
        found: usize,
    },

    /// A token is neither a number nor a known name.
    #[error("invalid {field} value '{value}'")]
    InvalidValue {
        /// Field name (minute, hour, ...).
        field: &'static str,
        /// The offending token.
        value: String,
    },

    /// A number outside the field's bounds.
    #[error("{field} value {value} is out of range ({min}-{max})")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// The parsed number.
        value: u32,
        /// Lowest accepted value.
        min: u32,
        /// Highest accepted value.
        max: u32,
    },

    /// A range whose start is after its end.
    #[error("invalid {field} range '{value}'")]
    InvalidRange {
        /// Field name.
        field: &'static str,
        /// The offending range token.
        value: String,
    },

    /// A step that is zero or not a number.
    #[error("invalid {field} step '{value}'")]
    InvalidStep {
        /// Field name.
        field: &'static str,
        /// The offending step token.
        value: String,
    },
}

/// Cron expression parsing.
///
/// Five whitespace-separated fields: minute, hour, day of month, month and
/// day of week. Each field is `*`, or a comma list of values (`5`, `MON`),
/// ranges (`1-5`) and steps (`*/15`, `10/5`, `8-18/2`). Day fields also take
/// `?` as a synonym for `*`. The `@hourly`-style macros expand to their
/// five-field equivalents.
use std::str::FromStr;

use super::errors::ScheduleError;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const DAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Which of the five cron fields a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl FieldKind {
    /// Human-readable field name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::DayOfMonth => "day-of-month",
            Self::Month => "month",
            Self::DayOfWeek => "day-of-week",
        }
    }

    /// Inclusive bounds. Day of week accepts 7 as an alias for Sunday.
    const fn bounds(self) -> (u32, u32) {
        match self {
            Self::Minute => (0, 59),
            Self::Hour => (0, 23),
            Self::DayOfMonth => (1, 31),
            Self::Month => (1, 12),
            Self::DayOfWeek => (0, 7),
        }
    }

    const fn accepts_question_mark(self) -> bool {
        matches!(self, Self::DayOfMonth | Self::DayOfWeek)
    }

    fn lookup_name(self, token: &str) -> Option<u32> {
        let (names, offset): (&[&str], u32) = match self {
            Self::Month => (&MONTH_NAMES, 1),
            Self::DayOfWeek => (&DAY_NAMES, 0),
            _ => return None,
        };
        let index = names.iter().position(|n| n.eq_ignore_ascii_case(token))?;
        u32::try_from(index).ok().map(|i| i + offset)
    }
}

/// What a step counts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepBase {
    /// `*/n`
    Any,
    /// `a/n`
    From(u32),
    /// `a-b/n`
    Range(u32, u32),
}

/// One comma-separated element of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Value(u32),
    Range(u32, u32),
    Step { base: StepBase, every: u32 },
}

/// A parsed cron field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// `*` or `?`
    Any,
    List(Vec<Segment>),
}

impl Field {
    /// The value when the field is exactly one plain number.
    #[must_use]
    pub fn single(&self) -> Option<u32> {
        match self {
            Self::List(segments) => match segments.as_slice() {
                [Segment::Value(v)] => Some(*v),
                _ => None,
            },
            Self::Any => None,
        }
    }

    /// All values when the field is a list made only of plain numbers.
    #[must_use]
    pub fn values(&self) -> Option<Vec<u32>> {
        match self {
            Self::List(segments) => segments
                .iter()
                .map(|s| match s {
                    Segment::Value(v) => Some(*v),
                    _ => None,
                })
                .collect(),
            Self::Any => None,
        }
    }
}

/// A parsed five-field cron expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpr {
    pub minute: Field,
    pub hour: Field,
    pub day_of_month: Field,
    pub month: Field,
    pub day_of_week: Field,
}

impl FromStr for CronExpr {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ScheduleError::Empty);
        }

        let expanded = match trimmed.strip_prefix('@') {
            Some(name) => expand_macro(name)?,
            None => trimmed,
        };

        let fields: Vec<&str> = expanded.split_whitespace().collect();
        let [minute, hour, day_of_month, month, day_of_week] = fields.as_slice() else {
            return Err(ScheduleError::FieldCount {
                expr: trimmed.to_owned(),
                found: fields.len(),
            });
        };

        Ok(Self {
            minute: parse_field(minute, FieldKind::Minute)?,
            hour: parse_field(hour, FieldKind::Hour)?,
            day_of_month: parse_field(day_of_month, FieldKind::DayOfMonth)?,
            month: parse_field(month, FieldKind::Month)?,
            day_of_week: parse_field(day_of_week, FieldKind::DayOfWeek)?,
        })
    }
}

fn expand_macro(name: &str) -> Result<&'static str, ScheduleError> {
    match name.to_ascii_lowercase().as_str() {
        "yearly" | "annually" => Ok("0 0 1 1 *"),
        "monthly" => Ok("0 0 1 * *"),
        "weekly" => Ok("0 0 * * 0"),
        "daily" | "midnight" => Ok("0 0 * * *"),
        "hourly" => Ok("0 * * * *"),
        _ => Err(ScheduleError::UnknownMacro(format!("@{name}"))),
    }
}

fn parse_field(token: &str, kind: FieldKind) -> Result<Field, ScheduleError> {
    if token == "*" || (token == "?" && kind.accepts_question_mark()) {
        return Ok(Field::Any);
    }

    token
        .split(',')
        .map(|part| parse_segment(part, kind))
        .collect::<Result<Vec<_>, _>>()
        .map(Field::List)
}

fn parse_segment(part: &str, kind: FieldKind) -> Result<Segment, ScheduleError> {
    let Some((base, step)) = part.split_once('/') else {
        return Ok(match parse_span(part, kind)? {
            (value, None) => Segment::Value(value),
            (start, Some(end)) => Segment::Range(start, end),
        });
    };

    let every = step
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ScheduleError::InvalidStep {
            field: kind.name(),
            value: part.to_owned(),
        })?;

    let base = if base == "*" {
        StepBase::Any
    } else {
        match parse_span(base, kind)? {
            (start, None) => StepBase::From(start),
            (start, Some(end)) => StepBase::Range(start, end),
        }
    };

    Ok(Segment::Step { base, every })
}

/// Parse `a` or `a-b`.
fn parse_span(token: &str, kind: FieldKind) -> Result<(u32, Option<u32>), ScheduleError> {
    let Some((start, end)) = token.split_once('-') else {
        return Ok((parse_value(token, kind)?, None));
    };

    let (start, end) = (parse_value(start, kind)?, parse_value(end, kind)?);
    if start > end {
        return Err(ScheduleError::InvalidRange {
            field: kind.name(),
            value: token.to_owned(),
        });
    }
    Ok((start, Some(end)))
}

fn parse_value(token: &str, kind: FieldKind) -> Result<u32, ScheduleError> {
    let value = match token.parse::<u32>() {
        Ok(v) => v,
        Err(_) => kind
            .lookup_name(token)
            .ok_or_else(|| ScheduleError::InvalidValue {
                field: kind.name(),
                value: token.to_owned(),
            })?,
    };

    let (min, max) = kind.bounds();
    if value < min || value > max {
        return Err(ScheduleError::OutOfRange {
            field: kind.name(),
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// English rendering of parsed cron expressions.
///
/// Output follows the usual cron-descriptor phrasing: the time of day first,
/// then day of month, day of week and month qualifiers, each introduced by a
/// comma. Times use a zero-padded 12-hour clock (`08:00 PM`).
use super::cron::{CronExpr, Field, Segment, StepBase};

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Describe a cron expression, e.g. `At 08:00 AM, Monday through Friday`.
#[must_use]
pub fn describe(cron: &CronExpr) -> String {
    let mut description = time_description(cron);
    description.push_str(&day_of_month_description(&cron.day_of_month));
    description.push_str(&day_of_week_description(&cron.day_of_week));
    description.push_str(&month_description(&cron.month));
    description
}

fn time_description(cron: &CronExpr) -> String {
    if let (Some(minute), Some(hours)) = (cron.minute.single(), cron.hour.values()) {
        let times: Vec<String> = hours.iter().map(|h| clock(*h, minute)).collect();
        return format!("At {}", join(&times));
    }

    let mut description = minute_description(&cron.minute);
    description.push_str(&hour_description(&cron.hour));
    description
}

fn minute_description(field: &Field) -> String {
    let Field::List(segments) = field else {
        return "Every minute".to_owned();
    };

    if let Some(values) = field.values() {
        let label = if values == [1] { "minute" } else { "minutes" };
        let values: Vec<String> = values.iter().map(u32::to_string).collect();
        return format!("At {} {label} past the hour", join(&values));
    }

    let phrases: Vec<String> = segments.iter().map(minute_segment).collect();
    capitalize(&join(&phrases))
}

fn minute_segment(segment: &Segment) -> String {
    match segment {
        Segment::Value(m) => format!("at {m} minutes past the hour"),
        Segment::Range(a, b) => format!("minutes {a} through {b} past the hour"),
        Segment::Step { base, every } => {
            let every = every_unit(*every, "minute", "minutes");
            match base {
                StepBase::Any => every,
                StepBase::From(a) => format!("{every}, starting at {a} minutes past the hour"),
                StepBase::Range(a, b) => {
                    format!("{every}, minutes {a} through {b} past the hour")
                }
            }
        }
    }
}

fn hour_description(field: &Field) -> String {
    let Field::List(segments) = field else {
        return String::new();
    };

    if let Some(hour) = field.single() {
        return format!(", between {} and {}", clock(hour, 0), clock(hour, 59));
    }
    if let Some(values) = field.values() {
        let times: Vec<String> = values.iter().map(|h| clock(*h, 0)).collect();
        return format!(", at {}", join(&times));
    }

    let phrases: Vec<String> = segments.iter().map(hour_segment).collect();
    format!(", {}", join(&phrases))
}

fn hour_segment(segment: &Segment) -> String {
    match segment {
        Segment::Value(h) => format!("at {}", clock(*h, 0)),
        Segment::Range(a, b) => format!("between {} and {}", clock(*a, 0), clock(*b, 59)),
        Segment::Step { base, every } => {
            let every = every_unit(*every, "hour", "hours");
            match base {
                StepBase::Any => every,
                StepBase::From(a) => format!("{every}, starting at {}", clock(*a, 0)),
                StepBase::Range(a, b) => {
                    format!("{every}, between {} and {}", clock(*a, 0), clock(*b, 59))
                }
            }
        }
    }
}

fn day_of_month_description(field: &Field) -> String {
    let Field::List(segments) = field else {
        return String::new();
    };

    if let Some(day) = field.single() {
        return format!(", on day {day} of the month");
    }
    if let Some(values) = field.values() {
        let days: Vec<String> = values.iter().map(u32::to_string).collect();
        return format!(", on days {} of the month", join(&days));
    }

    let phrases: Vec<String> = segments.iter().map(day_of_month_segment).collect();
    format!(", {}", join(&phrases))
}

fn day_of_month_segment(segment: &Segment) -> String {
    match segment {
        Segment::Value(d) => format!("on day {d} of the month"),
        Segment::Range(a, b) => format!("between day {a} and {b} of the month"),
        Segment::Step { base, every } => {
            let every = every_unit(*every, "day", "days");
            match base {
                StepBase::Any => every,
                StepBase::From(a) => format!("{every}, starting on day {a} of the month"),
                StepBase::Range(a, b) => format!("{every}, between day {a} and {b} of the month"),
            }
        }
    }
}

fn day_of_week_description(field: &Field) -> String {
    let Field::List(segments) = field else {
        return String::new();
    };

    if let Some(values) = field.values() {
        let days: Vec<String> = values.iter().map(|d| weekday(*d).to_owned()).collect();
        return format!(", only on {}", join(&days));
    }

    match segments.as_slice() {
        [segment] => format!(", {}", day_of_week_segment(segment)),
        _ => {
            let phrases: Vec<String> = segments.iter().map(day_of_week_segment).collect();
            format!(", only on {}", join(&phrases))
        }
    }
}

fn day_of_week_segment(segment: &Segment) -> String {
    match segment {
        Segment::Value(d) => weekday(*d).to_owned(),
        Segment::Range(a, b) => format!("{} through {}", weekday(*a), weekday(*b)),
        Segment::Step { base, every } => {
            let every = every_unit(*every, "day of the week", "days of the week");
            match base {
                StepBase::Any => every,
                StepBase::From(a) => format!("{every}, starting on {}", weekday(*a)),
                StepBase::Range(a, b) => {
                    format!("{every}, {} through {}", weekday(*a), weekday(*b))
                }
            }
        }
    }
}

fn month_description(field: &Field) -> String {
    let Field::List(segments) = field else {
        return String::new();
    };

    if let Some(values) = field.values() {
        let months: Vec<String> = values.iter().map(|m| month(*m).to_owned()).collect();
        return format!(", only in {}", join(&months));
    }

    match segments.as_slice() {
        [segment] => format!(", {}", month_segment(segment)),
        _ => {
            let phrases: Vec<String> = segments.iter().map(month_segment).collect();
            format!(", only in {}", join(&phrases))
        }
    }
}

fn month_segment(segment: &Segment) -> String {
    match segment {
        Segment::Value(m) => month(*m).to_owned(),
        Segment::Range(a, b) => format!("{} through {}", month(*a), month(*b)),
        Segment::Step { base, every } => {
            let every = every_unit(*every, "month", "months");
            match base {
                StepBase::Any => every,
                StepBase::From(a) => format!("{every}, starting in {}", month(*a)),
                StepBase::Range(a, b) => format!("{every}, {} through {}", month(*a), month(*b)),
            }
        }
    }
}

/// `08:00 PM` style clock time.
fn clock(hour: u32, minute: u32) -> String {
    let (hour, suffix) = match hour {
        0 => (12, "AM"),
        1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        _ => (hour - 12, "PM"),
    };
    format!("{hour:02}:{minute:02} {suffix}")
}

fn every_unit(n: u32, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("every {singular}")
    } else {
        format!("every {n} {plural}")
    }
}

// Day of week 7 is Sunday.
fn weekday(day: u32) -> &'static str {
    WEEKDAYS[(day % 7) as usize]
}

fn month(month: u32) -> &'static str {
    MONTHS[(month.clamp(1, 12) - 1) as usize]
}

/// `a`, `a and b`, `a, b and c`.
fn join(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

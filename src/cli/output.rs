/// Output formatting: autoscale tables, canonical JSON, error envelopes.
use std::io::{self, Write};
use std::time::Instant;

use comfy_table::Table;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::errors::RpaasError;
use crate::rpaas::{Autoscale, ScheduledWindow};
use crate::schedule;
use crate::types::ErrorOutput;

/// ASCII borders with a single rule under the header and none between rows.
const ASCII_HEADER_RULE: &str = "||--+-++|    ++++++";

/// Rendering strategy, chosen once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable lines and tables.
    #[default]
    Table,
    /// Canonical JSON: sorted keys, tab indented.
    Json,
}

/// Output context passed to all formatters.
pub struct OutputCtx {
    pub format: OutputFormat,
}

impl OutputCtx {
    #[must_use]
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Start a named timer. Logs the elapsed time at debug level on drop.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn timer(&self, label: &'static str) -> DebugTimer {
        DebugTimer::new(label)
    }
}

// --- Autoscale ---

/// Write an autoscale policy in the context's format.
///
/// # Errors
///
/// Returns `RpaasError::Output` if writing fails and
/// `RpaasError::Serialization` if JSON encoding fails.
pub fn write_autoscale(
    out: &mut dyn Write,
    autoscale: &Autoscale,
    ctx: &OutputCtx,
) -> Result<(), RpaasError> {
    match ctx.format {
        OutputFormat::Json => write_json(out, autoscale),
        OutputFormat::Table => write_autoscale_table(out, autoscale),
    }
}

fn write_autoscale_table(out: &mut dyn Write, autoscale: &Autoscale) -> Result<(), RpaasError> {
    writeln!(out, "min replicas: {}", autoscale.min_replicas)?;
    writeln!(out, "max replicas: {}", autoscale.max_replicas)?;

    let rows = trigger_rows(autoscale);
    if rows.is_empty() {
        return Ok(());
    }

    let table = render_table(["Triggers", "trigger details"], &rows);
    writeln!(out, "{table}")?;
    Ok(())
}

fn trigger_rows(autoscale: &Autoscale) -> Vec<[String; 2]> {
    let mut rows = Vec::new();
    if let Some(cpu) = autoscale.cpu {
        rows.push(["CPU".to_owned(), format!("{cpu}%")]);
    }
    if let Some(memory) = autoscale.memory {
        rows.push(["Memory".to_owned(), format!("{memory}%")]);
    }
    if let Some(rps) = autoscale.rps {
        rows.push(["RPS".to_owned(), format!("{rps} req/s")]);
    }
    if !autoscale.schedules.is_empty() {
        rows.push(["Schedule(s)".to_owned(), schedules_cell(&autoscale.schedules)]);
    }
    rows
}

fn schedules_cell(windows: &[ScheduledWindow]) -> String {
    windows
        .iter()
        .enumerate()
        .map(|(i, window)| window_block(i + 1, window))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn window_block(index: usize, window: &ScheduledWindow) -> String {
    let mut lines = vec![
        format!("Window {index}:"),
        format!("  Min replicas: {}", window.min_replicas),
        format!("  Start: {}", cron_label(&window.start)),
        format!("  End: {}", cron_label(&window.end)),
    ];
    if let Some(timezone) = window.timezone.as_deref().filter(|tz| !tz.is_empty()) {
        lines.push(format!("  Timezone: {timezone}"));
    }
    lines.join("\n")
}

/// `At 08:00 AM, Monday through Friday (00 08 * * 1-5)`; the bare expression
/// when the server hands back something that does not parse.
fn cron_label(expr: &str) -> String {
    match schedule::humanize(expr) {
        Ok(description) => format!("{description} ({expr})"),
        Err(err) => {
            debug!(%err, expr, "could not humanize cron expression");
            expr.to_owned()
        }
    }
}

/// Two-column table with centered header labels.
fn render_table(header: [&str; 2], rows: &[[String; 2]]) -> Table {
    let widths: [usize; 2] = std::array::from_fn(|col| {
        rows.iter()
            .map(|row| text_width(&row[col]))
            .chain([text_width(header[col])])
            .max()
            .unwrap_or(0)
    });

    let mut table = Table::new();
    table.load_preset(ASCII_HEADER_RULE);
    table.set_header([center(header[0], widths[0]), center(header[1], widths[1])]);
    for row in rows {
        table.add_row([row[0].as_str(), row[1].as_str()]);
    }
    table
}

fn text_width(text: &str) -> usize {
    text.lines().map(|l| l.chars().count()).max().unwrap_or(0)
}

// Extra space goes to the right on odd padding.
fn center(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.chars().count());
    let left = padding / 2;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(padding - left))
}

// --- Messages ---

/// Write a single confirmation line.
///
/// # Errors
///
/// Returns `RpaasError::Output` if writing fails.
pub fn write_message(out: &mut dyn Write, message: &str) -> Result<(), RpaasError> {
    writeln!(out, "{message}")?;
    Ok(())
}

// --- Error output ---

/// Write a structured error to stderr.
pub fn write_error(err: &ErrorOutput, format: OutputFormat) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match format {
        OutputFormat::Json => {
            let _ = write_json(&mut out, err);
        }
        OutputFormat::Table => {
            let _ = writeln!(out, "Error: {}", err.error.message);
        }
    }
}

// --- Debug timer ---

/// A RAII timer that logs elapsed time on drop.
///
/// Created via [`OutputCtx::timer`]. Visible with `--debug` or `RUST_LOG=debug`.
pub struct DebugTimer {
    label: &'static str,
    start: Instant,
}

impl DebugTimer {
    #[must_use]
    fn new(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        debug!(label = self.label, elapsed = ?self.start.elapsed(), "timing");
    }
}

// --- Generic JSON helpers ---

/// Pretty JSON with sorted keys and tab indentation, followed by a newline.
///
/// # Errors
///
/// Returns `RpaasError::Serialization` if `value` cannot be encoded and
/// `RpaasError::Output` if writing fails.
pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<(), RpaasError> {
    // `Value` objects are `BTreeMap`s, so keys come out sorted.
    let value = serde_json::to_value(value)?;
    {
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut *out, PrettyFormatter::with_indent(b"\t"));
        value.serialize(&mut serializer)?;
    }
    writeln!(out)?;
    Ok(())
}

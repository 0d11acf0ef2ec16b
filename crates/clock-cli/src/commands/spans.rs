//! Spans command: one subject's spans, optionally sliced by a window.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use clock_core::{
    AttendanceRecord, Clip, OpenRecords, Span, SubjectId, TimelineRegistry, Window,
    total_duration,
};
use serde::Serialize;

use super::util::format_hours;

#[derive(Debug, Serialize)]
pub struct JsonSpans {
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<Window>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<Clip>,
    pub spans: Vec<Span>,
    pub total_ms: i64,
}

/// Runs the spans command.
///
/// Without a window every stored span is listed unclipped. With a window the
/// spans are selected and clipped under `clip`.
pub fn run<W: Write>(
    writer: &mut W,
    records: &[AttendanceRecord],
    now: NaiveDateTime,
    subject: &SubjectId,
    window: Option<Window>,
    clip: Clip,
    json: bool,
) -> Result<()> {
    let registry = TimelineRegistry::from_records(records, OpenRecords::ResolveTo(now));
    let Some(timeline) = registry.get(subject) else {
        anyhow::bail!("no attendance recorded for subject {subject}");
    };

    let spans = match window {
        Some(window) => timeline.slice_between(window, clip),
        None => timeline.spans().to_vec(),
    };
    let total = total_duration(&spans);

    if json {
        let output = JsonSpans {
            subject: subject.to_string(),
            window,
            clip: window.map(|_| clip),
            spans,
            total_ms: total.num_milliseconds(),
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    match window {
        Some(window) => writeln!(writer, "{subject} in {window} ({clip})")?,
        None => writeln!(writer, "{subject}")?,
    }
    for span in &spans {
        let hours = format_hours(span.duration());
        writeln!(writer, "  {span}  {hours:>5}")?;
    }
    if let (Some(first), Some(last)) = (
        spans.iter().map(|s| s.start).min(),
        spans.iter().map(|s| s.end).max(),
    ) {
        writeln!(writer, "Earliest start: {first}")?;
        writeln!(writer, "Latest end:     {last}")?;
    }
    let total_hours = if total.is_zero() {
        "0.0".to_string()
    } else {
        format_hours(total)
    };
    writeln!(writer, "Total: {total_hours}h")?;
    Ok(())
}

//! Double-time command: bonus credit for sessions inside a window.

use std::io::Write;

use anyhow::Result;
use chrono::Duration;
use clock_core::report::{self, DoubleTimeCredit};
use clock_core::{AttendanceRecord, OpenRecords, TimelineRegistry, Window};
use serde::Serialize;

use super::util::{format_hours, write_table};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output format for double-time credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
    /// Attendance rows tagged `doubletime`, ready to append to storage.
    Records,
}

#[derive(Debug, Serialize)]
pub struct JsonDoubleTime {
    pub window: Window,
    pub credits: Vec<JsonCredit>,
}

#[derive(Debug, Serialize)]
pub struct JsonCredit {
    pub subject: String,
    pub started_at: String,
    pub ended_at: String,
    pub total_ms: i64,
}

pub fn write_credits<W: Write>(
    writer: &mut W,
    window: &Window,
    credits: &[DoubleTimeCredit],
) -> Result<()> {
    writeln!(
        writer,
        "DOUBLE TIME: {} .. {}",
        window.left.format(TIMESTAMP_FORMAT),
        window.right.format(TIMESTAMP_FORMAT)
    )?;
    writeln!(writer)?;

    if credits.is_empty() {
        writeln!(writer, "No double time earned.")?;
        return Ok(());
    }

    let header = ["subject", "started", "ended", "hours"].map(String::from);
    let rows: Vec<Vec<String>> = credits
        .iter()
        .map(|c| {
            vec![
                c.subject.to_string(),
                c.started_at.format(TIMESTAMP_FORMAT).to_string(),
                c.ended_at.format(TIMESTAMP_FORMAT).to_string(),
                format_hours(c.total),
            ]
        })
        .collect();
    write_table(writer, &header, &rows)
}

pub fn format_credits_json(window: Window, credits: &[DoubleTimeCredit]) -> Result<String> {
    let json = JsonDoubleTime {
        window,
        credits: credits
            .iter()
            .map(|c| JsonCredit {
                subject: c.subject.to_string(),
                started_at: c.started_at.format(TIMESTAMP_FORMAT).to_string(),
                ended_at: c.ended_at.format(TIMESTAMP_FORMAT).to_string(),
                total_ms: c.total.num_milliseconds(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

/// Runs the double-time command.
///
/// Only completed records are considered. A session that starts inside
/// `window` is credited up to its clock-out even when that lies past the
/// window's end.
pub fn run<W: Write>(
    writer: &mut W,
    records: &[AttendanceRecord],
    window: Window,
    min_total: Duration,
    output: Output,
) -> Result<()> {
    if window.is_inverted() {
        anyhow::bail!(
            "double-time window ends before it starts: {} .. {}",
            window.left,
            window.right
        );
    }

    let registry = TimelineRegistry::from_records(records, OpenRecords::Skip);
    let credits = report::double_time(&registry, window, min_total);
    tracing::info!(credits = credits.len(), %window, "computed double time");

    match output {
        Output::Text => write_credits(writer, &window, &credits)?,
        Output::Json => writeln!(writer, "{}", format_credits_json(window, &credits)?)?,
        Output::Records => {
            let rows: Vec<AttendanceRecord> = credits
                .into_iter()
                .map(DoubleTimeCredit::into_record)
                .collect();
            writeln!(writer, "{}", serde_json::to_string_pretty(&rows)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use clock_core::SubjectId;
    use insta::assert_snapshot;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 25)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn records() -> Vec<AttendanceRecord> {
        let alice = SubjectId::new("alice").unwrap();
        let bob = SubjectId::new("bob").unwrap();
        vec![
            AttendanceRecord::new(alice.clone(), at(16, 0), Some(at(18, 0))),
            AttendanceRecord::new(alice, at(18, 30), Some(at(21, 30))),
            AttendanceRecord::new(bob.clone(), at(9, 0), Some(at(17, 0))),
            AttendanceRecord::new(bob, at(19, 0), None),
        ]
    }

    fn window() -> Window {
        Window::new(at(17, 0), at(20, 0))
    }

    fn output(format: Output) -> String {
        let mut out = Vec::new();
        run(&mut out, &records(), window(), Duration::minutes(1), format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_double_time_text() {
        assert_snapshot!(output(Output::Text), @r"
        DOUBLE TIME: 2025-01-25 17:00:00 .. 2025-01-25 20:00:00

        subject              started                ended  hours
        alice    2025-01-25 17:00:00  2025-01-25 21:30:00    4.0
        ");
    }

    #[test]
    fn test_double_time_json() {
        let value: serde_json::Value = serde_json::from_str(&output(Output::Json)).unwrap();
        assert_eq!(value["window"]["left"], "2025-01-25T17:00:00");
        assert_eq!(value["credits"][0]["subject"], "alice");
        assert_eq!(value["credits"][0]["total_ms"], 4 * 3_600_000);
        assert_eq!(value["credits"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_double_time_records_are_tagged() {
        let rows: Vec<AttendanceRecord> = serde_json::from_str(&output(Output::Records)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].started_at, at(17, 0));
        assert_eq!(rows[0].ended_at, Some(at(21, 30)));
        assert_eq!(rows[0].info.as_deref(), Some(report::DOUBLE_TIME_INFO));
    }

    #[test]
    fn test_double_time_rejects_inverted_window() {
        let mut out = Vec::new();
        let window = Window::new(at(20, 0), at(17, 0));
        let result = run(&mut out, &records(), window, Duration::minutes(1), Output::Text);
        assert!(result.is_err());
    }
}

//! Parsing, loading, and table helpers shared by the subcommands.

use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use clock_core::AttendanceRecord;
use clock_core::report::SubjectTotal;
use regex::Regex;
use serde::Serialize;

/// Matches `N <unit>[s] ago`.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Upper bound on relative offsets, roughly a millennium in minutes.
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Formats accepted in addition to ISO 8601 (`2025-01-27T09:00:00[.ffffff]`).
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a naive local datetime string.
///
/// Supports:
/// - ISO 8601 without offset: "2025-01-27T09:30:00", "2025-01-27T09:30"
/// - Space separated: "2025-01-27 09:30:00", "2025-01-27 09:30"
/// - Date only (midnight): "2025-01-27"
/// - Relative to `now`: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Ok(dt);
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use YYYY-MM-DD, YYYY-MM-DDTHH:MM[:SS] or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    now.checked_sub_signed(Duration::minutes(n * minutes_per_unit))
        .with_context(|| format!("{s} is before the earliest supported date"))
}

/// Converts a minute count from flags or config into a `Duration`.
pub fn minutes_to_duration(minutes: i64) -> Result<Duration> {
    Duration::try_minutes(minutes)
        .with_context(|| format!("{minutes} minutes is out of range"))
}

/// Reads attendance records from a JSON array file, or stdin when `path` is `-`.
pub fn load_records(path: &Path) -> Result<Vec<AttendanceRecord>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read records from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read records from {}", path.display()))?
    };

    let records: Vec<AttendanceRecord> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse records in {}", path.display()))?;
    tracing::debug!(count = records.len(), path = %path.display(), "loaded attendance records");
    Ok(records)
}

/// A subject's total in JSON output.
#[derive(Debug, Serialize)]
pub struct JsonSubjectTotal {
    pub subject: String,
    pub total_ms: i64,
}

impl From<&SubjectTotal> for JsonSubjectTotal {
    fn from(total: &SubjectTotal) -> Self {
        Self {
            subject: total.subject.to_string(),
            total_ms: total.total.num_milliseconds(),
        }
    }
}

/// Formats a duration as decimal hours with one digit.
/// Zero renders as an empty cell.
#[expect(
    clippy::cast_precision_loss,
    reason = "totals stay far below 2^52 ms; one decimal of hours is all we print"
)]
pub fn format_hours(duration: Duration) -> String {
    if duration.is_zero() {
        return String::new();
    }
    let hours = duration.num_milliseconds() as f64 / 3_600_000.0;
    format!("{hours:.1}")
}

/// Writes a plain text table.
///
/// The first column is left aligned, every other column right aligned.
/// Trailing whitespace is trimmed from each line.
pub fn write_table<W: Write>(writer: &mut W, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    for row in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        let mut line = String::new();
        for (i, (cell, width)) in row.iter().zip(&widths).enumerate() {
            if i == 0 {
                line.push_str(&format!("{cell:<width$}"));
            } else {
                line.push_str(&format!("  {cell:>width$}"));
            }
        }
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 29)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn dt(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_parse_iso_datetime() {
        assert_eq!(
            parse_datetime("2025-01-27T09:30:15", now()).unwrap(),
            dt(27, 9, 30, 15)
        );
        assert_eq!(
            parse_datetime("2025-01-27T09:30", now()).unwrap(),
            dt(27, 9, 30, 0)
        );
    }

    #[test]
    fn test_parse_fractional_seconds() {
        assert_eq!(
            parse_datetime("2025-01-27T23:59:59.999999", now()).unwrap(),
            dt(27, 23, 59, 59) + Duration::microseconds(999_999)
        );
    }

    #[test]
    fn test_parse_space_separated() {
        assert_eq!(
            parse_datetime("2025-01-27 17:00", now()).unwrap(),
            dt(27, 17, 0, 0)
        );
        assert_eq!(
            parse_datetime("2025-01-27 17:00:30", now()).unwrap(),
            dt(27, 17, 0, 30)
        );
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        assert_eq!(parse_datetime("2025-01-27", now()).unwrap(), dt(27, 0, 0, 0));
    }

    #[test]
    fn test_parse_relative() {
        assert_eq!(parse_datetime("2 hours ago", now()).unwrap(), dt(29, 10, 0, 0));
        assert_eq!(parse_datetime("1 day ago", now()).unwrap(), dt(28, 12, 0, 0));
        assert_eq!(parse_datetime("1 week ago", now()).unwrap(), dt(22, 12, 0, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_datetime("yesterday-ish", now()).is_err());
        assert!(parse_datetime("2025-01-27T09:30:00Z", now()).is_err());
        assert!(parse_datetime("999999999999 weeks ago", now()).is_err());
    }

    #[test]
    fn test_parse_relative_before_earliest_date_is_error() {
        let earliest = NaiveDate::MIN.and_hms_opt(0, 0, 0).unwrap();
        assert!(parse_datetime("1 week ago", earliest).is_err());
    }

    #[test]
    fn test_minutes_to_duration() {
        assert_eq!(minutes_to_duration(90).unwrap(), Duration::minutes(90));
        assert_eq!(minutes_to_duration(0).unwrap(), Duration::zero());
        let err = minutes_to_duration(i64::MAX).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");
        assert!(minutes_to_duration(i64::MIN).is_err());
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(Duration::zero()), "");
        assert_eq!(format_hours(Duration::hours(7)), "7.0");
        assert_eq!(format_hours(Duration::minutes(150)), "2.5");
        assert_eq!(format_hours(Duration::minutes(20)), "0.3");
    }

    #[test]
    fn test_write_table_aligns_columns() {
        let header = vec!["subject".to_string(), "Mon".to_string()];
        let rows = vec![
            vec!["alice".to_string(), "7.0".to_string()],
            vec!["bob".to_string(), String::new()],
        ];
        let mut out = Vec::new();
        write_table(&mut out, &header, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "subject  Mon\nalice    7.0\nbob\n"
        );
    }

    #[test]
    fn test_load_records_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = load_records(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }

    #[test]
    fn test_load_records_parses_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attendance.json");
        std::fs::write(
            &path,
            r#"[{"subject": "7", "started_at": "2025-01-27T09:00:00", "ended_at": null}]"#,
        )
        .unwrap();
        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_open());
    }
}

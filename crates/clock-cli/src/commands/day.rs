//! Day command: hours per subject for one calendar day.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use clock_core::report::{self, DaySheet};
use clock_core::{AttendanceRecord, OpenRecords, TimelineRegistry};
use serde::Serialize;

use super::util::{JsonSubjectTotal, format_hours, write_table};

#[derive(Debug, Serialize)]
pub struct JsonDaySheet {
    pub date: String,
    pub subjects: Vec<JsonSubjectTotal>,
}

/// Writes the human-readable day sheet.
pub fn write_day_sheet<W: Write>(writer: &mut W, sheet: &DaySheet) -> Result<()> {
    writeln!(
        writer,
        "TIME SHEET: {}",
        sheet.day.left.format("%A, %b %-d, %Y")
    )?;
    writeln!(writer)?;

    if sheet.totals.is_empty() {
        writeln!(writer, "No attendance recorded.")?;
        return Ok(());
    }

    let header = vec!["subject".to_string(), "hours".to_string()];
    let rows: Vec<Vec<String>> = sheet
        .totals
        .iter()
        .map(|t| vec![t.subject.to_string(), format_hours(t.total)])
        .collect();
    write_table(writer, &header, &rows)
}

/// Formats the day sheet as JSON.
pub fn format_day_sheet_json(sheet: &DaySheet) -> Result<String> {
    let json = JsonDaySheet {
        date: sheet.day.left.format("%Y-%m-%d").to_string(),
        subjects: sheet.totals.iter().map(JsonSubjectTotal::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

/// Runs the day command. Open records are closed at `now`.
pub fn run<W: Write>(
    writer: &mut W,
    records: &[AttendanceRecord],
    now: NaiveDateTime,
    day: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let registry = TimelineRegistry::from_records(records, OpenRecords::ResolveTo(now));
    let sheet = report::day_sheet(&registry, day);

    if json {
        writeln!(writer, "{}", format_day_sheet_json(&sheet)?)?;
    } else {
        write_day_sheet(writer, &sheet)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use clock_core::SubjectId;
    use insta::assert_snapshot;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn records() -> Vec<AttendanceRecord> {
        let alice = SubjectId::new("alice").unwrap();
        let bob = SubjectId::new("bob").unwrap();
        vec![
            AttendanceRecord::new(alice.clone(), at(27, 9), Some(at(27, 12))),
            AttendanceRecord::new(alice, at(27, 13), Some(at(27, 17))),
            AttendanceRecord::new(bob.clone(), at(28, 9), Some(at(28, 10))),
            AttendanceRecord::new(SubjectId::new("carol").unwrap(), at(27, 14), None),
        ]
    }

    fn output(day: NaiveDateTime, json: bool) -> String {
        let mut out = Vec::new();
        run(&mut out, &records(), at(27, 16), day, json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_day_sheet_text() {
        assert_snapshot!(output(at(27, 8), false), @r"
        TIME SHEET: Monday, Jan 27, 2025

        subject  hours
        alice      7.0
        bob
        carol      2.0
        ");
    }

    #[test]
    fn test_day_sheet_json() {
        let value: serde_json::Value = serde_json::from_str(&output(at(28, 0), true)).unwrap();
        assert_eq!(value["date"], "2025-01-28");
        assert_eq!(value["subjects"][1]["subject"], "bob");
        assert_eq!(value["subjects"][1]["total_ms"], 3_600_000);
        assert_eq!(value["subjects"][2]["total_ms"], 0);
    }

    #[test]
    fn test_day_sheet_empty() {
        let mut out = Vec::new();
        run(&mut out, &[], at(27, 16), at(27, 0), false).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("No attendance recorded."));
    }

    #[test]
    fn test_day_sheet_on_last_representable_day() {
        let mut out = Vec::new();
        let last = NaiveDate::MAX.and_hms_opt(23, 0, 0).unwrap();
        run(&mut out, &records(), at(27, 16), last, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["subjects"][0]["total_ms"], 0);
    }
}

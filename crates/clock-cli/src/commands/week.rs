//! Week command: daily, weekly, and year-to-date hours for one week.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use clock_core::report::{self, WeekSheet};
use clock_core::bucket::days_of_week;
use clock_core::{AttendanceRecord, OpenRecords, TimelineRegistry, round_to_year};
use serde::Serialize;

use super::util::{format_hours, write_table};

#[derive(Debug, Serialize)]
pub struct JsonWeekSheet {
    pub week_start: String,
    pub year_start: String,
    pub rows: Vec<JsonWeekRow>,
}

#[derive(Debug, Serialize)]
pub struct JsonWeekRow {
    pub subject: String,
    /// Monday through Sunday.
    pub days_ms: [i64; 7],
    pub week_total_ms: i64,
    pub year_total_ms: i64,
}

/// Writes the human-readable week sheet.
pub fn write_week_sheet<W: Write>(writer: &mut W, sheet: &WeekSheet) -> Result<()> {
    let monday = sheet.week.left;
    writeln!(writer, "WEEK OF {}", monday.format("%b %-d, %Y"))?;
    writeln!(writer)?;

    if sheet.rows.is_empty() {
        writeln!(writer, "No attendance recorded.")?;
        return Ok(());
    }

    let header: Vec<String> = std::iter::once("subject".to_string())
        .chain(
            days_of_week(monday)
                .iter()
                .map(|day| day.left.format("%a %m/%d").to_string()),
        )
        .chain(["Week Total".to_string(), "Year Total".to_string()])
        .collect();

    let rows: Vec<Vec<String>> = sheet
        .rows
        .iter()
        .map(|row| {
            std::iter::once(row.subject.to_string())
                .chain(row.days.iter().map(|d| format_hours(*d)))
                .chain([format_hours(row.week_total), format_hours(row.year_total)])
                .collect()
        })
        .collect();

    write_table(writer, &header, &rows)
}

impl From<&WeekSheet> for JsonWeekSheet {
    fn from(sheet: &WeekSheet) -> Self {
        Self {
            week_start: sheet.week.left.format("%Y-%m-%d").to_string(),
            year_start: sheet.year_start.format("%Y-%m-%d").to_string(),
            rows: sheet
                .rows
                .iter()
                .map(|row| JsonWeekRow {
                    subject: row.subject.to_string(),
                    days_ms: row.days.map(|d| d.num_milliseconds()),
                    week_total_ms: row.week_total.num_milliseconds(),
                    year_total_ms: row.year_total.num_milliseconds(),
                })
                .collect(),
        }
    }
}

/// Formats the week sheet as JSON.
pub fn format_week_sheet_json(sheet: &WeekSheet) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonWeekSheet::from(sheet))?)
}

/// Runs the week command.
///
/// Open records are closed at `now`; the year-to-date column counts from
/// January 1st of `now`'s year.
pub fn run<W: Write>(
    writer: &mut W,
    records: &[AttendanceRecord],
    now: NaiveDateTime,
    week: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let registry = TimelineRegistry::from_records(records, OpenRecords::ResolveTo(now));
    let sheet = report::week_sheet(&registry, week, round_to_year(now));

    if json {
        writeln!(writer, "{}", format_week_sheet_json(&sheet)?)?;
    } else {
        write_week_sheet(writer, &sheet)?;
    }
    Ok(())
}

/// Runs the week command for every week with attendance, newest first.
///
/// Open records are closed at `now` before the weeks are collected, so a
/// subject still clocked in keeps the current week active.
pub fn run_all<W: Write>(
    writer: &mut W,
    records: &[AttendanceRecord],
    now: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let registry = TimelineRegistry::from_records(records, OpenRecords::ResolveTo(now));
    let year_start = round_to_year(now);
    let sheets: Vec<WeekSheet> = report::active_weeks(&registry)
        .into_iter()
        .map(|week| report::week_sheet(&registry, week, year_start))
        .collect();

    if json {
        let json: Vec<JsonWeekSheet> = sheets.iter().map(JsonWeekSheet::from).collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&json)?)?;
        return Ok(());
    }

    if sheets.is_empty() {
        writeln!(writer, "No attendance recorded.")?;
    }
    for (i, sheet) in sheets.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        write_week_sheet(writer, sheet)?;
    }
    Ok(())
}

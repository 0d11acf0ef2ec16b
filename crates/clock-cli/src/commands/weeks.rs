//! Weeks command: week totals per subject for every week with attendance.

use std::io::Write;

use anyhow::Result;
use clock_core::report::{self, WeeklyTotals};
use clock_core::{AttendanceRecord, OpenRecords, TimelineRegistry};
use serde::Serialize;

use super::util::{JsonSubjectTotal, format_hours, write_table};

#[derive(Debug, Serialize)]
pub struct JsonWeek {
    pub week_start: String,
    pub subjects: Vec<JsonSubjectTotal>,
}

/// Writes one row per week, one column per subject.
pub fn write_weekly_totals<W: Write>(writer: &mut W, weeks: &[WeeklyTotals]) -> Result<()> {
    let Some(first) = weeks.first() else {
        writeln!(writer, "No completed attendance recorded.")?;
        return Ok(());
    };

    // Every week lists the same subjects in the same order
    let header: Vec<String> = std::iter::once("week".to_string())
        .chain(first.totals.iter().map(|t| t.subject.to_string()))
        .collect();

    let rows: Vec<Vec<String>> = weeks
        .iter()
        .map(|week| {
            std::iter::once(week.week.left.format("%Y-%m-%d").to_string())
                .chain(week.totals.iter().map(|t| format_hours(t.total)))
                .collect()
        })
        .collect();

    write_table(writer, &header, &rows)
}

/// Formats weekly totals as JSON.
pub fn format_weekly_totals_json(weeks: &[WeeklyTotals]) -> Result<String> {
    let json: Vec<JsonWeek> = weeks
        .iter()
        .map(|week| JsonWeek {
            week_start: week.week.left.format("%Y-%m-%d").to_string(),
            subjects: week.totals.iter().map(JsonSubjectTotal::from).collect(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&json)?)
}

/// Runs the weeks command.
///
/// Only completed records count; subjects still clocked in are left out
/// until they clock out.
pub fn run<W: Write>(writer: &mut W, records: &[AttendanceRecord], json: bool) -> Result<()> {
    let registry = TimelineRegistry::from_records(records, OpenRecords::Skip);
    let weeks = report::active_weeks(&registry);
    let totals = report::weekly_totals(&registry, &weeks);

    if json {
        writeln!(writer, "{}", format_weekly_totals_json(&totals)?)?;
    } else {
        write_weekly_totals(writer, &totals)?;
    }
    Ok(())
}

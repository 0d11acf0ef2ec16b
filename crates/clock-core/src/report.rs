//! Aggregated hour reports built on top of the timeline registry.
//!
//! Every function here is a pure computation over a [`TimelineRegistry`]; the
//! results carry [`Duration`]s and leave formatting to the caller.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDateTime};

use crate::bucket::{day_window, days_of_week, round_to_week, week_window};
use crate::record::AttendanceRecord;
use crate::registry::TimelineRegistry;
use crate::span::{Clip, Window, total_duration};
use crate::types::SubjectId;

/// Info tag stamped on attendance rows produced from double-time credits.
pub const DOUBLE_TIME_INFO: &str = "doubletime";

/// Time credited to one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectTotal {
    pub subject: SubjectId,
    pub total: Duration,
}

/// Per-subject totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySheet {
    pub day: Window,
    pub totals: Vec<SubjectTotal>,
}

/// One subject's row in a week sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekRow {
    pub subject: SubjectId,
    /// Monday through Sunday.
    pub days: [Duration; 7],
    pub week_total: Duration,
    /// From the year start through the end of this week.
    pub year_total: Duration,
}

/// Daily, weekly, and year-to-date totals for one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSheet {
    pub week: Window,
    pub year_start: NaiveDateTime,
    pub rows: Vec<WeekRow>,
}

/// Per-subject totals for one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyTotals {
    pub week: Window,
    pub totals: Vec<SubjectTotal>,
}

/// Bonus credit for time worked inside a double-time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleTimeCredit {
    pub subject: SubjectId,
    /// Earliest clipped start inside the window.
    pub started_at: NaiveDateTime,
    /// Latest end of any span that started inside the window.
    pub ended_at: NaiveDateTime,
    pub total: Duration,
}

impl DoubleTimeCredit {
    /// The attendance row that grants this credit.
    pub fn into_record(self) -> AttendanceRecord {
        AttendanceRecord {
            subject: self.subject,
            started_at: self.started_at,
            ended_at: Some(self.ended_at),
            info: Some(DOUBLE_TIME_INFO.to_string()),
        }
    }
}

/// Monday 00:00 of every week in which any span starts, newest first.
pub fn active_weeks(registry: &TimelineRegistry) -> Vec<NaiveDateTime> {
    let weeks: BTreeSet<_> = registry
        .iter()
        .flat_map(|(_, tl)| tl.spans().iter().map(|s| round_to_week(s.start)))
        .collect();
    weeks.into_iter().rev().collect()
}

/// Closed-closed totals per subject for the day containing `day`.
pub fn day_sheet(registry: &TimelineRegistry, day: NaiveDateTime) -> DaySheet {
    let window = day_window(day);
    DaySheet {
        day: window,
        totals: totals_in(registry, window),
    }
}

/// Day, week, and year-to-date totals per subject for the week containing
/// `week`.
///
/// The year-to-date window runs from `year_start` to the end of the week, so
/// weeks before `year_start` get a zero year total.
pub fn week_sheet(
    registry: &TimelineRegistry,
    week: NaiveDateTime,
    year_start: NaiveDateTime,
) -> WeekSheet {
    let window = week_window(week);
    let days = days_of_week(week);
    let year_window = Window::new(year_start, window.right);

    let rows = registry
        .iter()
        .map(|(subject, tl)| WeekRow {
            subject: subject.clone(),
            days: days.map(|d| tl.total_between(d, Clip::ClosedClosed)),
            week_total: tl.total_between(window, Clip::ClosedClosed),
            year_total: tl.total_between(year_window, Clip::ClosedClosed),
        })
        .collect();

    WeekSheet {
        week: window,
        year_start,
        rows,
    }
}

/// Closed-closed week totals per subject, one entry per week in `weeks`.
pub fn weekly_totals(registry: &TimelineRegistry, weeks: &[NaiveDateTime]) -> Vec<WeeklyTotals> {
    weeks
        .iter()
        .map(|&week| {
            let window = week_window(week);
            WeeklyTotals {
                week: window,
                totals: totals_in(registry, window),
            }
        })
        .collect()
}

/// Double-time credits for `window`.
///
/// Uses closed-open slicing: a session starting inside the window earns
/// credit up to its real clock-out, even past `window.right`. Subjects whose
/// credited time is below `min_total` get nothing.
pub fn double_time(
    registry: &TimelineRegistry,
    window: Window,
    min_total: Duration,
) -> Vec<DoubleTimeCredit> {
    let mut credits = Vec::new();

    for (subject, tl) in registry {
        let slices = tl.slice_between(window, Clip::ClosedOpen);
        let total = total_duration(&slices);
        if total < min_total {
            tracing::debug!(%subject, total_ms = total.num_milliseconds(), "below double-time minimum");
            continue;
        }
        let started_at = slices.iter().map(|s| s.start).min();
        let ended_at = slices.iter().map(|s| s.end).max();
        let (Some(started_at), Some(ended_at)) = (started_at, ended_at) else {
            continue;
        };
        credits.push(DoubleTimeCredit {
            subject: subject.clone(),
            started_at,
            ended_at,
            total,
        });
    }

    credits
}

fn totals_in(registry: &TimelineRegistry, window: Window) -> Vec<SubjectTotal> {
    registry
        .iter()
        .map(|(subject, tl)| SubjectTotal {
            subject: subject.clone(),
            total: tl.total_between(window, Clip::ClosedClosed),
        })
        .collect()
}

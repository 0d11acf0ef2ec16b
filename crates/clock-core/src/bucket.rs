//! Day, week, and year bucketing.
//!
//! Weeks start on Monday 00:00 local time. Bucket windows are closed on both
//! ends and stop one [`TICK`] short of the next bucket, so adjacent windows
//! never share an instant.
//!
//! Buckets that would reach past chrono's representable range are clamped to
//! [`NaiveDateTime::MIN`] or [`NaiveDateTime::MAX`].

use chrono::{Datelike, Days, NaiveDateTime, NaiveTime};

use crate::span::{TICK, Window};

/// Truncates `t` to midnight of the same calendar date.
pub fn round_to_day(t: NaiveDateTime) -> NaiveDateTime {
    t.date().and_time(NaiveTime::MIN)
}

/// Truncates `t` to Monday 00:00 of its week.
pub fn round_to_week(t: NaiveDateTime) -> NaiveDateTime {
    let days_since_monday = Days::new(u64::from(t.weekday().num_days_from_monday()));
    t.checked_sub_days(days_since_monday)
        .map_or(NaiveDateTime::MIN, round_to_day)
}

/// Truncates `t` to January 1st 00:00 of its year.
pub fn round_to_year(t: NaiveDateTime) -> NaiveDateTime {
    // Every valid date's January 1st is itself valid
    round_to_day(t.with_ordinal(1).unwrap_or(t))
}

/// The window covering `t`'s calendar day.
pub fn day_window(t: NaiveDateTime) -> Window {
    let day = round_to_day(t);
    Window::new(day, bucket_end(day, 1))
}

/// The window covering `t`'s Monday-based week.
pub fn week_window(t: NaiveDateTime) -> Window {
    let week = round_to_week(t);
    Window::new(week, bucket_end(week, 7))
}

/// The seven day windows of the week containing `t`, Monday first.
///
/// Days past [`NaiveDateTime::MAX`] repeat the last representable day.
pub fn days_of_week(t: NaiveDateTime) -> [Window; 7] {
    let mut day = round_to_week(t);
    std::array::from_fn(|_| {
        let window = day_window(day);
        day = day.checked_add_days(Days::new(1)).unwrap_or(day);
        window
    })
}

/// One tick before the bucket `days` after `start`.
fn bucket_end(start: NaiveDateTime, days: u64) -> NaiveDateTime {
    start
        .checked_add_days(Days::new(days))
        .and_then(|next| next.checked_sub_signed(TICK))
        .unwrap_or(NaiveDateTime::MAX)
}

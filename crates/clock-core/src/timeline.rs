//! Per-subject interval timeline.
//!
//! An [`IntervalTimeline`] holds every span recorded for one subject, sorted by
//! `(start, end)`, and answers windowed queries against it.
//!
//! # Clipping
//!
//! Two clipping policies share one selection rule ([`Span::overlaps`]):
//!
//! - **closed-closed** ([`Clip::ClosedClosed`]) clamps both edges into the
//!   window. Daily, weekly, and year-to-date totals use it.
//! - **closed-open** ([`Clip::ClosedOpen`]) clamps only the start. A span that
//!   begins inside the window keeps its full end even when that end lies past
//!   the window. Double-time credit uses it.
//!
//! Overlapping input spans are never merged. Two spans covering the same hour
//! each contribute that hour to a total.

use chrono::{Duration, NaiveDateTime};

use crate::bucket::{day_window, week_window};
use crate::span::{Clip, Span, Window, total_duration};

/// Sorted collection of spans for a single subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalTimeline {
    spans: Vec<Span>,
}

impl IntervalTimeline {
    pub const fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// Records a span from `start` to `end`.
    ///
    /// Nothing is validated or merged; duplicates are kept.
    pub fn add(&mut self, start: NaiveDateTime, end: NaiveDateTime) {
        self.insert(Span::new(start, end));
    }

    /// Inserts `span` at its sorted position, after any equal spans.
    pub fn insert(&mut self, span: Span) {
        let idx = self.spans.partition_point(|s| *s <= span);
        self.spans.insert(idx, span);
    }

    /// All stored spans, ascending by `(start, end)`.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Every stored span sharing at least one instant with `[left, right]`.
    ///
    /// Spans touching a boundary are included: one ending exactly at `left`
    /// or starting exactly at `right` overlaps.
    pub fn overlapping_with(&self, left: NaiveDateTime, right: NaiveDateTime) -> Vec<Span> {
        let window = Window::new(left, right);
        self.overlapping(&window).collect()
    }

    fn overlapping<'a>(&'a self, window: &'a Window) -> impl Iterator<Item = Span> + 'a {
        if window.is_inverted() {
            tracing::trace!(%window, "inverted window selects nothing");
        }
        self.spans.iter().copied().filter(|s| s.overlaps(window))
    }

    /// Selects spans overlapping `window` and clips each with `clip`.
    pub fn slice_between(&self, window: Window, clip: Clip) -> Vec<Span> {
        self.overlapping(&window)
            .map(|s| s.clip(&window, clip))
            .collect()
    }

    /// Closed-closed slice: both edges clamped into `[left, right]`.
    pub fn slice_between_cc(&self, left: NaiveDateTime, right: NaiveDateTime) -> Vec<Span> {
        self.slice_between(Window::new(left, right), Clip::ClosedClosed)
    }

    /// Closed-open slice: start clamped to `left`, end left as stored.
    ///
    /// `right` only decides which spans are selected; it never truncates them.
    pub fn slice_between_co(&self, left: NaiveDateTime, right: NaiveDateTime) -> Vec<Span> {
        self.slice_between(Window::new(left, right), Clip::ClosedOpen)
    }

    pub fn slice_day_cc(&self, t: NaiveDateTime) -> Vec<Span> {
        self.slice_between(day_window(t), Clip::ClosedClosed)
    }

    pub fn slice_day_co(&self, t: NaiveDateTime) -> Vec<Span> {
        self.slice_between(day_window(t), Clip::ClosedOpen)
    }

    pub fn slice_week_cc(&self, t: NaiveDateTime) -> Vec<Span> {
        self.slice_between(week_window(t), Clip::ClosedClosed)
    }

    pub fn slice_week_co(&self, t: NaiveDateTime) -> Vec<Span> {
        self.slice_between(week_window(t), Clip::ClosedOpen)
    }

    /// Total time credited inside `window` under `clip`.
    pub fn total_between(&self, window: Window, clip: Clip) -> Duration {
        total_duration(&self.slice_between(window, clip))
    }
}

impl Extend<Span> for IntervalTimeline {
    fn extend<I: IntoIterator<Item = Span>>(&mut self, iter: I) {
        for span in iter {
            self.insert(span);
        }
    }
}

impl FromIterator<Span> for IntervalTimeline {
    fn from_iter<I: IntoIterator<Item = Span>>(iter: I) -> Self {
        let mut timeline = Self::new();
        timeline.extend(iter);
        timeline
    }
}

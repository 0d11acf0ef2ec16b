//! Span and window value types.
//!
//! All instants are naive local time. No timezone conversion happens anywhere
//! in this crate; callers are expected to hand in wall-clock values.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The smallest time increment the engine distinguishes.
///
/// Day and week windows end one tick before the next bucket starts, so a span
/// starting exactly at the next midnight never touches the previous bucket.
pub const TICK: Duration = Duration::microseconds(1);

/// One contiguous active period, `[start, end]`.
///
/// Ordered by `start`, then `end`. The engine never validates `start <= end`;
/// an inverted span is kept as supplied but treated as covering no time (see
/// [`Span::duration`] and [`Span::overlaps`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Span {
    pub const fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Returns true if the span ends before it starts.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Length of the span. Inverted spans count as zero.
    pub fn duration(&self) -> Duration {
        (self.end - self.start).max(Duration::zero())
    }

    /// Inclusive-inclusive overlap test against `window`.
    ///
    /// A span is only rejected when it lies entirely before `window.left` or
    /// entirely after `window.right`, so spans that merely touch a boundary
    /// (`end == left` or `start == right`) overlap. Inverted spans and inverted
    /// windows contain no instant and never overlap anything.
    pub fn overlaps(&self, window: &Window) -> bool {
        if self.is_inverted() || window.is_inverted() {
            return false;
        }
        let before = self.start < window.left && self.end < window.left;
        let after = self.start > window.right && self.end > window.right;
        !(before || after)
    }

    /// Clamps the span into `window` according to `clip`.
    ///
    /// Does not check for overlap first; callers select overlapping spans
    /// before clipping.
    #[must_use]
    pub fn clip(self, window: &Window, clip: Clip) -> Self {
        let start = self.start.max(window.left);
        match clip {
            Clip::ClosedClosed => Self::new(start, self.end.min(window.right)),
            Clip::ClosedOpen => Self::new(start, self.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// A query range `[left, right]`. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub left: NaiveDateTime,
    pub right: NaiveDateTime,
}

impl Window {
    pub const fn new(left: NaiveDateTime, right: NaiveDateTime) -> Self {
        Self { left, right }
    }

    /// Returns true if `left > right`. Such a window contains no instant.
    pub fn is_inverted(&self) -> bool {
        self.left > self.right
    }

    /// Inclusive containment test.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.left <= instant && instant <= self.right
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}

/// How a selected span is clamped into a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clip {
    /// Clamp both edges into the window. Totals never exceed the window.
    ClosedClosed,
    /// Clamp only the start. The end passes through even when it lies past
    /// the window's right edge; the right edge only takes part in selection.
    ClosedOpen,
}

impl Clip {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ClosedClosed => "cc",
            Self::ClosedOpen => "co",
        }
    }
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Clip {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cc" | "closed-closed" => Ok(Self::ClosedClosed),
            "co" | "closed-open" => Ok(Self::ClosedOpen),
            _ => Err(format!("invalid clip policy: {s}")),
        }
    }
}

/// Sums the durations of `spans`, saturating at [`Duration::MAX`].
pub fn total_duration(spans: &[Span]) -> Duration {
    spans
        .iter()
        .map(Span::duration)
        .fold(Duration::zero(), |acc, d| {
            acc.checked_add(&d).unwrap_or(Duration::MAX)
        })
}

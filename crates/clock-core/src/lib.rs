//! Core domain logic for attendance reporting.
//!
//! This crate contains:
//! - Timeline: per-subject sorted spans with closed-closed and closed-open
//!   windowed slicing
//! - Bucketing: day, week, and year windows over naive local time
//! - Reports: daily, weekly, year-to-date, and double-time totals computed
//!   from a per-request timeline registry

pub mod bucket;
mod record;
mod registry;
pub mod report;
mod span;
mod timeline;
mod types;

pub use bucket::{day_window, round_to_day, round_to_week, round_to_year, week_window};
pub use record::AttendanceRecord;
pub use registry::{OpenRecords, TimelineRegistry};
pub use span::{Clip, Span, TICK, Window, total_duration};
pub use timeline::IntervalTimeline;
pub use types::{SubjectId, ValidationError};

//! Subject-to-timeline mapping assembled per report.

use std::collections::BTreeMap;
use std::collections::btree_map;

use chrono::NaiveDateTime;

use crate::record::AttendanceRecord;
use crate::span::Span;
use crate::timeline::IntervalTimeline;
use crate::types::SubjectId;

/// What to do with rows that have no clock-out yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenRecords {
    /// Close them at the given instant (usually "now").
    ResolveTo(NaiveDateTime),
    /// Leave them out entirely.
    Skip,
}

/// One timeline per subject, iterated in subject order.
///
/// Built fresh for every report and dropped afterwards; nothing here is
/// cached between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineRegistry {
    timelines: BTreeMap<SubjectId, IntervalTimeline>,
}

impl TimelineRegistry {
    pub const fn new() -> Self {
        Self {
            timelines: BTreeMap::new(),
        }
    }

    /// Groups `records` by subject and feeds each group into its timeline.
    pub fn from_records<'a, I>(records: I, open: OpenRecords) -> Self
    where
        I: IntoIterator<Item = &'a AttendanceRecord>,
    {
        let mut registry = Self::new();
        let mut skipped = 0usize;
        let mut resolved = 0usize;

        for record in records {
            let span = match (record.ended_at, open) {
                (Some(end), _) => Span::new(record.started_at, end),
                (None, OpenRecords::ResolveTo(now)) => {
                    resolved += 1;
                    record.resolve(now)
                }
                (None, OpenRecords::Skip) => {
                    skipped += 1;
                    continue;
                }
            };
            if span.is_inverted() {
                tracing::warn!(subject = %record.subject, %span, "inverted span will count as zero");
            }
            registry.timeline_mut(&record.subject).insert(span);
        }

        tracing::debug!(
            subjects = registry.len(),
            resolved,
            skipped,
            "built timeline registry"
        );
        registry
    }

    /// The timeline for `subject`, created empty on first use.
    pub fn timeline_mut(&mut self, subject: &SubjectId) -> &mut IntervalTimeline {
        self.timelines.entry(subject.clone()).or_default()
    }

    pub fn get(&self, subject: &SubjectId) -> Option<&IntervalTimeline> {
        self.timelines.get(subject)
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, SubjectId, IntervalTimeline> {
        self.timelines.iter()
    }
}

impl<'a> IntoIterator for &'a TimelineRegistry {
    type Item = (&'a SubjectId, &'a IntervalTimeline);
    type IntoIter = btree_map::Iter<'a, SubjectId, IntervalTimeline>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

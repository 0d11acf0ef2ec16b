//! Raw attendance rows as supplied by storage.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::span::Span;
use crate::types::SubjectId;

/// One clock-in, optionally closed by a clock-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Who clocked in.
    pub subject: SubjectId,
    /// Clock-in time.
    pub started_at: NaiveDateTime,
    /// Clock-out time. `None` while the subject is still clocked in.
    #[serde(default)]
    pub ended_at: Option<NaiveDateTime>,
    /// Free-form note attached to the row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl AttendanceRecord {
    pub const fn new(
        subject: SubjectId,
        started_at: NaiveDateTime,
        ended_at: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            subject,
            started_at,
            ended_at,
            info: None,
        }
    }

    /// Returns true if the subject has not clocked out yet.
    pub const fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Converts the row to a span, closing an open row at `now`.
    pub fn resolve(&self, now: NaiveDateTime) -> Span {
        Span::new(self.started_at, self.ended_at.unwrap_or(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 27)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn open_record_resolves_to_now() {
        let record = AttendanceRecord::new(SubjectId::new("7").unwrap(), at(9), None);
        assert!(record.is_open());
        assert_eq!(record.resolve(at(15)), Span::new(at(9), at(15)));
    }

    #[test]
    fn closed_record_ignores_now() {
        let record = AttendanceRecord::new(SubjectId::new("7").unwrap(), at(9), Some(at(11)));
        assert!(!record.is_open());
        assert_eq!(record.resolve(at(15)), Span::new(at(9), at(11)));
    }

    #[test]
    fn record_deserializes_null_and_missing_end() {
        let json = r#"[
            {"subject": "7", "started_at": "2025-01-27T09:00:00", "ended_at": null},
            {"subject": "8", "started_at": "2025-01-27T10:00:00"},
            {"subject": "9", "started_at": "2025-01-27T11:00:00", "ended_at": "2025-01-27T12:00:00", "info": "doubletime"}
        ]"#;
        let records: Vec<AttendanceRecord> = serde_json::from_str(json).unwrap();
        assert!(records[0].is_open());
        assert!(records[1].is_open());
        assert_eq!(records[2].ended_at, Some(at(12)));
        assert_eq!(records[2].info.as_deref(), Some("doubletime"));
    }

    #[test]
    fn record_rejects_empty_subject() {
        let json = r#"{"subject": "", "started_at": "2025-01-27T09:00:00"}"#;
        let result: Result<AttendanceRecord, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}

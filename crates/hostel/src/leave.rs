//! Student leave applications.
//!
//! A student asks for leave with a reason and a `DD/MM/YYYY` date range. The
//! application is stored with a snapshot of the student's profile (name,
//! department, room) so the warden sees who asked even if the profile later
//! changes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{
    self, format_date, parse_date, required, ApplicationKind, Decision, Status,
};
use crate::error::{Error, Result};
use crate::student::normalize_student_id;

/// A leave request as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveRequest {
    /// Student asking for leave.
    pub student_id: String,
    /// Why the student is leaving.
    pub reason: String,
    /// First day away, `DD/MM/YYYY`.
    pub start_date: String,
    /// Last day away, `DD/MM/YYYY`.
    pub end_date: String,
}

/// A leave request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLeave {
    /// Trimmed student identifier.
    pub student_id: String,
    /// Trimmed reason.
    pub reason: String,
    /// First day away.
    pub start_date: NaiveDate,
    /// Last day away.
    pub end_date: NaiveDate,
}

impl LeaveRequest {
    /// Create a leave request from raw form input.
    #[must_use]
    pub fn new(
        student_id: impl Into<String>,
        reason: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            reason: reason.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }

    /// Check the request before it is stored.
    ///
    /// Every field must be filled in before any date is looked at. Both dates
    /// must be `DD/MM/YYYY` in the 2000s, and the leave may not end before it
    /// starts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStudentId`, `MissingField`, `InvalidDate` or
    /// `InvalidDateRange`.
    pub fn validate(&self) -> Result<ValidLeave> {
        let student_id = normalize_student_id(&self.student_id)
            .ok_or(Error::InvalidStudentId)?
            .to_string();
        let reason = required("reason", &self.reason)?;
        required("start_date", &self.start_date)?;
        required("end_date", &self.end_date)?;

        let start_date = parse_date("start_date", &self.start_date)?;
        let end_date = parse_date("end_date", &self.end_date)?;
        if end_date < start_date {
            return Err(Error::InvalidDateRange {
                start: format_date(start_date),
                end: format_date(end_date),
            });
        }

        Ok(ValidLeave {
            student_id,
            reason,
            start_date,
            end_date,
        })
    }
}

/// A stored leave application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// Application number.
    pub id: i64,
    /// Student who applied.
    pub student_id: String,
    /// Student name at the time of applying.
    pub student_name: String,
    /// Department at the time of applying.
    pub department: String,
    /// Room at the time of applying.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Why the student is leaving.
    pub reason: String,
    /// First day away.
    pub start_date: NaiveDate,
    /// Last day away.
    pub end_date: NaiveDate,
    /// Where the application stands.
    pub status: Status,
    /// When the application was submitted.
    pub created_at: DateTime<Utc>,
    /// When it was approved or rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
    /// Who approved or rejected it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<String>,
}

impl LeaveApplication {
    /// The leave period as shown on the dashboard, `start - end`.
    #[must_use]
    pub fn period(&self) -> String {
        format!(
            "{} - {}",
            format_date(self.start_date),
            format_date(self.end_date)
        )
    }

    /// Number of days away, counting both ends.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Approve or reject a pending application.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyProcessed` unless the application is pending, and
    /// `MissingField` if `processed_by` is blank. The record is unchanged on
    /// error.
    pub fn decide(
        &mut self,
        decision: Decision,
        processed_by: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let stamp =
            application::decide(ApplicationKind::Leave, self.id, self.status, processed_by, at)?;
        self.status = decision.status();
        self.processed_at = Some(stamp.processed_at);
        self.processed_by = Some(stamp.processed_by);
        Ok(())
    }
}

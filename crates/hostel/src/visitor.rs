//! Visitor entry applications.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{self, required, ApplicationKind, Decision, Status};
use crate::error::Result;

/// A visitor request as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorRequest {
    /// Who is visiting.
    pub visitor_name: String,
    /// Student being visited.
    pub student_id: String,
    /// Relation of the visitor to the student.
    pub relation: String,
    /// Visitor's contact number.
    pub phone: String,
    /// Day of the visit.
    pub visit_date: NaiveDate,
}

impl VisitorRequest {
    /// Check the request and return a trimmed copy.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for the first blank field, checked in the order
    /// visitor name, student, relation, phone.
    pub fn validate(&self) -> Result<Self> {
        Ok(Self {
            visitor_name: required("visitor_name", &self.visitor_name)?,
            student_id: required("student_id", &self.student_id)?,
            relation: required("relation", &self.relation)?,
            phone: required("phone", &self.phone)?,
            visit_date: self.visit_date,
        })
    }
}

/// A stored visitor application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorApplication {
    /// Application number.
    pub id: i64,
    /// Who is visiting.
    pub visitor_name: String,
    /// Student being visited.
    pub student_id: String,
    /// Relation of the visitor to the student.
    pub relation: String,
    /// Visitor's contact number.
    pub phone: String,
    /// Day of the visit.
    pub visit_date: NaiveDate,
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

impl VisitorApplication {
    /// Approve or reject a pending application.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyProcessed` unless the application is pending, and
    /// `MissingField` if `processed_by` is blank.
    pub fn decide(
        &mut self,
        decision: Decision,
        processed_by: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let stamp =
            application::decide(ApplicationKind::Visitor, self.id, self.status, processed_by, at)?;
        self.status = decision.status();
        self.processed_at = Some(stamp.processed_at);
        self.processed_by = Some(stamp.processed_by);
        Ok(())
    }
}

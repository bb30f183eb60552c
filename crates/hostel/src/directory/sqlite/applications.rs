//! Leave and visitor applications stored next to the student records.

use chrono::{NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use super::{parse_timestamp, SqliteDirectory};
use crate::application::{ApplicationKind, Decision, Status};
use crate::error::{Error, Result};
use crate::leave::{LeaveApplication, LeaveRequest};
use crate::logging::LEDGER_TARGET;
use crate::visitor::{VisitorApplication, VisitorRequest};

const LEAVE_COLUMNS: &str = "id, student_id, student_name, department, room, reason, \
    start_date, end_date, status, created_at, processed_at, processed_by";

const VISITOR_COLUMNS: &str = "id, visitor_name, student_id, relation, phone, visit_date, \
    status, created_at, processed_at, processed_by";

impl SqliteDirectory {
    /// Validate and store a leave request as a pending application.
    ///
    /// The applicant's name, department and room are copied from their
    /// directory record.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`LeaveRequest::validate`],
    /// `StudentNotFound` if the applicant has no record, or a database error.
    pub fn submit_leave(&self, request: &LeaveRequest) -> Result<LeaveApplication> {
        let leave = request.validate()?;
        let student = self
            .get(&leave.student_id)?
            .ok_or_else(|| Error::student_not_found(&leave.student_id))?;

        let conn = self.conn()?;
        conn.execute(
            r"
            INSERT INTO leave_applications
                (student_id, student_name, department, room, reason, start_date, end_date, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                student.id,
                student.name,
                student.department,
                student.room,
                leave.reason,
                leave.start_date.to_string(),
                leave.end_date.to_string(),
                Status::Pending.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(
            target: LEDGER_TARGET,
            application = id,
            student = %student.id,
            "leave application submitted"
        );

        find_leave(&conn, id)?.ok_or(Error::ApplicationNotFound {
            kind: ApplicationKind::Leave,
            id,
        })
    }

    /// Get a leave application by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn leave_application(&self, id: i64) -> Result<Option<LeaveApplication>> {
        find_leave(&*self.conn()?, id)
    }

    /// Leave applications in submission order, optionally only those in
    /// `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn leave_applications(&self, status: Option<Status>) -> Result<Vec<LeaveApplication>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_applications \
             WHERE ?1 IS NULL OR status = ?1 ORDER BY id"
        ))?;
        let apps = stmt
            .query_map([status.map(Status::as_str)], row_to_leave)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(apps)
    }

    /// Approve or reject a pending leave application.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationNotFound`, `AlreadyProcessed` if it was decided
    /// before, `MissingField` for a blank `processed_by`, or a database error.
    pub fn decide_leave(
        &self,
        id: i64,
        decision: Decision,
        processed_by: &str,
    ) -> Result<LeaveApplication> {
        let conn = self.conn()?;
        let mut app = find_leave(&conn, id)?.ok_or(Error::ApplicationNotFound {
            kind: ApplicationKind::Leave,
            id,
        })?;
        app.decide(decision, processed_by, Utc::now())?;
        record_decision(
            &conn,
            "leave_applications",
            id,
            app.status,
            app.processed_at.map(|at| at.to_rfc3339()),
            app.processed_by.as_deref(),
        )?;
        info!(
            target: LEDGER_TARGET,
            application = id,
            status = %app.status,
            "leave application decided"
        );
        Ok(app)
    }

    /// Validate and store a visitor request as a pending application.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` from [`VisitorRequest::validate`],
    /// `StudentNotFound` if the student being visited has no record, or a
    /// database error.
    pub fn submit_visitor(&self, request: &VisitorRequest) -> Result<VisitorApplication> {
        let visit = request.validate()?;
        if self.get(&visit.student_id)?.is_none() {
            return Err(Error::student_not_found(&visit.student_id));
        }

        let conn = self.conn()?;
        conn.execute(
            r"
            INSERT INTO visitor_applications
                (visitor_name, student_id, relation, phone, visit_date, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                visit.visitor_name,
                visit.student_id,
                visit.relation,
                visit.phone,
                visit.visit_date.to_string(),
                Status::Pending.as_str(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(
            target: LEDGER_TARGET,
            application = id,
            student = %visit.student_id,
            "visitor application submitted"
        );

        find_visitor(&conn, id)?.ok_or(Error::ApplicationNotFound {
            kind: ApplicationKind::Visitor,
            id,
        })
    }

    /// Get a visitor application by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn visitor_application(&self, id: i64) -> Result<Option<VisitorApplication>> {
        find_visitor(&*self.conn()?, id)
    }

    /// Visitor applications in submission order, optionally only those in
    /// `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn visitor_applications(&self, status: Option<Status>) -> Result<Vec<VisitorApplication>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {VISITOR_COLUMNS} FROM visitor_applications \
             WHERE ?1 IS NULL OR status = ?1 ORDER BY id"
        ))?;
        let apps = stmt
            .query_map([status.map(Status::as_str)], row_to_visitor)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(apps)
    }

    /// Approve or reject a pending visitor application.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationNotFound`, `AlreadyProcessed` if it was decided
    /// before, `MissingField` for a blank `processed_by`, or a database error.
    pub fn decide_visitor(
        &self,
        id: i64,
        decision: Decision,
        processed_by: &str,
    ) -> Result<VisitorApplication> {
        let conn = self.conn()?;
        let mut app = find_visitor(&conn, id)?.ok_or(Error::ApplicationNotFound {
            kind: ApplicationKind::Visitor,
            id,
        })?;
        app.decide(decision, processed_by, Utc::now())?;
        record_decision(
            &conn,
            "visitor_applications",
            id,
            app.status,
            app.processed_at.map(|at| at.to_rfc3339()),
            app.processed_by.as_deref(),
        )?;
        info!(
            target: LEDGER_TARGET,
            application = id,
            status = %app.status,
            "visitor application decided"
        );
        Ok(app)
    }
}

/// Write a decision, only ever moving a row out of `pending`.
fn record_decision(
    conn: &Connection,
    table: &str,
    id: i64,
    status: Status,
    processed_at: Option<String>,
    processed_by: Option<&str>,
) -> Result<()> {
    let affected = conn.execute(
        &format!(
            "UPDATE {table} SET status = ?1, processed_at = ?2, processed_by = ?3 \
             WHERE id = ?4 AND status = 'pending'"
        ),
        params![status.as_str(), processed_at, processed_by, id],
    )?;
    if affected == 0 {
        return Err(Error::internal(format!(
            "{table} row {id} left pending state while being decided"
        )));
    }
    Ok(())
}

fn find_leave(conn: &Connection, id: i64) -> Result<Option<LeaveApplication>> {
    let app = conn
        .query_row(
            &format!("SELECT {LEAVE_COLUMNS} FROM leave_applications WHERE id = ?1"),
            [id],
            row_to_leave,
        )
        .optional()?;
    Ok(app)
}

fn find_visitor(conn: &Connection, id: i64) -> Result<Option<VisitorApplication>> {
    let app = conn
        .query_row(
            &format!("SELECT {VISITOR_COLUMNS} FROM visitor_applications WHERE id = ?1"),
            [id],
            row_to_visitor,
        )
        .optional()?;
    Ok(app)
}

fn row_to_leave(row: &Row) -> rusqlite::Result<LeaveApplication> {
    Ok(LeaveApplication {
        id: row.get(0)?,
        student_id: row.get(1)?,
        student_name: row.get(2)?,
        department: row.get(3)?,
        room: row.get(4)?,
        reason: row.get(5)?,
        start_date: date_column(row, 6)?,
        end_date: date_column(row, 7)?,
        status: status_column(row, 8)?,
        created_at: timestamp_column(row, 9)?,
        processed_at: optional_timestamp_column(row, 10)?,
        processed_by: row.get(11)?,
    })
}

fn row_to_visitor(row: &Row) -> rusqlite::Result<VisitorApplication> {
    Ok(VisitorApplication {
        id: row.get(0)?,
        visitor_name: row.get(1)?,
        student_id: row.get(2)?,
        relation: row.get(3)?,
        phone: row.get(4)?,
        visit_date: date_column(row, 5)?,
        status: status_column(row, 6)?,
        created_at: timestamp_column(row, 7)?,
        processed_at: optional_timestamp_column(row, 8)?,
        processed_by: row.get(9)?,
    })
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}

fn date_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|e| conversion_error(idx, format!("bad date {raw:?}: {e}")))
}

fn status_column(row: &Row, idx: usize) -> rusqlite::Result<Status> {
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|_| conversion_error(idx, format!("bad status {raw:?}")))
}

fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<chrono::DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).ok_or_else(|| conversion_error(idx, format!("bad timestamp {raw:?}")))
}

fn optional_timestamp_column(
    row: &Row,
    idx: usize,
) -> rusqlite::Result<Option<chrono::DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        parse_timestamp(&s).ok_or_else(|| conversion_error(idx, format!("bad timestamp {s:?}")))
    })
    .transpose()
}

//! Error types for the hostel ledger.
//!
//! This module defines all error types used throughout the hostel crate. The
//! assignment-rule variants are meant to be shown to a warden as-is; the rest
//! describe infrastructure failures in the directory or configuration layers.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::{ApplicationKind, Status};

/// The main error type for hostel operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Assignment Errors ===
    /// The student identifier does not resolve to any directory record.
    #[error("student not found: {student_id}")]
    StudentNotFound {
        /// The identifier that was looked up.
        student_id: String,
    },

    /// The student already occupies a room.
    #[error("student {student_id} is already assigned to room {room_id}")]
    AlreadyAssigned {
        /// The student being assigned.
        student_id: String,
        /// The room the student currently occupies.
        room_id: String,
    },

    /// The room has no free beds left.
    #[error("room {room_id} is full ({capacity} beds)")]
    RoomFull {
        /// The room that rejected the assignment.
        room_id: String,
        /// Bed capacity of the room.
        capacity: u32,
    },

    /// The room identifier is not part of the catalog.
    #[error("room not found: {room_id}")]
    RoomNotFound {
        /// The identifier that was looked up.
        room_id: String,
    },

    /// The student identifier was empty after trimming.
    #[error("student identifier must not be empty")]
    InvalidStudentId,

    // === Directory Errors ===
    /// The directory rejected a room update or could not be reached.
    #[error("failed to update room for student {student_id}: {message}")]
    RemoteWriteFailure {
        /// The student whose record was being written.
        student_id: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The directory could not be read.
    #[error("failed to read student directory: {message}")]
    DirectoryRead {
        /// Description of what went wrong.
        message: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Request Errors ===
    /// A required field was missing or blank.
    #[error("{field} is required")]
    MissingField {
        /// Name of the field.
        field: &'static str,
    },

    /// A date was not a real `DD/MM/YYYY` day in the 2000s.
    #[error("{field} must be a DD/MM/YYYY date between 2000 and 2099, got {value:?}")]
    InvalidDate {
        /// Name of the field.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A leave period ends before it starts.
    #[error("leave ends on {end} before it starts on {start}")]
    InvalidDateRange {
        /// First day of leave.
        start: String,
        /// Last day of leave.
        end: String,
    },

    /// No application with that identifier.
    #[error("{kind} application {id} not found")]
    ApplicationNotFound {
        /// Which workflow was searched.
        kind: ApplicationKind,
        /// The identifier that was looked up.
        id: i64,
    },

    /// The application has already been approved or rejected.
    #[error("{kind} application {id} is already {status}")]
    AlreadyProcessed {
        /// Which workflow the application belongs to.
        kind: ApplicationKind,
        /// The application identifier.
        id: i64,
        /// The status it was left in.
        status: Status,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for hostel operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a student-not-found error.
    #[must_use]
    pub fn student_not_found(student_id: impl Into<String>) -> Self {
        Self::StudentNotFound {
            student_id: student_id.into(),
        }
    }

    /// Create a room-not-found error.
    #[must_use]
    pub fn room_not_found(room_id: impl Into<String>) -> Self {
        Self::RoomNotFound {
            room_id: room_id.into(),
        }
    }

    /// Create a remote write failure for the given student.
    #[must_use]
    pub fn remote_write(student_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteWriteFailure {
            student_id: student_id.into(),
            message: message.into(),
        }
    }

    /// Create a directory read error.
    #[must_use]
    pub fn directory_read(message: impl Into<String>) -> Self {
        Self::DirectoryRead {
            message: message.into(),
        }
    }

    /// Create a missing-field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is an assignment rule rejection.
    ///
    /// Rule rejections leave both the directory and the ledger untouched and
    /// are safe to show to the user verbatim.
    #[must_use]
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::StudentNotFound { .. }
                | Self::AlreadyAssigned { .. }
                | Self::RoomFull { .. }
                | Self::RoomNotFound { .. }
                | Self::InvalidStudentId
        )
    }

    /// Check if this error rejects a leave or visitor submission or decision.
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::InvalidDate { .. }
                | Self::InvalidDateRange { .. }
                | Self::AlreadyProcessed { .. }
        )
    }

    /// Check if this error came from the directory service.
    #[must_use]
    pub fn is_directory_failure(&self) -> bool {
        matches!(
            self,
            Self::RemoteWriteFailure { .. } | Self::DirectoryRead { .. }
        )
    }
}

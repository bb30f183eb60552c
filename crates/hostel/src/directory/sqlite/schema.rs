//! `SQLite` schema definitions for the student directory.
//!
//! [`SCHEMA_STATEMENTS`] create the version 1 schema. Later columns and
//! tables are added by migrations, see [`super::migrations`].

/// SQL statement to create the students table.
pub const CREATE_STUDENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS students (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    department TEXT NOT NULL,
    room TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on room for occupancy lookups.
pub const CREATE_ROOM_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_students_room ON students(room)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Version 2: when the room field last changed.
pub const ADD_ROOM_UPDATED_AT_COLUMN: &str = r"
ALTER TABLE students ADD COLUMN room_updated_at TEXT
";

/// Version 3: leave applications with a snapshot of the applicant's profile.
pub const CREATE_LEAVE_APPLICATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS leave_applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id TEXT NOT NULL,
    student_name TEXT NOT NULL,
    department TEXT NOT NULL,
    room TEXT,
    reason TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL,
    processed_at TEXT,
    processed_by TEXT
)
";

/// Version 3: visitor applications.
pub const CREATE_VISITOR_APPLICATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS visitor_applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    visitor_name TEXT NOT NULL,
    student_id TEXT NOT NULL,
    relation TEXT NOT NULL,
    phone TEXT NOT NULL,
    visit_date TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL,
    processed_at TEXT,
    processed_by TEXT
)
";

/// Applications are listed by status.
pub const CREATE_APPLICATION_STATUS_INDEXES: &str = r"
CREATE INDEX IF NOT EXISTS idx_leave_applications_status ON leave_applications(status);
CREATE INDEX IF NOT EXISTS idx_visitor_applications_status ON visitor_applications(status);
";

/// All base schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_STUDENTS_TABLE,
    CREATE_ROOM_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_students_table_contains_required_columns() {
        assert!(CREATE_STUDENTS_TABLE.contains("id TEXT PRIMARY KEY"));
        assert!(CREATE_STUDENTS_TABLE.contains("name TEXT NOT NULL"));
        assert!(CREATE_STUDENTS_TABLE.contains("department TEXT NOT NULL"));
        assert!(CREATE_STUDENTS_TABLE.contains("room TEXT,"));
    }

    #[test]
    fn test_application_tables_track_decisions() {
        for table in [CREATE_LEAVE_APPLICATIONS_TABLE, CREATE_VISITOR_APPLICATIONS_TABLE] {
            assert!(table.contains("status TEXT NOT NULL DEFAULT 'pending'"));
            assert!(table.contains("processed_at TEXT"));
            assert!(table.contains("processed_by TEXT"));
        }
        assert!(CREATE_LEAVE_APPLICATIONS_TABLE.contains("reason TEXT NOT NULL"));
        assert!(CREATE_VISITOR_APPLICATIONS_TABLE.contains("phone TEXT NOT NULL"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}

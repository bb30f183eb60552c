//! `SQLite`-backed student directory.
//!
//! Lets `hostelctl` act as its own system of record when no remote directory
//! is available. Student profiles are written with [`SqliteDirectory::upsert_profile`];
//! the room field is only changed through the [`Directory`] trait. Leave and
//! visitor applications live in the same database.

mod applications;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::Directory;
use crate::error::{Error, Result};
use crate::student::{normalize_room, StudentRecord};

/// Student directory stored in a `SQLite` database.
#[derive(Debug)]
pub struct SqliteDirectory {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl SqliteDirectory {
    /// Open or create a directory database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening directory database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Directory database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory directory, mostly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a student, or update name and department of an existing one.
    ///
    /// Identifier, name and department are trimmed first. The room of a new
    /// record is taken from `student`; the room of an existing record is left
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStudentId` or `MissingField` for a blank identifier or
    /// name, or an error if the database operation fails.
    pub fn upsert_profile(&self, student: &StudentRecord) -> Result<()> {
        let student = student.validated()?;
        let room = normalize_room(student.room.clone());
        let stamp = room.as_ref().map(|_| Utc::now().to_rfc3339());
        self.conn()?.execute(
            r"
            INSERT INTO students (id, name, department, room, room_updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, department = excluded.department
            ",
            params![student.id, student.name, student.department, room, stamp],
        )?;
        debug!("Upserted student {}", student.id);
        Ok(())
    }

    /// Get a student by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, student_id: &str) -> Result<Option<StudentRecord>> {
        let result = self
            .conn()?
            .query_row(
                "SELECT id, name, department, room FROM students WHERE id = ?1",
                [student_id],
                Self::row_to_student,
            )
            .optional()?;
        Ok(result)
    }

    /// All students in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all(&self) -> Result<Vec<StudentRecord>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, department, room FROM students ORDER BY rowid")?;
        let students = stmt
            .query_map([], Self::row_to_student)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(students)
    }

    /// Set or clear a student's room, stamping the change time.
    ///
    /// Returns `false` if no such student exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_room(&self, student_id: &str, room_id: Option<&str>) -> Result<bool> {
        let room = normalize_room(room_id.map(str::to_string));
        let affected = self.conn()?.execute(
            "UPDATE students SET room = ?1, room_updated_at = ?2 WHERE id = ?3",
            params![room, Utc::now().to_rfc3339(), student_id],
        )?;
        Ok(affected > 0)
    }

    /// When the student's room last changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn room_updated_at(&self, student_id: &str) -> Result<Option<DateTime<Utc>>> {
        let stamp: Option<Option<String>> = self
            .conn()?
            .query_row(
                "SELECT room_updated_at FROM students WHERE id = ?1",
                [student_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(stamp.flatten().as_deref().and_then(parse_timestamp))
    }

    /// Count students in the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get directory statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<DirectoryStats> {
        let total_students = self.count()?;

        let conn = self.conn()?;
        let assigned_students: i64 = conn.query_row(
            "SELECT COUNT(*) FROM students WHERE room IS NOT NULL AND trim(room) <> ''",
            [],
            |row| row.get(0),
        )?;
        let newest: Option<String> = conn
            .query_row(
                "SELECT MAX(room_updated_at) FROM students",
                [],
                |row| row.get(0),
            )
            .optional()?
            .flatten();
        drop(conn);

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(DirectoryStats {
            total_students,
            assigned_students,
            last_room_change: newest.as_deref().and_then(parse_timestamp),
            db_size_bytes,
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("directory connection lock poisoned"))
    }

    fn row_to_student(row: &rusqlite::Row) -> rusqlite::Result<StudentRecord> {
        let room: Option<String> = row.get(3)?;
        Ok(StudentRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            department: row.get(2)?,
            room: normalize_room(room),
        })
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// rusqlite is synchronous, so these run on the calling task. Each call is a
// single indexed statement on a local file; callers serving many concurrent
// requests should wrap the directory with `tokio::task::spawn_blocking`.
#[async_trait]
impl Directory for SqliteDirectory {
    async fn list_students(&self) -> Result<Vec<StudentRecord>> {
        self.all()
            .map_err(|e| Error::directory_read(e.to_string()))
    }

    async fn update_student_room(&self, student_id: &str, room_id: Option<&str>) -> Result<()> {
        match self.set_room(student_id, room_id) {
            Ok(true) => {
                debug!(student = student_id, room = ?room_id, "updated room field");
                Ok(())
            }
            Ok(false) => Err(Error::remote_write(student_id, "no such student record")),
            Err(e) => Err(Error::remote_write(student_id, e.to_string())),
        }
    }
}

/// Statistics about the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryStats {
    /// Total number of student records.
    pub total_students: i64,
    /// Students with a non-empty room.
    pub assigned_students: i64,
    /// Most recent room change.
    pub last_room_change: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_directory() -> SqliteDirectory {
        SqliteDirectory::open_in_memory().expect("failed to create test directory")
    }

    fn student(id: &str) -> StudentRecord {
        StudentRecord::new(id, format!("Student {id}"), "Computer Science")
    }

    #[test]
    fn test_upsert_and_get() {
        let dir = create_test_directory();
        dir.upsert_profile(&student("CS-001")).unwrap();

        let got = dir.get("CS-001").unwrap().unwrap();
        assert_eq!(got.name, "Student CS-001");
        assert!(!got.is_assigned());
        assert!(dir.get("CS-999").unwrap().is_none());
    }

    #[test]
    fn test_upsert_preserves_room() {
        let dir = create_test_directory();
        dir.upsert_profile(&student("CS-001").in_room("A-101")).unwrap();

        let mut renamed = student("CS-001");
        renamed.name = "Renamed".to_string();
        dir.upsert_profile(&renamed).unwrap();

        let got = dir.get("CS-001").unwrap().unwrap();
        assert_eq!(got.name, "Renamed");
        assert!(got.is_in("A-101"));
    }

    #[test]
    fn test_upsert_rejects_blank_name() {
        let dir = create_test_directory();
        let err = dir
            .upsert_profile(&StudentRecord::new("S1", "   ", ""))
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "name" }));
        assert_eq!(dir.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_trims_profile() {
        let dir = create_test_directory();
        dir.upsert_profile(&StudentRecord::new(" S1 ", " Asha Rao ", " CS "))
            .unwrap();

        let got = dir.get("S1").unwrap().unwrap();
        assert_eq!(got.name, "Asha Rao");
        assert_eq!(got.department, "CS");
    }

    #[test]
    fn test_all_in_insertion_order() {
        let dir = create_test_directory();
        for id in ["S3", "S1", "S2"] {
            dir.upsert_profile(&student(id)).unwrap();
        }
        let ids: Vec<String> = dir.all().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, ["S3", "S1", "S2"]);
    }

    #[test]
    fn test_set_room_and_timestamp() {
        let dir = create_test_directory();
        dir.upsert_profile(&student("S1")).unwrap();
        assert!(dir.room_updated_at("S1").unwrap().is_none());

        assert!(dir.set_room("S1", Some("A-104")).unwrap());
        assert!(dir.get("S1").unwrap().unwrap().is_in("A-104"));
        assert!(dir.room_updated_at("S1").unwrap().is_some());

        assert!(dir.set_room("S1", None).unwrap());
        assert!(!dir.get("S1").unwrap().unwrap().is_assigned());

        assert!(!dir.set_room("nobody", Some("A-101")).unwrap());
    }

    #[test]
    fn test_blank_room_reads_as_unassigned() {
        let dir = create_test_directory();
        dir.upsert_profile(&student("S1")).unwrap();
        dir.conn()
            .unwrap()
            .execute("UPDATE students SET room = '' WHERE id = 'S1'", [])
            .unwrap();

        assert!(!dir.get("S1").unwrap().unwrap().is_assigned());
        assert_eq!(dir.stats().unwrap().assigned_students, 0);
    }

    #[test]
    fn test_stats() {
        let dir = create_test_directory();
        let empty = dir.stats().unwrap();
        assert_eq!(empty.total_students, 0);
        assert!(empty.last_room_change.is_none());

        dir.upsert_profile(&student("S1")).unwrap();
        dir.upsert_profile(&student("S2")).unwrap();
        dir.set_room("S2", Some("A-101")).unwrap();

        let stats = dir.stats().unwrap();
        assert_eq!(stats.total_students, 2);
        assert_eq!(stats.assigned_students, 1);
        assert!(stats.last_room_change.is_some());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[tokio::test]
    async fn test_directory_trait() {
        let dir = create_test_directory();
        dir.upsert_profile(&student("S1")).unwrap();

        dir.update_student_room("S1", Some("A-102")).await.unwrap();
        let students = dir.list_students().await.unwrap();
        assert_eq!(students.len(), 1);
        assert!(students[0].is_in("A-102"));

        let err = dir
            .update_student_room("S9", Some("A-102"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RemoteWriteFailure { .. }));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("nested/dir/students.db");

        let dir = SqliteDirectory::open(&nested).unwrap();
        dir.upsert_profile(&student("S1")).unwrap();
        assert!(nested.exists());
        assert_eq!(dir.path(), nested);
    }

    #[test]
    fn test_path_in_memory() {
        let dir = create_test_directory();
        assert_eq!(dir.path().to_string_lossy(), ":memory:");
    }
}

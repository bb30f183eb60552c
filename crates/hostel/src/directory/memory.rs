//! In-process directory.
//!
//! Holds student records in memory. Reads and writes can be made to fail on
//! demand, which is how the ledger's failure paths are exercised in tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use super::Directory;
use crate::error::{Error, Result};
use crate::student::{normalize_room, StudentRecord};

/// A [`Directory`] backed by a `Vec` behind a mutex.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    students: Mutex<Vec<StudentRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryDirectory {
    /// Create a directory seeded with `students`.
    #[must_use]
    pub fn new(students: Vec<StudentRecord>) -> Self {
        Self {
            students: Mutex::new(students),
            ..Self::default()
        }
    }

    /// Add or replace a student record.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the record lock is poisoned.
    pub fn upsert(&self, student: StudentRecord) -> Result<()> {
        let mut students = self.lock()?;
        match students.iter_mut().find(|s| s.id == student.id) {
            Some(existing) => *existing = student,
            None => students.push(student),
        }
        Ok(())
    }

    /// Copy of the current records.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the record lock is poisoned.
    pub fn snapshot(&self) -> Result<Vec<StudentRecord>> {
        Ok(self.lock()?.clone())
    }

    /// Make subsequent `list_students` calls fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `update_student_room` calls fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful room updates applied.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<StudentRecord>>> {
        self.students
            .lock()
            .map_err(|_| Error::internal("in-memory directory lock poisoned"))
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn list_students(&self) -> Result<Vec<StudentRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::directory_read("directory unavailable"));
        }
        self.snapshot()
    }

    async fn update_student_room(&self, student_id: &str, room_id: Option<&str>) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::remote_write(student_id, "directory unavailable"));
        }

        let mut students = self.lock()?;
        let student = students
            .iter_mut()
            .find(|s| s.id == student_id)
            .ok_or_else(|| Error::remote_write(student_id, "no such student record"))?;
        student.room = normalize_room(room_id.map(str::to_string));
        self.writes.fetch_add(1, Ordering::SeqCst);

        debug!(student = student_id, room = ?room_id, "updated in-memory room field");
        Ok(())
    }
}

//! The student directory seam.
//!
//! The directory is the system of record for students and their assigned
//! room. The ledger talks to it only through [`Directory`], so a remote
//! backend, the bundled `SQLite` store, or an in-process fake can be swapped
//! in without touching assignment logic.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::student::StudentRecord;

pub use memory::InMemoryDirectory;
pub use sqlite::{DirectoryStats, SqliteDirectory};

/// Capability set the ledger needs from a directory service.
///
/// Each call is independent: there are no transactions spanning records and
/// no retries. Writes touch exactly one student record.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Fetch every student record.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryRead` if the directory cannot be read.
    async fn list_students(&self) -> Result<Vec<StudentRecord>>;

    /// Set (`Some`) or clear (`None`) the assigned room of one student.
    ///
    /// # Errors
    ///
    /// Returns `RemoteWriteFailure` if the update was rejected or the
    /// directory could not be reached.
    async fn update_student_room(&self, student_id: &str, room_id: Option<&str>) -> Result<()>;
}

//! Room occupancy ledger.
//!
//! The ledger keeps the last directory snapshot it saw, the occupancy derived
//! from it, and applies assign/remove operations by writing through to the
//! directory first and updating its own view only once the write succeeded.
//!
//! Per student the only transitions are `Unassigned -> Assigned(room)` via
//! [`Ledger::assign`] and `Assigned(room) -> Unassigned` via [`Ledger::remove`].
//! Moving a student between rooms takes a remove followed by an assign.

use tracing::{debug, info, warn};

use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::occupancy::{derive_occupancy, Occupancy, RoomSummary};
use crate::room::{Room, RoomCatalog};
use crate::student::{normalize_room, normalize_student_id, StudentRecord};

/// Result of a [`Ledger::remove`] call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The student was in the room and has been unassigned.
    Removed,
    /// The student was not listed in the room; nothing was written.
    NotInRoom,
}

/// Tracks which students occupy which catalog rooms.
#[derive(Debug)]
pub struct Ledger<D> {
    directory: D,
    catalog: RoomCatalog,
    enforce_capacity: bool,
    students: Vec<StudentRecord>,
    occupancy: Occupancy,
}

impl<D: Directory> Ledger<D> {
    /// Create a ledger with an empty snapshot.
    ///
    /// Call [`Ledger::refresh`] (or use [`Ledger::load`]) before assigning.
    #[must_use]
    pub fn new(directory: D, catalog: RoomCatalog) -> Self {
        let occupancy = derive_occupancy(&catalog, &[]);
        Self {
            directory,
            catalog,
            enforce_capacity: false,
            students: Vec::new(),
            occupancy,
        }
    }

    /// Create a ledger and read the initial snapshot from `directory`.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryRead` if the directory cannot be listed.
    pub async fn load(directory: D, catalog: RoomCatalog) -> Result<Self> {
        let mut ledger = Self::new(directory, catalog);
        ledger.refresh().await?;
        Ok(ledger)
    }

    /// Reject assignments to rooms that are already full.
    ///
    /// Off by default: room capacity is advisory unless this is enabled.
    #[must_use]
    pub fn with_capacity_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_capacity = enforce;
        self
    }

    /// Whether assignments are checked against room capacity.
    #[must_use]
    pub fn enforces_capacity(&self) -> bool {
        self.enforce_capacity
    }

    /// Re-read the directory and recompute occupancy.
    ///
    /// On failure the previous snapshot stays in place.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryRead` if the directory cannot be listed.
    pub async fn refresh(&mut self) -> Result<()> {
        let students = self.directory.list_students().await?;
        self.apply_snapshot(students);
        Ok(())
    }

    /// Replace the snapshot with `students` and recompute occupancy.
    ///
    /// This is the entry point for directories that push changes instead of
    /// being polled.
    pub fn apply_snapshot(&mut self, mut students: Vec<StudentRecord>) {
        for student in &mut students {
            student.room = normalize_room(student.room.take());
        }
        self.students = students;
        self.recompute();

        debug!(
            students = self.students.len(),
            occupied = self.occupancy.total_occupied(),
            "applied directory snapshot"
        );
        for student_id in self.occupancy.unmatched() {
            warn!(student = %student_id, "student is assigned to a room outside the catalog");
        }
    }

    /// Assign a student to a room.
    ///
    /// The identifier is trimmed before lookup. The directory is written
    /// first; the ledger's view changes only if that write succeeds.
    ///
    /// # Errors
    ///
    /// - `InvalidStudentId` if the identifier is blank
    /// - `RoomNotFound` if the room is not in the catalog
    /// - `StudentNotFound` if no record has this identifier
    /// - `AlreadyAssigned` if the student already has a room
    /// - `RoomFull` if capacity enforcement is on and no bed is free
    /// - `RemoteWriteFailure` if the directory rejects the update
    pub async fn assign(&mut self, room_id: &str, student_id: &str) -> Result<()> {
        let student_id = normalize_student_id(student_id).ok_or(Error::InvalidStudentId)?;
        let room = self
            .catalog
            .get(room_id)
            .cloned()
            .ok_or_else(|| Error::room_not_found(room_id))?;

        let index = self
            .index_of(student_id)
            .ok_or_else(|| Error::student_not_found(student_id))?;
        if let Some(existing) = &self.students[index].room {
            return Err(Error::AlreadyAssigned {
                student_id: student_id.to_string(),
                room_id: existing.clone(),
            });
        }

        if self.enforce_capacity {
            let occupied = self.occupancy.occupants(&room.id).map_or(0, <[String]>::len);
            if u64::try_from(occupied).unwrap_or(u64::MAX) >= u64::from(room.capacity) {
                return Err(Error::RoomFull {
                    room_id: room.id,
                    capacity: room.capacity,
                });
            }
        }

        if let Err(e) = self
            .directory
            .update_student_room(student_id, Some(room.id.as_str()))
            .await
        {
            warn!(student = student_id, room = %room.id, error = %e, "assign failed");
            return Err(e);
        }

        self.students[index].room = Some(room.id.clone());
        self.recompute();
        info!(student = student_id, room = %room.id, "assigned student to room");
        Ok(())
    }

    /// Remove a student from a room.
    ///
    /// A student not listed in `room_id` is tolerated: a warning is logged
    /// and [`RemoveOutcome::NotInRoom`] is returned without touching the
    /// directory.
    ///
    /// # Errors
    ///
    /// - `InvalidStudentId` if the identifier is blank
    /// - `RoomNotFound` if the room is not in the catalog
    /// - `RemoteWriteFailure` if the directory rejects the update
    pub async fn remove(&mut self, room_id: &str, student_id: &str) -> Result<RemoveOutcome> {
        let student_id = normalize_student_id(student_id).ok_or(Error::InvalidStudentId)?;
        let occupants = self
            .occupancy
            .occupants(room_id)
            .ok_or_else(|| Error::room_not_found(room_id))?;

        if !occupants.iter().any(|o| o == student_id) {
            warn!(
                student = student_id,
                room = room_id,
                "student is not in this room, nothing to remove"
            );
            return Ok(RemoveOutcome::NotInRoom);
        }

        if let Err(e) = self.directory.update_student_room(student_id, None).await {
            warn!(student = student_id, room = room_id, error = %e, "remove failed");
            return Err(e);
        }

        if let Some(index) = self.index_of(student_id) {
            self.students[index].room = None;
        }
        self.recompute();
        info!(student = student_id, room = room_id, "removed student from room");
        Ok(RemoveOutcome::Removed)
    }

    /// The room catalog.
    #[must_use]
    pub fn catalog(&self) -> &RoomCatalog {
        &self.catalog
    }

    /// The current occupancy view.
    #[must_use]
    pub fn occupancy(&self) -> &Occupancy {
        &self.occupancy
    }

    /// Occupant identifiers of `room_id`.
    #[must_use]
    pub fn occupants(&self, room_id: &str) -> Option<&[String]> {
        self.occupancy.occupants(room_id)
    }

    /// Full records of the students in `room_id`, in occupancy order.
    #[must_use]
    pub fn occupant_records(&self, room_id: &str) -> Option<Vec<&StudentRecord>> {
        self.occupants(room_id).map(|ids| {
            ids.iter()
                .filter_map(|id| self.student(id))
                .collect()
        })
    }

    /// Bed usage of `room_id`.
    #[must_use]
    pub fn summary(&self, room_id: &str) -> Option<RoomSummary> {
        self.occupancy.room(room_id).map(|r| r.summary())
    }

    /// Bed usage of every room, in catalog order.
    #[must_use]
    pub fn summaries(&self) -> Vec<(&Room, RoomSummary)> {
        self.occupancy
            .rooms()
            .iter()
            .map(|r| (&r.room, r.summary()))
            .collect()
    }

    /// Look up a student in the current snapshot.
    #[must_use]
    pub fn student(&self, student_id: &str) -> Option<&StudentRecord> {
        self.students.iter().find(|s| s.id == student_id)
    }

    /// The current snapshot.
    #[must_use]
    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    /// The directory this ledger writes to.
    #[must_use]
    pub fn directory(&self) -> &D {
        &self.directory
    }

    fn index_of(&self, student_id: &str) -> Option<usize> {
        self.students.iter().position(|s| s.id == student_id)
    }

    fn recompute(&mut self) {
        self.occupancy = derive_occupancy(&self.catalog, &self.students);
    }
}

//! Derived room occupancy.
//!
//! Occupancy is never stored. It is recomputed from a catalog and a snapshot
//! of student records whenever either changes, so the directory stays the
//! single source of truth for who sits where.

use std::collections::HashMap;

use serde::Serialize;

use crate::room::{Room, RoomCatalog};
use crate::student::StudentRecord;

/// Occupants of a single room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomOccupancy {
    /// The room.
    pub room: Room,
    /// Identifiers of students assigned to the room, in snapshot order.
    pub occupants: Vec<String>,
}

impl RoomOccupancy {
    /// Summarise bed usage for display.
    #[must_use]
    pub fn summary(&self) -> RoomSummary {
        RoomSummary::new(&self.room, self.occupants.len())
    }
}

/// Bed usage of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    /// Number of assigned students.
    pub occupied: usize,
    /// Bed capacity.
    pub capacity: u32,
    /// `occupied / capacity` as a whole percentage, rounded half up.
    pub occupancy_percent: u64,
    /// True once every bed is taken (or the room is over capacity).
    pub is_full: bool,
}

impl RoomSummary {
    fn new(room: &Room, occupied: usize) -> Self {
        let capacity = u64::from(room.capacity);
        let occupied_u64 = u64::try_from(occupied).unwrap_or(u64::MAX);
        let occupancy_percent = if capacity == 0 {
            0
        } else {
            occupied_u64.saturating_mul(100).saturating_add(capacity / 2) / capacity
        };
        Self {
            occupied,
            capacity: room.capacity,
            occupancy_percent,
            is_full: occupied_u64 >= capacity,
        }
    }

    /// Beds still free; zero when full or over capacity.
    #[must_use]
    pub fn free_beds(&self) -> u64 {
        u64::from(self.capacity).saturating_sub(u64::try_from(self.occupied).unwrap_or(u64::MAX))
    }
}

/// Room -> occupants mapping for a whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    rooms: Vec<RoomOccupancy>,
    unmatched: Vec<String>,
}

impl Occupancy {
    /// Occupants of `room_id`, or `None` if the room is not in the catalog.
    #[must_use]
    pub fn occupants(&self, room_id: &str) -> Option<&[String]> {
        self.room(room_id).map(|r| r.occupants.as_slice())
    }

    /// Entry for `room_id`.
    #[must_use]
    pub fn room(&self, room_id: &str) -> Option<&RoomOccupancy> {
        self.rooms.iter().find(|r| r.room.id == room_id)
    }

    /// All rooms in catalog order.
    #[must_use]
    pub fn rooms(&self) -> &[RoomOccupancy] {
        &self.rooms
    }

    /// Students whose assigned room is not in the catalog.
    #[must_use]
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    /// Room currently listing `student_id`, if any.
    #[must_use]
    pub fn room_of(&self, student_id: &str) -> Option<&Room> {
        self.rooms
            .iter()
            .find(|r| r.occupants.iter().any(|o| o == student_id))
            .map(|r| &r.room)
    }

    /// Total assigned students across catalog rooms.
    #[must_use]
    pub fn total_occupied(&self) -> usize {
        self.rooms.iter().map(|r| r.occupants.len()).sum()
    }
}

/// Compute the occupancy mapping for `catalog` from a directory snapshot.
///
/// Every catalog room appears in the result, empty rooms included. A student
/// is listed under a room exactly when its assigned room equals that room's
/// identifier; occupant order follows the order of `students`.
#[must_use]
pub fn derive_occupancy(catalog: &RoomCatalog, students: &[StudentRecord]) -> Occupancy {
    let index: HashMap<&str, usize> = catalog
        .rooms()
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id.as_str(), i))
        .collect();

    let mut rooms: Vec<RoomOccupancy> = catalog
        .rooms()
        .iter()
        .map(|room| RoomOccupancy {
            room: room.clone(),
            occupants: Vec::new(),
        })
        .collect();
    let mut unmatched = Vec::new();

    for student in students {
        let Some(room_id) = student.room.as_deref() else {
            continue;
        };
        match index.get(room_id) {
            Some(&i) => rooms[i].occupants.push(student.id.clone()),
            None => unmatched.push(student.id.clone()),
        }
    }

    Occupancy { rooms, unmatched }
}

//! Rooms and the static room catalog.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A room with a fixed number of beds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier, block letter plus number (e.g. `A-101`).
    pub id: String,
    /// Number of beds.
    pub capacity: u32,
}

impl Room {
    /// Create a room.
    #[must_use]
    pub fn new(id: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            capacity,
        }
    }
}

/// The fixed, ordered set of rooms the ledger tracks.
///
/// Rooms are enumerated once at startup and never created or destroyed while
/// the ledger runs. Identifiers are unique and every room has at least one bed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCatalog {
    rooms: Vec<Room>,
}

impl RoomCatalog {
    /// Build a catalog from an explicit list of rooms.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` if the list is empty, contains a duplicate
    /// identifier, a blank identifier, or a room with zero beds.
    pub fn new(rooms: Vec<Room>) -> Result<Self> {
        if rooms.is_empty() {
            return Err(Error::ConfigValidation {
                message: "room catalog must contain at least one room".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(rooms.len());
        for room in &rooms {
            if room.id.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "room identifier must not be empty".to_string(),
                });
            }
            if room.capacity == 0 {
                return Err(Error::ConfigValidation {
                    message: format!("room {} must have at least one bed", room.id),
                });
            }
            if !seen.insert(room.id.as_str()) {
                return Err(Error::ConfigValidation {
                    message: format!("duplicate room identifier: {}", room.id),
                });
            }
        }

        Ok(Self { rooms })
    }

    /// Enumerate `count` rooms in one block, numbered from `first_number`.
    ///
    /// `block("A", 101, 10, 4)` yields `A-101` through `A-110`, four beds each.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidation` under the same rules as [`RoomCatalog::new`],
    /// or when a room number would not fit in a `u32`.
    pub fn block(block: &str, first_number: u32, count: u32, beds: u32) -> Result<Self> {
        let rooms = (0..count)
            .map(|offset| {
                let number = first_number.checked_add(offset).ok_or_else(|| {
                    Error::ConfigValidation {
                        message: format!(
                            "room numbers starting at {first_number} overflow after {offset} rooms"
                        ),
                    }
                })?;
                Ok(Room::new(format!("{block}-{number}"), beds))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(rooms)
    }

    /// All rooms in catalog order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Look up a room by identifier.
    #[must_use]
    pub fn get(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    /// Whether the catalog contains `room_id`.
    #[must_use]
    pub fn contains(&self, room_id: &str) -> bool {
        self.get(room_id).is_some()
    }

    /// Number of rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Always false for a constructed catalog; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Total beds across all rooms.
    #[must_use]
    pub fn total_beds(&self) -> u64 {
        self.rooms.iter().map(|r| u64::from(r.capacity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_enumeration() {
        let catalog = RoomCatalog::block("A", 101, 10, 4).unwrap();
        assert_eq!(catalog.len(), 10);
        assert_eq!(catalog.rooms()[0].id, "A-101");
        assert_eq!(catalog.rooms()[9].id, "A-110");
        assert!(catalog.rooms().iter().all(|r| r.capacity == 4));
        assert_eq!(catalog.total_beds(), 40);
    }

    #[test]
    fn test_get_and_contains() {
        let catalog = RoomCatalog::block("B", 1, 3, 2).unwrap();
        assert!(catalog.contains("B-2"));
        assert!(!catalog.contains("A-101"));
        assert_eq!(catalog.get("B-3").map(|r| r.capacity), Some(2));
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let err = RoomCatalog::new(Vec::new()).unwrap_err();
        assert!(err.to_string().contains("at least one room"));
        assert!(RoomCatalog::block("A", 101, 0, 4).is_err());
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = RoomCatalog::block("A", 101, 2, 0).unwrap_err();
        assert!(err.to_string().contains("at least one bed"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let rooms = vec![Room::new("A-101", 4), Room::new("A-101", 2)];
        let err = RoomCatalog::new(rooms).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_block_rejects_room_number_overflow() {
        let err = RoomCatalog::block("A", u32::MAX, 2, 4).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
        assert!(err.to_string().contains("overflow"));

        let last = RoomCatalog::block("A", u32::MAX, 1, 4).unwrap();
        assert_eq!(last.rooms()[0].id, format!("A-{}", u32::MAX));
    }

    #[test]
    fn test_rejects_blank_id() {
        let err = RoomCatalog::new(vec![Room::new("  ", 4)]).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }
}

//! Student records as held by the directory service.
//!
//! The directory owns these records; the ledger only ever reads a snapshot of
//! them and changes a single field (the assigned room) through the directory.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A student as known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Unique identifier (the roll number).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Academic department.
    pub department: String,

    /// Room the student is assigned to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl StudentRecord {
    /// Create an unassigned student record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: department.into(),
            room: None,
        }
    }

    /// Builder-style helper that places the student in `room`.
    #[must_use]
    pub fn in_room(mut self, room: impl Into<String>) -> Self {
        self.room = normalize_room(Some(room.into()));
        self
    }

    /// Trimmed copy of a profile about to be saved.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStudentId` for a blank identifier and `MissingField`
    /// for a blank name.
    pub fn validated(&self) -> Result<Self> {
        let id = normalize_student_id(&self.id).ok_or(Error::InvalidStudentId)?;
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::missing_field("name"));
        }
        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            department: self.department.trim().to_string(),
            room: normalize_room(self.room.clone()),
        })
    }

    /// Whether the student currently has a room.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.room.is_some()
    }

    /// Whether the student is assigned to exactly `room_id`.
    #[must_use]
    pub fn is_in(&self, room_id: &str) -> bool {
        self.room.as_deref() == Some(room_id)
    }
}

/// Trim a user-supplied student identifier, rejecting blank input.
#[must_use]
pub fn normalize_student_id(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Collapse blank room values to `None`.
///
/// Directories in the wild store "no room" as null, as an empty string, or as
/// whitespace; all of them mean unassigned.
#[must_use]
pub fn normalize_room(room: Option<String>) -> Option<String> {
    room.and_then(|r| {
        let trimmed = r.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == r.len() {
            Some(r)
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_unassigned() {
        let s = StudentRecord::new("CS-001", "Asha Rao", "Computer Science");
        assert_eq!(s.id, "CS-001");
        assert!(!s.is_assigned());
        assert!(!s.is_in("A-101"));
    }

    #[test]
    fn test_in_room() {
        let s = StudentRecord::new("CS-001", "Asha Rao", "CS").in_room("A-101");
        assert!(s.is_assigned());
        assert!(s.is_in("A-101"));
        assert!(!s.is_in("A-102"));
    }

    #[test]
    fn test_in_room_blank_is_unassigned() {
        let s = StudentRecord::new("CS-001", "Asha Rao", "CS").in_room("   ");
        assert!(!s.is_assigned());
    }

    #[test]
    fn test_validated_trims_profile() {
        let s = StudentRecord::new(" CS-001 ", "  Asha Rao ", " CS ")
            .validated()
            .unwrap();
        assert_eq!(s, StudentRecord::new("CS-001", "Asha Rao", "CS"));
    }

    #[test]
    fn test_validated_requires_name() {
        let err = StudentRecord::new("CS-001", " ", "CS").validated().unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "name" }));
        assert_eq!(err.to_string(), "name is required");

        let err = StudentRecord::new("", "Asha", "CS").validated().unwrap_err();
        assert!(matches!(err, Error::InvalidStudentId));
    }

    #[test]
    fn test_validated_allows_blank_department() {
        let s = StudentRecord::new("CS-001", "Asha", "").validated().unwrap();
        assert!(s.department.is_empty());
    }

    #[test]
    fn test_normalize_student_id() {
        assert_eq!(normalize_student_id("  CS-001 "), Some("CS-001"));
        assert_eq!(normalize_student_id("CS-001"), Some("CS-001"));
        assert_eq!(normalize_student_id(""), None);
        assert_eq!(normalize_student_id(" \t "), None);
    }

    #[test]
    fn test_normalize_room() {
        assert_eq!(normalize_room(None), None);
        assert_eq!(normalize_room(Some(String::new())), None);
        assert_eq!(normalize_room(Some(" A-101 ".into())), Some("A-101".into()));
        assert_eq!(normalize_room(Some("A-101".into())), Some("A-101".into()));
    }

    #[test]
    fn test_serialization_omits_missing_room() {
        let s = StudentRecord::new("EE-010", "Ravi", "Electrical");
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("room"));

        let back: StudentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}

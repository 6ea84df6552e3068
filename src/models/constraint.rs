//! Constraint tables.
//!
//! Four tables accompany the catalog:
//! - [`ForcedAssignment`]: pins a course's instructor, room, and/or time slot.
//!   Violations are fatal configuration errors, not soft penalties.
//! - [`FitnessTable`]: named penalty → integer amount, plus the preferred
//!   teaching window.
//! - [`RoomAttribute`] / [`InstructorAttribute`]: key/value facts about
//!   rooms and instructors consulted by the fitness evaluator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ClockTime;

/// Penalty applied when an instructor's home building differs from the room's.
pub const INSTRUCTOR_PROXIMITY: &str = "instructor_proximity";
/// Penalty applied when a course's department differs from the room's building.
pub const DEPARTMENT_PROXIMITY: &str = "department_proximity";
/// Penalty applied when a class starts outside the preferred window.
pub const TIME_OF_DAY: &str = "time_of_day";
/// Penalty applied when too many seats go unused.
pub const WASTED_CAPACITY: &str = "wasted_capacity";
/// Penalty applied when a lab course lands in a non-lab room.
pub const LAB_MISMATCH: &str = "lab_mismatch";
/// Penalty applied when a class meets on a day the instructor marked unavailable.
pub const INSTRUCTOR_UNAVAILABLE_DAY: &str = "instructor_unavailable_day";

/// Room attribute marking lab support (`"true"`/`"yes"`/`"y"`/`"1"`).
pub const ATTR_LAB: &str = "lab";
/// Instructor attribute listing day codes to avoid (e.g. `"F"` or `"MW"`).
pub const ATTR_UNAVAILABLE_DAYS: &str = "unavailable_days";

/// A forced (constraint-pinned) assignment for one course section.
///
/// Several rows may target the same course; each field may be pinned by
/// at most one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedAssignment {
    /// Target course ID (`<catalog_id>_<section>`).
    pub course_id: String,
    /// Pinned instructor.
    pub instructor: Option<String>,
    /// Pinned room.
    pub room: Option<String>,
    /// Pinned time slot.
    pub time_slot: Option<String>,
}

impl ForcedAssignment {
    /// Creates an empty constraint row for a course.
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            ..Self::default()
        }
    }

    /// Pins the instructor.
    pub fn with_instructor(mut self, instructor_id: impl Into<String>) -> Self {
        self.instructor = Some(instructor_id.into());
        self
    }

    /// Pins the room.
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room = Some(room_id.into());
        self
    }

    /// Pins the time slot.
    pub fn with_time_slot(mut self, slot_id: impl Into<String>) -> Self {
        self.time_slot = Some(slot_id.into());
        self
    }

    /// Whether the row pins anything.
    pub fn is_empty(&self) -> bool {
        self.instructor.is_none() && self.room.is_none() && self.time_slot.is_none()
    }

    /// Folds another row for the same course into this one.
    ///
    /// Later rows fill fields left open by earlier ones; a field pinned by
    /// both keeps the first value (validation reports the contradiction).
    pub fn merge(&mut self, other: &ForcedAssignment) {
        if self.instructor.is_none() {
            self.instructor = other.instructor.clone();
        }
        if self.room.is_none() {
            self.room = other.room.clone();
        }
        if self.time_slot.is_none() {
            self.time_slot = other.time_slot.clone();
        }
    }
}

/// Penalty magnitudes and the preferred teaching window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessTable {
    /// Named penalty → amount subtracted from the score.
    pub penalties: HashMap<String, i64>,
    /// Earliest start that avoids the time-of-day penalty.
    pub preferred_start: ClockTime,
    /// Latest start that avoids the time-of-day penalty.
    pub preferred_end: ClockTime,
}

impl Default for FitnessTable {
    fn default() -> Self {
        Self {
            penalties: HashMap::new(),
            preferred_start: ClockTime::from_encoded(900),
            preferred_end: ClockTime::from_encoded(1700),
        }
    }
}

impl FitnessTable {
    /// Creates an empty table (every penalty zero, window 9:00-17:00).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a named penalty.
    pub fn with_penalty(mut self, name: impl Into<String>, amount: i64) -> Self {
        self.penalties.insert(name.into(), amount);
        self
    }

    /// Sets the preferred teaching window.
    pub fn with_preferred_window(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.preferred_start = start;
        self.preferred_end = end;
        self
    }

    /// Penalty amount for `name` (0 if unset).
    pub fn penalty(&self, name: &str) -> i64 {
        self.penalties.get(name).copied().unwrap_or(0)
    }

    /// Whether a start time falls outside the preferred window.
    pub fn outside_window(&self, start: ClockTime) -> bool {
        start < self.preferred_start || start > self.preferred_end
    }
}

/// A key/value fact about a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAttribute {
    /// Room (facility) ID.
    pub room_id: String,
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl RoomAttribute {
    /// Creates a room attribute row.
    pub fn new(
        room_id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A key/value fact about an instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorAttribute {
    /// Instructor ID.
    pub instructor_id: String,
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl InstructorAttribute {
    /// Creates an instructor attribute row.
    pub fn new(
        instructor_id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            instructor_id: instructor_id.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Interprets a yes/no attribute value.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_clock;

    #[test]
    fn test_forced_merge() {
        let mut a = ForcedAssignment::new("C1").with_instructor("I1");
        let b = ForcedAssignment::new("C1").with_room("R1").with_instructor("I2");
        a.merge(&b);
        assert_eq!(a.instructor.as_deref(), Some("I1"));
        assert_eq!(a.room.as_deref(), Some("R1"));
        assert!(a.time_slot.is_none());
        assert!(!a.is_empty());
        assert!(ForcedAssignment::new("C2").is_empty());
    }

    #[test]
    fn test_fitness_table_defaults() {
        let table = FitnessTable::new().with_penalty(TIME_OF_DAY, 5);
        assert_eq!(table.penalty(TIME_OF_DAY), 5);
        assert_eq!(table.penalty(WASTED_CAPACITY), 0);

        assert!(table.outside_window(parse_clock("8:00").unwrap()));
        assert!(!table.outside_window(parse_clock("9:00").unwrap()));
        assert!(!table.outside_window(parse_clock("17:00").unwrap()));
        assert!(table.outside_window(parse_clock("17:30").unwrap()));
    }

    #[test]
    fn test_truthy() {
        assert!(is_truthy("Y"));
        assert!(is_truthy(" true "));
        assert!(!is_truthy("no"));
        assert!(!is_truthy(""));
    }
}

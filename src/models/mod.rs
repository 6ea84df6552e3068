//! Timetabling domain models.
//!
//! Provides the static catalog (courses, instructors, rooms, time slots,
//! constraint tables), the time-slot algebra used for overlap detection,
//! the per-solution resource calendar, and the solution type itself.
//!
//! # Domain Mappings
//!
//! | u-timetable | Meaning |
//! |-------------|---------|
//! | Course | One section to place |
//! | TimeSlot | Weekly meeting pattern (days + start/end) |
//! | AtomicSlot | One day of a meeting pattern |
//! | ResourceCalendar | Busy/free rooms and instructors for one solution |
//! | Solution | Course → (time slot, instructor, room) for every course |

mod calendar;
mod catalog;
pub mod constraint;
mod course;
mod instructor;
mod room;
mod solution;
mod time_slot;

pub use calendar::{Booking, ResourceCalendar, ResourceKind};
pub use catalog::Catalog;
pub use constraint::{FitnessTable, ForcedAssignment, InstructorAttribute, RoomAttribute};
pub use course::Course;
pub use instructor::Instructor;
pub use room::{building_of, Room};
pub use solution::{
    AssignmentField, Conflict, CourseAssignment, DisplayField, DisplayRow, ForcedFlags, Solution,
};
pub use time_slot::{
    atomize, day_code, equivalent_slots, overlaps, parse_clock, AtomicSlot, ClockTime, TimeSlot,
    Weekday,
};

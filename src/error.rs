//! Error types.
//!
//! Every variant here is fatal for a run: contradictory constraint tables,
//! exhausted retry bounds, malformed time strings, or a broken calendar
//! invariant. Busy candidates during random search are not errors; the
//! assembler and the genetic operators retry those locally.

use thiserror::Error;

use crate::models::ResourceKind;
use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Fatal scheduling errors.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// A clock time did not parse as `H:MM`.
    #[error("malformed time '{value}': {reason}")]
    MalformedTime {
        /// The offending input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A day-set code contained an unknown or repeated day.
    #[error("malformed day code '{0}'")]
    MalformedDays(String),

    /// A time-slot identifier did not have the `<days>_<start>_<end>` shape.
    #[error("malformed time slot '{0}'")]
    MalformedTimeSlot(String),

    /// A course or constraint names an entity missing from the catalog.
    #[error("course {course_id} references unknown {kind} '{id}'")]
    UnknownReference {
        /// Course that holds the reference.
        course_id: String,
        /// Entity kind ("instructor", "room", "time slot").
        kind: &'static str,
        /// The missing identifier.
        id: String,
    },

    /// A forced assignment needs a resource that another forced assignment
    /// already holds at an overlapping time.
    #[error(
        "contradictory constraints: course {course_id} is forced onto {kind} '{resource_id}' \
         at {time_slot}, which course {holder} already holds"
    )]
    ConstraintConflict {
        /// Course whose constraint could not be honored.
        course_id: String,
        /// Kind of the contested resource.
        kind: ResourceKind,
        /// Contested resource.
        resource_id: String,
        /// Time slot of the failed booking.
        time_slot: String,
        /// Course already holding the resource.
        holder: String,
    },

    /// A forced room cannot seat the course's enrollment cap.
    #[error(
        "course {course_id} is forced into room '{room_id}' with capacity {capacity}, \
         below its enrollment cap {enrollment_cap}"
    )]
    ForcedRoomTooSmall {
        /// Course with the forced room.
        course_id: String,
        /// The forced room.
        room_id: String,
        /// Room capacity.
        capacity: u32,
        /// Course enrollment cap.
        enrollment_cap: u32,
    },

    /// Every candidate time slot was tried without finding a free
    /// instructor and room.
    #[error("not enough resources for {course_id}: {reason}")]
    InsufficientResources {
        /// Course that could not be placed.
        course_id: String,
        /// What ran out.
        reason: String,
    },

    /// `book` was called on a resource that is not free. This is a bug in
    /// the caller, which must `check` first.
    #[error(
        "double booking of {kind} '{resource_id}' for course {course_id} at {time_slot} \
         (held by course {holder})"
    )]
    DoubleBooking {
        /// Kind of the resource.
        kind: ResourceKind,
        /// The resource.
        resource_id: String,
        /// Course requesting the booking.
        course_id: String,
        /// Requested time slot.
        time_slot: String,
        /// Course already holding the resource.
        holder: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The catalog failed validation.
    #[error("catalog validation failed with {} error(s): {}", .0.len(), summarize(.0))]
    InvalidCatalog(Vec<ValidationError>),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

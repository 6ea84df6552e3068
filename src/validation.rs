//! Input validation for timetabling catalogs.
//!
//! Checks structural integrity of the catalog before search. Detects:
//! - Duplicate IDs (courses, instructors, rooms, time slots)
//! - Degenerate time slots (no days, end not after start)
//! - References to unknown instructors, rooms, time slots, or courses
//! - Forced-assignment rows pinning one field to two different values
//! - Attribute rows for unknown rooms/instructors, unparseable day codes
//! - Courses to place with no rooms, instructors, or time slots at all
//!
//! Contradictions that only show up when bookings collide (two forced
//! courses on one room at overlapping times, a forced room too small) are
//! reported by the assembler, which sees the calendar.

use std::collections::{HashMap, HashSet};

use crate::models::constraint::ATTR_UNAVAILABLE_DAYS;
use crate::models::{Catalog, Weekday};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A course, constraint, or attribute references an unknown entity.
    InvalidReference,
    /// A time slot has no days or does not end after it starts.
    InvalidTimeSlot,
    /// Forced-assignment rows pin one field of a course to different values.
    ContradictoryConstraint,
    /// An attribute value cannot be interpreted.
    InvalidAttribute,
    /// Courses exist but rooms, instructors, or time slots do not.
    EmptyDomain,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates a catalog.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();

    check_duplicates(
        "course",
        catalog.courses().iter().map(|c| c.id.as_str()),
        &mut errors,
    );
    check_duplicates(
        "instructor",
        catalog.instructors().iter().map(|i| i.id.as_str()),
        &mut errors,
    );
    check_duplicates(
        "room",
        catalog.rooms().iter().map(|r| r.id.as_str()),
        &mut errors,
    );
    check_duplicates(
        "time slot",
        catalog.time_slots().iter().map(|s| s.id.as_str()),
        &mut errors,
    );

    for slot in catalog.time_slots() {
        if slot.days.is_empty() || slot.end <= slot.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeSlot,
                format!("Time slot '{}' has no days or ends before it starts", slot.id),
            ));
        }
    }

    if !catalog.courses().is_empty() {
        for (what, empty) in [
            ("rooms", catalog.rooms().is_empty()),
            ("instructors", catalog.instructors().is_empty()),
            ("time slots", catalog.time_slots().is_empty()),
        ] {
            if empty {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptyDomain,
                    format!("{} courses to place but no {what}", catalog.courses().len()),
                ));
            }
        }
    }

    for course in catalog.courses() {
        for instructor in &course.qualified_instructors {
            if catalog.instructor(instructor).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidReference,
                    format!(
                        "Course '{}' lists unknown instructor '{instructor}'",
                        course.id
                    ),
                ));
            }
        }
    }

    check_forced(catalog, &mut errors);
    check_attributes(catalog, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_duplicates<'a>(
    what: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {what} ID: {id}"),
            ));
        }
    }
}

fn check_forced(catalog: &Catalog, errors: &mut Vec<ValidationError>) {
    // course → (field → first pinned value)
    let mut pinned: HashMap<&str, HashMap<&'static str, &str>> = HashMap::new();

    for row in catalog.forced_assignments() {
        let course = row.course_id.as_str();
        if catalog.course(course).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidReference,
                format!("Forced assignment targets unknown course '{course}'"),
            ));
        }

        let fields: [(&'static str, Option<&str>, bool); 3] = [
            (
                "instructor",
                row.instructor.as_deref(),
                row.instructor
                    .as_deref()
                    .is_some_and(|id| catalog.instructor(id).is_some()),
            ),
            (
                "room",
                row.room.as_deref(),
                row.room.as_deref().is_some_and(|id| catalog.room(id).is_some()),
            ),
            (
                "time slot",
                row.time_slot.as_deref(),
                row.time_slot
                    .as_deref()
                    .is_some_and(|id| catalog.time_slot(id).is_some()),
            ),
        ];

        for (field, value, known) in fields {
            let Some(value) = value else { continue };
            if !known {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidReference,
                    format!("Forced assignment for '{course}' names unknown {field} '{value}'"),
                ));
            }
            let slot = pinned.entry(course).or_default();
            match slot.get(field) {
                Some(&first) if first != value => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::ContradictoryConstraint,
                        format!(
                            "Course '{course}' is forced to {field} '{first}' and '{value}'"
                        ),
                    ));
                }
                Some(_) => {}
                None => {
                    slot.insert(field, value);
                }
            }
        }
    }
}

fn check_attributes(catalog: &Catalog, errors: &mut Vec<ValidationError>) {
    for attr in catalog.room_attributes() {
        if catalog.room(&attr.room_id).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidReference,
                format!("Room attribute '{}' for unknown room '{}'", attr.name, attr.room_id),
            ));
        }
    }

    for attr in catalog.instructor_attributes() {
        if catalog.instructor(&attr.instructor_id).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidReference,
                format!(
                    "Instructor attribute '{}' for unknown instructor '{}'",
                    attr.name, attr.instructor_id
                ),
            ));
        }
    }

    for instructor in catalog.instructors() {
        if let Some(code) = catalog.instructor_attribute(&instructor.id, ATTR_UNAVAILABLE_DAYS) {
            if Weekday::parse_days(code).is_err() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidAttribute,
                    format!(
                        "Instructor '{}' has unparseable {ATTR_UNAVAILABLE_DAYS} '{code}'",
                        instructor.id
                    ),
                ));
            }
        }
    }
}

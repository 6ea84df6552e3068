//! Per-solution resource calendar.
//!
//! Tracks which rooms and instructors are busy at which atomic time slots
//! for one solution. Each solution owns its own calendar, so solutions can
//! be assembled, crossed over, and mutated independently without locking.
//!
//! # Invariant
//! A resource is busy at an atomic slot iff some course in the owning
//! solution holds it at an overlapping time. No two courses may hold the
//! same resource at overlapping atomic slots; [`ResourceCalendar::book`]
//! refuses such a booking with [`ScheduleError::DoubleBooking`].
//!
//! # Precedence
//! Callers `check` before they `book`. A failed `check` during random search
//! is a normal retry; a failed `book` is a bug.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{AtomicSlot, TimeSlot};
use crate::error::{ScheduleError, ScheduleResult};

/// The two bookable resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A teaching room (keyed by facility ID).
    Room,
    /// An instructor.
    Instructor,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Room => f.write_str("room"),
            ResourceKind::Instructor => f.write_str("instructor"),
        }
    }
}

/// One course's hold on a resource at one atomic slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// The occupied fragment.
    pub atom: AtomicSlot,
    /// Course holding the resource.
    pub course_id: String,
}

/// Busy/free state of every room and instructor for one solution.
#[derive(Debug, Clone, Default)]
pub struct ResourceCalendar {
    bookings: HashMap<ResourceKind, HashMap<String, Vec<Booking>>>,
}

impl ResourceCalendar {
    /// Creates an empty calendar (everything free).
    pub fn new() -> Self {
        Self::default()
    }

    fn bookings_for(&self, kind: ResourceKind, resource_id: &str) -> &[Booking] {
        self.bookings
            .get(&kind)
            .and_then(|by_id| by_id.get(resource_id))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// True iff the resource is free at every given atomic slot.
    pub fn check(&self, kind: ResourceKind, resource_id: &str, atoms: &[AtomicSlot]) -> bool {
        self.holder(kind, resource_id, atoms).is_none()
    }

    /// Like [`check`](Self::check), but holds by `course_id` itself count as free.
    pub fn check_for(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        course_id: &str,
        atoms: &[AtomicSlot],
    ) -> bool {
        !self
            .bookings_for(kind, resource_id)
            .iter()
            .any(|b| b.course_id != course_id && atoms.iter().any(|a| a.overlaps(&b.atom)))
    }

    /// The course holding the resource at any of `atoms`, if any.
    pub fn holder(
        &self,
        kind: ResourceKind,
        resource_id: &str,
        atoms: &[AtomicSlot],
    ) -> Option<&str> {
        self.bookings_for(kind, resource_id)
            .iter()
            .find(|b| atoms.iter().any(|a| a.overlaps(&b.atom)))
            .map(|b| b.course_id.as_str())
    }

    /// Whether the resource is busy at a single atomic slot.
    pub fn is_busy_at(&self, kind: ResourceKind, resource_id: &str, atom: &AtomicSlot) -> bool {
        !self.check(kind, resource_id, std::slice::from_ref(atom))
    }

    /// Books `resource_id` for `course_id` across every fragment of `slot`.
    ///
    /// Fails with [`ScheduleError::DoubleBooking`] if any fragment is not free;
    /// the calendar is left unchanged in that case.
    pub fn book(
        &mut self,
        kind: ResourceKind,
        resource_id: &str,
        course_id: &str,
        slot: &TimeSlot,
    ) -> ScheduleResult<()> {
        let atoms = slot.atoms();
        if let Some(holder) = self.holder(kind, resource_id, &atoms) {
            return Err(ScheduleError::DoubleBooking {
                kind,
                resource_id: resource_id.to_string(),
                course_id: course_id.to_string(),
                time_slot: slot.id.clone(),
                holder: holder.to_string(),
            });
        }

        let entry = self
            .bookings
            .entry(kind)
            .or_default()
            .entry(resource_id.to_string())
            .or_default();
        entry.extend(atoms.into_iter().map(|atom| Booking {
            atom,
            course_id: course_id.to_string(),
        }));
        Ok(())
    }

    /// Releases every hold `course_id` has on `resource_id`.
    ///
    /// Returns the number of atomic slots freed.
    pub fn free(&mut self, kind: ResourceKind, resource_id: &str, course_id: &str) -> usize {
        let Some(list) = self
            .bookings
            .get_mut(&kind)
            .and_then(|by_id| by_id.get_mut(resource_id))
        else {
            return 0;
        };
        let before = list.len();
        list.retain(|b| b.course_id != course_id);
        before - list.len()
    }

    /// Number of atomic bookings held on a resource.
    pub fn booking_count(&self, kind: ResourceKind, resource_id: &str) -> usize {
        self.bookings_for(kind, resource_id).len()
    }

    /// Total atomic bookings across all resources of a kind.
    pub fn total_bookings(&self, kind: ResourceKind) -> usize {
        self.bookings
            .get(&kind)
            .map(|by_id| by_id.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Weekday;

    fn slot(id: &str) -> TimeSlot {
        TimeSlot::parse(id).unwrap()
    }

    #[test]
    fn test_empty_calendar_is_free() {
        let cal = ResourceCalendar::new();
        let s = slot("MWF_9:10_10:00");
        assert!(cal.check(ResourceKind::Room, "R1", &s.atoms()));
        assert_eq!(cal.total_bookings(ResourceKind::Room), 0);
    }

    #[test]
    fn test_book_marks_every_fragment() {
        let mut cal = ResourceCalendar::new();
        let s = slot("MWF_9:10_10:00");
        cal.book(ResourceKind::Room, "R1", "C1", &s).unwrap();

        assert_eq!(cal.booking_count(ResourceKind::Room, "R1"), 3);
        for atom in s.atoms() {
            assert!(cal.is_busy_at(ResourceKind::Room, "R1", &atom));
        }
        // other resource and other kind unaffected
        assert!(cal.check(ResourceKind::Room, "R2", &s.atoms()));
        assert!(cal.check(ResourceKind::Instructor, "R1", &s.atoms()));
    }

    #[test]
    fn test_overlapping_pattern_is_busy() {
        let mut cal = ResourceCalendar::new();
        cal.book(ResourceKind::Instructor, "I1", "C1", &slot("MWF_9:10_10:00"))
            .unwrap();

        assert!(!cal.check(ResourceKind::Instructor, "I1", &slot("MW_9:30_10:45").atoms()));
        assert!(cal.check(ResourceKind::Instructor, "I1", &slot("TTh_9:30_10:45").atoms()));
        // touching boundary is free
        assert!(cal.check(ResourceKind::Instructor, "I1", &slot("MWF_10:00_10:50").atoms()));
        assert_eq!(
            cal.holder(ResourceKind::Instructor, "I1", &slot("F_9:00_9:30").atoms()),
            Some("C1")
        );
    }

    #[test]
    fn test_double_booking_is_rejected() {
        let mut cal = ResourceCalendar::new();
        cal.book(ResourceKind::Room, "R1", "C1", &slot("TTh_12:45_14:00"))
            .unwrap();
        let err = cal
            .book(ResourceKind::Room, "R1", "C2", &slot("Th_13:00_14:00"))
            .unwrap_err();
        match err {
            ScheduleError::DoubleBooking { holder, course_id, .. } => {
                assert_eq!(holder, "C1");
                assert_eq!(course_id, "C2");
            }
            other => panic!("unexpected error: {other}"),
        }
        // unchanged after the failed booking
        assert_eq!(cal.booking_count(ResourceKind::Room, "R1"), 2);
    }

    #[test]
    fn test_free_releases_only_that_course() {
        let mut cal = ResourceCalendar::new();
        cal.book(ResourceKind::Room, "R1", "C1", &slot("MW_8:00_9:00")).unwrap();
        cal.book(ResourceKind::Room, "R1", "C2", &slot("MW_9:00_10:00")).unwrap();

        assert_eq!(cal.free(ResourceKind::Room, "R1", "C1"), 2);
        assert_eq!(cal.free(ResourceKind::Room, "R1", "C1"), 0);
        assert_eq!(cal.free(ResourceKind::Room, "R9", "C1"), 0);

        let monday_eight = AtomicSlot::new(
            Weekday::Monday,
            "8:00".parse().unwrap(),
            "9:00".parse().unwrap(),
        );
        assert!(!cal.is_busy_at(ResourceKind::Room, "R1", &monday_eight));
        assert_eq!(cal.booking_count(ResourceKind::Room, "R1"), 2);
    }

    #[test]
    fn test_check_for_ignores_own_holds() {
        let mut cal = ResourceCalendar::new();
        let s = slot("TTh_8:00_9:15");
        cal.book(ResourceKind::Room, "R1", "C1", &s).unwrap();
        assert!(cal.check_for(ResourceKind::Room, "R1", "C1", &s.atoms()));
        assert!(!cal.check_for(ResourceKind::Room, "R1", "C2", &s.atoms()));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = ResourceCalendar::new();
        a.book(ResourceKind::Room, "R1", "C1", &slot("M_8:00_9:00")).unwrap();
        let mut b = a.clone();
        b.free(ResourceKind::Room, "R1", "C1");
        assert_eq!(a.booking_count(ResourceKind::Room, "R1"), 1);
        assert_eq!(b.booking_count(ResourceKind::Room, "R1"), 0);
    }
}

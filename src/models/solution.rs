//! Solution (candidate timetable) model.
//!
//! A solution assigns every catalog course exactly one time slot, instructor,
//! and room. It owns its [`ResourceCalendar`], and every change to an
//! assignment goes through methods that keep the two consistent: a field is
//! rebooked only if the new resource is free, otherwise the old booking is
//! restored and the change is refused.
//!
//! Fields pinned by a forced assignment are never changed here.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::{ClockTime, Course, Instructor, ResourceCalendar, ResourceKind, Room, TimeSlot};
use crate::error::ScheduleResult;

/// Which assignment fields were pinned by constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedFlags {
    /// Time slot pinned.
    pub time_slot: bool,
    /// Instructor pinned.
    pub instructor: bool,
    /// Room pinned.
    pub room: bool,
}

impl ForcedFlags {
    /// Whether `field` is pinned.
    pub fn is_forced(&self, field: AssignmentField) -> bool {
        match field {
            AssignmentField::TimeSlot => self.time_slot,
            AssignmentField::Instructor => self.instructor,
            AssignmentField::Room => self.room,
        }
    }
}

/// A mutable field of a course assignment (a gene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentField {
    TimeSlot,
    Instructor,
    Room,
}

impl AssignmentField {
    /// All fields, in a fixed order.
    pub const ALL: [AssignmentField; 3] = [
        AssignmentField::TimeSlot,
        AssignmentField::Instructor,
        AssignmentField::Room,
    ];
}

/// One course's assignment within a solution.
///
/// Display fields (names, buildings, capacities) are denormalized from the
/// catalog at assignment time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseAssignment {
    /// Course ID.
    pub course_id: String,
    /// Catalog course ID.
    pub catalog_id: String,
    /// Section.
    pub section: String,
    /// Class number.
    pub class_nbr: String,
    /// Subject + number.
    pub subject_number: String,
    /// Course department.
    pub department: String,
    /// Enrollment cap.
    pub enrollment_cap: u32,
    /// Assigned time slot.
    pub slot: TimeSlot,
    /// Assigned instructor ID.
    pub instructor_id: String,
    /// Instructor display name.
    pub instructor_name: String,
    /// Instructor home building.
    pub instructor_building: String,
    /// Assigned room (facility ID).
    pub room_id: String,
    /// Room building.
    pub building: String,
    /// Room capacity.
    pub room_capacity: u32,
    /// Pinned fields.
    pub forced: ForcedFlags,
}

impl CourseAssignment {
    /// Creates an assignment, copying display fields from the catalog entities.
    pub fn new(
        course: &Course,
        slot: &TimeSlot,
        instructor: &Instructor,
        room: &Room,
        forced: ForcedFlags,
    ) -> Self {
        let mut a = Self {
            course_id: course.id.clone(),
            catalog_id: course.catalog_id.clone(),
            section: course.section.clone(),
            class_nbr: course.class_nbr.clone(),
            subject_number: course.subject_number.clone(),
            department: course.department.clone(),
            enrollment_cap: course.enrollment_cap,
            slot: slot.clone(),
            instructor_id: String::new(),
            instructor_name: String::new(),
            instructor_building: String::new(),
            room_id: String::new(),
            building: String::new(),
            room_capacity: 0,
            forced,
        };
        a.set_instructor_fields(instructor);
        a.set_room_fields(room);
        a
    }

    fn set_instructor_fields(&mut self, instructor: &Instructor) {
        self.instructor_id = instructor.id.clone();
        self.instructor_name = instructor.display_name().to_string();
        self.instructor_building = instructor.building.clone();
    }

    fn set_room_fields(&mut self, room: &Room) {
        self.room_id = room.id.clone();
        self.building = room.building.clone();
        self.room_capacity = room.capacity;
    }

    /// Start time.
    #[inline]
    pub fn start(&self) -> ClockTime {
        self.slot.start
    }

    /// Value of a display field.
    pub fn display_value(&self, field: DisplayField) -> String {
        match field {
            DisplayField::CourseId => self.catalog_id.clone(),
            DisplayField::Section => self.section.clone(),
            DisplayField::ClassNbr => self.class_nbr.clone(),
            DisplayField::SubjectNumber => self.subject_number.clone(),
            DisplayField::TimeSlot => self.slot.id.clone(),
            DisplayField::Days => super::day_code(&self.slot.days),
            DisplayField::StartTime => self.slot.start.to_string(),
            DisplayField::EndTime => self.slot.end.to_string(),
            DisplayField::Facility => self.room_id.clone(),
            DisplayField::Building => self.building.clone(),
            DisplayField::RoomCapacity => self.room_capacity.to_string(),
            DisplayField::Instructor => self.instructor_id.clone(),
            DisplayField::InstructorName => self.instructor_name.clone(),
            DisplayField::InstructorBuilding => self.instructor_building.clone(),
            DisplayField::EnrollmentCap => self.enrollment_cap.to_string(),
        }
    }
}

/// Columns available to the output collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayField {
    CourseId,
    Section,
    ClassNbr,
    SubjectNumber,
    TimeSlot,
    Days,
    StartTime,
    EndTime,
    Facility,
    Building,
    RoomCapacity,
    Instructor,
    InstructorName,
    InstructorBuilding,
    EnrollmentCap,
}

impl DisplayField {
    /// Every column, in default display order.
    pub const ALL: [DisplayField; 15] = [
        DisplayField::CourseId,
        DisplayField::Section,
        DisplayField::ClassNbr,
        DisplayField::SubjectNumber,
        DisplayField::TimeSlot,
        DisplayField::Days,
        DisplayField::StartTime,
        DisplayField::EndTime,
        DisplayField::Facility,
        DisplayField::Building,
        DisplayField::RoomCapacity,
        DisplayField::Instructor,
        DisplayField::InstructorName,
        DisplayField::InstructorBuilding,
        DisplayField::EnrollmentCap,
    ];

    /// Column header.
    pub fn header(self) -> &'static str {
        match self {
            DisplayField::CourseId => "Course ID",
            DisplayField::Section => "Section",
            DisplayField::ClassNbr => "Class Nbr",
            DisplayField::SubjectNumber => "Class Subject + Nbr",
            DisplayField::TimeSlot => "Time Slot",
            DisplayField::Days => "Days",
            DisplayField::StartTime => "Start Time",
            DisplayField::EndTime => "End Time",
            DisplayField::Facility => "Facility ID",
            DisplayField::Building => "Building",
            DisplayField::RoomCapacity => "Room Capacity",
            DisplayField::Instructor => "Instructor",
            DisplayField::InstructorName => "Instructor Name",
            DisplayField::InstructorBuilding => "Instructor Building",
            DisplayField::EnrollmentCap => "Enrollment Cap",
        }
    }
}

/// One ordered output row; serializes as a map of header → value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// (header, value) pairs in column order.
    pub cells: Vec<(&'static str, String)>,
}

impl DisplayRow {
    /// Value under a header.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| *h == header)
            .map(|(_, v)| v.as_str())
    }
}

impl Serialize for DisplayRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, value) in &self.cells {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

/// A pair of courses holding the same resource at overlapping times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Contested resource kind.
    pub kind: ResourceKind,
    /// Contested resource.
    pub resource_id: String,
    /// First course.
    pub first: String,
    /// Second course.
    pub second: String,
}

/// A complete candidate timetable.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    assignments: Vec<CourseAssignment>,
    calendar: ResourceCalendar,
    score: Option<i64>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty solution with a pre-populated calendar.
    pub fn with_calendar(calendar: ResourceCalendar) -> Self {
        Self {
            calendar,
            ..Self::default()
        }
    }

    /// Assignments in catalog course order.
    pub fn assignments(&self) -> &[CourseAssignment] {
        &self.assignments
    }

    /// The solution's resource calendar.
    pub fn calendar(&self) -> &ResourceCalendar {
        &self.calendar
    }

    /// Assignment for a course.
    pub fn assignment_for(&self, course_id: &str) -> Option<&CourseAssignment> {
        self.assignments.iter().find(|a| a.course_id == course_id)
    }

    /// Number of assigned courses.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no course is assigned.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Fitness from the most recent evaluation.
    pub fn score(&self) -> Option<i64> {
        self.score
    }

    /// Records a fitness score.
    pub fn set_score(&mut self, score: i64) {
        self.score = Some(score);
    }

    /// Drops the score after the solution changes.
    pub fn clear_score(&mut self) {
        self.score = None;
    }

    /// Books the assignment's instructor and room, then appends it.
    ///
    /// Bookings the course already holds (from a forced pre-pass) are
    /// released and rebooked, so placing is idempotent per course.
    pub fn place(&mut self, assignment: CourseAssignment) -> ScheduleResult<()> {
        let course_id = assignment.course_id.as_str();
        self.calendar
            .free(ResourceKind::Instructor, &assignment.instructor_id, course_id);
        self.calendar
            .free(ResourceKind::Room, &assignment.room_id, course_id);
        self.calendar.book(
            ResourceKind::Instructor,
            &assignment.instructor_id,
            course_id,
            &assignment.slot,
        )?;
        if let Err(e) = self.calendar.book(
            ResourceKind::Room,
            &assignment.room_id,
            course_id,
            &assignment.slot,
        ) {
            self.calendar
                .free(ResourceKind::Instructor, &assignment.instructor_id, course_id);
            return Err(e);
        }
        self.assignments.push(assignment);
        self.score = None;
        Ok(())
    }

    /// Reorders assignments by `key`. Bookings are keyed by course and do not move.
    pub fn sort_assignments_by_key<K: Ord>(&mut self, key: impl FnMut(&CourseAssignment) -> K) {
        self.assignments.sort_by_key(key);
    }

    /// Moves course `idx` to `room` if the room is free at its time slot.
    ///
    /// Returns `Ok(false)` when the room is busy, unchanged, the field is forced,
    /// or `idx` is out of range.
    pub fn try_set_room(&mut self, idx: usize, room: &Room) -> ScheduleResult<bool> {
        let Some(a) = self.assignments.get(idx) else {
            return Ok(false);
        };
        if a.forced.room || a.room_id == room.id {
            return Ok(false);
        }
        let (course_id, old_room, slot) = (a.course_id.clone(), a.room_id.clone(), a.slot.clone());

        self.calendar.free(ResourceKind::Room, &old_room, &course_id);
        if !self.calendar.check(ResourceKind::Room, &room.id, &slot.atoms()) {
            self.calendar
                .book(ResourceKind::Room, &old_room, &course_id, &slot)?;
            return Ok(false);
        }
        self.calendar
            .book(ResourceKind::Room, &room.id, &course_id, &slot)?;
        self.assignments[idx].set_room_fields(room);
        self.score = None;
        Ok(true)
    }

    /// Moves course `idx` to `instructor` if they are free at its time slot.
    ///
    /// Returns `Ok(false)` when the instructor is busy, unchanged, the field is
    /// forced, or `idx` is out of range.
    pub fn try_set_instructor(
        &mut self,
        idx: usize,
        instructor: &Instructor,
    ) -> ScheduleResult<bool> {
        let Some(a) = self.assignments.get(idx) else {
            return Ok(false);
        };
        if a.forced.instructor || a.instructor_id == instructor.id {
            return Ok(false);
        }
        let (course_id, old, slot) =
            (a.course_id.clone(), a.instructor_id.clone(), a.slot.clone());

        self.calendar.free(ResourceKind::Instructor, &old, &course_id);
        if !self
            .calendar
            .check(ResourceKind::Instructor, &instructor.id, &slot.atoms())
        {
            self.calendar
                .book(ResourceKind::Instructor, &old, &course_id, &slot)?;
            return Ok(false);
        }
        self.calendar
            .book(ResourceKind::Instructor, &instructor.id, &course_id, &slot)?;
        self.assignments[idx].set_instructor_fields(instructor);
        self.score = None;
        Ok(true)
    }

    /// Moves course `idx` to `slot` if its instructor and room are both free then.
    ///
    /// Returns `Ok(false)` when either is busy, the slot is unchanged, the field
    /// is forced, or `idx` is out of range.
    pub fn try_set_time_slot(&mut self, idx: usize, slot: &TimeSlot) -> ScheduleResult<bool> {
        let Some(a) = self.assignments.get(idx) else {
            return Ok(false);
        };
        if a.forced.time_slot || a.slot.id == slot.id {
            return Ok(false);
        }
        let (course_id, instructor, room, old_slot) = (
            a.course_id.clone(),
            a.instructor_id.clone(),
            a.room_id.clone(),
            a.slot.clone(),
        );

        self.calendar
            .free(ResourceKind::Instructor, &instructor, &course_id);
        self.calendar.free(ResourceKind::Room, &room, &course_id);

        let atoms = slot.atoms();
        let target = if self.calendar.check(ResourceKind::Instructor, &instructor, &atoms)
            && self.calendar.check(ResourceKind::Room, &room, &atoms)
        {
            slot
        } else {
            &old_slot
        };
        self.calendar
            .book(ResourceKind::Instructor, &instructor, &course_id, target)?;
        self.calendar
            .book(ResourceKind::Room, &room, &course_id, target)?;

        if target.id == old_slot.id {
            return Ok(false);
        }
        self.assignments[idx].slot = slot.clone();
        self.score = None;
        Ok(true)
    }

    /// Ordered display rows for the given columns.
    pub fn display_rows(&self, fields: &[DisplayField]) -> Vec<DisplayRow> {
        self.assignments
            .iter()
            .map(|a| DisplayRow {
                cells: fields
                    .iter()
                    .map(|&f| (f.header(), a.display_value(f)))
                    .collect(),
            })
            .collect()
    }

    /// Pairs of courses that hold the same instructor or room at
    /// overlapping times, computed from the assignments alone.
    ///
    /// Empty for every solution built through this type's methods.
    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut out = Vec::new();
        for (i, a) in self.assignments.iter().enumerate() {
            for b in &self.assignments[i + 1..] {
                if !a.slot.overlaps(&b.slot) {
                    continue;
                }
                if a.instructor_id == b.instructor_id {
                    out.push(Conflict {
                        kind: ResourceKind::Instructor,
                        resource_id: a.instructor_id.clone(),
                        first: a.course_id.clone(),
                        second: b.course_id.clone(),
                    });
                }
                if a.room_id == b.room_id {
                    out.push(Conflict {
                        kind: ResourceKind::Room,
                        resource_id: a.room_id.clone(),
                        first: a.course_id.clone(),
                        second: b.course_id.clone(),
                    });
                }
            }
        }
        out
    }
}

//! Catalog store.
//!
//! Static reference data for one run: courses, instructors, rooms, the
//! time-slot universe, and the four constraint tables. Built once by the
//! ingestion layer and read-only during search, so it is shared by
//! reference across threads without locking.
//!
//! # Ordering
//! Entities keep insertion order. Course iteration order during assembly is
//! catalog order, and random choices index into these vectors, so a fixed
//! seed reproduces the same run.
//!
//! Lookups by ID resolve to the first entity inserted with that ID;
//! duplicates are kept so that [`crate::validation::validate_catalog`] can
//! report them.

use std::collections::HashMap;

use super::constraint::{is_truthy, ATTR_LAB, ATTR_UNAVAILABLE_DAYS};
use super::{
    Course, FitnessTable, ForcedAssignment, Instructor, InstructorAttribute, Room,
    RoomAttribute, TimeSlot, Weekday,
};

/// Read-only reference data for scheduling.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    instructors: Vec<Instructor>,
    rooms: Vec<Room>,
    time_slots: Vec<TimeSlot>,
    forced: Vec<ForcedAssignment>,
    fitness: FitnessTable,
    room_attributes: Vec<RoomAttribute>,
    instructor_attributes: Vec<InstructorAttribute>,

    course_index: HashMap<String, usize>,
    instructor_index: HashMap<String, usize>,
    room_index: HashMap<String, usize>,
    slot_index: HashMap<String, usize>,
    forced_index: HashMap<String, ForcedAssignment>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // ---- builders ----

    /// Adds a course.
    pub fn with_course(mut self, course: Course) -> Self {
        self.add_course(course);
        self
    }

    /// Adds an instructor.
    pub fn with_instructor(mut self, instructor: Instructor) -> Self {
        self.add_instructor(instructor);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.add_room(room);
        self
    }

    /// Adds a time slot to the universe.
    pub fn with_time_slot(mut self, slot: TimeSlot) -> Self {
        self.add_time_slot(slot);
        self
    }

    /// Adds a forced-assignment row.
    pub fn with_forced(mut self, forced: ForcedAssignment) -> Self {
        self.add_forced(forced);
        self
    }

    /// Replaces the fitness table.
    pub fn with_fitness_table(mut self, table: FitnessTable) -> Self {
        self.fitness = table;
        self
    }

    /// Adds a room attribute row.
    pub fn with_room_attribute(mut self, attr: RoomAttribute) -> Self {
        self.room_attributes.push(attr);
        self
    }

    /// Adds an instructor attribute row.
    pub fn with_instructor_attribute(mut self, attr: InstructorAttribute) -> Self {
        self.instructor_attributes.push(attr);
        self
    }

    /// Adds a course.
    pub fn add_course(&mut self, course: Course) {
        self.course_index
            .entry(course.id.clone())
            .or_insert(self.courses.len());
        self.courses.push(course);
    }

    /// Adds an instructor.
    pub fn add_instructor(&mut self, instructor: Instructor) {
        self.instructor_index
            .entry(instructor.id.clone())
            .or_insert(self.instructors.len());
        self.instructors.push(instructor);
    }

    /// Adds a room.
    pub fn add_room(&mut self, room: Room) {
        self.room_index
            .entry(room.id.clone())
            .or_insert(self.rooms.len());
        self.rooms.push(room);
    }

    /// Adds a time slot.
    pub fn add_time_slot(&mut self, slot: TimeSlot) {
        self.slot_index
            .entry(slot.id.clone())
            .or_insert(self.time_slots.len());
        self.time_slots.push(slot);
    }

    /// Adds a forced-assignment row, merging with earlier rows for the same course.
    pub fn add_forced(&mut self, forced: ForcedAssignment) {
        self.forced_index
            .entry(forced.course_id.clone())
            .and_modify(|existing| existing.merge(&forced))
            .or_insert_with(|| forced.clone());
        self.forced.push(forced);
    }

    // ---- accessors ----

    /// Courses in catalog order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Instructors in catalog order.
    pub fn instructors(&self) -> &[Instructor] {
        &self.instructors
    }

    /// Rooms in catalog order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// The time-slot universe.
    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    /// Raw forced-assignment rows.
    pub fn forced_assignments(&self) -> &[ForcedAssignment] {
        &self.forced
    }

    /// Penalty table.
    pub fn fitness_table(&self) -> &FitnessTable {
        &self.fitness
    }

    /// Raw room attribute rows.
    pub fn room_attributes(&self) -> &[RoomAttribute] {
        &self.room_attributes
    }

    /// Raw instructor attribute rows.
    pub fn instructor_attributes(&self) -> &[InstructorAttribute] {
        &self.instructor_attributes
    }

    /// Looks up a course.
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.course_index.get(id).map(|&i| &self.courses[i])
    }

    /// Catalog position of a course.
    pub fn course_position(&self, id: &str) -> Option<usize> {
        self.course_index.get(id).copied()
    }

    /// Looks up an instructor.
    pub fn instructor(&self, id: &str) -> Option<&Instructor> {
        self.instructor_index.get(id).map(|&i| &self.instructors[i])
    }

    /// Looks up a room.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.room_index.get(id).map(|&i| &self.rooms[i])
    }

    /// Looks up a time slot.
    pub fn time_slot(&self, id: &str) -> Option<&TimeSlot> {
        self.slot_index.get(id).map(|&i| &self.time_slots[i])
    }

    /// Merged forced assignment for a course, if any row targets it.
    pub fn forced_for(&self, course_id: &str) -> Option<&ForcedAssignment> {
        self.forced_index.get(course_id)
    }

    /// Instructor IDs eligible for a course.
    ///
    /// An empty qualified list means every catalog instructor is eligible.
    pub fn qualified_pool<'a>(&'a self, course: &'a Course) -> Vec<&'a str> {
        if course.qualified_instructors.is_empty() {
            self.instructors.iter().map(|i| i.id.as_str()).collect()
        } else {
            course.qualified_instructors.iter().map(|s| s.as_str()).collect()
        }
    }

    /// Value of a room attribute, from the attribute table or the room itself.
    pub fn room_attribute(&self, room_id: &str, name: &str) -> Option<&str> {
        self.room_attributes
            .iter()
            .rev()
            .find(|a| a.room_id == room_id && a.name == name)
            .map(|a| a.value.as_str())
            .or_else(|| {
                self.room(room_id)
                    .and_then(|r| r.attributes.get(name))
                    .map(|v| v.as_str())
            })
    }

    /// Value of an instructor attribute, from the attribute table or the instructor itself.
    pub fn instructor_attribute(&self, instructor_id: &str, name: &str) -> Option<&str> {
        self.instructor_attributes
            .iter()
            .rev()
            .find(|a| a.instructor_id == instructor_id && a.name == name)
            .map(|a| a.value.as_str())
            .or_else(|| {
                self.instructor(instructor_id)
                    .and_then(|i| i.attributes.get(name))
                    .map(|v| v.as_str())
            })
    }

    /// Whether a room supports lab sections.
    pub fn room_supports_lab(&self, room_id: &str) -> bool {
        self.room(room_id).is_some_and(|r| r.lab)
            || self.room_attribute(room_id, ATTR_LAB).is_some_and(is_truthy)
    }

    /// Days an instructor marked unavailable. Unparseable codes yield no days.
    pub fn instructor_unavailable_days(&self, instructor_id: &str) -> Vec<Weekday> {
        self.instructor_attribute(instructor_id, ATTR_UNAVAILABLE_DAYS)
            .and_then(|code| Weekday::parse_days(code).ok())
            .unwrap_or_default()
    }
}

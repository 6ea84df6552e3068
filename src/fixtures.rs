//! Shared catalogs for unit tests.

use crate::models::constraint::{
    DEPARTMENT_PROXIMITY, INSTRUCTOR_PROXIMITY, INSTRUCTOR_UNAVAILABLE_DAY, LAB_MISMATCH,
    TIME_OF_DAY, WASTED_CAPACITY,
};
use crate::models::{
    Catalog, Course, FitnessTable, ForcedAssignment, Instructor, InstructorAttribute, Room,
    TimeSlot,
};

/// Routes `log` output to the test harness; set `RUST_LOG` to see it.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn slot(id: &str) -> TimeSlot {
    TimeSlot::parse(id).unwrap()
}

pub(crate) fn penalties() -> FitnessTable {
    FitnessTable::new()
        .with_penalty(INSTRUCTOR_PROXIMITY, 10)
        .with_penalty(DEPARTMENT_PROXIMITY, 20)
        .with_penalty(TIME_OF_DAY, 5)
        .with_penalty(WASTED_CAPACITY, 15)
        .with_penalty(LAB_MISMATCH, 40)
        .with_penalty(INSTRUCTOR_UNAVAILABLE_DAY, 25)
}

/// 3 courses, 2 rooms, 2 instructors qualified for everything, 4 time slots.
pub(crate) fn small_catalog() -> Catalog {
    let mut cat = Catalog::new();
    for n in 1..=3 {
        cat.add_course(
            Course::new(format!("C{n}"), "001")
                .with_subject_number(format!("CS {n}00"))
                .with_enrollment_cap(30)
                .with_department("SICCS")
                .with_instructor("I1")
                .with_instructor("I2"),
        );
    }
    cat.with_instructor(Instructor::new("I1").with_building("SICCS"))
        .with_instructor(Instructor::new("I2").with_building("SICCS"))
        .with_room(Room::new("R-1", 40))
        .with_room(Room::new("R-2", 40))
        .with_time_slot(slot("MWF_9:10_10:00"))
        .with_time_slot(slot("MWF_10:20_11:10"))
        .with_time_slot(slot("TTh_9:35_10:50"))
        .with_time_slot(slot("TTh_11:10_12:25"))
        .with_fitness_table(penalties())
}

/// One course forced onto instructor I1, room R-1 (capacity == cap), slot MWF 9:10.
pub(crate) fn exact_fit_catalog() -> Catalog {
    Catalog::new()
        .with_course(
            Course::new("C1", "001")
                .with_enrollment_cap(30)
                .with_department("R")
                .with_instructor("I1"),
        )
        .with_instructor(Instructor::new("I1").with_building("R"))
        .with_room(Room::new("R-1", 30))
        .with_time_slot(slot("MWF_9:10_10:00"))
        .with_forced(
            ForcedAssignment::new("C1_001")
                .with_instructor("I1")
                .with_room("R-1")
                .with_time_slot("MWF_9:10_10:00"),
        )
        .with_fitness_table(penalties())
}

/// One course with cap 60 forced into a 50-seat room.
pub(crate) fn undersized_forced_room_catalog() -> Catalog {
    Catalog::new()
        .with_course(Course::new("C1", "001").with_enrollment_cap(60))
        .with_instructor(Instructor::new("I1"))
        .with_room(Room::new("Y-1", 50))
        .with_room(Room::new("Z-1", 80))
        .with_time_slot(slot("MWF_9:10_10:00"))
        .with_forced(ForcedAssignment::new("C1_001").with_room("Y-1"))
}

/// C1 may use I1 or I2; C2 is forced onto I1 without a time. One slot, two rooms.
pub(crate) fn forced_instructor_catalog() -> Catalog {
    Catalog::new()
        .with_course(
            Course::new("C1", "001")
                .with_enrollment_cap(20)
                .with_instructor("I1")
                .with_instructor("I2"),
        )
        .with_course(
            Course::new("C2", "001")
                .with_enrollment_cap(20)
                .with_instructor("I1"),
        )
        .with_instructor(Instructor::new("I1"))
        .with_instructor(Instructor::new("I2"))
        .with_room(Room::new("R-1", 30))
        .with_room(Room::new("R-2", 30))
        .with_time_slot(slot("MWF_9:10_10:00"))
        .with_forced(ForcedAssignment::new("C2_001").with_instructor("I1"))
        .with_fitness_table(penalties())
}

/// Two departments, mixed rooms, a lab course, a forced lab, and an
/// instructor who avoids Fridays.
pub(crate) fn department_catalog() -> Catalog {
    Catalog::new()
        .with_course(
            Course::new("CS126", "001")
                .with_subject_number("CS 126")
                .with_enrollment_cap(35)
                .with_department("SICCS")
                .with_instructors(vec!["I1".into(), "I2".into()]),
        )
        .with_course(
            Course::new("CS126", "002")
                .with_subject_number("CS 126")
                .with_enrollment_cap(35)
                .with_department("SICCS")
                .with_instructors(vec!["I1".into(), "I2".into()]),
        )
        .with_course(
            Course::new("CS136", "001")
                .with_subject_number("CS 136")
                .with_enrollment_cap(24)
                .with_department("SICCS")
                .with_instructor("I2")
                .with_lab(),
        )
        .with_course(
            Course::new("EE110", "001")
                .with_subject_number("EE 110")
                .with_enrollment_cap(55)
                .with_department("ENG")
                .with_instructors(vec!["I3".into(), "I4".into()]),
        )
        .with_course(
            Course::new("EE188", "001")
                .with_subject_number("EE 188")
                .with_enrollment_cap(28)
                .with_department("ENG")
                .with_instructors(vec!["I3".into(), "I4".into()]),
        )
        .with_course(
            Course::new("EE188L", "001")
                .with_subject_number("EE 188L")
                .with_enrollment_cap(20)
                .with_department("ENG")
                .with_instructor("I4")
                .with_lab(),
        )
        .with_instructor(Instructor::new("I1").with_name("Ada").with_building("SICCS"))
        .with_instructor(Instructor::new("I2").with_name("Grace").with_building("SICCS"))
        .with_instructor(Instructor::new("I3").with_name("Nikola").with_building("ENG"))
        .with_instructor(Instructor::new("I4").with_name("Hedy").with_building("ENG"))
        .with_instructor_attribute(InstructorAttribute::new("I3", "unavailable_days", "F"))
        .with_room(Room::new("SICCS-101", 40))
        .with_room(Room::new("SICCS-110", 24).with_lab())
        .with_room(Room::new("ENG-201", 60))
        .with_room(Room::new("ENG-120", 30))
        .with_room(Room::new("ENG-130", 22).with_lab())
        .with_time_slot(slot("MWF_8:00_8:50"))
        .with_time_slot(slot("MWF_9:10_10:00"))
        .with_time_slot(slot("MWF_10:20_11:10"))
        .with_time_slot(slot("MW_9:30_10:45"))
        .with_time_slot(slot("TTh_9:35_10:50"))
        .with_time_slot(slot("TTh_12:45_14:00"))
        .with_time_slot(slot("TTh_17:30_18:45"))
        .with_forced(
            ForcedAssignment::new("EE188L_001")
                .with_room("ENG-130")
                .with_time_slot("TTh_12:45_14:00"),
        )
        .with_forced(ForcedAssignment::new("EE188L_001").with_instructor("I4"))
        .with_fitness_table(penalties())
}

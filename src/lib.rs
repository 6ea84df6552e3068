//! Genetic-algorithm course timetabling.
//!
//! Assigns every course section a weekly time slot, a qualified instructor,
//! and a room, such that no instructor or room is double-booked, then
//! improves the timetable against soft preferences (proximity, time of day,
//! room-size fit) with a generational genetic search.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Catalog`, `Course`, `Instructor`, `Room`,
//!   `TimeSlot`, `ResourceCalendar`, `Solution`, constraint tables
//! - **`validation`**: Catalog integrity checks (duplicate IDs, dangling
//!   references, contradictory forced rows)
//! - **`ga`**: Solution assembly, fitness, genetic operators, and the
//!   population state machine
//! - **`error`**: The fatal error taxonomy
//!
//! # Example
//!
//! ```
//! use u_timetable::ga::GaConfig;
//! use u_timetable::models::{Catalog, Course, Instructor, Room, TimeSlot};
//!
//! let catalog = Catalog::new()
//!     .with_course(Course::new("CS126", "001").with_enrollment_cap(30))
//!     .with_instructor(Instructor::new("I1"))
//!     .with_room(Room::new("SBS-101", 40))
//!     .with_time_slot(TimeSlot::parse("MWF_9:10_10:00").unwrap());
//!
//! let config = GaConfig::default()
//!     .with_population_size(8)
//!     .with_survivor_count(4)
//!     .with_generations(3)
//!     .with_seed(1);
//! let result = u_timetable::schedule(&catalog, &config).unwrap();
//! let best = result.best().unwrap();
//! assert_eq!(best.solution.assignments()[0].room_id, "SBS-101");
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"

pub mod error;
pub mod ga;
pub mod models;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{ScheduleError, ScheduleResult};
pub use ga::{schedule, GaConfig, GaResult};

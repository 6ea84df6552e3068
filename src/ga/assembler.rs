//! Solution assembler: builds one complete, conflict-free timetable.
//!
//! # Algorithm
//!
//! 1. Resolve every course's forced instructor/room/time slot against the
//!    catalog. A forced room below the course's enrollment cap is fatal.
//! 2. Book forced resources for courses with a forced time slot into a base
//!    calendar, so random choices can never collide with them. A booking
//!    that finds the resource busy means two constraints contradict each
//!    other; that is fatal.
//! 3. Place courses with any forced field first, then the rest, each group
//!    in catalog order. A course pinned to an instructor or room but not to
//!    a time must claim that resource before unconstrained courses can take
//!    every slot it is free in. For each course, draw time slots uniformly
//!    from the untried ones (the forced slot only, if pinned). At each slot, draw
//!    instructors from the qualified pool and rooms from the catalog, again
//!    without replacement, keeping the first free one of each. Room capacity
//!    is not considered here; the fitness evaluator judges it.
//! 4. Book the winning instructor and room across the slot's atomic
//!    fragments. If every slot is exhausted the course cannot be placed and
//!    the run fails with "not enough resources".
//!
//! Steps 1-2 run once per assembler; the base calendar is cloned into each
//! new solution. Finished solutions list assignments in catalog order.

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{
    Catalog, Course, CourseAssignment, ForcedFlags, Instructor, ResourceCalendar, ResourceKind,
    Room, Solution, TimeSlot,
};

/// A course with its constraint references resolved.
#[derive(Debug, Clone)]
struct CoursePlan<'a> {
    course: &'a Course,
    pool: Vec<&'a Instructor>,
    instructor: Option<&'a Instructor>,
    room: Option<&'a Room>,
    slot: Option<&'a TimeSlot>,
}

impl CoursePlan<'_> {
    fn flags(&self) -> ForcedFlags {
        ForcedFlags {
            time_slot: self.slot.is_some(),
            instructor: self.instructor.is_some(),
            room: self.room.is_some(),
        }
    }
}

/// Builds random, calendar-consistent solutions from a catalog.
#[derive(Debug, Clone)]
pub struct SolutionAssembler<'a> {
    catalog: &'a Catalog,
    plans: Vec<CoursePlan<'a>>,
    /// Plan indices, forced courses first.
    placement_order: Vec<usize>,
    base_calendar: ResourceCalendar,
}

impl<'a> SolutionAssembler<'a> {
    /// Resolves forced assignments and books the time-pinned ones.
    ///
    /// # Errors
    /// [`ScheduleError::UnknownReference`], [`ScheduleError::ForcedRoomTooSmall`],
    /// or [`ScheduleError::ConstraintConflict`] when the constraint tables are
    /// inconsistent.
    pub fn new(catalog: &'a Catalog) -> ScheduleResult<Self> {
        let plans = catalog
            .courses()
            .iter()
            .map(|course| resolve_plan(catalog, course))
            .collect::<ScheduleResult<Vec<_>>>()?;

        let mut base_calendar = ResourceCalendar::new();
        let mut pinned = 0;
        for plan in &plans {
            let Some(slot) = plan.slot else { continue };
            if let Some(instructor) = plan.instructor {
                book_forced(
                    &mut base_calendar,
                    plan.course,
                    ResourceKind::Instructor,
                    &instructor.id,
                    slot,
                )?;
                pinned += 1;
            }
            if let Some(room) = plan.room {
                book_forced(
                    &mut base_calendar,
                    plan.course,
                    ResourceKind::Room,
                    &room.id,
                    slot,
                )?;
                pinned += 1;
            }
        }
        debug!(
            "Assembler ready: {} courses, {} forced bookings pre-populated",
            plans.len(),
            pinned
        );

        let (forced, free): (Vec<usize>, Vec<usize>) =
            (0..plans.len()).partition(|&i| plans[i].flags() != ForcedFlags::default());
        let placement_order = forced.into_iter().chain(free).collect();

        Ok(Self {
            catalog,
            plans,
            placement_order,
            base_calendar,
        })
    }

    /// The calendar every new solution starts from.
    pub fn base_calendar(&self) -> &ResourceCalendar {
        &self.base_calendar
    }

    /// Assembles one complete solution.
    ///
    /// # Errors
    /// [`ScheduleError::InsufficientResources`] if some course finds no free
    /// instructor and room at any candidate time slot.
    pub fn assemble<R: Rng>(&self, rng: &mut R) -> ScheduleResult<Solution> {
        let mut solution = Solution::with_calendar(self.base_calendar.clone());
        for &i in &self.placement_order {
            self.place(&mut solution, &self.plans[i], rng)?;
        }
        solution.sort_assignments_by_key(|a| {
            self.catalog
                .course_position(&a.course_id)
                .unwrap_or(usize::MAX)
        });
        Ok(solution)
    }

    fn place<R: Rng>(
        &self,
        solution: &mut Solution,
        plan: &CoursePlan<'a>,
        rng: &mut R,
    ) -> ScheduleResult<()> {
        let course = plan.course;
        if plan.instructor.is_none() && plan.pool.is_empty() {
            return Err(ScheduleError::InsufficientResources {
                course_id: course.id.clone(),
                reason: "no qualified instructors".into(),
            });
        }

        let mut slots: Vec<&TimeSlot> = match plan.slot {
            Some(slot) => vec![slot],
            None => self.catalog.time_slots().iter().collect(),
        };
        slots.shuffle(rng);

        let mut pool = plan.pool.clone();
        let mut rooms: Vec<&Room> = self.catalog.rooms().iter().collect();

        for (attempt, slot) in slots.iter().enumerate() {
            let atoms = slot.atoms();
            let cal = solution.calendar();

            let instructor = match plan.instructor {
                Some(i) => Some(i).filter(|i| {
                    cal.check_for(ResourceKind::Instructor, &i.id, &course.id, &atoms)
                }),
                None => {
                    pool.shuffle(rng);
                    pool.iter().copied().find(|i| {
                        cal.check_for(ResourceKind::Instructor, &i.id, &course.id, &atoms)
                    })
                }
            };
            let Some(instructor) = instructor else {
                trace!(
                    "{}: no free instructor at {} (attempt {})",
                    course.id,
                    slot.id,
                    attempt + 1
                );
                continue;
            };

            let room = match plan.room {
                Some(r) => Some(r).filter(|r| {
                    cal.check_for(ResourceKind::Room, &r.id, &course.id, &atoms)
                }),
                None => {
                    rooms.shuffle(rng);
                    rooms
                        .iter()
                        .copied()
                        .find(|r| cal.check_for(ResourceKind::Room, &r.id, &course.id, &atoms))
                }
            };
            let Some(room) = room else {
                trace!("{}: no free room at {} (attempt {})", course.id, slot.id, attempt + 1);
                continue;
            };

            return solution.place(CourseAssignment::new(
                course,
                slot,
                instructor,
                room,
                plan.flags(),
            ));
        }

        Err(ScheduleError::InsufficientResources {
            course_id: course.id.clone(),
            reason: format!(
                "no free instructor and room in {} candidate time slot(s)",
                slots.len()
            ),
        })
    }
}

fn resolve_plan<'a>(catalog: &'a Catalog, course: &'a Course) -> ScheduleResult<CoursePlan<'a>> {
    let unknown = |kind: &'static str, id: &str| ScheduleError::UnknownReference {
        course_id: course.id.clone(),
        kind,
        id: id.to_string(),
    };

    let pool = catalog
        .qualified_pool(course)
        .into_iter()
        .map(|id| catalog.instructor(id).ok_or_else(|| unknown("instructor", id)))
        .collect::<ScheduleResult<Vec<_>>>()?;

    let mut plan = CoursePlan {
        course,
        pool,
        instructor: None,
        room: None,
        slot: None,
    };

    let Some(forced) = catalog.forced_for(&course.id) else {
        return Ok(plan);
    };

    if let Some(id) = forced.instructor.as_deref() {
        plan.instructor = Some(catalog.instructor(id).ok_or_else(|| unknown("instructor", id))?);
    }
    if let Some(id) = forced.room.as_deref() {
        let room = catalog.room(id).ok_or_else(|| unknown("room", id))?;
        if room.capacity < course.enrollment_cap {
            return Err(ScheduleError::ForcedRoomTooSmall {
                course_id: course.id.clone(),
                room_id: room.id.clone(),
                capacity: room.capacity,
                enrollment_cap: course.enrollment_cap,
            });
        }
        plan.room = Some(room);
    }
    if let Some(id) = forced.time_slot.as_deref() {
        plan.slot = Some(catalog.time_slot(id).ok_or_else(|| unknown("time slot", id))?);
    }
    Ok(plan)
}

fn book_forced(
    calendar: &mut ResourceCalendar,
    course: &Course,
    kind: ResourceKind,
    resource_id: &str,
    slot: &TimeSlot,
) -> ScheduleResult<()> {
    if let Some(holder) = calendar.holder(kind, resource_id, &slot.atoms()) {
        return Err(ScheduleError::ConstraintConflict {
            course_id: course.id.clone(),
            kind,
            resource_id: resource_id.to_string(),
            time_slot: slot.id.clone(),
            holder: holder.to_string(),
        });
    }
    calendar.book(kind, resource_id, &course.id, slot)
}

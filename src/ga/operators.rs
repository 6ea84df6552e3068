//! Genetic operators over timetables.
//!
//! A gene is one (course, field) pair where the field is the course's time
//! slot, instructor, or room. Operators only change genes through the
//! solution's `try_set_*` methods, so every child and mutant stays free of
//! double bookings, and forced fields are never touched.
//!
//! # Crossover
//!
//! Both children start as copies of their parents. A swap exchanges the
//! chosen field of the *same* course between the two children; it happens
//! only if each incoming value is free in the receiving child. If the first
//! half succeeds and the second is refused, the first is reverted, so a swap
//! is all-or-nothing.
//!
//! - [`CrossoverType::SingleField`]: one random course, one random field.
//! - [`CrossoverType::Uniform`]: every course, with probability
//!   `gene_swap_pct`, swaps one random field that neither child has forced.
//!
//! # Mutation
//!
//! Picks random non-forced genes and moves each to a different free value:
//! another room at the same time, another qualified instructor at the same
//! time, or another time slot where the current instructor and room are both
//! free. At most `max_tries` alternatives are tried per gene; if none fits,
//! the mutation is skipped.

use log::trace;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::{CrossoverType, GaConfig};
use crate::error::ScheduleResult;
use crate::models::{AssignmentField, Catalog, Solution};

/// Produces two children from two parents.
///
/// Parents must assign the same courses in the same order, which every
/// solution built from one catalog does.
pub fn crossover<R: Rng>(
    parent1: &Solution,
    parent2: &Solution,
    config: &GaConfig,
    catalog: &Catalog,
    rng: &mut R,
) -> ScheduleResult<(Solution, Solution)> {
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();
    let n = child1.len().min(child2.len());
    if n == 0 {
        return Ok((child1, child2));
    }

    match config.crossover {
        CrossoverType::SingleField => {
            let idx = rng.random_range(0..n);
            let field = AssignmentField::ALL[rng.random_range(0..AssignmentField::ALL.len())];
            swap_field(&mut child1, &mut child2, idx, field, catalog)?;
        }
        CrossoverType::Uniform => {
            let p = f64::from(config.gene_swap_pct) / 100.0;
            for idx in 0..n {
                if !rng.random_bool(p) {
                    continue;
                }
                let open = open_fields(&child1, &child2, idx);
                let Some(&field) = open.choose(rng) else {
                    continue;
                };
                swap_field(&mut child1, &mut child2, idx, field, catalog)?;
            }
        }
    }
    Ok((child1, child2))
}

/// Fields of course `idx` that are forced in neither solution.
fn open_fields(a: &Solution, b: &Solution, idx: usize) -> Vec<AssignmentField> {
    let (Some(ga), Some(gb)) = (a.assignments().get(idx), b.assignments().get(idx)) else {
        return Vec::new();
    };
    AssignmentField::ALL
        .into_iter()
        .filter(|&f| !ga.forced.is_forced(f) && !gb.forced.is_forced(f))
        .collect()
}

/// Exchanges `field` of course `idx` between two solutions.
///
/// Returns `Ok(true)` if the swap happened, `Ok(false)` if it was refused or
/// `idx` is out of range for either solution.
pub fn swap_field(
    a: &mut Solution,
    b: &mut Solution,
    idx: usize,
    field: AssignmentField,
    catalog: &Catalog,
) -> ScheduleResult<bool> {
    let (Some(ga), Some(gb)) = (a.assignments().get(idx), b.assignments().get(idx)) else {
        return Ok(false);
    };
    if ga.forced.is_forced(field) || gb.forced.is_forced(field) {
        trace!("Crossover skipped forced {field:?} of {}", ga.course_id);
        return Ok(false);
    }
    let (va, vb) = (gene_value(a, idx, field), gene_value(b, idx, field));
    if va == vb {
        return Ok(false);
    }

    if !set_gene(a, idx, field, &vb, catalog)? {
        return Ok(false);
    }
    if set_gene(b, idx, field, &va, catalog)? {
        return Ok(true);
    }
    set_gene(a, idx, field, &va, catalog)?;
    trace!(
        "Crossover swap of {field:?} on {} refused by second child",
        a.assignments()[idx].course_id
    );
    Ok(false)
}

/// Applies up to `count` random mutations to non-forced genes.
///
/// Returns the number that took effect.
pub fn mutate<R: Rng>(
    solution: &mut Solution,
    count: usize,
    catalog: &Catalog,
    max_tries: usize,
    rng: &mut R,
) -> ScheduleResult<usize> {
    if count == 0 {
        return Ok(0);
    }
    let genes: Vec<(usize, AssignmentField)> = solution
        .assignments()
        .iter()
        .enumerate()
        .flat_map(|(idx, a)| {
            AssignmentField::ALL
                .into_iter()
                .filter(move |&f| !a.forced.is_forced(f))
                .map(move |f| (idx, f))
        })
        .collect();
    if genes.is_empty() {
        return Ok(0);
    }

    let mut applied = 0;
    for _ in 0..count {
        let Some(&(idx, field)) = genes.choose(rng) else {
            break;
        };
        if mutate_gene(solution, idx, field, catalog, max_tries, rng)? {
            applied += 1;
        } else {
            trace!(
                "Mutation of {field:?} on {} skipped after {max_tries} tries",
                solution.assignments()[idx].course_id
            );
        }
    }
    Ok(applied)
}

fn mutate_gene<R: Rng>(
    solution: &mut Solution,
    idx: usize,
    field: AssignmentField,
    catalog: &Catalog,
    max_tries: usize,
    rng: &mut R,
) -> ScheduleResult<bool> {
    let current = gene_value(solution, idx, field);
    let mut candidates: Vec<&str> = match field {
        AssignmentField::Room => catalog.rooms().iter().map(|r| r.id.as_str()).collect(),
        AssignmentField::TimeSlot => {
            catalog.time_slots().iter().map(|s| s.id.as_str()).collect()
        }
        AssignmentField::Instructor => {
            match catalog.course(&solution.assignments()[idx].course_id) {
                Some(course) => catalog.qualified_pool(course),
                None => return Ok(false),
            }
        }
    };
    candidates.retain(|&c| c != current);
    candidates.shuffle(rng);

    for value in candidates.into_iter().take(max_tries) {
        if set_gene(solution, idx, field, value, catalog)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn gene_value(solution: &Solution, idx: usize, field: AssignmentField) -> String {
    let a = &solution.assignments()[idx];
    match field {
        AssignmentField::TimeSlot => a.slot.id.clone(),
        AssignmentField::Instructor => a.instructor_id.clone(),
        AssignmentField::Room => a.room_id.clone(),
    }
}

fn set_gene(
    solution: &mut Solution,
    idx: usize,
    field: AssignmentField,
    value: &str,
    catalog: &Catalog,
) -> ScheduleResult<bool> {
    match field {
        AssignmentField::Room => match catalog.room(value) {
            Some(room) => solution.try_set_room(idx, room),
            None => Ok(false),
        },
        AssignmentField::Instructor => match catalog.instructor(value) {
            Some(instructor) => solution.try_set_instructor(idx, instructor),
            None => Ok(false),
        },
        AssignmentField::TimeSlot => match catalog.time_slot(value) {
            Some(slot) => solution.try_set_time_slot(idx, slot),
            None => Ok(false),
        },
    }
}

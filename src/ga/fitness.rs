//! Fitness evaluation.
//!
//! Scores a solution by starting from a configured baseline and subtracting
//! named penalties per course. All magnitudes come from the catalog's
//! [`FitnessTable`]; a name missing from the table costs nothing.
//!
//! # Penalties (applied per course, in order)
//!
//! | Name | Condition |
//! |------|-----------|
//! | `instructor_proximity` | instructor's building ≠ room's building |
//! | `department_proximity` | course department ≠ room's building |
//! | `time_of_day` | start outside the preferred window |
//! | `wasted_capacity` | unused seats exceed the waste threshold (percent) |
//! | `lab_mismatch` | lab course in a room without lab support |
//! | `instructor_unavailable_day` | slot meets on a day the instructor avoids |
//!
//! A room smaller than the enrollment cap is a hard infeasibility: the whole
//! solution scores zero and evaluation of that solution stops.
//!
//! Evaluation is a pure function of the solution, the catalog, and the
//! configuration, so scoring the same solution twice yields the same value.

use std::collections::{HashMap, HashSet};

use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::GaConfig;
use crate::models::constraint::{
    DEPARTMENT_PROXIMITY, INSTRUCTOR_PROXIMITY, INSTRUCTOR_UNAVAILABLE_DAY, LAB_MISMATCH,
    TIME_OF_DAY, WASTED_CAPACITY,
};
use crate::models::{Catalog, CourseAssignment, FitnessTable, Solution, Weekday};

/// One penalty applied to one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyRecord {
    /// Penalized course.
    pub course_id: String,
    /// Penalty name from the fitness table.
    pub name: String,
    /// Amount subtracted.
    pub amount: i64,
}

/// Score breakdown for one solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessReport {
    /// Final score.
    pub score: i64,
    /// Every penalty applied, in evaluation order.
    pub penalties: Vec<PenaltyRecord>,
    /// Why the solution was zeroed, if it was.
    pub infeasible: Option<String>,
}

impl FitnessReport {
    /// Whether the solution is feasible by capacity.
    pub fn is_feasible(&self) -> bool {
        self.infeasible.is_none()
    }

    /// Sum of the amounts recorded under `name`.
    pub fn total_for(&self, name: &str) -> i64 {
        self.penalties
            .iter()
            .filter(|p| p.name == name)
            .map(|p| p.amount)
            .sum()
    }
}

/// Population statistics for one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number (0 = seeded population).
    pub generation: usize,
    /// Mean score.
    pub average: f64,
    /// Best score.
    pub max: i64,
    /// Worst score.
    pub min: i64,
    /// Population index holding `max` (lowest index on ties).
    pub best_index: usize,
    /// Solutions not zeroed by a capacity violation.
    pub feasible_count: usize,
    /// Feasible solutions that scored at or below zero.
    pub non_positive_feasible: usize,
}

/// Scores solutions against a catalog.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<'a> {
    table: &'a FitnessTable,
    baseline: i64,
    waste_threshold: u32,
    lab_courses: HashSet<&'a str>,
    lab_rooms: HashSet<&'a str>,
    unavailable: HashMap<&'a str, Vec<Weekday>>,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates an evaluator, resolving lab and availability attributes once.
    pub fn new(catalog: &'a Catalog, config: &GaConfig) -> Self {
        let lab_courses = catalog
            .courses()
            .iter()
            .filter(|c| c.requires_lab)
            .map(|c| c.id.as_str())
            .collect();
        let lab_rooms = catalog
            .rooms()
            .iter()
            .filter(|r| catalog.room_supports_lab(&r.id))
            .map(|r| r.id.as_str())
            .collect();
        let unavailable = catalog
            .instructors()
            .iter()
            .filter_map(|i| {
                let days = catalog.instructor_unavailable_days(&i.id);
                (!days.is_empty()).then_some((i.id.as_str(), days))
            })
            .collect();

        Self {
            table: catalog.fitness_table(),
            baseline: config.fitness_baseline,
            waste_threshold: config.capacity_waste_threshold,
            lab_courses,
            lab_rooms,
            unavailable,
        }
    }

    /// Score of a solution.
    pub fn score(&self, solution: &Solution) -> i64 {
        self.assess(solution, None).0
    }

    /// Score of a solution with every applied penalty itemized.
    pub fn report(&self, solution: &Solution) -> FitnessReport {
        let mut penalties = Vec::new();
        let (score, infeasible) = self.assess(solution, Some(&mut penalties));
        FitnessReport {
            score,
            penalties,
            infeasible,
        }
    }

    /// Scores every solution in place and summarizes the population.
    pub fn evaluate_population(
        &self,
        population: &mut [Solution],
        generation: usize,
        parallel: bool,
    ) -> GenerationStats {
        let assess = |s: &mut Solution| {
            let (score, infeasible) = self.assess(s, None);
            s.set_score(score);
            (score, infeasible.is_none())
        };
        let results: Vec<(i64, bool)> = if parallel {
            population.par_iter_mut().map(assess).collect()
        } else {
            population.iter_mut().map(assess).collect()
        };

        let mut stats = GenerationStats {
            generation,
            average: 0.0,
            max: 0,
            min: 0,
            best_index: 0,
            feasible_count: results.iter().filter(|(_, ok)| *ok).count(),
            non_positive_feasible: results
                .iter()
                .filter(|&&(score, ok)| ok && score <= 0)
                .count(),
        };
        if results.is_empty() {
            return stats;
        }
        if stats.non_positive_feasible > 0 {
            warn!(
                "Generation {generation}: {} feasible solution(s) scored <= 0 (baseline {})",
                stats.non_positive_feasible, self.baseline
            );
        }

        stats.max = results[0].0;
        stats.min = results[0].0;
        let mut total = 0i128;
        for (idx, &(score, _)) in results.iter().enumerate() {
            total += score as i128;
            if score > stats.max {
                stats.max = score;
                stats.best_index = idx;
            }
            stats.min = stats.min.min(score);
        }
        stats.average = total as f64 / results.len() as f64;
        stats
    }

    fn assess(
        &self,
        solution: &Solution,
        mut records: Option<&mut Vec<PenaltyRecord>>,
    ) -> (i64, Option<String>) {
        let mut score = self.baseline;
        for a in solution.assignments() {
            if a.room_capacity < a.enrollment_cap {
                let reason = format!(
                    "{} (cap {}) does not fit room {} (capacity {})",
                    a.course_id, a.enrollment_cap, a.room_id, a.room_capacity
                );
                return (0, Some(reason));
            }

            let mut apply = |name: &str| {
                let amount = self.table.penalty(name);
                score -= amount;
                if let Some(out) = records.as_deref_mut() {
                    if amount != 0 {
                        out.push(PenaltyRecord {
                            course_id: a.course_id.clone(),
                            name: name.to_string(),
                            amount,
                        });
                    }
                }
            };

            if a.instructor_building != a.building {
                apply(INSTRUCTOR_PROXIMITY);
            }
            if a.department != a.building {
                apply(DEPARTMENT_PROXIMITY);
            }
            if self.table.outside_window(a.start()) {
                apply(TIME_OF_DAY);
            }
            if waste_pct(a) > self.waste_threshold {
                apply(WASTED_CAPACITY);
            }
            if self.lab_courses.contains(a.course_id.as_str())
                && !self.lab_rooms.contains(a.room_id.as_str())
            {
                apply(LAB_MISMATCH);
            }
            if self
                .unavailable
                .get(a.instructor_id.as_str())
                .is_some_and(|days| a.slot.days.iter().any(|d| days.contains(d)))
            {
                apply(INSTRUCTOR_UNAVAILABLE_DAY);
            }
        }

        (score, None)
    }
}

/// Unused seats as a percentage of room capacity (rounded down).
fn waste_pct(a: &CourseAssignment) -> u32 {
    if a.room_capacity == 0 {
        return 0;
    }
    let unused = a.room_capacity.saturating_sub(a.enrollment_cap) as u64;
    (unused * 100 / a.room_capacity as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::ga::SolutionAssembler;
    use crate::models::{Course, ForcedFlags, Instructor, Room};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn config() -> GaConfig {
        GaConfig::default()
    }

    /// One course, catalog-independent assignment.
    fn single(course: &Course, slot: &str, instructor: &Instructor, room: &Room) -> Solution {
        let mut s = Solution::new();
        s.place(CourseAssignment::new(
            course,
            &fixtures::slot(slot),
            instructor,
            room,
            ForcedFlags::default(),
        ))
        .unwrap();
        s
    }

    #[test]
    fn test_exact_fit_is_feasible() {
        let catalog = fixtures::exact_fit_catalog();
        let config = config();
        let s = SolutionAssembler::new(&catalog)
            .unwrap()
            .assemble(&mut SmallRng::seed_from_u64(0))
            .unwrap();
        let report = FitnessEvaluator::new(&catalog, &config).report(&s);

        assert!(report.is_feasible());
        assert_eq!(report.total_for(WASTED_CAPACITY), 0);
        assert_eq!(report.score, config.fitness_baseline);
    }

    #[test]
    fn test_room_too_small_zeroes_solution() {
        let catalog = fixtures::small_catalog();
        let course = Course::new("C1", "001").with_enrollment_cap(60).with_department("SICCS");
        let s = single(
            &course,
            "MWF_9:10_10:00",
            &Instructor::new("I1").with_building("SICCS"),
            &Room::new("SICCS-1", 50),
        );
        let report = FitnessEvaluator::new(&catalog, &config()).report(&s);
        assert_eq!(report.score, 0);
        assert!(report.infeasible.unwrap().contains("SICCS-1"));
    }

    #[test]
    fn test_waste_threshold_is_exclusive() {
        let catalog = fixtures::small_catalog();
        let eval = FitnessEvaluator::new(&catalog, &config());
        let i = Instructor::new("I1").with_building("SICCS");

        // 50% unused: at the threshold, no penalty
        let half = Course::new("C1", "001").with_enrollment_cap(20).with_department("SICCS");
        let s = single(&half, "MWF_9:10_10:00", &i, &Room::new("SICCS-1", 40));
        assert_eq!(eval.score(&s), 10_000);

        // 75% unused
        let small = Course::new("C1", "001").with_enrollment_cap(10).with_department("SICCS");
        let s = single(&small, "MWF_9:10_10:00", &i, &Room::new("SICCS-1", 40));
        let report = eval.report(&s);
        assert_eq!(report.total_for(WASTED_CAPACITY), 15);
        assert_eq!(report.score, 10_000 - 15);
    }

    #[test]
    fn test_proximity_and_time_of_day() {
        let catalog = fixtures::small_catalog();
        let eval = FitnessEvaluator::new(&catalog, &config());
        let course = Course::new("C1", "001").with_enrollment_cap(30).with_department("SICCS");
        let far = Instructor::new("I1").with_building("ENG");
        let room = Room::new("SBS-101", 40);

        let report = eval.report(&single(&course, "TTh_8:00_9:15", &far, &room));
        let names: Vec<&str> = report.penalties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec![INSTRUCTOR_PROXIMITY, DEPARTMENT_PROXIMITY, TIME_OF_DAY]);
        assert_eq!(report.score, 10_000 - 10 - 20 - 5);

        // 17:00 is inside the window, 17:30 is not
        let near = Instructor::new("I1").with_building("SBS");
        let sbs = Course::new("C1", "001").with_enrollment_cap(30).with_department("SBS");
        assert_eq!(eval.score(&single(&sbs, "MW_17:00_18:15", &near, &room)), 10_000);
        assert_eq!(eval.score(&single(&sbs, "MW_17:30_18:45", &near, &room)), 10_000 - 5);
    }

    #[test]
    fn test_lab_and_unavailable_day_penalties() {
        let catalog = fixtures::department_catalog();
        let eval = FitnessEvaluator::new(&catalog, &config());
        let lab_course = catalog.course("CS136_001").unwrap();
        let i2 = catalog.instructor("I2").unwrap();

        let lab_room = catalog.room("SICCS-110").unwrap();
        let in_lab = single(lab_course, "TTh_9:35_10:50", i2, lab_room);
        assert_eq!(eval.report(&in_lab).total_for(LAB_MISMATCH), 0);
        let lecture_room = catalog.room("SICCS-101").unwrap();
        let in_lecture = single(lab_course, "TTh_9:35_10:50", i2, lecture_room);
        assert_eq!(eval.report(&in_lecture).total_for(LAB_MISMATCH), 40);

        let ee = catalog.course("EE110_001").unwrap();
        let i3 = catalog.instructor("I3").unwrap();
        let room = catalog.room("ENG-201").unwrap();
        assert_eq!(
            eval.report(&single(ee, "MWF_9:10_10:00", i3, room))
                .total_for(INSTRUCTOR_UNAVAILABLE_DAY),
            25
        );
        assert_eq!(
            eval.report(&single(ee, "MW_9:30_10:45", i3, room))
                .total_for(INSTRUCTOR_UNAVAILABLE_DAY),
            0
        );
    }

    #[test]
    fn test_missing_penalty_costs_nothing() {
        let catalog = Catalog::new();
        let eval = FitnessEvaluator::new(&catalog, &config());
        let course = Course::new("C1", "001").with_enrollment_cap(1).with_department("X");
        let s = single(&course, "M_7:00_8:00", &Instructor::new("I"), &Room::new("Y-1", 100));
        let report = eval.report(&s);
        assert_eq!(report.score, 10_000);
        assert!(report.penalties.is_empty());
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let catalog = fixtures::department_catalog();
        let eval = FitnessEvaluator::new(&catalog, &config());
        let s = SolutionAssembler::new(&catalog)
            .unwrap()
            .assemble(&mut SmallRng::seed_from_u64(11))
            .unwrap();
        assert_eq!(eval.score(&s), eval.score(&s));
        assert_eq!(eval.report(&s), eval.report(&s));
        assert_eq!(eval.report(&s).score, eval.score(&s));
    }

    #[test]
    fn test_population_stats() {
        let catalog = fixtures::department_catalog();
        let eval = FitnessEvaluator::new(&catalog, &config());
        let assembler = SolutionAssembler::new(&catalog).unwrap();
        let mut rng = SmallRng::seed_from_u64(4);
        let mut pop: Vec<Solution> = (0..12)
            .map(|_| assembler.assemble(&mut rng).unwrap())
            .collect();
        let mut pop_seq = pop.clone();

        let par = eval.evaluate_population(&mut pop, 3, true);
        let seq = eval.evaluate_population(&mut pop_seq, 3, false);
        assert_eq!(par, seq);
        assert_eq!(par.generation, 3);

        let scores: Vec<i64> = pop.iter().map(|s| s.score().unwrap()).collect();
        let max = *scores.iter().max().unwrap();
        assert_eq!(par.max, max);
        assert_eq!(par.min, *scores.iter().min().unwrap());
        assert_eq!(par.best_index, scores.iter().position(|&s| s == max).unwrap());
        assert!(par.average <= max as f64);
        assert_eq!(par.non_positive_feasible, 0);
    }

    #[test]
    fn test_low_baseline_counts_non_positive_scores() {
        fixtures::init_logger();
        let catalog = fixtures::department_catalog();
        let eval = FitnessEvaluator::new(&catalog, &config().with_fitness_baseline(0));
        let assembler = SolutionAssembler::new(&catalog).unwrap();
        let mut rng = SmallRng::seed_from_u64(12);
        let mut pop: Vec<Solution> = (0..8)
            .map(|_| assembler.assemble(&mut rng).unwrap())
            .collect();

        let stats = eval.evaluate_population(&mut pop, 0, false);
        assert_eq!(stats.non_positive_feasible, stats.feasible_count);
        assert!(stats.max <= 0);
        assert!(pop.iter().all(|s| s.score().is_some_and(|v| v <= 0)));
    }
}

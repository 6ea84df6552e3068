//! Population manager: the generational state machine.
//!
//! ```text
//! SEEDING → (EVALUATING → CULLING → CROSSOVER → MUTATING)* → DONE
//! ```
//!
//! - **Seeding** assembles one solution per population slot.
//! - **Evaluating** scores every solution and records [`GenerationStats`].
//! - **Culling** stable-sorts by score descending and keeps the top
//!   `survivor_count`. Equal scores keep their previous relative order.
//! - **Crossover** runs `population_size / 4` pairings of two distinct random
//!   survivors. Children beyond the free slots are dropped; slots still free
//!   are refilled by cloning survivors in rank order.
//! - **Mutating** spreads `mutation_rate` percent of all non-protected genes
//!   over the population, never touching index 0 (the best survivor).
//!
//! The last generation skips mutation; its crossed-over population is
//! evaluated once more and ranked.
//!
//! # Reproducibility
//! One master `SmallRng` drives the run. Each unit of per-solution work gets
//! its own generator seeded from the master, so a fixed seed gives the same
//! result with `parallel` on or off.

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::fitness::{FitnessEvaluator, GenerationStats};
use super::operators::{crossover, mutate};
use super::{GaConfig, SolutionAssembler};
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{AssignmentField, Catalog, DisplayField, DisplayRow, Solution};
use crate::validation::validate_catalog;

/// State machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seeding,
    Evaluating,
    Culling,
    Crossover,
    Mutating,
    Done,
}

/// A returned solution with its final score.
#[derive(Debug, Clone)]
pub struct RankedSolution {
    /// The timetable.
    pub solution: Solution,
    /// Its fitness.
    pub score: i64,
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Best solutions, score descending.
    pub solutions: Vec<RankedSolution>,
    /// Statistics per evaluated generation.
    pub history: Vec<GenerationStats>,
    /// Generations completed.
    pub generations: usize,
    /// Whether the stall limit ended the run.
    pub stopped_early: bool,
    /// Columns for [`GaResult::display_rows`].
    pub display_fields: Vec<DisplayField>,
}

impl GaResult {
    /// The top-ranked solution.
    pub fn best(&self) -> Option<&RankedSolution> {
        self.solutions.first()
    }

    /// Display rows of the solution at `rank` (0 = best), in the configured columns.
    pub fn display_rows(&self, rank: usize) -> Option<Vec<DisplayRow>> {
        self.solutions
            .get(rank)
            .map(|r| r.solution.display_rows(&self.display_fields))
    }
}

/// Drives one genetic timetabling run.
pub struct PopulationManager<'a> {
    catalog: &'a Catalog,
    config: GaConfig,
    assembler: SolutionAssembler<'a>,
    evaluator: FitnessEvaluator<'a>,
    rng: SmallRng,
    population: Vec<Solution>,
    phase: Phase,
    generation: usize,
    history: Vec<GenerationStats>,
}

impl<'a> PopulationManager<'a> {
    /// Prepares a run.
    ///
    /// # Errors
    /// An invalid configuration, or forced constraints that contradict each
    /// other or the catalog.
    pub fn new(catalog: &'a Catalog, config: &GaConfig) -> ScheduleResult<Self> {
        config.validate()?;
        let assembler = SolutionAssembler::new(catalog)?;
        let evaluator = FitnessEvaluator::new(catalog, config);
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        Ok(Self {
            catalog,
            config: config.clone(),
            assembler,
            evaluator,
            rng,
            population: Vec::with_capacity(config.population_size),
            phase: Phase::Seeding,
            generation: 0,
            history: Vec::new(),
        })
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Generations completed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Current population.
    pub fn population(&self) -> &[Solution] {
        &self.population
    }

    /// Statistics recorded so far.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// SEEDING: assembles `population_size` solutions.
    pub fn seed(&mut self) -> ScheduleResult<()> {
        debug!("Seeding {} solutions", self.config.population_size);
        let seeds = self.draw_seeds(self.config.population_size);
        let assembler = &self.assembler;
        let solutions: ScheduleResult<Vec<Solution>> = if self.config.parallel {
            seeds
                .into_par_iter()
                .map(|seed| assembler.assemble(&mut SmallRng::seed_from_u64(seed)))
                .collect()
        } else {
            seeds
                .into_iter()
                .map(|seed| assembler.assemble(&mut SmallRng::seed_from_u64(seed)))
                .collect()
        };
        self.population = solutions?;
        self.phase = Phase::Evaluating;
        Ok(())
    }

    /// EVALUATING: scores the population.
    pub fn evaluate(&mut self) -> GenerationStats {
        let stats = self.evaluator.evaluate_population(
            &mut self.population,
            self.generation,
            self.config.parallel,
        );
        info!(
            "Generation {}: avg {:.1}, max {} (#{}), min {}, feasible {}/{}",
            stats.generation,
            stats.average,
            stats.max,
            stats.best_index,
            stats.min,
            stats.feasible_count,
            self.population.len()
        );
        self.history.push(stats.clone());
        self.phase = Phase::Culling;
        stats
    }

    /// CULLING: keeps the top `survivor_count` solutions, best first.
    pub fn cull(&mut self) {
        let keep = self.config.effective_survivors();
        self.population
            .sort_by(|a, b| rank_score(b).cmp(&rank_score(a)));
        self.population.truncate(keep);
        debug!("Culled to {} survivors", self.population.len());
        self.phase = Phase::Crossover;
    }

    /// CROSSOVER: refills the population with children of survivors.
    pub fn crossover(&mut self) -> ScheduleResult<()> {
        let survivors = self.population.len();
        let free = self.config.population_size.saturating_sub(survivors);
        let mut pairs = self.config.crossover_pairs();
        if survivors < 2 && pairs > 0 {
            warn!("Crossover skipped: {survivors} survivor(s) cannot form a pair");
            pairs = 0;
        }

        let jobs: Vec<(usize, usize, u64)> = (0..pairs)
            .map(|_| {
                let i = self.rng.random_range(0..survivors);
                let mut j = self.rng.random_range(0..survivors - 1);
                if j >= i {
                    j += 1;
                }
                (i, j, self.rng.random())
            })
            .collect();

        let parents = &self.population;
        let (config, catalog) = (&self.config, self.catalog);
        let breed = |&(i, j, seed): &(usize, usize, u64)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            crossover(&parents[i], &parents[j], config, catalog, &mut rng)
        };
        let children: ScheduleResult<Vec<(Solution, Solution)>> = if self.config.parallel {
            jobs.par_iter().map(breed).collect()
        } else {
            jobs.iter().map(breed).collect()
        };

        let mut offspring: Vec<Solution> = children?
            .into_iter()
            .flat_map(|(a, b)| [a, b])
            .collect();
        offspring.truncate(free);
        let bred = offspring.len();
        self.population.extend(offspring);

        let mut rank = 0;
        while self.population.len() < self.config.population_size && survivors > 0 {
            let clone = self.population[rank % survivors].clone();
            self.population.push(clone);
            rank += 1;
        }
        debug!(
            "Crossover: {} pairs, {} children, {} survivor clones",
            pairs, bred, rank
        );
        self.phase = Phase::Mutating;
        Ok(())
    }

    /// MUTATING: mutates `mutation_rate` percent of genes outside index 0.
    pub fn mutate(&mut self) -> ScheduleResult<()> {
        let len = self.population.len();
        let genes =
            len.saturating_sub(1) * self.catalog.courses().len() * AssignmentField::ALL.len();
        let target = genes * self.config.mutation_rate as usize / 100;

        let mut counts = vec![0usize; len];
        if len > 1 {
            for _ in 0..target {
                counts[self.rng.random_range(1..len)] += 1;
            }
        }
        let seeds = self.draw_seeds(len);

        let (catalog, tries) = (self.catalog, self.config.max_mutation_tries);
        let work = |(solution, (count, seed)): (&mut Solution, (usize, u64))| {
            mutate(
                solution,
                count,
                catalog,
                tries,
                &mut SmallRng::seed_from_u64(seed),
            )
        };
        let applied: ScheduleResult<Vec<usize>> = if self.config.parallel {
            self.population
                .par_iter_mut()
                .zip(counts.into_par_iter().zip(seeds.into_par_iter()))
                .map(work)
                .collect()
        } else {
            self.population
                .iter_mut()
                .zip(counts.into_iter().zip(seeds))
                .map(work)
                .collect()
        };
        let applied: usize = applied?.into_iter().sum();
        debug!("Mutation: {applied}/{target} applied");
        self.generation += 1;
        self.phase = Phase::Evaluating;
        Ok(())
    }

    /// Runs the whole state machine and ranks the final population.
    pub fn run(mut self) -> ScheduleResult<GaResult> {
        self.seed()?;

        let mut best = i64::MIN;
        let mut stalled = 0;
        let mut stopped_early = false;
        let generations = self.config.generations;

        for g in 0..generations {
            let stats = self.evaluate();
            if stats.max > best {
                best = stats.max;
                stalled = 0;
            } else {
                stalled += 1;
            }
            if self.config.stall_generations.is_some_and(|limit| stalled >= limit) {
                info!("No improvement for {stalled} generation(s); stopping");
                stopped_early = true;
                break;
            }

            self.cull();
            self.crossover()?;
            if g + 1 < generations {
                self.mutate()?;
            } else {
                self.generation += 1;
                self.phase = Phase::Evaluating;
            }
        }
        if !stopped_early {
            self.evaluate();
        }
        Ok(self.finish(stopped_early))
    }

    fn finish(mut self, stopped_early: bool) -> GaResult {
        self.population
            .sort_by(|a, b| rank_score(b).cmp(&rank_score(a)));
        self.phase = Phase::Done;
        let solutions = self
            .population
            .into_iter()
            .take(self.config.solutions_to_return)
            .map(|solution| RankedSolution {
                score: solution.score().unwrap_or(0),
                solution,
            })
            .collect::<Vec<_>>();
        if let Some(top) = solutions.first() {
            info!(
                "Finished after {} generation(s); best score {}",
                self.generation, top.score
            );
        }

        GaResult {
            solutions,
            history: self.history,
            generations: self.generation,
            stopped_early,
            display_fields: self.config.display_fields,
        }
    }

    fn draw_seeds(&mut self, n: usize) -> Vec<u64> {
        (0..n).map(|_| self.rng.random()).collect()
    }
}

fn rank_score(s: &Solution) -> i64 {
    s.score().unwrap_or(i64::MIN)
}

/// Validates the catalog and configuration, then runs the genetic search.
///
/// # Errors
/// [`ScheduleError::InvalidCatalog`] with every integrity problem found,
/// [`ScheduleError::InvalidConfig`], or any fatal error from seeding.
pub fn schedule(catalog: &Catalog, config: &GaConfig) -> ScheduleResult<GaResult> {
    validate_catalog(catalog).map_err(ScheduleError::InvalidCatalog)?;
    info!(
        "Scheduling {} courses: {} instructors, {} rooms, {} time slots",
        catalog.courses().len(),
        catalog.instructors().len(),
        catalog.rooms().len(),
        catalog.time_slots().len()
    );
    PopulationManager::new(catalog, config)?.run()
}

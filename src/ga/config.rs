//! Genetic search configuration.
//!
//! Plain scalar settings; parsing them from files or flags belongs to the
//! caller. Every field has a default, so partial JSON/TOML documents
//! deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::DisplayField;

/// Crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverType {
    /// Swap one random non-forced field of one random course between the children.
    SingleField,
    /// For each course, swap one random non-forced field with probability
    /// `gene_swap_pct`.
    Uniform,
}

/// Configuration for a genetic timetabling run.
///
/// # Example
///
/// ```
/// use u_timetable::ga::{CrossoverType, GaConfig};
///
/// let config = GaConfig::default()
///     .with_population_size(40)
///     .with_survivor_count(20)
///     .with_generations(25)
///     .with_crossover(CrossoverType::Uniform)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Solutions per generation.
    pub population_size: usize,
    /// Solutions kept by culling.
    pub survivor_count: usize,
    /// Generations to run.
    pub generations: usize,
    /// Percent of (solution, course, field) genes mutated per generation.
    pub mutation_rate: u32,
    /// Crossover strategy.
    pub crossover: CrossoverType,
    /// Per-course swap probability (percent) for [`CrossoverType::Uniform`].
    pub gene_swap_pct: u32,
    /// Unused-seat percentage above which the wasted-capacity penalty applies.
    pub capacity_waste_threshold: u32,
    /// Score every solution starts from before penalties.
    pub fitness_baseline: i64,
    /// Ranked solutions returned at the end.
    pub solutions_to_return: usize,
    /// RNG seed. `None` = OS entropy.
    pub seed: Option<u64>,
    /// Spread per-solution work across threads.
    pub parallel: bool,
    /// Stop early after this many generations without a better maximum.
    pub stall_generations: Option<usize>,
    /// Alternatives tried per mutation before it is skipped.
    pub max_mutation_tries: usize,
    /// Columns produced for the output collaborator.
    pub display_fields: Vec<DisplayField>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            survivor_count: 50,
            generations: 100,
            mutation_rate: 5,
            crossover: CrossoverType::SingleField,
            gene_swap_pct: 50,
            capacity_waste_threshold: 50,
            fitness_baseline: 10_000,
            solutions_to_return: 1,
            seed: None,
            parallel: true,
            stall_generations: None,
            max_mutation_tries: 10,
            display_fields: DisplayField::ALL.to_vec(),
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the survivor count.
    pub fn with_survivor_count(mut self, n: usize) -> Self {
        self.survivor_count = n;
        self
    }

    /// Sets the generation count.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the mutation rate (percent).
    pub fn with_mutation_rate(mut self, pct: u32) -> Self {
        self.mutation_rate = pct;
        self
    }

    /// Sets the crossover strategy.
    pub fn with_crossover(mut self, crossover: CrossoverType) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the uniform-crossover swap probability (percent).
    pub fn with_gene_swap_pct(mut self, pct: u32) -> Self {
        self.gene_swap_pct = pct;
        self
    }

    /// Sets the capacity-waste threshold (percent).
    pub fn with_capacity_waste_threshold(mut self, pct: u32) -> Self {
        self.capacity_waste_threshold = pct;
        self
    }

    /// Sets the fitness baseline.
    pub fn with_fitness_baseline(mut self, baseline: i64) -> Self {
        self.fitness_baseline = baseline;
        self
    }

    /// Sets how many ranked solutions are returned.
    pub fn with_solutions_to_return(mut self, n: usize) -> Self {
        self.solutions_to_return = n;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel work.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables early stop after `n` stalled generations.
    pub fn with_stall_generations(mut self, n: usize) -> Self {
        self.stall_generations = Some(n);
        self
    }

    /// Sets the per-mutation retry bound.
    pub fn with_max_mutation_tries(mut self, n: usize) -> Self {
        self.max_mutation_tries = n;
        self
    }

    /// Sets the output columns.
    pub fn with_display_fields(mut self, fields: Vec<DisplayField>) -> Self {
        self.display_fields = fields;
        self
    }

    /// Survivors actually kept: `survivor_count` capped at the population size.
    pub fn effective_survivors(&self) -> usize {
        self.survivor_count.min(self.population_size)
    }

    /// Crossover pairings per generation: `population_size / 4`, rounded down.
    pub fn crossover_pairs(&self) -> usize {
        self.population_size / 4
    }

    /// Checks value ranges.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.population_size == 0 {
            return Err(ScheduleError::InvalidConfig(
                "population_size must be at least 1".into(),
            ));
        }
        if self.survivor_count == 0 {
            return Err(ScheduleError::InvalidConfig(
                "survivor_count must be at least 1".into(),
            ));
        }
        if self.mutation_rate > 100 {
            return Err(ScheduleError::InvalidConfig(format!(
                "mutation_rate {} exceeds 100%",
                self.mutation_rate
            )));
        }
        if self.gene_swap_pct > 100 {
            return Err(ScheduleError::InvalidConfig(format!(
                "gene_swap_pct {} exceeds 100%",
                self.gene_swap_pct
            )));
        }
        if self.capacity_waste_threshold > 100 {
            return Err(ScheduleError::InvalidConfig(format!(
                "capacity_waste_threshold {} exceeds 100%",
                self.capacity_waste_threshold
            )));
        }
        if self.solutions_to_return == 0 {
            return Err(ScheduleError::InvalidConfig(
                "solutions_to_return must be at least 1".into(),
            ));
        }
        if self.max_mutation_tries == 0 {
            return Err(ScheduleError::InvalidConfig(
                "max_mutation_tries must be at least 1".into(),
            ));
        }
        if self.stall_generations == Some(0) {
            return Err(ScheduleError::InvalidConfig(
                "stall_generations must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}

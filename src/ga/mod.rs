//! Genetic search over course timetables.
//!
//! # Encoding
//!
//! A [`Solution`](crate::models::Solution) is its own chromosome: one
//! assignment per catalog course, each with three genes (time slot,
//! instructor, room). Genes fixed by forced assignments are immutable.
//! Every solution carries its own resource calendar, so operators can only
//! produce conflict-free timetables.
//!
//! # Submodules
//!
//! - [`assembler`]: random construction of complete solutions
//! - [`fitness`]: penalty-based scoring and per-generation statistics
//! - [`operators`]: crossover and mutation
//! - [`population`]: the generational state machine and [`schedule`]
//!
//! # Reference
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization, and Machine Learning"

pub mod assembler;
mod config;
pub mod fitness;
pub mod operators;
pub mod population;

pub use assembler::SolutionAssembler;
pub use config::{CrossoverType, GaConfig};
pub use fitness::{FitnessEvaluator, FitnessReport, GenerationStats, PenaltyRecord};
pub use population::{schedule, GaResult, Phase, PopulationManager, RankedSolution};

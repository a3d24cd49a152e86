//! Evolutionary search for Light-Up solutions.
//!
//! # How a Search Works
//!
//! 1. **Base genotype** ([`base_genotype`]) - Optionally propagates clue constraints to
//!    find lights every solution needs, then lays out the remaining white cells as loci
//! 2. **Population** ([`genetic`]) - Creates `mu` individuals with random genotypes
//! 3. **Breeding** ([`individual`], [`genes`]) - Selected parents produce `lambda`
//!    children by uniform crossover and flip mutation
//! 4. **Selection** ([`selection`]) - Survivors are chosen from offspring or from
//!    parents and offspring
//! 5. **Ranking** ([`pareto`]) - In multi-objective mode fitness comes from the
//!    individual's Pareto level
//! 6. **Orchestration** ([`search`]) - Repeats generations until the evaluation budget
//!    or the stagnation limit is reached, over several independent runs
//!
//! # Architecture
//!
//! ```text
//! Search Config (config)
//!     ↓ drives
//! Run Orchestrator (search)
//!     ↓ evolves
//! Population (genetic)
//!     ↓ bred by
//! Breeder (individual) → Solution Evaluator (akari-evaluator)
//!     ↓ selected by
//! Selection Operators / Pareto Ranking
//! ```
//!
//! Random draws come from a single generator passed through every call, so a fixed
//! seed reproduces a search. Offspring evaluation runs on scoped threads and does not
//! consume randomness.
//!
//! # Example
//!
//! ```
//! use akari_engine::{Coord, Grid};
//! use akari_training::{config::RawConfig, search};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let grid = Grid::new(4, 4, [(Coord::new(1, 1), Some(4))]).unwrap();
//! let config: RawConfig = serde_json::from_str(
//!     r#"{
//!         "searchAlgorithm": "EA",
//!         "mu": 10, "lambda": 10, "mutationRate": 8,
//!         "parentTournyK": 2, "survivalTruncation": true,
//!         "validityForcedInit": true, "enforceBlackCellConstraint": true,
//!         "numOfRuns": 1, "numOfFitnessEvals": 100
//!     }"#,
//! )
//! .unwrap();
//!
//! let mut rng = Pcg32::seed_from_u64(0);
//! let report = search::run_search(&grid, &config.validate().unwrap(), &mut rng);
//! let score = report.best.score().unwrap();
//! assert!((0.0..=1.0).contains(&score));
//! ```

pub mod base_genotype;
pub mod config;
pub mod genes;
pub mod genetic;
pub mod individual;
pub mod pareto;
pub mod search;
pub mod selection;
pub mod stats;

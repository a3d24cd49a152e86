//! Constraint evaluation for Light-Up light placements.
//!
//! This crate turns a set of light coordinates into a fitness value:
//!
//! 1. **Illumination** ([`lit_board`]) - Casts the four rays of every light over the grid,
//!    tracking which white cells are lit and which lights can see each other.
//!
//! 2. **Scoring** ([`solution_evaluator`]) - Counts light and black-cell violations and
//!    produces either a normalized scalar score or a three-objective vector.
//!
//! # Architecture
//!
//! ```text
//! Solution Evaluator (score / objectives)
//!     ↓ uses
//! Lit Board (illumination + violations)
//!     ↓ reads
//! Grid (akari-engine)
//! ```
//!
//! Evaluation is pure: the same grid, options and lights always produce the same
//! [`solution_evaluator::SolutionEvaluation`], which lets the search evaluate offspring
//! concurrently.
//!
//! # Example
//!
//! ```
//! use akari_engine::{Coord, Grid};
//! use akari_evaluator::solution_evaluator::{
//!     EvaluationMode, EvaluatorConfig, Objectives, SolutionEvaluator,
//! };
//!
//! let grid = Grid::new(5, 1, []).unwrap();
//! let config = EvaluatorConfig {
//!     mode: EvaluationMode::MultiObjective,
//!     ..EvaluatorConfig::default()
//! };
//! let evaluator = SolutionEvaluator::new(&grid, config);
//!
//! let evaluation = evaluator.evaluate(&[Coord::new(0, 0), Coord::new(4, 0)]);
//! assert_eq!(evaluation.light_violations(), 1);
//! assert_eq!(evaluation.objectives(), Some(Objectives([5.0, 0.5, 1.0])));
//! ```

pub mod lit_board;
pub mod solution_evaluator;

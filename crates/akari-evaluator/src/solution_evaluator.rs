//! Fitness evaluation of complete light placements.
//!
//! [`SolutionEvaluator::evaluate`] is a pure function of the grid, the
//! evaluator options and the set of lights. It is safe to call concurrently
//! from several threads.
//!
//! # Scoring
//!
//! In [`EvaluationMode::SingleObjective`] the score is the lit cell count,
//! adjusted for violations, divided by the number of white cells:
//!
//! - without a penalty coefficient any violation zeroes the score
//! - with a coefficient `c` the score becomes `lit - c * violations`
//!
//! A grid without white cells scores `0.0`.
//!
//! In [`EvaluationMode::MultiObjective`] the result is the objective vector
//! `(lit, 1 / (light_violations + 1), 1 / (black_cell_violations + 1))`, all
//! maximized.

use akari_engine::{Coord, Grid};

use crate::lit_board::LitBoard;

/// Which kind of fitness the evaluator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum EvaluationMode {
    #[default]
    SingleObjective,
    MultiObjective,
}

/// Options controlling how placements are scored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvaluatorConfig {
    pub mode: EvaluationMode,
    /// Count deviations from black-cell clues as violations.
    pub enforce_black_cell_constraint: bool,
    /// Soft penalty weight. `None` makes every violation fatal.
    pub penalty_coefficient: Option<f64>,
}

/// The three maximized objectives of multi-objective mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Objectives(pub [f64; 3]);

impl Objectives {
    #[must_use]
    pub fn values(&self) -> &[f64; 3] {
        &self.0
    }
}

/// Scalar score or objective vector, depending on [`EvaluationMode`].
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum Fitness {
    Score(f64),
    Objectives(Objectives),
}

/// Result of evaluating one light placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolutionEvaluation {
    lit_count: usize,
    light_violations: usize,
    black_cell_violations: usize,
    fitness: Fitness,
}

impl SolutionEvaluation {
    /// Number of lit white cells, light cells included.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.lit_count
    }

    /// Number of light pairs that shine on each other.
    #[must_use]
    pub fn light_violations(&self) -> usize {
        self.light_violations
    }

    /// Sum of `|adjacent lights - clue|` over all clue cells.
    ///
    /// Always zero when black-cell constraints are not enforced.
    #[must_use]
    pub fn black_cell_violations(&self) -> usize {
        self.black_cell_violations
    }

    #[must_use]
    pub fn violations(&self) -> usize {
        self.light_violations + self.black_cell_violations
    }

    /// A placement is valid when it has no counted violation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations() == 0
    }

    #[must_use]
    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    /// The scalar score, if evaluated in single-objective mode.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        match self.fitness {
            Fitness::Score(score) => Some(score),
            Fitness::Objectives(_) => None,
        }
    }

    /// The objective vector, if evaluated in multi-objective mode.
    #[must_use]
    pub fn objectives(&self) -> Option<Objectives> {
        match self.fitness {
            Fitness::Objectives(objectives) => Some(objectives),
            Fitness::Score(_) => None,
        }
    }
}

/// Scores light placements on a fixed grid.
///
/// # Example
///
/// ```
/// use akari_engine::{Coord, Grid};
/// use akari_evaluator::solution_evaluator::{EvaluatorConfig, SolutionEvaluator};
///
/// let grid = Grid::new(5, 5, []).unwrap();
/// let evaluator = SolutionEvaluator::new(&grid, EvaluatorConfig::default());
/// let evaluation = evaluator.evaluate(&[Coord::new(2, 2)]);
///
/// assert_eq!(evaluation.lit_count(), 9);
/// assert!(evaluation.is_valid());
/// assert_eq!(evaluation.score(), Some(9.0 / 25.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SolutionEvaluator<'a> {
    grid: &'a Grid,
    config: EvaluatorConfig,
}

impl<'a> SolutionEvaluator<'a> {
    #[must_use]
    pub fn new(grid: &'a Grid, config: EvaluatorConfig) -> Self {
        Self { grid, config }
    }

    #[must_use]
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    #[must_use]
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluates the placement of `lights`, which must all be white cells.
    #[must_use]
    pub fn evaluate(&self, lights: &[Coord]) -> SolutionEvaluation {
        let board = LitBoard::new(self.grid, lights);
        let lit_count = board.lit_count();
        let light_violations = board.light_violations();
        let black_cell_violations = if self.config.enforce_black_cell_constraint {
            black_cell_violations(&board)
        } else {
            0
        };

        let fitness = match self.config.mode {
            EvaluationMode::SingleObjective => {
                Fitness::Score(self.score(lit_count, light_violations + black_cell_violations))
            }
            EvaluationMode::MultiObjective => Fitness::Objectives(objectives(
                lit_count,
                light_violations,
                black_cell_violations,
            )),
        };

        SolutionEvaluation {
            lit_count,
            light_violations,
            black_cell_violations,
            fitness,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn score(&self, lit_count: usize, violations: usize) -> f64 {
        let white_count = self.grid.white_count();
        if white_count == 0 {
            return 0.0;
        }
        let score = match self.config.penalty_coefficient {
            Some(coefficient) => lit_count as f64 - coefficient * violations as f64,
            None if violations > 0 => 0.0,
            None => lit_count as f64,
        };
        score / white_count as f64
    }
}

fn black_cell_violations(board: &LitBoard<'_>) -> usize {
    board
        .grid()
        .clue_cells()
        .map(|(coord, clue)| board.adjacent_lights(coord).abs_diff(usize::from(clue)))
        .sum()
}

#[expect(clippy::cast_precision_loss)]
fn objectives(lit_count: usize, light_violations: usize, black_cell_violations: usize) -> Objectives {
    Objectives([
        lit_count as f64,
        1.0 / (light_violations + 1) as f64,
        1.0 / (black_cell_violations + 1) as f64,
    ])
}

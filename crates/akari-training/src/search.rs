//! Search orchestration: repeated independent runs of one algorithm.
//!
//! A run moves through three phases: it is initialized (base genotype and
//! first population), evolves generation by generation, and terminates when
//! the evaluation budget is spent or, with a stagnation limit, when the best
//! result has not improved for that many evaluations.
//!
//! The evaluation counter grows by `lambda` per generation and may overshoot
//! the budget by up to `lambda - 1`.
//!
//! Only the best result of all runs is kept:
//!
//! - single-objective: the individual with the strictly highest score, earliest
//!   run first
//! - multi-objective: the front preferred by
//!   [`compare_domination`](crate::pareto::compare_domination)

use std::fmt;

use akari_engine::{Coord, Grid};
use akari_evaluator::solution_evaluator::{
    EvaluationMode, EvaluatorConfig, Objectives, SolutionEvaluation, SolutionEvaluator,
};
use rand::{Rng, seq::index};

use crate::{
    base_genotype::BaseGenotype,
    config::{EvolutionConfig, SearchAlgorithm, SearchConfig},
    genetic::Population,
    individual::{Breeder, Individual},
    pareto::{Choice, TieBreak, compare_domination},
    stats::Summary,
};

/// One progress line of a run's log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Checkpoint {
    /// Population fitness after a generation (single-objective).
    Fitness {
        evaluations: usize,
        fitness: Summary,
    },
    /// Population objectives after a generation (multi-objective).
    Objectives {
        evaluations: usize,
        objectives: [Summary; 3],
    },
    /// A new best score of a random-search run.
    Improvement { evaluation: usize, score: f64 },
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fitness {
                evaluations,
                fitness,
            } => write!(f, "{evaluations}\t{}\t{}", fitness.mean, fitness.max),
            Self::Objectives {
                evaluations,
                objectives,
            } => {
                write!(f, "{evaluations}")?;
                for summary in objectives {
                    write!(f, "\t{}\t{}", summary.mean, summary.max)?;
                }
                Ok(())
            }
            Self::Improvement { evaluation, score } => write!(f, "{evaluation}\t{score}"),
        }
    }
}

/// A light placement and its evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    lights: Vec<Coord>,
    evaluation: SolutionEvaluation,
}

impl Solution {
    fn new(mut lights: Vec<Coord>, evaluation: SolutionEvaluation) -> Self {
        lights.sort_unstable();
        Self { lights, evaluation }
    }

    /// All lights, forced ones included, in lexicographic order.
    #[must_use]
    pub fn lights(&self) -> &[Coord] {
        &self.lights
    }

    #[must_use]
    pub fn evaluation(&self) -> &SolutionEvaluation {
        &self.evaluation
    }
}

/// The best result of a run or of a whole search.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Single(Solution),
    Front(Vec<Solution>),
}

impl Outcome {
    /// The score of a single-objective result.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Single(solution) => solution.evaluation.score(),
            Self::Front(_) => None,
        }
    }

    fn objectives(&self) -> Vec<Objectives> {
        match self {
            Self::Single(solution) => solution.evaluation.objectives().into_iter().collect(),
            Self::Front(front) => front
                .iter()
                .filter_map(|s| s.evaluation.objectives())
                .collect(),
        }
    }
}

impl fmt::Display for Outcome {
    /// Writes the solution block.
    ///
    /// A single solution starts with its lit cell count. Each member of a
    /// front starts with its objectives and the front size. Coordinates are
    /// 1-indexed `x y` lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(solution) => {
                writeln!(f, "{}", solution.evaluation.lit_count())?;
                write_lights(f, &solution.lights)
            }
            Self::Front(front) => {
                for solution in front {
                    let [a, b, c] = solution
                        .evaluation
                        .objectives()
                        .map_or([f64::NAN; 3], |o| *o.values());
                    writeln!(f, "{a}\t{b}\t{c}\t{}", front.len())?;
                    write_lights(f, &solution.lights)?;
                }
                Ok(())
            }
        }
    }
}

fn write_lights(f: &mut fmt::Formatter<'_>, lights: &[Coord]) -> fmt::Result {
    for light in lights {
        writeln!(f, "{light}")?;
    }
    Ok(())
}

/// Log lines and best result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub checkpoints: Vec<Checkpoint>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub runs: Vec<RunReport>,
    /// The best outcome across all runs.
    pub best: Outcome,
}

/// Runs the configured search on `grid`.
///
/// All randomness is drawn from `rng`, so a fixed seed reproduces the search.
///
/// # Panics
///
/// Panics if `runs` or `evaluations` is zero, or if an evolutionary algorithm
/// is configured without evolution settings.
/// [`RawConfig::validate`](crate::config::RawConfig::validate) never produces
/// such a configuration.
pub fn run_search<R>(grid: &Grid, config: &SearchConfig, rng: &mut R) -> SearchReport
where
    R: Rng + ?Sized,
{
    let evaluator = SolutionEvaluator::new(grid, config.evaluator);
    let base = config.evolution.map(|evolution| {
        let base = BaseGenotype::new(grid, evolution.forced_init);
        log::debug!(
            "base genotype: {} loci, {} forced lights, {} never-light cells",
            base.len(),
            base.forced_lights().len(),
            base.never_light().len()
        );
        base
    });

    let mut runs = Vec::with_capacity(config.runs);
    let mut best: Option<Outcome> = None;
    for run in 1..=config.runs {
        log::info!("{} run {run}/{} started", config.algorithm, config.runs);
        let report = match (config.algorithm, &base, &config.evolution) {
            (SearchAlgorithm::RandomSearch, _, _) => {
                random_run(grid, config.evaluator, config.evaluations, rng)
            }
            (SearchAlgorithm::Ea | SearchAlgorithm::Moea, Some(base), Some(evolution)) => {
                let breeder = Breeder::new(base, evaluator, evolution.mutation_rate);
                evolution_run(&breeder, evolution, config, rng)
            }
            _ => panic!("evolutionary search configured without evolution settings"),
        };

        best = Some(match best {
            None => report.outcome.clone(),
            Some(incumbent) => keep_better(incumbent, &report.outcome),
        });
        if let Some(score) = report.outcome.score() {
            log::info!("run {run} finished with best score {score}");
        } else {
            log::info!("run {run} finished");
        }
        runs.push(report);
    }

    SearchReport {
        runs,
        best: best.expect("at least one run"),
    }
}

fn keep_better(incumbent: Outcome, challenger: &Outcome) -> Outcome {
    let replace = match (incumbent.score(), challenger.score()) {
        (Some(current), Some(candidate)) => candidate > current,
        _ => compare_domination(
            &incumbent.objectives(),
            &challenger.objectives(),
            TieBreak::Incumbent,
        )
        .is_challenger(),
    };
    if replace { challenger.clone() } else { incumbent }
}

/// Uniform random sampling of light placements, without any genotype.
fn random_run<R>(grid: &Grid, config: EvaluatorConfig, evaluations: usize, rng: &mut R) -> RunReport
where
    R: Rng + ?Sized,
{
    let evaluator = SolutionEvaluator::new(
        grid,
        EvaluatorConfig {
            mode: EvaluationMode::SingleObjective,
            ..config
        },
    );
    let whites = grid.white_cells().collect::<Vec<_>>();

    let mut checkpoints = vec![];
    let mut best: Option<Solution> = None;
    for evaluation in 1..=evaluations {
        let lights = if whites.is_empty() {
            vec![]
        } else {
            let count = rng.random_range(1..=whites.len());
            index::sample(rng, whites.len(), count)
                .into_iter()
                .map(|i| whites[i])
                .collect()
        };
        let result = evaluator.evaluate(&lights);
        let score = result.score().unwrap_or_default();
        if best.as_ref().is_none_or(|b| score > b.evaluation.score().unwrap_or_default()) {
            checkpoints.push(Checkpoint::Improvement { evaluation, score });
            best = Some(Solution::new(lights, result));
        }
    }

    RunReport {
        checkpoints,
        outcome: Outcome::Single(best.expect("evaluation budget is at least one")),
    }
}

/// Running best of an evolutionary run.
enum Elite {
    Individual(Individual),
    Front(Vec<Individual>),
}

impl Elite {
    fn of(population: &Population, multi_objective: bool) -> Self {
        if multi_objective {
            Self::Front(population.front().into_iter().cloned().collect())
        } else {
            Self::Individual(
                population
                    .best()
                    .expect("population is never empty")
                    .clone(),
            )
        }
    }

    /// Replaces the elite if `population` holds something better.
    ///
    /// Returns `true` on improvement.
    fn update(&mut self, population: &Population) -> bool {
        match self {
            Self::Individual(best) => {
                let candidate = population.best().expect("population is never empty");
                if candidate.fitness() > best.fitness() {
                    *best = candidate.clone();
                    return true;
                }
                false
            }
            Self::Front(front) => {
                let challenger = population.front();
                let choice = compare_domination(
                    &front_objectives(front.iter()),
                    &front_objectives(challenger.iter().copied()),
                    TieBreak::Incumbent,
                );
                match choice {
                    Choice::Incumbent => false,
                    Choice::Challenger => {
                        *front = challenger.into_iter().cloned().collect();
                        true
                    }
                }
            }
        }
    }

    fn into_outcome(self, breeder: &Breeder<'_>) -> Outcome {
        let solution = |ind: &Individual| Solution::new(breeder.lights(ind), *ind.evaluation());
        match self {
            Self::Individual(best) => Outcome::Single(solution(&best)),
            Self::Front(front) => Outcome::Front(front.iter().map(solution).collect()),
        }
    }
}

fn front_objectives<'a, I>(front: I) -> Vec<Objectives>
where
    I: Iterator<Item = &'a Individual>,
{
    front
        .map(|ind| {
            ind.objectives()
                .expect("individual evaluated in multi-objective mode")
        })
        .collect()
}

fn checkpoint(population: &Population, evaluations: usize, multi_objective: bool) -> Checkpoint {
    if multi_objective {
        Checkpoint::Objectives {
            evaluations,
            objectives: population
                .objective_stats()
                .expect("population is never empty"),
        }
    } else {
        Checkpoint::Fitness {
            evaluations,
            fitness: population.fitness_stats().expect("population is never empty"),
        }
    }
}

fn evolution_run<R>(
    breeder: &Breeder<'_>,
    evolution: &EvolutionConfig,
    config: &SearchConfig,
    rng: &mut R,
) -> RunReport
where
    R: Rng + ?Sized,
{
    let multi_objective = config.evaluator.mode.is_multi_objective();
    let evolver = evolution.evolver();

    let mut population = Population::random(breeder, evolution.mu, rng);
    let mut evaluations = evolution.mu;
    let mut checkpoints = vec![checkpoint(&population, evaluations, multi_objective)];
    let mut elite = Elite::of(&population, multi_objective);
    let mut stale = 0;

    while evaluations < config.evaluations {
        population = evolver.evolve(breeder, population, rng);
        evaluations += evolution.lambda;

        let line = checkpoint(&population, evaluations, multi_objective);
        log::debug!("{line}");
        checkpoints.push(line);

        if elite.update(&population) {
            stale = 0;
        } else {
            stale += evolution.lambda;
            if config.stagnation_limit.is_some_and(|limit| stale >= limit) {
                log::info!("no improvement for {stale} evaluations, stopping after {evaluations}");
                break;
            }
        }
    }

    RunReport {
        checkpoints,
        outcome: elite.into_outcome(breeder),
    }
}

//! Individuals and offspring creation.
//!
//! An [`Individual`] owns its genotype and the evaluation of the placement it
//! decodes to. Offspring are produced by a [`Breeder`], which holds the shared
//! run context: the base genotype, the evaluator and the mutation rate.
//!
//! Breeding a batch is split into two phases. Genotypes are recombined
//! sequentially so that random draws happen in a fixed order, then all
//! placements are evaluated concurrently. The result does not depend on the
//! number of threads.

use std::{num::NonZeroUsize, thread};

use akari_engine::Coord;
use akari_evaluator::solution_evaluator::{Objectives, SolutionEvaluation, SolutionEvaluator};
use rand::Rng;

use crate::{base_genotype::BaseGenotype, genes, selection::Scored};

/// A candidate solution: a genotype and its evaluation.
#[derive(Debug, Clone)]
pub struct Individual {
    genes: Vec<bool>,
    evaluation: SolutionEvaluation,
    fitness: f64,
}

impl Individual {
    fn new(genes: Vec<bool>, evaluation: SolutionEvaluation) -> Self {
        // Multi-objective individuals receive their fitness from Pareto ranking.
        let fitness = evaluation.score().unwrap_or(0.0);
        Self {
            genes,
            evaluation,
            fitness,
        }
    }

    #[must_use]
    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    #[must_use]
    pub fn evaluation(&self) -> &SolutionEvaluation {
        &self.evaluation
    }

    /// Scalar fitness used by selection.
    ///
    /// This is the score in single-objective mode and `1 / (level + 1)` after
    /// Pareto ranking in multi-objective mode.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub(crate) fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Objective vector, if evaluated in multi-objective mode.
    #[must_use]
    pub fn objectives(&self) -> Option<Objectives> {
        self.evaluation.objectives()
    }
}

impl Scored for Individual {
    fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// Creates and evaluates individuals of one run.
#[derive(Debug, Clone, Copy)]
pub struct Breeder<'a> {
    base: &'a BaseGenotype,
    evaluator: SolutionEvaluator<'a>,
    mutation_rate: u32,
}

impl<'a> Breeder<'a> {
    /// # Panics
    ///
    /// Panics if `mutation_rate` is zero.
    #[must_use]
    pub fn new(base: &'a BaseGenotype, evaluator: SolutionEvaluator<'a>, mutation_rate: u32) -> Self {
        assert!(mutation_rate > 0, "mutation rate denominator must be positive");
        Self {
            base,
            evaluator,
            mutation_rate,
        }
    }

    #[must_use]
    pub fn base(&self) -> &'a BaseGenotype {
        self.base
    }

    #[must_use]
    pub fn evaluator(&self) -> &SolutionEvaluator<'a> {
        &self.evaluator
    }

    /// Creates `count` random individuals.
    pub fn random_batch<R>(&self, count: usize, rng: &mut R) -> Vec<Individual>
    where
        R: Rng + ?Sized,
    {
        let genotypes = (0..count)
            .map(|_| genes::random(rng, self.base.len()))
            .collect();
        self.evaluate_all(genotypes)
    }

    /// Uniform crossover of both parents followed by per-locus mutation.
    ///
    /// Neither parent is modified.
    pub fn recombine<R>(&self, parent1: &Individual, parent2: &Individual, rng: &mut R) -> Vec<bool>
    where
        R: Rng + ?Sized,
    {
        let mut child = genes::uniform_crossover(&parent1.genes, &parent2.genes, rng);
        genes::mutate(&mut child, self.mutation_rate, rng);
        child
    }

    /// Recombines two parents and evaluates the child.
    pub fn breed<R>(&self, parent1: &Individual, parent2: &Individual, rng: &mut R) -> Individual
    where
        R: Rng + ?Sized,
    {
        let child = self.recombine(parent1, parent2, rng);
        self.evaluate(child)
    }

    /// Breeds one child per `(parent1, parent2)` index pair into `parents`.
    pub fn breed_batch<R>(
        &self,
        parent_pairs: &[(usize, usize)],
        parents: &[Individual],
        rng: &mut R,
    ) -> Vec<Individual>
    where
        R: Rng + ?Sized,
    {
        let genotypes = parent_pairs
            .iter()
            .map(|&(i, j)| self.recombine(&parents[i], &parents[j], rng))
            .collect();
        self.evaluate_all(genotypes)
    }

    #[must_use]
    pub fn evaluate(&self, genes: Vec<bool>) -> Individual {
        let evaluation = self.evaluator.evaluate(&self.base.lights(&genes));
        Individual::new(genes, evaluation)
    }

    /// Evaluates genotypes in parallel, preserving their order.
    #[must_use]
    pub fn evaluate_all(&self, genotypes: Vec<Vec<bool>>) -> Vec<Individual> {
        let threads = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let chunk_size = genotypes.len().div_ceil(threads).max(1);
        let mut evaluations = vec![None; genotypes.len()];

        thread::scope(|s| {
            for (chunk, slots) in genotypes
                .chunks(chunk_size)
                .zip(evaluations.chunks_mut(chunk_size))
            {
                s.spawn(move || {
                    for (genes, slot) in chunk.iter().zip(slots) {
                        *slot = Some(self.evaluator.evaluate(&self.base.lights(genes)));
                    }
                });
            }
        });

        genotypes
            .into_iter()
            .zip(evaluations)
            .map(|(genes, evaluation)| {
                Individual::new(genes, evaluation.expect("every genotype is evaluated"))
            })
            .collect()
    }

    /// The full light placement of `individual`, forced lights included, sorted.
    #[must_use]
    pub fn lights(&self, individual: &Individual) -> Vec<Coord> {
        self.base.lights(&individual.genes)
    }
}

//! Parent and survivor selection operators.
//!
//! Operators work on anything [`Scored`] and return indices or new
//! collections; the population handed in is never left partially modified.
//!
//! # Tie-breaking
//!
//! Tournaments pick the last individual of maximal fitness in the order the
//! tournament was sampled. Truncation sorts stably by descending fitness, so
//! among equal fitness the earlier individual survives.
//!
//! # Fitness-proportional weights
//!
//! Sampling weights are `fitness - min(0, min_fitness) + ε`. Every weight is
//! therefore positive, even with negative fitness from soft penalties. A chosen
//! individual's weight is set to zero while it must not be drawn again.

use std::mem;

use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
    seq::index,
};

/// Offset keeping every fitness-proportional sampling weight positive.
pub const WEIGHT_EPSILON: f64 = 1e-12;

/// Anything that carries a scalar fitness to select on.
pub trait Scored {
    fn fitness(&self) -> f64;
}

/// How pairs of parents are drawn for each child.
///
/// Every variant prevents a parent from mating with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentSelection {
    /// Best of `k` sampled without replacement, for each parent.
    Tournament { k: usize },
    FitnessProportional,
    Uniform,
}

impl ParentSelection {
    /// Draws `count` parent index pairs from `population`.
    ///
    /// # Panics
    ///
    /// Panics if `population` has fewer than two individuals.
    pub fn select_pairs<T, R>(
        &self,
        population: &[T],
        count: usize,
        rng: &mut R,
    ) -> Vec<(usize, usize)>
    where
        T: Scored,
        R: Rng + ?Sized,
    {
        let len = population.len();
        assert!(len >= 2, "parent selection needs at least two individuals");

        match *self {
            Self::Tournament { k } => (0..count)
                .map(|_| {
                    let first = tournament(population, (0..len).collect(), k, rng);
                    let rest = (0..len).filter(|&i| i != first).collect();
                    let second = tournament(population, rest, k, rng);
                    (first, second)
                })
                .collect(),
            Self::FitnessProportional => {
                let mut weights = sampling_weights(population);
                (0..count)
                    .map(|_| {
                        let first = weighted_draw(&weights, rng);
                        let saved = mem::replace(&mut weights[first], 0.0);
                        let second = weighted_draw(&weights, rng);
                        weights[first] = saved;
                        (first, second)
                    })
                    .collect()
            }
            Self::Uniform => (0..count)
                .map(|_| {
                    let first = rng.random_range(0..len);
                    let mut second = rng.random_range(0..len - 1);
                    if second >= first {
                        second += 1;
                    }
                    (first, second)
                })
                .collect(),
        }
    }
}

/// How the next population is chosen from the pool of candidates.
///
/// Every variant selects each candidate at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurvivorSelection {
    /// Repeated tournaments of `k` over the shrinking pool.
    Tournament { k: usize },
    Truncation,
    Uniform,
    FitnessProportional,
}

impl SurvivorSelection {
    /// Picks `mu` survivors out of `pool`, in selection order.
    ///
    /// # Panics
    ///
    /// Panics if `pool` has fewer than `mu` candidates.
    pub fn select<T, R>(&self, pool: Vec<T>, mu: usize, rng: &mut R) -> Vec<T>
    where
        T: Scored,
        R: Rng + ?Sized,
    {
        let len = pool.len();
        assert!(len >= mu, "cannot select {mu} survivors from {len} candidates");

        let chosen = match *self {
            Self::Tournament { k } => {
                let mut remaining = (0..len).collect::<Vec<_>>();
                (0..mu)
                    .map(|_| {
                        let winner = tournament(&pool, remaining.clone(), k, rng);
                        remaining.retain(|&i| i != winner);
                        winner
                    })
                    .collect()
            }
            Self::Truncation => {
                let mut order = (0..len).collect::<Vec<_>>();
                order.sort_by(|&a, &b| pool[b].fitness().total_cmp(&pool[a].fitness()));
                order.truncate(mu);
                order
            }
            Self::Uniform => index::sample(rng, len, mu).into_vec(),
            Self::FitnessProportional => {
                let mut weights = sampling_weights(&pool);
                (0..mu)
                    .map(|_| {
                        let i = weighted_draw(&weights, rng);
                        weights[i] = 0.0;
                        i
                    })
                    .collect::<Vec<_>>()
            }
        };

        let mut slots = pool.into_iter().map(Some).collect::<Vec<_>>();
        chosen
            .into_iter()
            .map(|i| slots[i].take().expect("survivor selected at most once"))
            .collect()
    }
}

/// Samples `k` of `candidates` without replacement and returns the fittest.
///
/// `k` is clamped to the number of candidates.
fn tournament<T, R>(population: &[T], candidates: Vec<usize>, k: usize, rng: &mut R) -> usize
where
    T: Scored,
    R: Rng + ?Sized,
{
    assert!(k > 0 && !candidates.is_empty());
    let k = k.min(candidates.len());
    index::sample(rng, candidates.len(), k)
        .into_iter()
        .map(|i| candidates[i])
        .max_by(|&a, &b| population[a].fitness().total_cmp(&population[b].fitness()))
        .expect("tournament is never empty")
}

/// Fitness shifted so that every weight is positive.
#[must_use]
pub fn sampling_weights<T>(population: &[T]) -> Vec<f64>
where
    T: Scored,
{
    let min = population
        .iter()
        .map(Scored::fitness)
        .fold(0.0, f64::min);
    population
        .iter()
        .map(|ind| ind.fitness() - min + WEIGHT_EPSILON)
        .collect()
}

fn weighted_draw<R>(weights: &[f64], rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    WeightedIndex::new(weights)
        .expect("at least one sampling weight is positive")
        .sample(rng)
}

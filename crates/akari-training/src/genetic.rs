//! Generational evolution of light placements.
//!
//! One generation of [`PopulationEvolver::evolve`] runs these steps:
//!
//! 1. **Parent selection**: draw `lambda` parent pairs from the population
//! 2. **Recombination**: uniform crossover and per-locus flip mutation
//! 3. **Evaluation**: score all offspring (in parallel)
//! 4. **Pool**: offspring alone (comma survival) or population plus offspring
//!    (plus survival)
//! 5. **Ranking**: in multi-objective mode, fitness becomes `1 / (level + 1)`
//!    of the pool's Pareto ranking
//! 6. **Survivor selection**: reduce the pool to `mu` individuals
//!
//! In multi-objective mode the survivors are ranked again, so their fitness
//! always reflects the population they belong to.

use akari_evaluator::solution_evaluator::Objectives;
use rand::Rng;

use crate::{
    individual::{Breeder, Individual},
    pareto::ParetoFronts,
    selection::{ParentSelection, SurvivorSelection},
    stats::Summary,
};

/// Whether parents compete with their offspring for survival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Survival {
    /// Survivors are chosen from the offspring only.
    Comma,
    /// Survivors are chosen from parents and offspring.
    Plus,
}

/// A population of evaluated individuals.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` random individuals.
    ///
    /// In multi-objective mode the new population is ranked immediately.
    pub fn random<R>(breeder: &Breeder<'_>, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut population = Self {
            individuals: breeder.random_batch(count, rng),
        };
        if is_multi_objective(breeder) {
            population.rank_fronts();
        }
        population
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The first individual with the highest fitness.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.iter().reduce(|best, ind| {
            if ind.fitness() > best.fitness() {
                ind
            } else {
                best
            }
        })
    }

    /// Pareto-ranks the population and assigns level-based fitness.
    ///
    /// # Panics
    ///
    /// Panics if an individual was not evaluated in multi-objective mode.
    pub fn rank_fronts(&mut self) -> ParetoFronts {
        rank(&mut self.individuals)
    }

    /// Members of the non-dominated front.
    ///
    /// # Panics
    ///
    /// Panics if an individual was not evaluated in multi-objective mode.
    #[must_use]
    pub fn front(&self) -> Vec<&Individual> {
        let fronts = ParetoFronts::rank(&objectives(&self.individuals));
        fronts.front().iter().map(|&i| &self.individuals[i]).collect()
    }

    #[must_use]
    pub fn fitness_stats(&self) -> Option<Summary> {
        Summary::new(self.individuals.iter().map(Individual::fitness))
    }

    /// Mean and maximum of each objective.
    ///
    /// # Panics
    ///
    /// Panics if an individual was not evaluated in multi-objective mode.
    #[must_use]
    pub fn objective_stats(&self) -> Option<[Summary; 3]> {
        let objectives = objectives(&self.individuals);
        let summary = |k: usize| Summary::new(objectives.iter().map(|o| o.values()[k]));
        Some([summary(0)?, summary(1)?, summary(2)?])
    }
}

/// Controls how one generation turns into the next.
#[derive(Debug, Clone, Copy)]
pub struct PopulationEvolver {
    /// Population size kept by survivor selection
    pub mu: usize,
    /// Offspring per generation
    pub lambda: usize,
    pub parent_selection: ParentSelection,
    pub survivor_selection: SurvivorSelection,
    pub survival: Survival,
}

impl PopulationEvolver {
    /// Evolves `population` into the next generation of `mu` individuals.
    ///
    /// # Panics
    ///
    /// Panics if the population has fewer than two individuals, or if the
    /// survivor pool is smaller than `mu`.
    #[must_use]
    pub fn evolve<R>(&self, breeder: &Breeder<'_>, population: Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let parents = population.individuals;
        let pairs = self
            .parent_selection
            .select_pairs(&parents, self.lambda, rng);
        let offspring = breeder.breed_batch(&pairs, &parents, rng);

        let mut pool = match self.survival {
            Survival::Comma => offspring,
            Survival::Plus => {
                let mut pool = parents;
                pool.extend(offspring);
                pool
            }
        };

        let multi_objective = is_multi_objective(breeder);
        if multi_objective {
            rank(&mut pool);
        }
        let mut next = Population {
            individuals: self.survivor_selection.select(pool, self.mu, rng),
        };
        if multi_objective {
            next.rank_fronts();
        }
        next
    }
}

fn is_multi_objective(breeder: &Breeder<'_>) -> bool {
    breeder.evaluator().config().mode.is_multi_objective()
}

fn objectives(individuals: &[Individual]) -> Vec<Objectives> {
    individuals
        .iter()
        .map(|ind| {
            ind.objectives()
                .expect("individual evaluated in multi-objective mode")
        })
        .collect()
}

fn rank(individuals: &mut [Individual]) -> ParetoFronts {
    let fronts = ParetoFronts::rank(&objectives(individuals));
    for (ind, fitness) in individuals.iter_mut().zip(fronts.fitness()) {
        ind.set_fitness(fitness);
    }
    fronts
}

//! Boolean genotype operations.
//!
//! A genotype holds one gene per locus of the
//! [`BaseGenotype`](crate::base_genotype::BaseGenotype): `true` places a light
//! on that cell. These functions are the building blocks used by
//! [`individual::Breeder`](crate::individual::Breeder):
//!
//! - **Initialization**: [`random`] switches on a random number of random loci
//! - **Crossover**: [`uniform_crossover`] takes every gene from either parent
//! - **Mutation**: [`mutate`] flips every gene with probability `1 / rate`
//!
//! Operators never modify their parents. All randomness comes from the
//! generator passed in, so an identical generator state reproduces an
//! identical genotype.

use rand::{Rng, seq::index};

/// Creates a genotype by applying a function to each locus index.
///
/// # Examples
///
/// ```
/// use akari_training::genes;
///
/// let genes = genes::from_fn(|i| i % 2 == 0, 4);
/// assert_eq!(genes, vec![true, false, true, false]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<bool>
where
    F: FnMut(usize) -> bool,
{
    let mut genes = Vec::with_capacity(len);
    for i in 0..len {
        genes.push(f(i));
    }
    genes
}

/// Generates a random genotype for an initial population.
///
/// Chooses `k` uniformly from `1..=len`, then switches on `k` distinct loci
/// chosen uniformly at random. An empty genotype is returned unchanged.
pub fn random<R>(rng: &mut R, len: usize) -> Vec<bool>
where
    R: Rng + ?Sized,
{
    let mut genes = vec![false; len];
    if len == 0 {
        return genes;
    }
    let count = rng.random_range(1..=len);
    for i in index::sample(rng, len, count) {
        genes[i] = true;
    }
    genes
}

/// Uniform crossover: each gene is copied from `p1` or `p2` with equal probability.
///
/// # Panics
///
/// Panics if parent genotypes have different lengths.
pub fn uniform_crossover<R>(p1: &[bool], p2: &[bool], rng: &mut R) -> Vec<bool>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    from_fn(|i| if rng.random_bool(0.5) { p1[i] } else { p2[i] }, p1.len())
}

/// Flips each gene independently with probability `1 / rate`.
///
/// # Panics
///
/// Panics if `rate` is zero.
pub fn mutate<R>(genes: &mut [bool], rate: u32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    assert!(rate > 0, "mutation rate denominator must be positive");
    for gene in genes {
        if rng.random_ratio(1, rate) {
            *gene = !*gene;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_random_switches_on_at_least_one_locus() {
        let mut rng = Pcg32::seed_from_u64(7);
        for len in 1..20 {
            let genes = random(&mut rng, len);
            assert_eq!(genes.len(), len);
            assert!(genes.iter().any(|&g| g));
        }
    }

    #[test]
    fn test_random_empty() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert!(random(&mut rng, 0).is_empty());
    }

    #[test]
    fn test_crossover_takes_genes_from_parents() {
        let mut rng = Pcg32::seed_from_u64(1);
        let p1 = vec![true; 32];
        let p2 = vec![false; 32];
        let child = uniform_crossover(&p1, &p2, &mut rng);
        assert_eq!(child.len(), 32);
        assert!(child.iter().any(|&g| g));
        assert!(child.iter().any(|&g| !g));

        let same = uniform_crossover(&p1, &p1, &mut rng);
        assert_eq!(same, p1);
    }

    #[test]
    fn test_crossover_is_reproducible() {
        let p1 = from_fn(|i| i % 3 == 0, 40);
        let p2 = from_fn(|i| i % 2 == 0, 40);
        let a = uniform_crossover(&p1, &p2, &mut Pcg32::seed_from_u64(99));
        let b = uniform_crossover(&p1, &p2, &mut Pcg32::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_mutation_rate_one_flips_everything() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut genes = vec![true, false, true];
        mutate(&mut genes, 1, &mut rng);
        assert_eq!(genes, vec![false, true, false]);
    }

    #[test]
    fn test_low_mutation_rate_changes_little() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut genes = vec![false; 1000];
        mutate(&mut genes, 1_000_000, &mut rng);
        assert!(genes.iter().filter(|&&g| g).count() < 5);
    }
}

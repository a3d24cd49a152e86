//! Pareto dominance, non-dominated sorting and elite-set comparison.
//!
//! [`ParetoFronts::rank`] places individuals one at a time, in population
//! order, starting at level 0. An incoming individual that dominates an
//! incumbent pushes the incumbent down one level, where it is placed again by
//! the same rule. An incoming individual dominated by an incumbent moves down
//! itself. Displacements are processed from an explicit worklist in the same
//! depth-first order a recursive formulation would use, so deep cascades do
//! not grow the call stack.

use std::cmp::Ordering;

use akari_evaluator::solution_evaluator::Objectives;

/// Returns `true` if `a` is at least as good as `b` in every objective and
/// strictly better in at least one.
#[must_use]
pub fn dominates(a: &Objectives, b: &Objectives) -> bool {
    let mut strictly_better = false;
    for (x, y) in a.values().iter().zip(b.values()) {
        if x < y {
            return false;
        }
        if x > y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Levels of mutually non-dominating individuals, best level first.
///
/// Levels hold indices into the ranked slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParetoFronts {
    levels: Vec<Vec<usize>>,
}

impl ParetoFronts {
    /// Sorts `objectives` into fronts.
    #[must_use]
    pub fn rank(objectives: &[Objectives]) -> Self {
        let mut levels: Vec<Vec<usize>> = vec![];
        let mut pending = vec![];

        for individual in 0..objectives.len() {
            pending.push((0, individual));
            while let Some((level, current)) = pending.pop() {
                if level == levels.len() {
                    levels.push(vec![current]);
                    continue;
                }

                let mut displaced = vec![];
                let mut dominated = false;
                for &incumbent in &levels[level] {
                    if dominates(&objectives[current], &objectives[incumbent]) {
                        displaced.push(incumbent);
                    } else if dominates(&objectives[incumbent], &objectives[current]) {
                        dominated = true;
                        break;
                    }
                }

                levels[level].retain(|i| !displaced.contains(i));
                if dominated {
                    pending.push((level + 1, current));
                } else {
                    levels[level].push(current);
                }
                // Displaced incumbents are placed first, in the order found.
                pending.extend(displaced.into_iter().rev().map(|i| (level + 1, i)));
            }
        }

        Self { levels }
    }

    #[must_use]
    pub fn levels(&self) -> &[Vec<usize>] {
        &self.levels
    }

    /// The non-dominated front. Empty only if nothing was ranked.
    #[must_use]
    pub fn front(&self) -> &[usize] {
        self.levels.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Scalar fitness of every ranked index: `1 / (level + 1)`.
    #[must_use]
    pub fn fitness(&self) -> Vec<f64> {
        let len = self.levels.iter().map(Vec::len).sum();
        let mut fitness = vec![0.0; len];
        for (level, members) in (1_u32..).zip(&self.levels) {
            for &i in members {
                fitness[i] = 1.0 / f64::from(level);
            }
        }
        fitness
    }
}

/// Which set [`compare_domination`] keeps when both dominate equally often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    #[default]
    Incumbent,
    Challenger,
}

/// Outcome of [`compare_domination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Choice {
    Incumbent,
    Challenger,
}

/// Heuristic comparison of two elite sets.
///
/// Counts the members of each set that dominate at least one member of the
/// other set. The set with the higher count is chosen; equal counts are
/// resolved by `tie_break`.
#[must_use]
pub fn compare_domination(
    incumbent: &[Objectives],
    challenger: &[Objectives],
    tie_break: TieBreak,
) -> Choice {
    let incumbent_count = count_dominating(incumbent, challenger);
    let challenger_count = count_dominating(challenger, incumbent);
    match incumbent_count.cmp(&challenger_count) {
        Ordering::Greater => Choice::Incumbent,
        Ordering::Less => Choice::Challenger,
        Ordering::Equal => match tie_break {
            TieBreak::Incumbent => Choice::Incumbent,
            TieBreak::Challenger => Choice::Challenger,
        },
    }
}

fn count_dominating(set: &[Objectives], other: &[Objectives]) -> usize {
    set.iter()
        .filter(|a| other.iter().any(|b| dominates(a, b)))
        .count()
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;

    fn obj(a: f64, b: f64, c: f64) -> Objectives {
        Objectives([a, b, c])
    }

    #[test]
    fn test_dominance_is_strict() {
        let a = obj(3.0, 1.0, 0.5);
        let b = obj(2.0, 1.0, 0.5);
        assert!(dominates(&a, &b));
        assert!(!dominates(&b, &a));
        assert!(!dominates(&a, &a));
        // trade-off
        assert!(!dominates(&obj(3.0, 0.5, 1.0), &obj(2.0, 1.0, 1.0)));
        assert!(!dominates(&obj(2.0, 1.0, 1.0), &obj(3.0, 0.5, 1.0)));
    }

    #[test]
    fn test_displacement_cascades() {
        // Inserted worst first: each newcomer pushes the whole chain down.
        let objectives = [obj(1.0, 1.0, 1.0), obj(2.0, 1.0, 1.0), obj(3.0, 1.0, 1.0)];
        let fronts = ParetoFronts::rank(&objectives);
        assert_eq!(fronts.levels(), &[vec![2], vec![1], vec![0]]);
        assert_eq!(fronts.fitness(), vec![1.0 / 3.0, 0.5, 1.0]);
    }

    #[test]
    fn test_non_dominated_share_a_level() {
        let objectives = [
            obj(3.0, 0.5, 1.0),
            obj(2.0, 1.0, 1.0),
            obj(1.0, 0.5, 0.5),
            obj(3.0, 1.0, 1.0),
        ];
        let fronts = ParetoFronts::rank(&objectives);
        assert_eq!(fronts.front(), &[3]);
        assert_eq!(fronts.levels()[1], vec![0, 1]);
        assert_eq!(fronts.levels()[2], vec![2]);
    }

    #[test]
    fn test_every_lower_level_member_is_dominated_from_above() {
        let mut rng = Pcg32::seed_from_u64(31);
        for _ in 0..20 {
            let objectives = (0..40)
                .map(|_| {
                    obj(
                        f64::from(rng.random_range(0..6_u8)),
                        1.0 / f64::from(rng.random_range(1..4_u8)),
                        1.0 / f64::from(rng.random_range(1..4_u8)),
                    )
                })
                .collect::<Vec<_>>();
            let fronts = ParetoFronts::rank(&objectives);

            let mut seen = fronts.levels().concat();
            seen.sort_unstable();
            assert_eq!(seen, (0..objectives.len()).collect::<Vec<_>>());

            for pair in fronts.levels().windows(2) {
                let [upper, lower] = pair else { unreachable!() };
                for &x in lower {
                    assert!(
                        upper.iter().any(|&u| dominates(&objectives[u], &objectives[x])),
                        "{:?} is not dominated from the level above",
                        objectives[x]
                    );
                }
            }
            for level in fronts.levels() {
                assert!(!level.is_empty());
            }
        }
    }

    #[test]
    fn test_empty_population() {
        let fronts = ParetoFronts::rank(&[]);
        assert!(fronts.levels().is_empty());
        assert!(fronts.front().is_empty());
    }

    #[test]
    fn test_compare_domination() {
        let strong = [obj(5.0, 1.0, 1.0)];
        let weak = [obj(4.0, 1.0, 1.0), obj(1.0, 0.5, 1.0)];
        assert!(compare_domination(&weak, &strong, TieBreak::Incumbent).is_challenger());
        assert!(compare_domination(&strong, &weak, TieBreak::Challenger).is_incumbent());
    }

    #[test]
    fn test_compare_domination_tie_policy() {
        let a = [obj(2.0, 0.5, 1.0)];
        let b = [obj(1.0, 1.0, 1.0)];
        assert!(compare_domination(&a, &b, TieBreak::Incumbent).is_incumbent());
        assert!(compare_domination(&a, &b, TieBreak::Challenger).is_challenger());
        assert!(compare_domination(&a, &a, TieBreak::default()).is_incumbent());
    }
}

//! Shared genotype layout and clue-driven constraint propagation.
//!
//! Every individual of a run stores one boolean per *locus*. The loci are the
//! white cells of the grid in lexicographic `(x, y)` order, minus the cells that
//! propagation proved must always hold a light. Those *forced lights* are added
//! to every placement the genotype decodes to.
//!
//! # Propagation
//!
//! [`Propagator`] repeatedly scans the numbered black cells that are still
//! pending. For a clue with required count `R`, `F` adjacent forced lights and
//! candidate neighbours `C` (white, not lit by a forced light, not marked
//! never-light):
//!
//! - `R - F == 0`: every candidate is marked never-light and the clue is resolved
//! - `|C| == R - F`: every candidate becomes a forced light and the clue is resolved
//!
//! Unlike a plain comparison of `|C|` with the raw `R`, lights already forced next
//! to the clue count toward it, so a partly satisfied clue forces only what is
//! still missing.
//!
//! Black cells without a clue are resolved in the first pass. Scanning stops after
//! the first pass that changes nothing; every changing pass resolves at least one
//! clue, so the number of passes is bounded by the clue count plus one.
//!
//! Never-light cells stay ordinary loci; they are only reported.

use akari_engine::{Coord, Grid};
use akari_evaluator::lit_board::LitBoard;
use arrayvec::ArrayVec;

/// Cells fixed by propagation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Propagation {
    /// White cells that hold a light in every valid solution.
    pub forced_lights: Vec<Coord>,
    /// White cells next to a saturated clue, which can never hold a light.
    pub never_light: Vec<Coord>,
}

/// Step-wise clue propagation over a grid.
#[derive(Debug, Clone)]
pub struct Propagator<'a> {
    grid: &'a Grid,
    board: LitBoard<'a>,
    pending: Vec<(Coord, Option<u8>)>,
    never_light_mask: Vec<bool>,
    never_light: Vec<Coord>,
}

impl<'a> Propagator<'a> {
    #[must_use]
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            board: LitBoard::empty(grid),
            pending: grid.black_cells().collect(),
            never_light_mask: vec![false; grid.cell_count()],
            never_light: vec![],
        }
    }

    /// Runs one scan over the pending black cells.
    ///
    /// Returns `true` if the scan fixed any cell.
    pub fn pass(&mut self) -> bool {
        let Self {
            grid,
            board,
            pending,
            never_light_mask,
            never_light,
        } = self;

        let mut changed = false;
        pending.retain(|&(coord, clue)| {
            let Some(required) = clue else {
                return false;
            };
            let candidates = grid
                .neighbors(coord)
                .into_iter()
                .filter(|&n| {
                    grid.cell(n).is_white()
                        && !board.is_lit(n)
                        && !never_light_mask[grid.index(n)]
                })
                .collect::<ArrayVec<_, 4>>();
            let remaining = usize::from(required).saturating_sub(board.adjacent_lights(coord));

            if remaining == 0 {
                for cell in candidates {
                    never_light_mask[grid.index(cell)] = true;
                    never_light.push(cell);
                }
                changed = true;
                return false;
            }
            if candidates.len() == remaining {
                for cell in candidates {
                    board.place(cell);
                }
                changed = true;
                return false;
            }
            true
        });
        changed
    }

    /// Repeats [`pass`](Self::pass) until one changes nothing.
    ///
    /// Returns the number of passes run, the final unchanged one included.
    pub fn run_to_fixed_point(&mut self) -> usize {
        let mut passes = 1;
        while self.pass() {
            passes += 1;
        }
        passes
    }

    /// Black cells that are not resolved yet.
    pub fn pending_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.pending.iter().map(|(coord, _)| *coord)
    }

    /// Consumes the propagator, returning the fixed cells sorted.
    #[must_use]
    pub fn finish(self) -> Propagation {
        let mut forced_lights = self.board.lights().to_vec();
        let mut never_light = self.never_light;
        forced_lights.sort_unstable();
        never_light.sort_unstable();
        Propagation {
            forced_lights,
            never_light,
        }
    }
}

/// Runs propagation until a fixed point is reached.
#[must_use]
pub fn force_validity(grid: &Grid) -> Propagation {
    let mut propagator = Propagator::new(grid);
    let passes = propagator.run_to_fixed_point();
    log::debug!("propagation reached a fixed point after {passes} passes");
    propagator.finish()
}

/// Genotype layout shared read-only by all individuals of a run.
///
/// # Example
///
/// ```
/// use akari_engine::{Coord, Grid};
/// use akari_training::base_genotype::BaseGenotype;
///
/// // A 4 in the middle of a 3x3 grid forces its four neighbours.
/// let grid = Grid::new(3, 3, [(Coord::new(1, 1), Some(4))]).unwrap();
/// let base = BaseGenotype::new(&grid, true);
///
/// assert_eq!(base.forced_lights().len(), 4);
/// assert_eq!(base.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseGenotype {
    loci: Vec<Coord>,
    forced_lights: Vec<Coord>,
    never_light: Vec<Coord>,
}

impl BaseGenotype {
    /// Lays out the loci of `grid`, running propagation first when `forced_init` is set.
    #[must_use]
    pub fn new(grid: &Grid, forced_init: bool) -> Self {
        let Propagation {
            forced_lights,
            never_light,
        } = if forced_init {
            force_validity(grid)
        } else {
            Propagation::default()
        };

        let loci = grid
            .white_cells()
            .filter(|c| forced_lights.binary_search(c).is_err())
            .collect();
        Self {
            loci,
            forced_lights,
            never_light,
        }
    }

    /// Mutable positions, in gene order.
    #[must_use]
    pub fn loci(&self) -> &[Coord] {
        &self.loci
    }

    /// Number of loci.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loci.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    /// Lights present in every decoded placement, sorted.
    #[must_use]
    pub fn forced_lights(&self) -> &[Coord] {
        &self.forced_lights
    }

    /// Loci that propagation proved can never hold a light, sorted.
    #[must_use]
    pub fn never_light(&self) -> &[Coord] {
        &self.never_light
    }

    /// Decodes `genes` into the full light placement, sorted.
    ///
    /// # Panics
    ///
    /// Panics if `genes` does not have one entry per locus.
    #[must_use]
    pub fn lights(&self, genes: &[bool]) -> Vec<Coord> {
        assert_eq!(genes.len(), self.loci.len(), "genotype length mismatch");
        let mut lights = self
            .loci
            .iter()
            .zip(genes)
            .filter_map(|(&coord, &on)| on.then_some(coord))
            .chain(self.forced_lights.iter().copied())
            .collect::<Vec<_>>();
        lights.sort_unstable();
        lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_clue_marks_neighbors_in_one_pass() {
        // . 0 .
        let grid = Grid::new(3, 1, [(Coord::new(1, 0), Some(0))]).unwrap();
        let mut propagator = Propagator::new(&grid);

        assert!(propagator.pass());
        assert_eq!(propagator.pending_cells().count(), 0);
        assert!(!propagator.pass());

        let propagation = propagator.finish();
        assert_eq!(
            propagation.never_light,
            vec![Coord::new(0, 0), Coord::new(2, 0)]
        );
        assert!(propagation.forced_lights.is_empty());
    }

    #[test]
    fn test_saturated_clue_forces_all_candidates() {
        let grid = Grid::new(3, 3, [(Coord::new(1, 1), Some(4))]).unwrap();
        let propagation = force_validity(&grid);
        assert_eq!(
            propagation.forced_lights,
            vec![
                Coord::new(0, 1),
                Coord::new(1, 0),
                Coord::new(1, 2),
                Coord::new(2, 1)
            ]
        );
    }

    #[test]
    fn test_forced_light_satisfies_neighbouring_clue() {
        // 1 . 1 . .
        let grid = Grid::new(
            5,
            1,
            [(Coord::new(0, 0), Some(1)), (Coord::new(2, 0), Some(1))],
        )
        .unwrap();
        let propagation = force_validity(&grid);
        assert_eq!(propagation.forced_lights, vec![Coord::new(1, 0)]);
        assert_eq!(propagation.never_light, vec![Coord::new(3, 0)]);
    }

    #[test]
    fn test_fixed_point_pass_count() {
        // 1 . 1 . .
        let grid = Grid::new(
            5,
            1,
            [(Coord::new(0, 0), Some(1)), (Coord::new(2, 0), Some(1))],
        )
        .unwrap();
        let mut propagator = Propagator::new(&grid);
        assert_eq!(propagator.run_to_fixed_point(), 2);
        assert_eq!(propagator.pending_cells().count(), 0);
        assert!(!propagator.pass());

        let grid = Grid::new(2, 1, [(Coord::new(0, 0), Some(2))]).unwrap();
        let mut propagator = Propagator::new(&grid);
        assert_eq!(propagator.run_to_fixed_point(), 1);
    }

    #[test]
    fn test_blank_black_cells_are_resolved() {
        let grid = Grid::new(2, 2, [(Coord::new(0, 0), None)]).unwrap();
        let mut propagator = Propagator::new(&grid);
        assert!(!propagator.pass());
        assert_eq!(propagator.pending_cells().count(), 0);
    }

    #[test]
    fn test_unsatisfiable_clue_stays_pending() {
        // 2 .   (corner clue with a single white neighbour)
        let grid = Grid::new(2, 1, [(Coord::new(0, 0), Some(2))]).unwrap();
        let mut propagator = Propagator::new(&grid);
        assert!(!propagator.pass());
        assert_eq!(propagator.pending_cells().collect::<Vec<_>>(), vec![Coord::new(0, 0)]);
    }

    #[test]
    fn test_loci_partition_white_cells() {
        let grid = Grid::new(
            4,
            4,
            [
                (Coord::new(1, 1), Some(3)),
                (Coord::new(3, 3), Some(0)),
                (Coord::new(2, 0), None),
            ],
        )
        .unwrap();
        let base = BaseGenotype::new(&grid, true);

        let mut union = base
            .loci()
            .iter()
            .chain(base.forced_lights())
            .copied()
            .collect::<Vec<_>>();
        union.sort_unstable();
        assert_eq!(union, grid.white_cells().collect::<Vec<_>>());
        assert!(base.loci().iter().all(|l| !base.forced_lights().contains(l)));
        // never-light cells are kept as loci
        assert!(base.never_light().iter().all(|c| base.loci().contains(c)));
    }

    #[test]
    fn test_without_forced_init_every_white_cell_is_a_locus() {
        let grid = Grid::new(3, 3, [(Coord::new(1, 1), Some(4))]).unwrap();
        let base = BaseGenotype::new(&grid, false);
        assert_eq!(base.len(), 8);
        assert!(base.forced_lights().is_empty());
        assert!(base.loci().is_sorted());
    }

    #[test]
    fn test_decode_lights() {
        let grid = Grid::new(3, 3, [(Coord::new(1, 1), Some(4))]).unwrap();
        let base = BaseGenotype::new(&grid, true);
        let lights = base.lights(&[true, false, false, true]);
        assert_eq!(lights.len(), 6);
        assert!(lights.is_sorted());
        assert!(lights.contains(&base.loci()[0]));
        assert!(lights.contains(&base.loci()[3]));
    }
}

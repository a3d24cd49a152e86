use akari_engine::{Coord, Direction, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellState {
    Dark,
    Lit,
    Light,
}

/// Illumination state of a grid under a set of placed lights.
///
/// Each light shines in the four axis directions until it reaches the grid
/// boundary, a black cell or another light. A light that can see another light
/// is a violation; every such facing pair is counted once.
///
/// Lights can be placed incrementally with [`LitBoard::place`]. The resulting
/// illumination does not depend on placement order.
///
/// # Example
///
/// ```
/// use akari_engine::{Coord, Grid};
/// use akari_evaluator::lit_board::LitBoard;
///
/// let grid = Grid::new(5, 5, []).unwrap();
/// let board = LitBoard::new(&grid, &[Coord::new(2, 2)]);
/// assert_eq!(board.lit_count(), 9);
/// assert_eq!(board.light_violations(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct LitBoard<'a> {
    grid: &'a Grid,
    cells: Vec<CellState>,
    lights: Vec<Coord>,
    lit_count: usize,
}

impl<'a> LitBoard<'a> {
    /// Creates a board with no lights.
    #[must_use]
    pub fn empty(grid: &'a Grid) -> Self {
        Self {
            grid,
            cells: vec![CellState::Dark; grid.cell_count()],
            lights: Vec::new(),
            lit_count: 0,
        }
    }

    /// Creates a board and places every light in `lights`.
    #[must_use]
    pub fn new(grid: &'a Grid, lights: &[Coord]) -> Self {
        let mut board = Self::empty(grid);
        for &light in lights {
            board.place(light);
        }
        board
    }

    /// Places a light on a white cell and illuminates its four rays.
    ///
    /// Placing a light on a cell that already holds one has no effect.
    pub fn place(&mut self, light: Coord) {
        debug_assert!(self.grid.cell(light).is_white(), "light on black cell");
        let index = self.grid.index(light);
        match self.cells[index] {
            CellState::Light => return,
            CellState::Dark => self.lit_count += 1,
            CellState::Lit => {}
        }
        self.cells[index] = CellState::Light;
        self.lights.push(light);

        for direction in Direction::ALL {
            for coord in self.grid.ray(light, direction) {
                let index = self.grid.index(coord);
                match self.cells[index] {
                    CellState::Light => break,
                    CellState::Dark => {
                        self.cells[index] = CellState::Lit;
                        self.lit_count += 1;
                    }
                    CellState::Lit => {}
                }
            }
        }
    }

    #[must_use]
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// Number of distinct lights placed.
    #[must_use]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Placed lights in placement order.
    #[must_use]
    pub fn lights(&self) -> &[Coord] {
        &self.lights
    }

    /// Number of white cells that are lit, light cells included.
    #[must_use]
    pub fn lit_count(&self) -> usize {
        self.lit_count
    }

    /// Number of pairs of lights that shine on each other.
    #[must_use]
    pub fn light_violations(&self) -> usize {
        // Only forward rays are walked so that each facing pair counts once.
        self.lights
            .iter()
            .flat_map(|&light| {
                Direction::ALL
                    .into_iter()
                    .filter(|d| d.is_forward())
                    .map(move |d| (light, d))
            })
            .filter(|&(light, d)| self.grid.ray(light, d).any(|c| self.is_light(c)))
            .count()
    }

    #[must_use]
    pub fn is_light(&self, coord: Coord) -> bool {
        self.cells[self.grid.index(coord)] == CellState::Light
    }

    /// Whether `coord` is lit, either by a ray or by holding a light.
    #[must_use]
    pub fn is_lit(&self, coord: Coord) -> bool {
        self.cells[self.grid.index(coord)] != CellState::Dark
    }

    /// Number of lights orthogonally adjacent to `coord`.
    #[must_use]
    pub fn adjacent_lights(&self, coord: Coord) -> usize {
        self.grid
            .neighbors(coord)
            .into_iter()
            .filter(|&n| self.is_light(n))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_light_lights_row_and_column() {
        let grid = Grid::new(5, 5, []).unwrap();
        let board = LitBoard::new(&grid, &[Coord::new(2, 2)]);
        assert_eq!(board.lit_count(), 9);
        for i in 0..5 {
            assert!(board.is_lit(Coord::new(i, 2)));
            assert!(board.is_lit(Coord::new(2, i)));
        }
        assert!(!board.is_lit(Coord::new(0, 0)));
    }

    #[test]
    fn test_facing_lights_count_once() {
        let grid = Grid::new(5, 1, []).unwrap();
        let board = LitBoard::new(&grid, &[Coord::new(0, 0), Coord::new(4, 0)]);
        assert_eq!(board.light_violations(), 1);
        assert_eq!(board.lit_count(), 5);
    }

    #[test]
    fn test_black_cell_blocks_violation() {
        let grid = Grid::new(3, 1, [(Coord::new(1, 0), None)]).unwrap();
        let board = LitBoard::new(&grid, &[Coord::new(0, 0), Coord::new(2, 0)]);
        assert_eq!(board.light_violations(), 0);
        assert_eq!(board.lit_count(), 2);
    }

    #[test]
    fn test_middle_light_blocks_outer_pair() {
        let grid = Grid::new(5, 1, []).unwrap();
        let board = LitBoard::new(
            &grid,
            &[Coord::new(0, 0), Coord::new(4, 0), Coord::new(2, 0)],
        );
        // (0,2) and (2,4) see each other; (0,4) is blocked by the middle light.
        assert_eq!(board.light_violations(), 2);
    }

    #[test]
    fn test_placement_order_does_not_matter() {
        let grid = Grid::new(4, 4, [(Coord::new(1, 1), Some(2))]).unwrap();
        let lights = [Coord::new(0, 1), Coord::new(2, 1), Coord::new(2, 3), Coord::new(0, 3)];
        let forward = LitBoard::new(&grid, &lights);
        let mut reversed = lights;
        reversed.reverse();
        let backward = LitBoard::new(&grid, &reversed);

        assert_eq!(forward.lit_count(), backward.lit_count());
        assert_eq!(forward.light_violations(), backward.light_violations());
        for coord in grid.white_cells() {
            assert_eq!(forward.is_lit(coord), backward.is_lit(coord));
        }
    }

    #[test]
    fn test_duplicate_light_is_ignored() {
        let grid = Grid::new(3, 3, []).unwrap();
        let board = LitBoard::new(&grid, &[Coord::new(1, 1), Coord::new(1, 1)]);
        assert_eq!(board.light_count(), 1);
        assert_eq!(board.lit_count(), 5);
        assert_eq!(board.light_violations(), 0);
    }

    #[test]
    fn test_adjacent_lights() {
        let grid = Grid::new(3, 3, [(Coord::new(1, 1), Some(2))]).unwrap();
        let board = LitBoard::new(&grid, &[Coord::new(0, 1), Coord::new(1, 0)]);
        assert_eq!(board.adjacent_lights(Coord::new(1, 1)), 2);
    }
}

use std::fmt::{self, Write as _};

use arrayvec::ArrayVec;

use crate::GridError;

use super::coord::{Coord, Direction};

/// Largest number a clue cell can demand (one light per side).
pub const MAX_CLUE: u8 = 4;

/// Classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Cell {
    /// A cell that may hold a light.
    White,
    /// A wall. `Some(n)` requires exactly `n` lights on the orthogonally
    /// adjacent cells; `None` places no requirement.
    Black(Option<u8>),
}

impl Cell {
    /// Returns the required adjacent light count of a numbered black cell.
    #[must_use]
    pub fn clue(self) -> Option<u8> {
        match self {
            Cell::Black(clue) => clue,
            Cell::White => None,
        }
    }
}

/// Immutable Light-Up puzzle grid.
///
/// The grid stores one [`Cell`] per coordinate in row-major order. It is
/// validated on construction: dimensions are positive, every black cell lies
/// inside the bounds, no coordinate is declared twice and clues never exceed
/// [`MAX_CLUE`].
///
/// # Example
///
/// ```
/// use akari_engine::{Cell, Coord, Grid};
///
/// let grid = Grid::new(3, 3, [(Coord::new(1, 1), Some(2))]).unwrap();
/// assert_eq!(grid.white_count(), 8);
/// assert_eq!(grid.cell(Coord::new(1, 1)), Cell::Black(Some(2)));
/// assert_eq!(grid.neighbors(Coord::new(1, 1)).len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    white_count: usize,
}

impl Grid {
    /// Builds a grid of `width` x `height` white cells, then applies `blacks`.
    pub fn new<I>(width: usize, height: usize, blacks: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = (Coord, Option<u8>)>,
    {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimension { width, height });
        }

        let too_large = || GridError::TooLarge { width, height };
        let len = width.checked_mul(height).ok_or_else(too_large)?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large())?;
        cells.resize(len, Cell::White);
        for (coord, clue) in blacks {
            if coord.x >= width || coord.y >= height {
                return Err(GridError::OutOfBounds {
                    coord,
                    width,
                    height,
                });
            }
            if let Some(value) = clue
                && value > MAX_CLUE
            {
                return Err(GridError::InvalidClue { coord, value });
            }
            let cell = &mut cells[coord.y * width + coord.x];
            if cell.is_black() {
                return Err(GridError::DuplicateCell { coord });
            }
            *cell = Cell::Black(clue);
        }

        let white_count = cells.iter().filter(|c| c.is_white()).count();
        Ok(Self {
            width,
            height,
            cells,
            white_count,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells (`width * height`).
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn white_count(&self) -> usize {
        self.white_count
    }

    /// Row-major storage index of `coord`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `coord` lies outside the grid.
    #[must_use]
    pub fn index(&self, coord: Coord) -> usize {
        debug_assert!(self.contains(coord), "{coord:?} outside grid");
        coord.y * self.width + coord.x
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    #[must_use]
    pub fn cell(&self, coord: Coord) -> Cell {
        self.cells[self.index(coord)]
    }

    /// Iterates over every coordinate in lexicographic `(x, y)` order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| Coord::new(x, y)))
    }

    /// White cells in lexicographic `(x, y)` order.
    pub fn white_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(|c| self.cell(*c).is_white())
    }

    /// Black cells and their optional clue, in lexicographic `(x, y)` order.
    pub fn black_cells(&self) -> impl Iterator<Item = (Coord, Option<u8>)> + '_ {
        self.coords().filter_map(|c| match self.cell(c) {
            Cell::Black(clue) => Some((c, clue)),
            Cell::White => None,
        })
    }

    /// Numbered black cells and their required adjacent light count.
    pub fn clue_cells(&self) -> impl Iterator<Item = (Coord, u8)> + '_ {
        self.black_cells()
            .filter_map(|(c, clue)| clue.map(|clue| (c, clue)))
    }

    /// Orthogonal neighbours of `coord` that lie inside the grid.
    #[must_use]
    pub fn neighbors(&self, coord: Coord) -> ArrayVec<Coord, 4> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| coord.step(d, self.width, self.height))
            .collect()
    }

    /// Walks from `origin` (exclusive) in `direction` until the grid boundary
    /// or the first black cell, which is not yielded.
    pub fn ray(&self, origin: Coord, direction: Direction) -> impl Iterator<Item = Coord> + '_ {
        let mut current = origin;
        std::iter::from_fn(move || {
            let next = current.step(direction, self.width, self.height)?;
            if self.cell(next).is_black() {
                return None;
            }
            current = next;
            Some(next)
        })
    }
}

impl fmt::Display for Grid {
    /// Renders the grid top row first: `.` white, `0`-`4` clue, `#` blank wall.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = match self.cell(Coord::new(x, y)) {
                    Cell::White => '.',
                    Cell::Black(None) => '#',
                    Cell::Black(Some(n)) => char::from(b'0' + n),
                };
                f.write_char(ch)?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

//! Puzzle model for the Light-Up (Akari) solver.
//!
//! This crate owns the immutable description of a puzzle instance:
//!
//! - [`Grid`] - Dimensions and per-cell classification (white, numbered black, blank black)
//! - [`Coord`] / [`Direction`] - Cell addressing, neighbourhoods and ray walking
//! - [`puzzle::Puzzle`] - Parsing of puzzle definition files into a validated grid
//!
//! Everything that scores or searches light placements lives in `akari-evaluator`
//! and `akari-training`; the grid never changes once it has been built.
//!
//! # Example
//!
//! ```
//! use akari_engine::{Coord, Direction, puzzle::Puzzle};
//!
//! let puzzle: Puzzle = "3\n3\n2 2 1\n".parse().unwrap();
//! let grid = puzzle.grid();
//!
//! assert_eq!(grid.white_count(), 8);
//! // Nothing blocks the first column.
//! assert_eq!(grid.ray(Coord::new(0, 0), Direction::Down).count(), 2);
//! // The clue at (2, 2) blocks the middle row.
//! assert_eq!(grid.ray(Coord::new(0, 1), Direction::Right).count(), 0);
//! ```

pub use self::core::*;

pub mod core;
pub mod puzzle;

/// A grid whose declared dimensions and cell data disagree.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum GridError {
    #[display("grid dimensions must be positive, got {width}x{height}")]
    EmptyDimension { width: usize, height: usize },
    #[display("grid of {width}x{height} cells is too large")]
    TooLarge { width: usize, height: usize },
    #[display("black cell ({coord}) lies outside the {width}x{height} grid")]
    OutOfBounds {
        coord: Coord,
        width: usize,
        height: usize,
    },
    #[display("black cell ({coord}) declared more than once")]
    DuplicateCell { coord: Coord },
    #[display("black cell ({coord}) requires {value} lights, at most 4 allowed")]
    InvalidClue { coord: Coord, value: u8 },
}

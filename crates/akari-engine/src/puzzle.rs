//! Puzzle definition file parsing.
//!
//! The file format is line oriented:
//!
//! ```text
//! <width>
//! <height>
//! <x> <y> <value>   (one line per black cell)
//! ```
//!
//! Coordinates are 1-indexed. `value` is the required adjacent light count
//! (`0`-`4`) or [`UNCONSTRAINED_VALUE`] for a black cell without a clue.
//! Blank lines are ignored.

use std::{num::ParseIntError, str::FromStr};

use crate::{Coord, Grid, GridError};

/// Black-cell value marking a wall without a numeric clue.
pub const UNCONSTRAINED_VALUE: u8 = 5;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PuzzleParseError {
    #[display("missing {name} line")]
    MissingDimension { name: &'static str },
    #[display("line {line}: invalid number")]
    InvalidNumber { line: usize, source: ParseIntError },
    #[display("line {line}: expected `x y value`, got {content:?}")]
    MalformedLine { line: usize, content: String },
    #[display("line {line}: coordinates are 1-indexed")]
    ZeroCoordinate { line: usize },
    #[display("inconsistent grid")]
    #[from]
    Grid(#[error(source)] GridError),
}

/// A parsed puzzle, keeping the raw file text for the solution output.
#[derive(Debug, Clone)]
pub struct Puzzle {
    grid: Grid,
    source: String,
}

impl Puzzle {
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The puzzle definition exactly as it was read.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl FromStr for Puzzle {
    type Err = PuzzleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let mut dimension = |name: &'static str| -> Result<usize, PuzzleParseError> {
            let (line, text) = lines
                .next()
                .ok_or(PuzzleParseError::MissingDimension { name })?;
            text.parse()
                .map_err(|source| PuzzleParseError::InvalidNumber { line, source })
        };
        let width = dimension("width")?;
        let height = dimension("height")?;

        let blacks = lines
            .map(|(line, text)| parse_black_cell(line, text))
            .collect::<Result<Vec<_>, _>>()?;

        let grid = Grid::new(width, height, blacks)?;
        Ok(Self {
            grid,
            source: s.to_owned(),
        })
    }
}

fn parse_black_cell(line: usize, text: &str) -> Result<(Coord, Option<u8>), PuzzleParseError> {
    let malformed = || PuzzleParseError::MalformedLine {
        line,
        content: text.to_owned(),
    };
    let number = |field: &str| -> Result<usize, PuzzleParseError> {
        field
            .parse()
            .map_err(|source| PuzzleParseError::InvalidNumber { line, source })
    };

    let fields = text.split_whitespace().collect::<Vec<_>>();
    let [x, y, value] = fields[..] else {
        return Err(malformed());
    };
    let (x, y) = (number(x)?, number(y)?);
    if x == 0 || y == 0 {
        return Err(PuzzleParseError::ZeroCoordinate { line });
    }
    let value = value
        .parse::<u8>()
        .map_err(|source| PuzzleParseError::InvalidNumber { line, source })?;
    let clue = (value != UNCONSTRAINED_VALUE).then_some(value);
    Ok((Coord::new(x - 1, y - 1), clue))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    #[test]
    fn test_parse_puzzle() {
        let text = "3\n2\n1 1 2\n3 2 5\n";
        let puzzle = text.parse::<Puzzle>().unwrap();
        let grid = puzzle.grid();
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.cell(Coord::new(0, 0)), Cell::Black(Some(2)));
        assert_eq!(grid.cell(Coord::new(2, 1)), Cell::Black(None));
        assert_eq!(grid.white_count(), 4);
        assert_eq!(puzzle.source(), text);
    }

    #[test]
    fn test_parse_ignores_blank_lines() {
        let puzzle = "\n2\n\n2\n1 2 0\n\n".parse::<Puzzle>().unwrap();
        assert_eq!(puzzle.grid().white_count(), 3);
    }

    #[test]
    fn test_missing_height() {
        let err = "4\n".parse::<Puzzle>().unwrap_err();
        assert!(matches!(
            err,
            PuzzleParseError::MissingDimension { name: "height" }
        ));
    }

    #[test]
    fn test_malformed_line() {
        let err = "2\n2\n1 1\n".parse::<Puzzle>().unwrap_err();
        assert!(matches!(err, PuzzleParseError::MalformedLine { line: 3, .. }));
    }

    #[test]
    fn test_invalid_number() {
        let err = "2\nx\n".parse::<Puzzle>().unwrap_err();
        assert!(matches!(err, PuzzleParseError::InvalidNumber { line: 2, .. }));
    }

    #[test]
    fn test_zero_coordinate() {
        let err = "2\n2\n0 1 1\n".parse::<Puzzle>().unwrap_err();
        assert!(matches!(err, PuzzleParseError::ZeroCoordinate { line: 3 }));
    }

    #[test]
    fn test_black_cell_outside_declared_dimensions() {
        let err = "2\n2\n3 1 1\n".parse::<Puzzle>().unwrap_err();
        assert!(matches!(
            err,
            PuzzleParseError::Grid(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_overflowing_dimensions() {
        let err = "18446744073709551615\n2\n1 1 1\n".parse::<Puzzle>().unwrap_err();
        assert!(matches!(
            err,
            PuzzleParseError::Grid(GridError::TooLarge { height: 2, .. })
        ));
    }
}

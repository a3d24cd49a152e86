use std::fmt;

/// Zero-indexed cell position on a puzzle grid.
///
/// `x` is the column and `y` the row. The derived ordering is lexicographic on
/// `(x, y)`, which is the order loci and solution coordinates are listed in.
///
/// `Display` renders the 1-indexed `x y` pair used by puzzle and solution files.
///
/// # Example
///
/// ```
/// use akari_engine::Coord;
///
/// let coord = Coord::new(0, 2);
/// assert_eq!(coord.to_string(), "1 3");
/// assert!(Coord::new(0, 9) < Coord::new(1, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring coordinate one step in `direction`, or `None`
    /// when the step would leave a `width` x `height` grid.
    #[must_use]
    pub fn step(self, direction: Direction, width: usize, height: usize) -> Option<Self> {
        let Self { x, y } = self;
        match direction {
            Direction::Right => (x + 1 < width).then(|| Self::new(x + 1, y)),
            Direction::Left => x.checked_sub(1).map(|x| Self::new(x, y)),
            Direction::Down => (y + 1 < height).then(|| Self::new(x, y + 1)),
            Direction::Up => y.checked_sub(1).map(|y| Self::new(x, y)),
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x + 1, self.y + 1)
    }
}

/// One of the four axis directions a light shines in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Right, Self::Left, Self::Down, Self::Up];

    /// Whether this direction moves toward increasing `x` or `y`.
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::Right | Self::Down)
    }
}

pub use self::{coord::*, grid::*};

pub(crate) mod coord;
pub(crate) mod grid;

//! **cellwalk-core**: grid geometry for tactical maps.
//!
//! This crate provides the types shared by the *cellwalk* crates: grid
//! coordinates and rectangles, the cell-to-pixel mapping used by
//! obstruction checks, and token footprints.

pub mod footprint;
pub mod geom;
pub mod grid;

pub use footprint::Footprint;
pub use geom::{Point, Range, RangeIter};
pub use grid::{CellBounds, SquareGrid};

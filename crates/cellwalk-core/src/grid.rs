//! Cell-to-pixel mapping.
//!
//! Movement checks against sight-blocking geometry happen in pixel space, so
//! every consumer needs to know where a cell sits on the map. The
//! [`CellBounds`] trait is that mapping; [`SquareGrid`] is the usual
//! implementation for square maps.

use crate::geom::{Point, Range};

/// Pixel-space bounds of a grid cell.
pub trait CellBounds {
    /// Bounding rectangle of `cell` in map pixels.
    ///
    /// An empty range means the cell has no geometry; obstruction checks
    /// treat it as never blocked.
    fn cell_bounds(&self, cell: Point) -> Range;
}

impl<T: CellBounds + ?Sized> CellBounds for &T {
    fn cell_bounds(&self, cell: Point) -> Range {
        (**self).cell_bounds(cell)
    }
}

/// A square grid with a fixed cell size and a pixel offset for cell (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquareGrid {
    cell_size: i32,
    offset: Point,
}

impl Default for SquareGrid {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CELL_SIZE)
    }
}

impl SquareGrid {
    /// Cell size of a freshly created map, in pixels.
    pub const DEFAULT_CELL_SIZE: i32 = 50;

    /// Create a grid whose cell (0, 0) starts at the pixel origin.
    ///
    /// A non-positive `cell_size` produces empty bounds for every cell.
    pub const fn new(cell_size: i32) -> Self {
        Self {
            cell_size,
            offset: Point::ZERO,
        }
    }

    /// Shift the whole grid by a pixel offset.
    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// Cell edge length in pixels.
    #[inline]
    pub const fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Pixel offset of cell (0, 0).
    #[inline]
    pub const fn offset(&self) -> Point {
        self.offset
    }

    /// Cell containing the pixel `(px, py)`, or `None` for a degenerate grid.
    pub fn cell_at(&self, px: i32, py: i32) -> Option<Point> {
        if self.cell_size <= 0 {
            return None;
        }
        let x = (i64::from(px) - i64::from(self.offset.x)).div_euclid(i64::from(self.cell_size));
        let y = (i64::from(py) - i64::from(self.offset.y)).div_euclid(i64::from(self.cell_size));
        Some(Point::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?))
    }
}

impl CellBounds for SquareGrid {
    fn cell_bounds(&self, cell: Point) -> Range {
        let edge = |c: i32, offset: i32| {
            let min = c.checked_mul(self.cell_size)?.checked_add(offset)?;
            Some((min, min.checked_add(self.cell_size)?))
        };
        if self.cell_size <= 0 {
            return Range::default();
        }
        match (edge(cell.x, self.offset.x), edge(cell.y, self.offset.y)) {
            (Some((x0, x1)), Some((y0, y1))) => Range::new(x0, y0, x1, y1),
            // Past the pixel coordinate space: no geometry can reach it.
            _ => Range::default(),
        }
    }
}

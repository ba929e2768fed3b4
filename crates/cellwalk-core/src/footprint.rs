//! Token footprints: the cells a token covers relative to its anchor cell.

use crate::geom::{Point, Range};

/// The set of cells a token occupies, expressed as offsets from its anchor.
///
/// Offsets are kept sorted and free of duplicates. A footprint always
/// contains at least one offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Footprint {
    offsets: Vec<Point>,
}

impl Default for Footprint {
    fn default() -> Self {
        Self::single()
    }
}

impl Footprint {
    /// A one-cell token.
    pub fn single() -> Self {
        Self {
            offsets: vec![Point::ZERO],
        }
    }

    /// A `size` × `size` token anchored at its top-left cell.
    ///
    /// Sizes below one are treated as one.
    pub fn square(size: i32) -> Self {
        let size = size.max(1);
        Self {
            offsets: Range::new(0, 0, size, size).iter().collect(),
        }
    }

    /// Build a footprint from arbitrary offsets.
    ///
    /// Returns `None` when `offsets` is empty.
    pub fn from_offsets(offsets: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut offsets: Vec<Point> = offsets.into_iter().collect();
        if offsets.is_empty() {
            return None;
        }
        offsets.sort_unstable();
        offsets.dedup();
        Some(Self { offsets })
    }

    /// Offsets relative to the anchor, in row-major order.
    pub fn offsets(&self) -> &[Point] {
        &self.offsets
    }

    /// Number of covered cells.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false; a footprint covers at least its anchor region.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Cells covered when the token is anchored at `anchor`.
    ///
    /// Cells that would fall outside the `i32` coordinate space are left out.
    pub fn occupied_cells(&self, anchor: Point) -> impl Iterator<Item = Point> + '_ {
        self.offsets.iter().filter_map(move |&o| anchor.checked_add(o))
    }

    /// Smallest cell range covering the token anchored at `anchor`.
    pub fn bounds(&self, anchor: Point) -> Range {
        self.occupied_cells(anchor)
            .map(|p| Range::new(p.x, p.y, p.x.saturating_add(1), p.y.saturating_add(1)))
            .fold(Range::default(), Range::union)
    }
}

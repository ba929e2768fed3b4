use cellwalk_core::Range;
use geo::Coord;

use crate::error::GeometryError;

/// Permanent sight and movement obstructions baked into the map.
///
/// Implementations are read-only snapshots; a walker may query them from a
/// background thread.
pub trait StaticGeometry: Send + Sync {
    /// Whether there is nothing to collide with.
    fn is_empty(&self) -> bool;

    /// Whether any obstruction touches the pixel rectangle `rect`.
    fn intersects_rect(&self, rect: Range) -> bool;

    /// Whether the segment from `from` to `to` crosses any obstruction.
    fn intersects_segment(&self, from: Coord<f64>, to: Coord<f64>) -> Result<bool, GeometryError>;
}

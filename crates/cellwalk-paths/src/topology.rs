//! Polygonal sight-blocking geometry ("topology") backed by `geo`.

use cellwalk_core::Range;
use geo::{BoundingRect, Contains, Coord, Intersects, Line, LineString, Polygon, Rect, coord};

use crate::error::GeometryError;
use crate::traits::StaticGeometry;

/// Width of the polygon a wall segment is widened into, in pixels.
///
/// Walls are buffered by one pixel on each side so that a segment touching
/// a wall end-on still registers.
pub const WALL_THICKNESS: f64 = 2.0;

/// An immutable-after-build set of blocking polygons.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    polygons: Vec<Polygon<f64>>,
    extent: Option<Rect<f64>>,
}

impl Topology {
    /// Empty topology: nothing blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from polygons, rejecting malformed ones.
    pub fn from_polygons(
        polygons: impl IntoIterator<Item = Polygon<f64>>,
    ) -> Result<Self, GeometryError> {
        let mut topology = Self::new();
        for polygon in polygons {
            topology.add_polygon(polygon)?;
        }
        Ok(topology)
    }

    /// Build from pixel rectangles. Empty rectangles are skipped.
    pub fn from_rects(rects: impl IntoIterator<Item = Range>) -> Self {
        let mut topology = Self::new();
        for rect in rects {
            topology.add_rect(rect);
        }
        topology
    }

    /// Add one blocking polygon.
    pub fn add_polygon(&mut self, polygon: Polygon<f64>) -> Result<(), GeometryError> {
        if let Err(e) = validate(&polygon) {
            log::warn!("rejecting blocking polygon: {e}");
            return Err(e);
        }
        if let Some(bounds) = polygon.bounding_rect() {
            self.grow_extent(bounds);
        }
        self.polygons.push(polygon);
        Ok(())
    }

    /// Add a solid pixel rectangle.
    pub fn add_rect(&mut self, rect: Range) {
        if rect.is_empty() {
            return;
        }
        let rect = to_rect(rect);
        self.polygons.push(rect.to_polygon());
        self.grow_extent(rect);
    }

    /// Add a wall segment, widened into a [`WALL_THICKNESS`]-wide polygon.
    pub fn add_wall(&mut self, from: Coord<f64>, to: Coord<f64>) -> Result<(), GeometryError> {
        check_finite(from)?;
        check_finite(to)?;
        let d = to - from;
        let len = d.x.hypot(d.y);
        if len <= f64::EPSILON {
            return Err(GeometryError::DegenerateWall { x: from.x, y: from.y });
        }
        let half = WALL_THICKNESS / 2.0;
        let along = coord! { x: d.x / len * half, y: d.y / len * half };
        let across = coord! { x: -along.y, y: along.x };
        let ring = LineString::from(vec![
            from - along + across,
            to + along + across,
            to + along - across,
            from - along - across,
        ]);
        self.add_polygon(Polygon::new(ring, Vec::new()))
    }

    /// Number of blocking polygons.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Whether the pixel point `c` lies inside any obstruction.
    pub fn contains(&self, c: Coord<f64>) -> bool {
        self.polygons.iter().any(|p| p.contains(&c))
    }

    /// Bounding box of all obstructions.
    pub fn extent(&self) -> Option<Rect<f64>> {
        self.extent
    }

    fn grow_extent(&mut self, bounds: Rect<f64>) {
        self.extent = Some(match self.extent {
            Some(extent) => merge(extent, bounds),
            None => bounds,
        });
    }

    fn may_touch(&self, rect: &Rect<f64>) -> bool {
        self.extent.is_some_and(|extent| extent.intersects(rect))
    }
}

impl StaticGeometry for Topology {
    fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    fn intersects_rect(&self, rect: Range) -> bool {
        if rect.is_empty() {
            return false;
        }
        let rect = to_rect(rect);
        self.may_touch(&rect) && self.polygons.iter().any(|p| p.intersects(&rect))
    }

    fn intersects_segment(&self, from: Coord<f64>, to: Coord<f64>) -> Result<bool, GeometryError> {
        check_finite(from)?;
        check_finite(to)?;
        let line = Line::new(from, to);
        if !self.may_touch(&line.bounding_rect()) {
            return Ok(false);
        }
        Ok(self.polygons.iter().any(|p| p.intersects(&line)))
    }
}

fn to_rect(r: Range) -> Rect<f64> {
    Rect::new(
        coord! { x: f64::from(r.min.x), y: f64::from(r.min.y) },
        coord! { x: f64::from(r.max.x), y: f64::from(r.max.y) },
    )
}

fn merge(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
        coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
    )
}

fn check_finite(c: Coord<f64>) -> Result<(), GeometryError> {
    if c.x.is_finite() && c.y.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFinite { x: c.x, y: c.y })
    }
}

fn validate(polygon: &Polygon<f64>) -> Result<(), GeometryError> {
    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
        for &c in &ring.0 {
            check_finite(c)?;
        }
        // Rings are stored closed, the last coordinate repeats the first.
        let vertices = ring.0.len().saturating_sub(1);
        if vertices < 3 {
            return Err(GeometryError::DegenerateRing { vertices });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        coord! { x: x, y: y }
    }

    #[test]
    fn empty_topology_blocks_nothing() {
        let t = Topology::new();
        assert!(t.is_empty());
        assert!(!t.intersects_rect(Range::new(0, 0, 100, 100)));
        assert_eq!(t.intersects_segment(c(0.0, 0.0), c(100.0, 100.0)), Ok(false));
    }

    #[test]
    fn wall_blocks_crossing_segment_only() {
        let mut t = Topology::new();
        t.add_wall(c(50.0, 0.0), c(50.0, 50.0)).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.intersects_segment(c(25.0, 25.0), c(75.0, 25.0)), Ok(true));
        assert_eq!(t.intersects_segment(c(25.0, 75.0), c(75.0, 75.0)), Ok(false));
        assert!(t.intersects_rect(Range::new(0, 0, 50, 50)));
        assert!(!t.intersects_rect(Range::new(100, 100, 150, 150)));
    }

    #[test]
    fn rects_and_containment() {
        let t = Topology::from_rects([Range::new(0, 0, 10, 10), Range::default()]);
        assert_eq!(t.len(), 1);
        assert!(t.contains(c(5.0, 5.0)));
        assert!(!t.contains(c(15.0, 5.0)));
        let extent = t.extent().unwrap();
        assert_eq!(extent.max(), c(10.0, 10.0));
    }

    #[test]
    fn malformed_input_is_rejected() {
        let mut t = Topology::new();
        assert!(matches!(
            t.add_wall(c(1.0, 1.0), c(1.0, 1.0)),
            Err(GeometryError::DegenerateWall { .. })
        ));
        assert!(matches!(
            t.add_wall(c(f64::NAN, 1.0), c(1.0, 1.0)),
            Err(GeometryError::NonFinite { .. })
        ));
        let sliver = Polygon::new(LineString::from(vec![c(0.0, 0.0), c(1.0, 1.0)]), Vec::new());
        assert!(matches!(
            Topology::from_polygons([sliver]),
            Err(GeometryError::DegenerateRing { .. })
        ));
        assert!(t.is_empty());
    }

    #[test]
    fn non_finite_segment_is_an_error() {
        let t = Topology::from_rects([Range::new(0, 0, 10, 10)]);
        assert!(t.intersects_segment(c(f64::INFINITY, 0.0), c(5.0, 5.0)).is_err());
    }
}

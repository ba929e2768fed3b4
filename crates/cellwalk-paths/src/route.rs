//! Multi-leg movement through waypoints.

use std::cell::OnceCell;
use std::sync::Arc;

use cellwalk_core::{Footprint, Point};

use crate::path::Path;
use crate::walker::Walker;

/// A route through a list of waypoints, one path per leg.
///
/// Dragging a token only moves the last waypoint, so only the last leg is
/// recomputed when it changes.
pub struct Route {
    walker: Arc<Walker>,
    footprint: Footprint,
    restrict: bool,
    waypoints: Vec<Point>,
    legs: Vec<Path>,
    distance: OnceCell<i32>,
}

impl Route {
    pub fn new(walker: Arc<Walker>, footprint: Footprint, restrict: bool) -> Self {
        Self {
            walker,
            footprint,
            restrict,
            waypoints: Vec::new(),
            legs: Vec::new(),
            distance: OnceCell::new(),
        }
    }

    /// Reset to a single leg from `start` to `end`.
    pub fn set_waypoints(&mut self, start: Point, end: Point) {
        self.waypoints.clear();
        self.legs.clear();
        self.add_waypoint(start);
        self.add_waypoint(end);
    }

    /// Append a waypoint, computing the leg that reaches it.
    pub fn add_waypoint(&mut self, p: Point) {
        if let Some(&last) = self.waypoints.last() {
            let leg = self.walker.compute_path(last, p, &self.footprint, self.restrict);
            self.legs.push(leg);
        }
        self.waypoints.push(p);
        self.distance.take();
    }

    /// Move the final waypoint to `p` and recompute only the last leg.
    pub fn replace_last_waypoint(&mut self, p: Point, restrict: bool) {
        self.restrict = restrict;
        if self.waypoints.pop().is_some() {
            self.legs.pop();
        }
        self.add_waypoint(p);
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    pub fn legs(&self) -> &[Path] {
        &self.legs
    }

    /// Whether every leg reached its waypoint.
    pub fn is_complete(&self) -> bool {
        self.legs.iter().all(Path::is_found)
    }

    /// All cells of the route, each joint waypoint listed once.
    pub fn cells(&self) -> Vec<Point> {
        let mut cells: Vec<Point> = Vec::new();
        for leg in &self.legs {
            let mut leg_cells = leg.cells();
            if let (Some(last), Some(first)) = (cells.last(), leg_cells.first()) {
                if last == first {
                    leg_cells = &leg_cells[1..];
                }
            }
            cells.extend_from_slice(leg_cells);
        }
        cells
    }

    /// Summed game distance of all legs, in display units.
    pub fn distance(&self) -> i32 {
        *self.distance.get_or_init(|| {
            let traveled: f64 = self.legs.iter().map(Path::distance_traveled).sum();
            (traveled * f64::from(self.walker.config().units_per_cell)) as i32
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WalkerConfig;
    use crate::metric::MovementMetric;
    use cellwalk_core::SquareGrid;

    fn route() -> Route {
        let config = WalkerConfig::default().with_metric(MovementMetric::OneOneOne);
        let walker = Walker::new(config, SquareGrid::new(50)).unwrap();
        Route::new(Arc::new(walker), Footprint::single(), true)
    }

    #[test]
    fn single_waypoint_has_no_legs() {
        let mut r = route();
        r.add_waypoint(Point::new(1, 1));
        assert!(r.legs().is_empty());
        assert!(r.cells().is_empty());
        assert_eq!(r.distance(), 0);
        assert!(r.is_complete());
    }

    #[test]
    fn joints_are_not_repeated() {
        let mut r = route();
        r.set_waypoints(Point::new(0, 0), Point::new(2, 0));
        r.add_waypoint(Point::new(2, 3));
        assert_eq!(r.legs().len(), 2);
        let cells = r.cells();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells.iter().filter(|&&c| c == Point::new(2, 0)).count(), 1);
        assert_eq!(r.distance(), 25);
    }

    #[test]
    fn replace_last_recomputes_last_leg() {
        let mut r = route();
        r.set_waypoints(Point::new(0, 0), Point::new(2, 0));
        r.add_waypoint(Point::new(2, 3));
        assert_eq!(r.distance(), 25);
        r.replace_last_waypoint(Point::new(2, 1), true);
        assert_eq!(r.waypoints(), &[Point::new(0, 0), Point::new(2, 0), Point::new(2, 1)]);
        assert_eq!(r.legs().len(), 2);
        assert_eq!(r.distance(), 15);
    }
}

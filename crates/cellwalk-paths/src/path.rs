use cellwalk_core::Point;

use crate::metric::Metric;

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOutcome {
    /// The goal was reached.
    Found,
    /// Every reachable cell was expanded without reaching the goal.
    Exhausted,
    /// The wall-clock budget ran out.
    TimedOut,
    /// The caller cancelled the search.
    Cancelled,
}

/// A movement path from start to goal, in cell order.
///
/// Empty unless the search reached the goal; a partial route that stops
/// short is never returned.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    cells: Vec<Point>,
    distance_traveled: f64,
    outcome: SearchOutcome,
}

impl Path {
    pub(crate) fn found(cells: Vec<Point>, distance_traveled: f64) -> Self {
        Self {
            cells,
            distance_traveled,
            outcome: SearchOutcome::Found,
        }
    }

    /// An empty path for a search that ended with `outcome`.
    pub fn empty(outcome: SearchOutcome) -> Self {
        Self {
            cells: Vec::new(),
            distance_traveled: 0.0,
            outcome,
        }
    }

    /// Cells from start to goal, both included.
    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Point> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves, one less than the number of cells.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Point> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<Point> {
        self.cells.last().copied()
    }

    pub fn outcome(&self) -> SearchOutcome {
        self.outcome
    }

    pub fn is_found(&self) -> bool {
        self.outcome == SearchOutcome::Found
    }

    /// Game distance in cells, terrain and diagonal multipliers included.
    pub fn distance_traveled(&self) -> f64 {
        self.distance_traveled
    }

    /// Game distance in display units, truncated.
    pub fn distance(&self, units_per_cell: i32) -> i32 {
        (self.distance_traveled * f64::from(units_per_cell)) as i32
    }

    /// Tabletop distance in display units, counted step by step under
    /// `metric` without terrain.
    pub fn cell_distance(&self, metric: &Metric, units_per_cell: i32) -> Option<i32> {
        metric.path_cells(&self.cells).map(|cells| cells * units_per_cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::MovementMetric;

    #[test]
    fn empty_path() {
        let path = Path::empty(SearchOutcome::TimedOut);
        assert!(path.is_empty());
        assert!(!path.is_found());
        assert_eq!(path.steps(), 0);
        assert_eq!(path.distance(5), 0);
        assert_eq!(path.start(), None);
    }

    #[test]
    fn distances() {
        let cells = vec![Point::new(0, 0), Point::new(1, 1), Point::new(2, 2), Point::new(3, 2)];
        let path = Path::found(cells, 1.5 + 1.5 + 1.0);
        assert_eq!(path.steps(), 3);
        assert_eq!(path.goal(), Some(Point::new(3, 2)));
        assert_eq!(path.distance(5), 20);
        assert_eq!(path.distance(3), 12);
        let octile = Metric::new(MovementMetric::OneTwoOne);
        assert_eq!(path.cell_distance(&octile, 5), Some(20));
        let chebyshev = Metric::new(MovementMetric::OneOneOne);
        assert_eq!(path.cell_distance(&chebyshev, 5), Some(15));
    }
}

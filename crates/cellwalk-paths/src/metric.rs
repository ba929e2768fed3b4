//! Movement metrics: neighbour offsets, heuristics and edge costs.
//!
//! The heuristic and the edge costs of a metric are defined together so
//! that the heuristic never overestimates the cheapest path (admissibility)
//! as long as terrain multipliers are at least one.

use cellwalk_core::Point;

const NORTH: Point = Point::new(0, -1);
const EAST: Point = Point::new(1, 0);
const SOUTH: Point = Point::new(0, 1);
const WEST: Point = Point::new(-1, 0);
const NORTH_EAST: Point = Point::new(1, -1);
const SOUTH_EAST: Point = Point::new(1, 1);
const SOUTH_WEST: Point = Point::new(-1, 1);
const NORTH_WEST: Point = Point::new(-1, -1);

const CARDINAL: [Point; 4] = [NORTH, EAST, SOUTH, WEST];

// Straight directions come first so equal-cost ties prefer them and paths
// do not zig-zag along diagonals.
const STRAIGHT_FIRST: [Point; 8] = [
    NORTH, EAST, SOUTH, WEST, NORTH_EAST, SOUTH_EAST, SOUTH_WEST, NORTH_WEST,
];

/// Real-cost multiplier of a diagonal step under [`MovementMetric::OneTwoOne`].
pub const OCTILE_DIAGONAL_REAL: f64 = 1.414;
/// Game-distance multiplier of a diagonal step under [`MovementMetric::OneTwoOne`].
///
/// Tabletop rules count every second diagonal as two cells; 1.5 is the flat
/// average of that rule.
pub const OCTILE_DIAGONAL_GAME: f64 = 1.5;

/// Cost of a straight step on uniform terrain.
pub const NORMAL_COST: f64 = 1.0;

/// How tokens move between cells and how that movement is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum MovementMetric {
    /// Four straight directions only.
    NoDiagonals,
    /// Eight directions, a diagonal step counts as two straight ones.
    Manhattan,
    /// Eight directions, every step counts as one (Chebyshev).
    OneOneOne,
    /// Eight directions, diagonals cost roughly √2 (octile).
    #[default]
    OneTwoOne,
}

/// Cost of one edge: `real` drives the search, `game` is the distance
/// reported to players.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCost {
    pub real: f64,
    pub game: f64,
}

impl EdgeCost {
    /// Both costs scaled by a terrain multiplier.
    #[inline]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            real: self.real * factor,
            game: self.game * factor,
        }
    }
}

/// A [`MovementMetric`] with its offset table and diagonal multipliers
/// resolved once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    kind: MovementMetric,
    steps: &'static [Point],
    diagonal_real: f64,
    diagonal_game: f64,
}

impl Default for Metric {
    fn default() -> Self {
        Self::new(MovementMetric::default())
    }
}

impl From<MovementMetric> for Metric {
    fn from(kind: MovementMetric) -> Self {
        Self::new(kind)
    }
}

impl Metric {
    /// Resolve the tables for `kind`.
    pub const fn new(kind: MovementMetric) -> Self {
        match kind {
            MovementMetric::NoDiagonals => Self {
                kind,
                steps: &CARDINAL,
                diagonal_real: 1.0,
                diagonal_game: 1.0,
            },
            MovementMetric::Manhattan => Self {
                kind,
                steps: &STRAIGHT_FIRST,
                diagonal_real: 2.0,
                diagonal_game: 2.0,
            },
            MovementMetric::OneOneOne => Self {
                kind,
                steps: &STRAIGHT_FIRST,
                diagonal_real: 1.0,
                diagonal_game: 1.0,
            },
            MovementMetric::OneTwoOne => Self {
                kind,
                steps: &STRAIGHT_FIRST,
                diagonal_real: OCTILE_DIAGONAL_REAL,
                diagonal_game: OCTILE_DIAGONAL_GAME,
            },
        }
    }

    #[inline]
    pub fn kind(&self) -> MovementMetric {
        self.kind
    }

    /// Neighbour offsets in expansion order.
    #[inline]
    pub fn step_directions(&self) -> &'static [Point] {
        self.steps
    }

    /// Estimated real cost from `a` to `b` on uniform terrain.
    pub fn heuristic(&self, a: Point, b: Point) -> f64 {
        let (dx, dy) = a.abs_diff(b);
        let (lo, hi) = (dx.min(dy), dx.max(dy));
        match self.kind {
            MovementMetric::NoDiagonals | MovementMetric::Manhattan => f64::from(dx) + f64::from(dy),
            MovementMetric::OneOneOne => f64::from(hi),
            MovementMetric::OneTwoOne => self.diagonal_real * f64::from(lo) + f64::from(hi - lo),
        }
    }

    /// Cost of one step on uniform terrain.
    #[inline]
    pub fn edge_cost(&self, diagonal: bool) -> EdgeCost {
        if diagonal {
            EdgeCost {
                real: NORMAL_COST * self.diagonal_real,
                game: NORMAL_COST * self.diagonal_game,
            }
        } else {
            EdgeCost {
                real: NORMAL_COST,
                game: NORMAL_COST,
            }
        }
    }

    /// Tabletop length of a contiguous path, in cells.
    ///
    /// Under [`MovementMetric::OneTwoOne`] every second diagonal counts
    /// double. Returns `None` if two consecutive cells are not adjacent.
    pub fn path_cells(&self, cells: &[Point]) -> Option<i32> {
        let mut straight = 0;
        let mut diagonal = 0;
        for pair in cells.windows(2) {
            match pair[1].abs_diff(pair[0]) {
                (1, 0) | (0, 1) => straight += 1,
                (1, 1) => diagonal += 1,
                _ => return None,
            }
        }
        Some(match self.kind {
            MovementMetric::NoDiagonals | MovementMetric::Manhattan => straight + diagonal * 2,
            MovementMetric::OneOneOne => straight + diagonal,
            MovementMetric::OneTwoOne => straight + diagonal + diagonal / 2,
        })
    }
}

//! Movement obstruction between cells, with a per-search memo.
//!
//! Blocking is direction dependent: a wall hugging one side of a cell may
//! stop a step coming from the west but not one coming from the north. The
//! cache is therefore keyed by the goal cell *and* the direction of
//! approach, never by the goal alone.

use std::collections::HashMap;
use std::time::Instant;

use cellwalk_core::{CellBounds, Point};
use geo::coord;

use crate::stats::SearchStats;
use crate::traits::StaticGeometry;

/// Memoized result of one obstruction test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Passage {
    #[default]
    Unknown,
    Blocked,
    Clear,
}

impl From<bool> for Passage {
    fn from(blocked: bool) -> Self {
        if blocked { Self::Blocked } else { Self::Clear }
    }
}

// Wrapping keeps the key unique per start cell for a fixed goal.
fn approach(start: Point, goal: Point) -> Point {
    Point::new(start.x.wrapping_sub(goal.x), start.y.wrapping_sub(goal.y))
}

/// Results recorded for one goal cell, per direction of approach.
#[derive(Debug, Clone, Default)]
pub struct ObstructionEntry {
    approaches: HashMap<Point, Passage>,
}

impl ObstructionEntry {
    /// Passage from a start cell at `approach = start - goal`, wrapping at
    /// the `i32` limits.
    pub fn passage(&self, approach: Point) -> Passage {
        self.approaches.get(&approach).copied().unwrap_or_default()
    }

    fn record(&mut self, approach: Point, blocked: bool) {
        self.approaches.insert(approach, Passage::from(blocked));
    }

    /// Number of directions with a known result.
    pub fn len(&self) -> usize {
        self.approaches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.approaches.is_empty()
    }
}

/// Obstruction results of one search, keyed by goal cell.
#[derive(Debug, Clone, Default)]
pub struct ObstructionCache {
    entries: HashMap<Point, ObstructionEntry>,
}

impl ObstructionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached passage into `goal` from `start`.
    pub fn passage(&self, start: Point, goal: Point) -> Passage {
        self.entries
            .get(&goal)
            .map_or(Passage::Unknown, |e| e.passage(approach(start, goal)))
    }

    /// Record the result of a movement test from `start` into `goal`.
    pub fn record(&mut self, start: Point, goal: Point, blocked: bool) {
        self.entries.entry(goal).or_default().record(approach(start, goal), blocked);
    }

    /// The entry of `goal`, if any test into it has run.
    pub fn entry(&self, goal: Point) -> Option<&ObstructionEntry> {
        self.entries.get(&goal)
    }

    /// Number of goal cells with at least one cached result.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of cached (goal, direction) results.
    pub fn results(&self) -> usize {
        self.entries.values().map(ObstructionEntry::len).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Answers whether a step between two cells crosses static geometry.
pub struct ObstructionOracle<'a> {
    bounds: &'a dyn CellBounds,
    geometry: Option<&'a dyn StaticGeometry>,
    cache: ObstructionCache,
}

impl<'a> ObstructionOracle<'a> {
    /// Create an oracle with a fresh cache.
    ///
    /// Geometry may change between searches, so a cache never outlives the
    /// oracle that filled it.
    pub fn new(bounds: &'a dyn CellBounds, geometry: Option<&'a dyn StaticGeometry>) -> Self {
        Self {
            bounds,
            geometry,
            cache: ObstructionCache::new(),
        }
    }

    /// Whether moving from `start` into `goal` is blocked.
    ///
    /// Geometry failures are treated as blocked and logged; they never
    /// abort the search.
    pub fn blocks_movement(&mut self, start: Point, goal: Point, stats: &mut SearchStats) -> bool {
        let Some(geometry) = self.geometry else {
            return false;
        };
        if geometry.is_empty() {
            return false;
        }

        let timer = Instant::now();
        match self.cache.passage(start, goal) {
            Passage::Blocked => {
                stats.record_cache_hit(timer.elapsed());
                return true;
            }
            Passage::Clear => {
                stats.record_cache_hit(timer.elapsed());
                return false;
            }
            Passage::Unknown => {}
        }

        let start_bounds = self.bounds.cell_bounds(start);
        let goal_bounds = self.bounds.cell_bounds(goal);
        let blocked = if start_bounds.is_empty() || goal_bounds.is_empty() {
            false
        } else if !geometry.intersects_rect(start_bounds) && !geometry.intersects_rect(goal_bounds) {
            false
        } else {
            // A goal centre inside the geometry gets no special treatment:
            // the segment test below decides for every role.
            let (x1, y1) = start_bounds.center();
            let (x2, y2) = goal_bounds.center();
            match geometry.intersects_segment(coord! { x: x1, y: y1 }, coord! { x: x2, y: y2 }) {
                Ok(blocked) => blocked,
                Err(e) => {
                    log::warn!("obstruction test {start} -> {goal} failed, treating as blocked: {e}");
                    stats.geometry_failures += 1;
                    return true;
                }
            }
        };

        stats.record_obstruction_test(timer.elapsed());
        self.cache.record(start, goal, blocked);
        blocked
    }

    /// Results gathered so far.
    pub fn cache(&self) -> &ObstructionCache {
        &self.cache
    }

    /// Give up the oracle, keeping its results.
    pub fn into_cache(self) -> ObstructionCache {
        self.cache
    }
}

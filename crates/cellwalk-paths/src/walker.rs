use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use cellwalk_core::{CellBounds, Footprint, Point};

use crate::astar::Search;
use crate::cancel::CancelToken;
use crate::config::WalkerConfig;
use crate::error::ConfigError;
use crate::metric::Metric;
use crate::neighbors::NeighborGenerator;
use crate::obstruction::{ObstructionCache, ObstructionOracle};
use crate::path::{Path, SearchOutcome};
use crate::stats::SearchStats;
use crate::terrain::{TerrainMap, TerrainModifier};
use crate::traits::StaticGeometry;

/// What to search for.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathRequest {
    pub start: Point,
    pub end: Point,
    /// Cells the moving token covers, relative to its anchor.
    pub footprint: Footprint,
    /// Honour geometry and terrain. Unset, only distance counts.
    pub restrict: bool,
}

impl PathRequest {
    pub fn new(start: Point, end: Point, footprint: Footprint, restrict: bool) -> Self {
        Self {
            start,
            end,
            footprint,
            restrict,
        }
    }
}

/// Finds movement paths for tokens on one map.
///
/// A walker holds a snapshot of the map: the cell layout, the blocking
/// geometry and the terrain modifiers. Build a new walker when any of them
/// changes.
///
/// [`compute_path`] and [`begin_search`] track the route of one moving
/// token: each cancels the search started before it. To search for several
/// tokens at once from different threads, call [`compute_path_with`] with a
/// [`CancelToken`] per token; those searches never cancel each other.
///
/// [`compute_path`]: Walker::compute_path
/// [`begin_search`]: Walker::begin_search
/// [`compute_path_with`]: Walker::compute_path_with
pub struct Walker {
    config: WalkerConfig,
    metric: Metric,
    grid: Arc<dyn CellBounds + Send + Sync>,
    geometry: Option<Arc<dyn StaticGeometry>>,
    terrain: TerrainMap,
    current: Mutex<CancelToken>,
    last_traveled: Mutex<Option<f64>>,
    last_cache: Mutex<ObstructionCache>,
}

impl Walker {
    /// Create a walker over `grid` with no geometry and no terrain.
    pub fn new(
        config: WalkerConfig,
        grid: impl CellBounds + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            metric: Metric::new(config.metric),
            config,
            grid: Arc::new(grid),
            geometry: None,
            terrain: TerrainMap::default(),
            current: Mutex::new(CancelToken::new()),
            last_traveled: Mutex::new(None),
            last_cache: Mutex::new(ObstructionCache::new()),
        })
    }

    /// Use `geometry` to block movement in restricted searches.
    pub fn with_geometry(mut self, geometry: Arc<dyn StaticGeometry>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Snapshot the given terrain modifiers.
    pub fn with_terrain<'a>(
        mut self,
        modifiers: impl IntoIterator<Item = &'a TerrainModifier>,
    ) -> Self {
        self.terrain = TerrainMap::new(modifiers);
        self
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    pub fn terrain(&self) -> &TerrainMap {
        &self.terrain
    }

    /// Shortest path for a token with `footprint` from `start` to `end`.
    ///
    /// Supersedes any search started earlier on this walker. The path is
    /// empty when the goal is unreachable or the search timed out or was
    /// cancelled; [`Path::outcome`] tells which.
    pub fn compute_path(
        &self,
        start: Point,
        end: Point,
        footprint: &Footprint,
        restrict: bool,
    ) -> Path {
        let request = PathRequest::new(start, end, footprint.clone(), restrict);
        let cancel = self.begin_search();
        let mut stats = SearchStats::default();
        self.compute_path_with(&request, &cancel, &mut stats)
    }

    /// Run `request` under an explicit token, adding counters to `stats`.
    ///
    /// Does not touch the walker's current search, so any number of these
    /// can run concurrently.
    pub fn compute_path_with(
        &self,
        request: &PathRequest,
        cancel: &CancelToken,
        stats: &mut SearchStats,
    ) -> Path {
        let started = Instant::now();
        let deadline = started + self.config.effective_timeout();
        stats.searches += 1;

        if cancel.is_cancelled() {
            return Path::empty(SearchOutcome::Cancelled);
        }

        let geometry = if request.restrict {
            self.geometry.as_deref()
        } else {
            None
        };
        let oracle = ObstructionOracle::new(&*self.grid, geometry);
        let generator = NeighborGenerator::new(
            self.metric,
            &request.footprint,
            &self.terrain,
            oracle,
            self.config.bounds,
            request.restrict,
        );
        let mut search = Search::new(generator, self.metric);
        let path = search.run(request.start, request.end, deadline, cancel, stats);

        let elapsed = started.elapsed();
        stats.elapsed += elapsed;
        match path.outcome() {
            SearchOutcome::Found => {
                *lock(&self.last_traveled) = Some(path.distance_traveled());
            }
            SearchOutcome::TimedOut => {
                log::info!(
                    "path {} -> {} timed out after {:?}",
                    request.start,
                    request.end,
                    self.config.effective_timeout()
                );
            }
            SearchOutcome::Exhausted | SearchOutcome::Cancelled => {}
        }
        if elapsed > self.config.slow_search {
            log::info!(
                "path {} -> {} took {}ms ({:?}, {} nodes)",
                request.start,
                request.end,
                elapsed.as_millis(),
                path.outcome(),
                search.node_count()
            );
        }
        log::debug!(
            "path {} -> {}: {:?} in {} steps, {} cached passages; {}",
            request.start,
            request.end,
            path.outcome(),
            path.steps(),
            search.cache().results(),
            stats
        );
        *lock(&self.last_cache) = search.into_cache();
        path
    }

    /// Start a new search, cancelling the previous one.
    ///
    /// The returned token belongs to the new search.
    pub fn begin_search(&self) -> CancelToken {
        let token = CancelToken::new();
        let previous = std::mem::replace(&mut *lock(&self.current), token.clone());
        previous.cancel();
        token
    }

    /// Obstruction results of the most recent search to finish.
    pub fn last_cache(&self) -> ObstructionCache {
        lock(&self.last_cache).clone()
    }

    /// Cancel the most recent search.
    pub fn cancel(&self) {
        lock(&self.current).cancel();
    }

    /// Game distance of the last path found, in display units.
    ///
    /// Zero until a search succeeds.
    pub fn distance(&self) -> i32 {
        lock(&self.last_traveled).map_or(0, |traveled| {
            (traveled * f64::from(self.config.units_per_cell)) as i32
        })
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::MovementMetric;
    use crate::topology::Topology;
    use cellwalk_core::SquareGrid;
    use geo::coord;

    fn walker(kind: MovementMetric) -> Walker {
        let config = WalkerConfig::default().with_metric(kind);
        Walker::new(config, SquareGrid::new(50)).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = WalkerConfig::default().with_units_per_cell(-5);
        assert!(matches!(
            Walker::new(config, SquareGrid::new(50)),
            Err(ConfigError::InvalidUnitsPerCell(-5))
        ));
    }

    #[test]
    fn distance_tracks_last_found_path() {
        let w = walker(MovementMetric::OneOneOne);
        assert_eq!(w.distance(), 0);
        let path = w.compute_path(Point::new(0, 0), Point::new(4, 4), &Footprint::single(), true);
        assert_eq!(path.steps(), 4);
        assert_eq!(w.distance(), 20);
    }

    #[test]
    fn begin_search_cancels_previous() {
        let w = walker(MovementMetric::OneTwoOne);
        let first = w.begin_search();
        let second = w.begin_search();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        w.cancel();
        assert!(second.is_cancelled());
    }

    #[test]
    fn explicit_tokens_leave_the_current_search_alone() {
        let w = walker(MovementMetric::OneOneOne);
        let current = w.begin_search();
        let request = PathRequest::new(Point::new(0, 0), Point::new(3, 3), Footprint::single(), true);
        let mut stats = SearchStats::default();
        let path = w.compute_path_with(&request, &CancelToken::new(), &mut stats);
        assert!(path.is_found());
        assert!(!current.is_cancelled());
    }

    #[test]
    fn cancelled_token_returns_at_once() {
        let w = walker(MovementMetric::OneTwoOne);
        let token = CancelToken::new();
        token.cancel();
        let mut stats = SearchStats::default();
        let request = PathRequest::new(Point::new(0, 0), Point::new(3, 0), Footprint::single(), true);
        let path = w.compute_path_with(&request, &token, &mut stats);
        assert_eq!(path.outcome(), SearchOutcome::Cancelled);
        assert_eq!(stats.searches, 1);
        assert_eq!(stats.expanded, 0);
    }

    #[test]
    fn unrestricted_search_ignores_geometry() {
        let mut topo = Topology::new();
        topo.add_wall(coord! { x: 50.0, y: -500.0 }, coord! { x: 50.0, y: 500.0 })
            .unwrap();
        let w = walker(MovementMetric::NoDiagonals).with_geometry(Arc::new(topo));
        let free = w.compute_path(Point::new(0, 0), Point::new(2, 0), &Footprint::single(), false);
        assert_eq!(free.steps(), 2);

        let mut stats = SearchStats::default();
        let request = PathRequest::new(Point::new(0, 0), Point::new(2, 0), Footprint::single(), true);
        let blocked = w.compute_path_with(&request, &w.begin_search(), &mut stats);
        assert!(blocked.steps() > 2);
        assert!(stats.blocked > 0);
        let cache = w.last_cache();
        assert!(cache.results() > 0);
        assert!(cache.entry(Point::new(1, 0)).is_some());
    }
}

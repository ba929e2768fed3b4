//! Movement pathfinding for tokens on tactical grid maps.
//!
//! This crate finds the route a token takes between two cells while
//! honouring the things a tabletop map adds to plain grid search:
//!
//! - **Distance metrics** ([`MovementMetric`]): orthogonal only, Manhattan,
//!   uniform diagonals, and the alternating one-two-one diagonal rule
//! - **Terrain** ([`TerrainModifier`]): cells that cost more to enter
//! - **Blocking geometry** ([`StaticGeometry`], [`Topology`]): walls and
//!   solid shapes that forbid some steps between adjacent cells
//! - **Multi-cell tokens** ([`Footprint`](cellwalk_core::Footprint)): every
//!   occupied cell is checked against the geometry
//!
//! All searches go through a [`Walker`], which snapshots the map once and
//! then answers any number of [`compute_path`](Walker::compute_path) calls.
//! A search is bounded by a wall-clock budget and can be cancelled through a
//! [`CancelToken`]; neither ever yields a partial path.
//!
//! # Example
//!
//! ```
//! use cellwalk_core::{Footprint, Point, SquareGrid};
//! use cellwalk_paths::{MovementMetric, Walker, WalkerConfig};
//!
//! let config = WalkerConfig::default().with_metric(MovementMetric::OneOneOne);
//! let walker = Walker::new(config, SquareGrid::new(50)).unwrap();
//! let path = walker.compute_path(Point::new(0, 0), Point::new(4, 4), &Footprint::single(), true);
//! assert_eq!(path.steps(), 4);
//! assert_eq!(walker.distance(), 20);
//! ```

mod astar;
mod cancel;
mod config;
mod error;
mod metric;
mod neighbors;
mod obstruction;
mod path;
mod route;
mod stats;
mod terrain;
mod topology;
mod traits;
mod walker;
mod worker;

pub use cancel::CancelToken;
pub use config::{Role, WalkerConfig};
pub use error::{ConfigError, GeometryError, WorkerError};
pub use metric::{
    EdgeCost, Metric, MovementMetric, NORMAL_COST, OCTILE_DIAGONAL_GAME, OCTILE_DIAGONAL_REAL,
};
pub use obstruction::{ObstructionCache, ObstructionEntry, ObstructionOracle, Passage};
pub use path::{Path, SearchOutcome};
pub use route::Route;
pub use stats::SearchStats;
pub use terrain::{TerrainMap, TerrainModifier};
pub use topology::{Topology, WALL_THICKNESS};
pub use traits::StaticGeometry;
pub use walker::{PathRequest, Walker};
pub use worker::{PathJob, spawn_path_job};

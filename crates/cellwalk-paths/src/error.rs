//! Error types.
//!
//! The search itself never fails: timeouts, cancellation and unreachable
//! goals all come back as an empty [`Path`](crate::Path). Errors only arise
//! when building inputs (topology, configuration, terrain) and when running
//! a search on a background thread.

use std::fmt;

/// Errors raised by static geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A coordinate was NaN or infinite.
    NonFinite { x: f64, y: f64 },
    /// A polygon ring has fewer than three distinct vertices.
    DegenerateRing { vertices: usize },
    /// A wall segment has zero length.
    DegenerateWall { x: f64, y: f64 },
    /// The geometry engine could not evaluate a query.
    Engine(String),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { x, y } => write!(f, "geometry: non-finite coordinate ({x}, {y})"),
            Self::DegenerateRing { vertices } => {
                write!(f, "geometry: polygon ring with only {vertices} distinct vertices")
            }
            Self::DegenerateWall { x, y } => {
                write!(f, "geometry: zero-length wall at ({x}, {y})")
            }
            Self::Engine(msg) => write!(f, "geometry: {msg}"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Errors raised when validating walker configuration or terrain input.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The search timeout is too large to form a deadline.
    InvalidTimeout,
    /// Units per cell must be strictly positive.
    InvalidUnitsPerCell(i32),
    /// Terrain multipliers must be finite and at least one.
    InvalidMultiplier(f64),
    /// The search bounds describe no cell at all.
    EmptyBounds,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimeout => write!(f, "config: search timeout out of range"),
            Self::InvalidUnitsPerCell(u) => {
                write!(f, "config: units per cell must be positive, got {u}")
            }
            Self::InvalidMultiplier(m) => {
                write!(f, "config: terrain multiplier must be finite and at least 1, got {m}")
            }
            Self::EmptyBounds => write!(f, "config: search bounds are empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised by background path jobs.
#[derive(Debug)]
pub enum WorkerError {
    /// The worker thread could not be started.
    Spawn(std::io::Error),
    /// The worker thread panicked before producing a path.
    Panicked,
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "path worker: failed to spawn thread: {e}"),
            Self::Panicked => write!(f, "path worker: search thread panicked"),
        }
    }
}

impl std::error::Error for WorkerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn(e) => Some(e),
            Self::Panicked => None,
        }
    }
}

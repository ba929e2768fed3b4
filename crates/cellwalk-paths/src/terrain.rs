//! Terrain cost modifiers.
//!
//! Tokens flagged as terrain (rubble, water, brambles) multiply the cost of
//! entering the cells they cover. Overlapping modifiers add up.

use std::collections::HashMap;

use cellwalk_core::{Footprint, Point};

use crate::error::ConfigError;

/// A multiplicative cost factor over a set of cells.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainModifier {
    cells: Vec<Point>,
    multiplier: f64,
}

impl TerrainModifier {
    /// Create a modifier. `multiplier` must be finite and at least one:
    /// terrain only ever slows a token down, which keeps the distance
    /// heuristic a lower bound.
    pub fn new(
        cells: impl IntoIterator<Item = Point>,
        multiplier: f64,
    ) -> Result<Self, ConfigError> {
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ConfigError::InvalidMultiplier(multiplier));
        }
        Ok(Self {
            cells: cells.into_iter().collect(),
            multiplier,
        })
    }

    /// The modifier of a terrain token anchored at `anchor`.
    pub fn from_token(
        footprint: &Footprint,
        anchor: Point,
        multiplier: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(footprint.occupied_cells(anchor), multiplier)
    }

    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

/// Per-cell multipliers, snapshotted once when a walker is built.
#[derive(Debug, Clone, Default)]
pub struct TerrainMap {
    cells: HashMap<Point, f64>,
}

impl TerrainMap {
    pub fn new<'a>(modifiers: impl IntoIterator<Item = &'a TerrainModifier>) -> Self {
        let mut cells: HashMap<Point, f64> = HashMap::new();
        for modifier in modifiers {
            for &cell in &modifier.cells {
                *cells.entry(cell).or_insert(0.0) += modifier.multiplier;
            }
        }
        Self { cells }
    }

    /// Summed multiplier of `cell`, or 1 when no terrain covers it.
    #[inline]
    pub fn multiplier(&self, cell: Point) -> f64 {
        self.cells.get(&cell).copied().unwrap_or(1.0)
    }

    /// Number of cells with terrain.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

//! Walker configuration.

use std::time::Duration;

use cellwalk_core::Range;

use crate::error::ConfigError;
use crate::metric::MovementMetric;

/// Who asked for the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    #[default]
    Player,
    /// Searches for a game master get half the budget.
    GameMaster,
}

/// Settings fixed for the lifetime of a [`Walker`](crate::Walker).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WalkerConfig {
    pub metric: MovementMetric,
    /// Wall-clock budget of one search before it gives up.
    pub timeout: Duration,
    pub role: Role,
    /// Display distance units (feet, metres) per cell.
    pub units_per_cell: i32,
    /// Searches slower than this are logged.
    pub slow_search: Duration,
    /// Optional area the search may not leave.
    pub bounds: Option<Range>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            metric: MovementMetric::default(),
            timeout: Duration::from_secs(10),
            role: Role::default(),
            units_per_cell: 5,
            slow_search: Duration::from_millis(50),
            bounds: None,
        }
    }
}

impl WalkerConfig {
    pub fn with_metric(mut self, metric: MovementMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_units_per_cell(mut self, units: i32) -> Self {
        self.units_per_cell = units;
        self
    }

    pub fn with_bounds(mut self, bounds: Range) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Search budget after the role adjustment.
    pub fn effective_timeout(&self) -> Duration {
        match self.role {
            Role::Player => self.timeout,
            Role::GameMaster => self.timeout / 2,
        }
    }

    /// Check the settings for values a walker cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.units_per_cell <= 0 {
            return Err(ConfigError::InvalidUnitsPerCell(self.units_per_cell));
        }
        // Deadlines are computed as `Instant + timeout`.
        if self.timeout > Duration::from_secs(60 * 60 * 24 * 365) {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.bounds.is_some_and(|b| b.is_empty()) {
            return Err(ConfigError::EmptyBounds);
        }
        Ok(())
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: WalkerConfig =
            serde_json::from_str(r#"{"metric":"ONE_ONE_ONE","units_per_cell":10}"#).unwrap();
        assert_eq!(config.metric, MovementMetric::OneOneOne);
        assert_eq!(config.units_per_cell, 10);
        assert_eq!(config.timeout, WalkerConfig::default().timeout);
    }
}

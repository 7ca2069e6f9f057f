// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Map configuration and errors.

use wayfield_graph::GraphError;
use wayfield_quadtree::ConfigError;

/// Tunables for a [`WaypointMap`](crate::WaypointMap).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapConfig {
    /// Slack added around every quad-tree region, in map units.
    pub loose_margin: f64,
    /// Side of the square spatial item centred on each waypoint.
    pub waypoint_extent: f64,
    /// Number of floors; waypoint floors range over `0..floor_count`.
    pub floor_count: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            loose_margin: 64.0,
            waypoint_extent: 16.0,
            floor_count: 1,
        }
    }
}

impl MapConfig {
    /// Check the values that have no sensible fallback.
    pub fn validate(&self) -> Result<(), MapError> {
        if !self.loose_margin.is_finite() {
            return Err(MapError::InvalidLooseMargin(self.loose_margin));
        }
        if !(self.waypoint_extent.is_finite() && self.waypoint_extent > 0.0) {
            return Err(MapError::InvalidWaypointExtent(self.waypoint_extent));
        }
        if self.floor_count == 0 {
            return Err(MapError::NoFloors);
        }
        Ok(())
    }
}

/// Failures reported by map operations.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum MapError {
    /// A position lies outside the map area.
    #[error("position ({x}, {y}) lies outside the map")]
    OutOfBounds {
        /// Rejected x.
        x: f64,
        /// Rejected y.
        y: f64,
    },
    /// The loose margin is not finite.
    #[error("loose margin must be finite, got {0}")]
    InvalidLooseMargin(f64),
    /// The waypoint extent is not a positive finite number.
    #[error("waypoint extent must be positive and finite, got {0}")]
    InvalidWaypointExtent(f64),
    /// `floor_count` is zero.
    #[error("a map needs at least one floor")]
    NoFloors,
    /// The spatial index rejected the derived configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The path graph rejected an edit.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction parameters for [`LooseQuadTree`](crate::LooseQuadTree).

use kurbo::{Point, Rect, Size};

/// Deepest subdivision accepted by [`QuadTreeConfig::validate`].
///
/// Ten levels already mean `4 * (4^10 - 1) / 3` (about 1.4 million) nodes.
pub const MAX_SUBDIVISION_COUNT: u32 = 10;

/// Parameters for building a tree.
///
/// ```
/// use wayfield_quadtree::QuadTreeConfig;
///
/// let config = QuadTreeConfig {
///     width: 512.0,
///     height: 256.0,
///     extra_loose_width: 16.0,
///     extra_loose_height: 16.0,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuadTreeConfig {
    /// Origin of the covered area (its minimum corner).
    pub offset: Point,
    /// Logical width of the covered area.
    pub width: f64,
    /// Logical height of the covered area.
    pub height: f64,
    /// Slack added to both horizontal sides of every node's loose area. Negative values act as 0.
    pub extra_loose_width: f64,
    /// Slack added to both vertical sides of every node's loose area. Negative values act as 0.
    pub extra_loose_height: f64,
    /// Number of levels, counting the four top-level nodes.
    ///
    /// `0` and `1` both make the top-level nodes leaves; each further level splits every
    /// leaf into four.
    pub subdivision_count: u32,
    /// Expected number of items, used to pre-size the registry.
    pub item_count_hint: usize,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            offset: Point::ZERO,
            width: 1024.0,
            height: 1024.0,
            extra_loose_width: 0.0,
            extra_loose_height: 0.0,
            subdivision_count: 4,
            item_count_hint: 0,
        }
    }
}

impl QuadTreeConfig {
    /// A config covering `size` at the origin, with every other field defaulted.
    pub fn with_size(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            ..Default::default()
        }
    }

    /// Check the parameters a tree cannot be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extent_ok = |v: f64| v.is_finite() && v > 0.0;
        if !extent_ok(self.width) || !extent_ok(self.height) {
            return Err(ConfigError::InvalidExtent {
                width: self.width,
                height: self.height,
            });
        }
        if !self.offset.x.is_finite() || !self.offset.y.is_finite() {
            return Err(ConfigError::InvalidOffset {
                x: self.offset.x,
                y: self.offset.y,
            });
        }
        if !self.extra_loose_width.is_finite() || !self.extra_loose_height.is_finite() {
            return Err(ConfigError::InvalidLooseMargin {
                width: self.extra_loose_width,
                height: self.extra_loose_height,
            });
        }
        if self.subdivision_count > MAX_SUBDIVISION_COUNT {
            return Err(ConfigError::TooDeep {
                requested: self.subdivision_count,
                max: MAX_SUBDIVISION_COUNT,
            });
        }
        Ok(())
    }

    /// The same config with negative slack clamped to zero.
    pub fn normalized(mut self) -> Self {
        self.extra_loose_width = self.extra_loose_width.max(0.0);
        self.extra_loose_height = self.extra_loose_height.max(0.0);
        self
    }

    /// The full area covered by the four top-level nodes.
    pub fn total_area(&self) -> Rect {
        Rect::from_origin_size(self.offset, (self.width, self.height))
    }
}

/// Reasons a [`QuadTreeConfig`] is rejected.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Width or height is zero, negative, or not finite.
    #[error("tree extent must be finite and positive, got {width}x{height}")]
    InvalidExtent {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },
    /// The offset has a non-finite coordinate.
    #[error("tree offset must be finite, got ({x}, {y})")]
    InvalidOffset {
        /// Requested x offset.
        x: f64,
        /// Requested y offset.
        y: f64,
    },
    /// A loose margin is not finite.
    #[error("loose margins must be finite, got ({width}, {height})")]
    InvalidLooseMargin {
        /// Requested horizontal slack.
        width: f64,
        /// Requested vertical slack.
        height: f64,
    },
    /// The subdivision count exceeds [`MAX_SUBDIVISION_COUNT`].
    #[error("subdivision count {requested} exceeds the maximum of {max}")]
    TooDeep {
        /// Requested level count.
        requested: u32,
        /// Accepted maximum.
        max: u32,
    },
}

//! Generation run configuration and its contract checks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid-configuration errors. These are caller contract violations and
/// fail fast; everything past validation degrades instead of erroring.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    BadDimensions { width: usize, height: usize },

    #[error("room width range invalid: min {min} > max {max}")]
    BadWidthRange { min: usize, max: usize },

    #[error("room height range invalid: min {min} > max {max}")]
    BadHeightRange { min: usize, max: usize },

    #[error("room sizes must be at least 1x1, got {min_w}x{min_h}")]
    BadRoomSize { min_w: usize, min_h: usize },

    #[error("corridor width must be at least 1")]
    BadCorridorWidth,

    #[error("extra edge ratio must be non-negative and finite, got {0}")]
    BadExtraEdgeRatio(f32),
}

/// Configuration for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Target room count; 0 means "fill within the attempt budget".
    pub room_count: usize,
    /// Room placement attempt budget.
    pub attempts: usize,
    /// Inclusive room width range.
    pub min_room_width: usize,
    pub max_room_width: usize,
    /// Inclusive room height range.
    pub min_room_height: usize,
    pub max_room_height: usize,
    /// Corridor width in cells.
    pub corridor_width: usize,
    /// Extra loop edges as a ratio of the MST edge count. 1.0 doubles the
    /// edge count; the resulting cap is enforced exactly.
    pub extra_edge_ratio: f32,
    /// RNG seed; 0 means "use a non-deterministic seed".
    pub seed: u64,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            room_count: 30,
            attempts: 200,
            min_room_width: 4,
            max_room_width: 10,
            min_room_height: 4,
            max_room_height: 10,
            corridor_width: 1,
            extra_edge_ratio: 0.5,
            seed: 0,
        }
    }
}

impl GenConfig {
    /// Check the caller contract.
    ///
    /// A grid too small to fit the requested rooms is NOT an error: room
    /// placement simply yields fewer rooms and downstream stages tolerate
    /// that, down to 0 rooms.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::BadDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.min_room_width == 0 || self.min_room_height == 0 {
            return Err(ConfigError::BadRoomSize {
                min_w: self.min_room_width,
                min_h: self.min_room_height,
            });
        }
        if self.min_room_width > self.max_room_width {
            return Err(ConfigError::BadWidthRange {
                min: self.min_room_width,
                max: self.max_room_width,
            });
        }
        if self.min_room_height > self.max_room_height {
            return Err(ConfigError::BadHeightRange {
                min: self.min_room_height,
                max: self.max_room_height,
            });
        }
        if self.corridor_width == 0 {
            return Err(ConfigError::BadCorridorWidth);
        }
        if !self.extra_edge_ratio.is_finite() || self.extra_edge_ratio < 0.0 {
            return Err(ConfigError::BadExtraEdgeRatio(self.extra_edge_ratio));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GenConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let cfg = GenConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadDimensions { .. })
        ));
    }

    #[test]
    fn test_inverted_ranges_rejected() {
        let cfg = GenConfig {
            min_room_width: 12,
            max_room_width: 4,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadWidthRange { min: 12, max: 4 })
        ));

        let cfg = GenConfig {
            min_room_height: 9,
            max_room_height: 4,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::BadHeightRange { .. })
        ));
    }

    #[test]
    fn test_bad_ratio_rejected() {
        let cfg = GenConfig {
            extra_edge_ratio: -0.1,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = GenConfig {
            extra_edge_ratio: f32::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_corridor_width_rejected() {
        let cfg = GenConfig {
            corridor_width: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::BadCorridorWidth));
    }

    #[test]
    fn test_tiny_grid_is_degenerate_not_invalid() {
        // Too small to ever fit a room, but that degrades to zero rooms
        let cfg = GenConfig {
            width: 3,
            height: 3,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }
}

//! Configuration - board extent, tile animation style and follow strategy.
//!
//! Built like a props struct: override what you need, default the rest.
//!
//! ```ignore
//! let config = HoneycombConfig {
//!     board_size: 8,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use crate::board::Board;
use crate::error::{ConfigError, Result};

/// Default board half-extent: cells span `[-50, 50)` on both axes.
pub const DEFAULT_BOARD_SIZE: i32 = 50;

/// Top-level configuration passed to [`crate::pipeline::start`].
#[derive(Debug, Clone, PartialEq)]
pub struct HoneycombConfig {
    /// Board spans `q, r ∈ [-board_size, board_size)`.
    pub board_size: i32,
    /// Scales, opacities and phase durations of tile highlights.
    pub tiles: TileStyle,
    /// How camera and light chase the pointer.
    pub follow: FollowStrategy,
}

impl Default for HoneycombConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            tiles: TileStyle::default(),
            follow: FollowStrategy::default(),
        }
    }
}

impl HoneycombConfig {
    /// Check every precondition once. Called by `start()`.
    pub fn validate(&self) -> Result<()> {
        Board::check(self.board_size)?;
        self.tiles.validate()?;
        self.follow.validate()
    }
}

// =============================================================================
// Tile style
// =============================================================================

/// Visual targets for the tile highlight phases.
///
/// Durations are in clock milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TileStyle {
    /// Resting scale a highlight starts from and contracts back to.
    pub rest_scale: f32,
    /// Peak scale of the enter pop.
    pub pop_scale: f32,
    /// Upper scale of the breathing loop.
    pub breathe_scale: f32,
    /// Scale a fading tile shrinks to before hiding.
    pub exit_scale: f32,

    pub rest_opacity: f32,
    pub pop_opacity: f32,
    pub breathe_opacity: f32,
    pub exit_opacity: f32,

    pub pop_duration: f64,
    pub contract_duration: f64,
    pub breathe_duration: f64,
    pub exit_duration: f64,
}

impl Default for TileStyle {
    fn default() -> Self {
        Self {
            rest_scale: 0.6,
            pop_scale: 0.94,
            breathe_scale: 0.8,
            exit_scale: 0.02,
            rest_opacity: 0.2,
            pop_opacity: 0.3,
            breathe_opacity: 0.3,
            exit_opacity: 0.1,
            pop_duration: 100.0,
            contract_duration: 400.0,
            breathe_duration: 600.0,
            exit_duration: 600.0,
        }
    }
}

impl TileStyle {
    fn validate(&self) -> Result<()> {
        let values = [
            ("rest_scale", self.rest_scale),
            ("pop_scale", self.pop_scale),
            ("breathe_scale", self.breathe_scale),
            ("exit_scale", self.exit_scale),
            ("rest_opacity", self.rest_opacity),
            ("pop_opacity", self.pop_opacity),
            ("breathe_opacity", self.breathe_opacity),
            ("exit_opacity", self.exit_opacity),
        ];
        for (field, value) in values {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        let durations = [
            ("pop", self.pop_duration),
            ("contract", self.contract_duration),
            ("breathe", self.breathe_duration),
            ("exit", self.exit_duration),
        ];
        for (phase, duration) in durations {
            if !(duration.is_finite() && duration > 0.0) {
                return Err(ConfigError::InvalidDuration { phase, duration });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Follow strategy
// =============================================================================

/// How the camera and the light follow the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FollowStrategy {
    /// Smoothed follower streams step 0.5 per tick toward the target and
    /// their emissions are written straight to the scene.
    #[default]
    Stepped,
    /// Each new target replaces a speed-bounded transition pair on the
    /// camera/light entity, advanced by the scheduler.
    Transition { camera_speed: f32, light_speed: f32 },
}

impl FollowStrategy {
    /// Speed-bounded strategy with the classic per-tick speeds.
    pub const fn transition() -> Self {
        Self::Transition {
            camera_speed: 0.1,
            light_speed: 0.5,
        }
    }

    fn validate(&self) -> Result<()> {
        if let Self::Transition {
            camera_speed,
            light_speed,
        } = *self
        {
            for (target, speed) in [("camera", camera_speed), ("light", light_speed)] {
                if !(speed.is_finite() && speed > 0.0) {
                    return Err(ConfigError::InvalidSpeed { target, speed });
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(HoneycombConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_empty_board_rejected() {
        let config = HoneycombConfig {
            board_size: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyBoard { size: 0 })
        );
    }

    #[test]
    fn test_oversized_board_rejected() {
        for board_size in [40_000, i32::MAX] {
            let config = HoneycombConfig {
                board_size,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::BoardTooLarge { size, .. }) if size == board_size
            ));
        }
    }

    #[test]
    fn test_default_follow_is_stepped() {
        assert_eq!(FollowStrategy::default(), FollowStrategy::Stepped);
        assert_eq!(HoneycombConfig::default().follow, FollowStrategy::Stepped);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = HoneycombConfig {
            tiles: TileStyle {
                exit_duration: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDuration { phase: "exit", .. })
        ));
    }

    #[test]
    fn test_non_finite_scale_rejected() {
        let config = HoneycombConfig {
            tiles: TileStyle {
                pop_scale: f32::NAN,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "pop_scale", .. })
        ));
    }

    #[test]
    fn test_follow_speed_rejected() {
        let config = HoneycombConfig {
            follow: FollowStrategy::Transition {
                camera_speed: 0.1,
                light_speed: -1.0,
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSpeed {
                target: "light",
                speed: -1.0
            })
        );
        assert_eq!(FollowStrategy::transition().validate(), Ok(()));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::EmptyBoard { size: -3 };
        assert_eq!(err.to_string(), "board size must be positive, got -3");
    }
}

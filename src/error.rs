//! Error taxonomy.
//!
//! Only construction can fail. Steady-state operation never errors:
//! lookup misses travel through the graph as `None`, and pushes into an
//! ended stream are silently dropped.

/// A configuration precondition violated at `start()`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The board must contain at least one cell.
    #[error("board size must be positive, got {size}")]
    EmptyBoard { size: i32 },

    /// Dense cell numbering must fit an `EntityId`.
    #[error("board size must be at most {max}, got {size}")]
    BoardTooLarge { size: i32, max: i32 },

    /// Phase durations are divisors; they must be finite and positive.
    #[error("{phase} duration must be finite and positive, got {duration}ms")]
    InvalidDuration { phase: &'static str, duration: f64 },

    /// Scale and opacity targets must be finite numbers.
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    /// Speed-bounded convergence needs a finite, positive step.
    #[error("{target} follow speed must be finite and positive, got {speed}")]
    InvalidSpeed { target: &'static str, speed: f32 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

//! Error types for the clock engine.
//!
//! Only configuration problems are hard failures. Commands issued in a mode
//! that cannot honor them are reported as `InvalidTransition` by the strict
//! `try_*` engine functions; the lenient ones turn them into no-ops.

use thiserror::Error;

use super::state::ClockMode;

pub type Result<T> = std::result::Result<T, ClockError>;

/// Unified error type for clock operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(ConfigViolation),

    #[error("cannot {command} while {mode}")]
    InvalidTransition {
        command: &'static str,
        mode: ClockMode,
    },

    #[error("invalid value {value:?} for env var {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// The specific rule a configuration broke.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigViolation {
    #[error("player count {count} outside {min}..={max}")]
    PlayerCount { count: usize, min: usize, max: usize },

    #[error("seconds per player must be non-negative (got {0})")]
    NegativeSeconds(i64),

    #[error("increment must be non-negative (got {0})")]
    NegativeIncrement(i64),

    #[error("{field} of {value} seconds is too large")]
    TooLarge { field: &'static str, value: i64 },
}

impl From<ConfigViolation> for ClockError {
    fn from(violation: ConfigViolation) -> Self {
        Self::InvalidConfig(violation)
    }
}

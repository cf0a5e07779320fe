//! Core clock types: players, configuration, state, errors.
//!
//! Nothing in here changes state on its own. Transitions live in
//! [`crate::engine`].

pub mod player;
pub mod config;
pub mod state;
pub mod error;

pub use player::{Player, PlayerId};
pub use config::{ClockConfig, ValidatedConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use state::{ClockMode, ClockSnapshot, ClockState, Players};
pub use error::{ClockError, ConfigViolation, Result};

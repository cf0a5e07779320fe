//! # turn-clock
//!
//! A countdown clock for N players: a chess clock that works for two to six
//! people.
//!
//! Each player holds a time budget that runs down while it is their turn.
//! Ending a turn hands the clock to the next player in round-robin order and,
//! Fischer-style, adds an increment to the outgoing player. In elimination
//! mode a player whose budget reaches zero drops out of the rotation; when
//! nobody is left to take a turn the game is over.
//!
//! ## Design Principles
//!
//! 1. **Pure transitions**: `ClockEngine` maps a state to the next state.
//!    No timers, no rendering, no shared mutability.
//!
//! 2. **Abstract time**: the engine reacts to "one second elapsed" and knows
//!    nothing about wall-clock time. Tests feed synthetic ticks.
//!
//! 3. **Total operations**: commands that make no sense in the current mode
//!    leave the state unchanged. The only hard failure is a bad config.
//!
//! ## Modules
//!
//! - `core`: players, configuration, state, snapshots, errors
//! - `engine`: the state machine and the commands it accepts
//! - `session`: single-writer owner of a clock, timing sources, event history
//! - `format`: `MM:SS` rendering and sentinel labels

pub mod core;
pub mod engine;
pub mod session;
pub mod format;

// Re-export commonly used types
pub use crate::core::{
    ClockConfig, ClockError, ClockMode, ClockSnapshot, ClockState, ConfigViolation, Player,
    PlayerId, ValidatedConfig,
};

pub use crate::engine::{ClockEngine, Command};

pub use crate::session::{
    ClockEvent, ClockSession, EventRecord, IntervalTicker, ManualTicks, SessionInput,
    SnapshotObserver, TickSource,
};

//! The clock state machine.
//!
//! `ClockEngine` holds the rules: how time is consumed, how turns advance,
//! how increment and elimination interact, and when the game is over. It is
//! a set of pure transitions over [`crate::core::ClockState`], callable the
//! same way from a UI, a CLI, or a test harness.

mod clock;
mod command;

pub use clock::ClockEngine;
pub use command::Command;

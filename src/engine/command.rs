//! Commands the presentation shell can issue.

use serde::{Deserialize, Serialize};

use crate::core::ClockConfig;

/// A discrete, user-triggered command.
///
/// The one-second timing signal is not a command; it reaches the engine
/// through `ClockEngine::tick`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Load a new game.
    Initialize(ClockConfig),
    /// Start (or resume) the active player's clock.
    Start,
    /// Suspend counting.
    Pause,
    /// Start when stopped, pause when running.
    TogglePause,
    /// End the active player's turn.
    AdvanceTurn,
    /// Discard the game.
    Reset,
}

impl Command {
    /// Short human-readable name, used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::Initialize(_) => "initialize",
            Command::Start => "start",
            Command::Pause => "pause",
            Command::TogglePause => "toggle pause",
            Command::AdvanceTurn => "advance turn",
            Command::Reset => "reset",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

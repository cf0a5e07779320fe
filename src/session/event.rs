//! Clock events and the session history.
//!
//! Events are derived by comparing the state before and after a transition,
//! so the engine stays a plain state-to-state function.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ClockMode, ClockState, PlayerId};

/// Events produced by a single command or tick. Rarely more than three.
pub type Events = SmallVec<[ClockEvent; 4]>;

/// Something observable that happened to the clock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockEvent {
    /// A game was loaded.
    Initialized { player_count: usize },
    /// The active player's clock started (or resumed) without a turn change.
    Started { player: PlayerId },
    /// Counting was suspended.
    Paused,
    /// The turn moved from one player to another.
    TurnPassed { from: PlayerId, to: PlayerId },
    /// A budget reached zero.
    TimeExpired { player: PlayerId },
    /// A player dropped out of the rotation.
    PlayerEliminated { player: PlayerId },
    /// No eligible player remains.
    GameOver,
    /// The game was discarded.
    Reset,
}

impl ClockEvent {
    /// Events implied by the change from `before` to `after`.
    ///
    /// Load and reset are not detected here; the session knows which command
    /// it ran and records those itself.
    #[must_use]
    pub fn between(before: &ClockState, after: &ClockState) -> Events {
        let mut events = Events::new();
        if before.player_count() != after.player_count() {
            return events;
        }

        for (old, new) in before.players().iter().zip(after.players()) {
            if old.time_left_seconds > 0 && new.time_left_seconds == 0 {
                events.push(ClockEvent::TimeExpired { player: new.id });
            }
            if !old.is_out && new.is_out {
                events.push(ClockEvent::PlayerEliminated { player: new.id });
            }
        }

        let from = before.active_player().map(|p| p.id);
        let to = after.active_player().map(|p| p.id);
        match (from, to) {
            (Some(from), Some(to)) if from != to => {
                events.push(ClockEvent::TurnPassed { from, to });
            }
            (_, Some(player))
                if after.mode() == ClockMode::Running && before.mode() != ClockMode::Running =>
            {
                events.push(ClockEvent::Started { player });
            }
            _ => {}
        }

        if before.mode() == ClockMode::Running && after.mode() == ClockMode::Paused {
            events.push(ClockEvent::Paused);
        }
        if after.is_terminal() && !before.is_terminal() {
            events.push(ClockEvent::GameOver);
        }

        events
    }
}

impl std::fmt::Display for ClockEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClockEvent::Initialized { player_count } => write!(f, "game set up for {player_count} players"),
            ClockEvent::Started { player } => write!(f, "{player}'s clock running"),
            ClockEvent::Paused => f.write_str("paused"),
            ClockEvent::TurnPassed { from, to } => write!(f, "{from} -> {to}"),
            ClockEvent::TimeExpired { player } => write!(f, "{player} ran out of time"),
            ClockEvent::PlayerEliminated { player } => write!(f, "{player} is out"),
            ClockEvent::GameOver => f.write_str("game over"),
            ClockEvent::Reset => f.write_str("reset"),
        }
    }
}

/// An event with its position in the session history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Monotonic across the whole session, including resets.
    pub sequence: u64,

    /// What happened.
    pub event: ClockEvent,
}

impl EventRecord {
    /// Create a new event record.
    #[must_use]
    pub fn new(sequence: u64, event: ClockEvent) -> Self {
        Self { sequence, event }
    }
}

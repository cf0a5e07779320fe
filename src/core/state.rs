//! Clock state: players, mode, and fixed game configuration.
//!
//! ## ClockState
//!
//! Owned by the engine. Readers get accessors and snapshots; every change
//! goes through a `ClockEngine` transition, which builds a new state from the
//! old one using the crate-private `with_*` helpers.
//!
//! ## ClockSnapshot
//!
//! The read-only view handed to the presentation shell after every command
//! and tick.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::{ValidatedConfig, MAX_PLAYERS};
use super::player::{Player, PlayerId};

/// Player storage. Games never exceed `MAX_PLAYERS`, so this stays inline.
pub type Players = SmallVec<[Player; MAX_PLAYERS]>;

/// Lifecycle mode of the clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClockMode {
    /// No game loaded.
    #[default]
    Uninitialized,
    /// Game loaded, clock not started yet.
    Ready,
    /// The active player's clock is counting down.
    Running,
    /// Counting suspended; the active player keeps the turn.
    Paused,
    /// No eligible player remains.
    Terminal,
}

impl ClockMode {
    /// Check if the mode has a turn in progress (`Running` or `Paused`).
    #[must_use]
    pub fn has_turn(self) -> bool {
        matches!(self, ClockMode::Running | ClockMode::Paused)
    }
}

impl std::fmt::Display for ClockMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClockMode::Uninitialized => "uninitialized",
            ClockMode::Ready => "ready",
            ClockMode::Running => "running",
            ClockMode::Paused => "paused",
            ClockMode::Terminal => "terminal",
        };
        f.write_str(name)
    }
}

/// Complete clock state.
///
/// ## Invariants
///
/// - At most one player is active; exactly one while `Running`/`Paused`
///   with an eligible player left.
/// - `is_out` is never set unless `elimination_mode` is on.
/// - Player ids and ordering are fixed once initialized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClockState {
    mode: ClockMode,
    elimination_mode: bool,
    increment_seconds: u32,
    initial_seconds_per_player: u32,
    players: Players,
}

impl ClockState {
    /// A fresh state with no game loaded.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// Build the `Ready` state for a validated configuration.
    ///
    /// Player 1 holds the turn.
    pub(crate) fn ready(config: &ValidatedConfig) -> Self {
        let players = PlayerId::all(config.player_count)
            .map(|id| {
                let mut player = Player::new(id, config.seconds_per_player);
                player.is_active = id.index() == 0;
                player
            })
            .collect();

        Self {
            mode: ClockMode::Ready,
            elimination_mode: config.elimination_mode,
            increment_seconds: config.increment_seconds,
            initial_seconds_per_player: config.seconds_per_player,
            players,
        }
    }

    /// Same state with a different mode.
    #[must_use]
    pub(crate) fn with_mode(mut self, mode: ClockMode) -> Self {
        self.mode = mode;
        self
    }

    /// Same state after `update` has been applied to the player list.
    ///
    /// The closure may change budgets and flags but not the list itself.
    #[must_use]
    pub(crate) fn with_players(mut self, update: impl FnOnce(&mut [Player])) -> Self {
        update(&mut self.players);
        self
    }

    // === Configuration ===

    /// Get the current mode.
    #[must_use]
    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Whether expired players drop out of the rotation.
    #[must_use]
    pub fn elimination_mode(&self) -> bool {
        self.elimination_mode
    }

    /// Seconds added when a turn ends with time left.
    #[must_use]
    pub fn increment_seconds(&self) -> u32 {
        self.increment_seconds
    }

    /// Starting budget, also the refill in non-elimination play.
    #[must_use]
    pub fn initial_seconds_per_player(&self) -> u32 {
        self.initial_seconds_per_player
    }

    /// Check if the game has ended.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.mode == ClockMode::Terminal
    }

    // === Players ===

    /// Get the number of players (0 when uninitialized).
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// All players in turn order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Seat index of the active player, if any.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.players.iter().position(|p| p.is_active)
    }

    /// The active player, if any.
    #[must_use]
    pub fn active_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_active)
    }

    /// Check if the player at `index` may take a turn.
    #[must_use]
    pub fn is_eligible(&self, index: usize) -> bool {
        self.players
            .get(index)
            .is_some_and(|p| !self.elimination_mode || !p.is_out)
    }

    /// Number of players still in the rotation.
    #[must_use]
    pub fn eligible_count(&self) -> usize {
        (0..self.players.len()).filter(|&i| self.is_eligible(i)).count()
    }

    /// Take a read-only snapshot for the presentation shell.
    #[must_use]
    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            mode: self.mode,
            elimination_mode: self.elimination_mode,
            players: self.players.clone(),
        }
    }
}

/// Read-only view of the clock, produced after every command and tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub mode: ClockMode,
    pub elimination_mode: bool,
    pub players: Players,
}

impl ClockSnapshot {
    /// The active player, if any.
    #[must_use]
    pub fn active_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_active)
    }
}

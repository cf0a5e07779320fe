//! Player identification and per-player clock data.
//!
//! ## PlayerId
//!
//! Type-safe player identifier. Ids are 1-based (`Player 1` moves first) and
//! double as the player's seat in round-robin order.
//!
//! ## Player
//!
//! One clock: remaining budget plus the active/eliminated flags.

use serde::{Deserialize, Serialize};

/// Player identifier, 1-based.
///
/// `PlayerId::new(1)` is the first player in turn order. Valid ids are
/// `1..=255`; seat arithmetic saturates at both ends instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw 1-based id.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Create the player ID for a 0-based seat index.
    ///
    /// Seats past 254 map to id 255.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u8::try_from(index.saturating_add(1)).unwrap_or(u8::MAX))
    }

    /// Get the 0-based seat index. Id 0 maps to seat 0.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use turn_clock::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[0], PlayerId::new(1));
    /// assert_eq!(players[3], PlayerId::new(4));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count).map(PlayerId::from_index)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A single player's clock.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier, also the seat in turn order.
    pub id: PlayerId,

    /// Remaining budget. Zero means expired, never negative.
    pub time_left_seconds: u32,

    /// Whether this player's clock is the one counting down.
    pub is_active: bool,

    /// Eliminated in elimination mode.
    pub is_out: bool,
}

impl Player {
    /// Create an inactive, non-eliminated player with a full budget.
    #[must_use]
    pub fn new(id: PlayerId, time_left_seconds: u32) -> Self {
        Self {
            id,
            time_left_seconds,
            is_active: false,
            is_out: false,
        }
    }

    /// Check if the player's budget is used up.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.time_left_seconds == 0
    }
}

//! Clock configuration.
//!
//! The shell supplies a `ClockConfig` before `initialize`. Values are kept
//! signed, as entered by the user, so that negative input can be rejected
//! with a proper `InvalidConfig` rather than wrapping silently.
//!
//! `validate()` turns a config into a `ValidatedConfig` carrying the
//! unsigned budgets the state machine works with.

use serde::{Deserialize, Serialize};

use super::error::{ClockError, ConfigViolation, Result};

/// Fewest players a game can have.
pub const MIN_PLAYERS: usize = 2;

/// Most players a game can have.
pub const MAX_PLAYERS: usize = 6;

/// Environment variable for the player count.
pub const ENV_PLAYERS: &str = "TURN_CLOCK_PLAYERS";

/// Environment variable for the per-player budget in seconds.
pub const ENV_SECONDS: &str = "TURN_CLOCK_SECONDS";

/// Environment variable for the increment in seconds.
pub const ENV_INCREMENT: &str = "TURN_CLOCK_INCREMENT";

/// Environment variable for the elimination flag.
pub const ENV_ELIMINATION: &str = "TURN_CLOCK_ELIMINATION";

/// Game configuration as supplied by the shell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Number of players (2-6).
    pub player_count: usize,

    /// Starting budget for every player.
    pub seconds_per_player: i64,

    /// Seconds added to a player's clock when they end their turn with time
    /// remaining.
    pub increment_seconds: i64,

    /// Whether expired players drop out of the rotation.
    pub elimination_mode: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            seconds_per_player: 300,
            increment_seconds: 5,
            elimination_mode: false,
        }
    }
}

impl ClockConfig {
    /// Create a config for `player_count` players with default timing.
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Set the starting budget.
    #[must_use]
    pub fn with_seconds_per_player(mut self, seconds: i64) -> Self {
        self.seconds_per_player = seconds;
        self
    }

    /// Set the increment.
    #[must_use]
    pub fn with_increment(mut self, seconds: i64) -> Self {
        self.increment_seconds = seconds;
        self
    }

    /// Enable or disable elimination mode.
    #[must_use]
    pub fn with_elimination(mut self, enabled: bool) -> Self {
        self.elimination_mode = enabled;
        self
    }

    /// Check every field, producing the unsigned form the engine uses.
    ///
    /// ```
    /// use turn_clock::core::ClockConfig;
    ///
    /// assert!(ClockConfig::new(3).validate().is_ok());
    /// assert!(ClockConfig::new(7).validate().is_err());
    /// assert!(ClockConfig::new(2).with_increment(-1).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<ValidatedConfig> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigViolation::PlayerCount {
                count: self.player_count,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            }
            .into());
        }
        if self.seconds_per_player < 0 {
            return Err(ConfigViolation::NegativeSeconds(self.seconds_per_player).into());
        }
        if self.increment_seconds < 0 {
            return Err(ConfigViolation::NegativeIncrement(self.increment_seconds).into());
        }

        Ok(ValidatedConfig {
            player_count: self.player_count,
            seconds_per_player: to_seconds("seconds per player", self.seconds_per_player)?,
            increment_seconds: to_seconds("increment", self.increment_seconds)?,
            elimination_mode: self.elimination_mode,
        })
    }

    /// Read a config from `TURN_CLOCK_*` environment variables.
    ///
    /// Unset variables fall back to the defaults. Values that do not parse
    /// are reported as `InvalidEnv`; range checks are left to `validate`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            player_count: parse_var(&lookup, ENV_PLAYERS)?.unwrap_or(defaults.player_count),
            seconds_per_player: parse_var(&lookup, ENV_SECONDS)?
                .unwrap_or(defaults.seconds_per_player),
            increment_seconds: parse_var(&lookup, ENV_INCREMENT)?
                .unwrap_or(defaults.increment_seconds),
            elimination_mode: parse_flag(&lookup, ENV_ELIMINATION)?
                .unwrap_or(defaults.elimination_mode),
        })
    }
}

/// A configuration that passed `ClockConfig::validate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedConfig {
    pub player_count: usize,
    pub seconds_per_player: u32,
    pub increment_seconds: u32,
    pub elimination_mode: bool,
}

fn to_seconds(field: &'static str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| ConfigViolation::TooLarge { field, value }.into())
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ClockError::InvalidEnv { var, value: raw })
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, var: &'static str) -> Result<Option<bool>> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ClockError::InvalidEnv { var, value: raw }),
    }
}

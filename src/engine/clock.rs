//! Turn/time transition rules.
//!
//! Every function takes the current state by reference and returns the next
//! one. Nothing here knows about wall-clock time: `tick` is "one second
//! elapsed", delivered by whoever drives the clock.
//!
//! ## Strict and lenient transitions
//!
//! `try_start`, `try_pause` and `try_advance_turn` report an
//! `InvalidTransition` when the mode cannot honor the command. `start`,
//! `pause` and `advance_turn` log the rejection and hand back the state
//! unchanged, since the shell is expected to gate its controls by mode.

use tracing::{debug, info, trace};

use crate::core::{ClockConfig, ClockError, ClockMode, ClockState, Player, Result};

use super::command::Command;

/// The clock state machine.
///
/// ```
/// use turn_clock::core::{ClockConfig, ClockMode, PlayerId};
/// use turn_clock::engine::ClockEngine;
///
/// let config = ClockConfig::new(3).with_seconds_per_player(10).with_increment(5);
/// let state = ClockEngine::initialize(&config).unwrap();
/// let state = ClockEngine::start(&state);
/// let state = ClockEngine::tick(&state);
/// let state = ClockEngine::advance_turn(&state);
///
/// assert_eq!(state.mode(), ClockMode::Running);
/// assert_eq!(state.player(PlayerId::new(1)).unwrap().time_left_seconds, 14);
/// assert_eq!(state.active_player().unwrap().id, PlayerId::new(2));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ClockEngine;

impl ClockEngine {
    /// Load a game from `config`.
    ///
    /// Produces a `Ready` state with player 1 holding the turn. Fails with
    /// `InvalidConfig` without touching anything else.
    pub fn initialize(config: &ClockConfig) -> Result<ClockState> {
        let validated = config.validate()?;
        info!(
            players = validated.player_count,
            seconds = validated.seconds_per_player,
            increment = validated.increment_seconds,
            elimination = validated.elimination_mode,
            "clock initialized"
        );
        Ok(ClockState::ready(&validated))
    }

    /// Start the active player's clock.
    ///
    /// Valid from `Ready` or `Paused` while the active player is still in
    /// the rotation.
    pub fn try_start(state: &ClockState) -> Result<ClockState> {
        let startable = matches!(state.mode(), ClockMode::Ready | ClockMode::Paused)
            && state.active_index().is_some_and(|i| state.is_eligible(i));
        if !startable {
            return Err(rejected("start", state));
        }
        Ok(state.clone().with_mode(ClockMode::Running))
    }

    /// Lenient form of [`ClockEngine::try_start`].
    #[must_use]
    pub fn start(state: &ClockState) -> ClockState {
        or_unchanged(state, Self::try_start(state))
    }

    /// Suspend counting. Only `Running` can be paused.
    pub fn try_pause(state: &ClockState) -> Result<ClockState> {
        if state.mode() != ClockMode::Running {
            return Err(rejected("pause", state));
        }
        Ok(state.clone().with_mode(ClockMode::Paused))
    }

    /// Lenient form of [`ClockEngine::try_pause`]. Safe to call repeatedly.
    #[must_use]
    pub fn pause(state: &ClockState) -> ClockState {
        or_unchanged(state, Self::try_pause(state))
    }

    /// Pause when running, start otherwise.
    #[must_use]
    pub fn toggle(state: &ClockState) -> ClockState {
        if state.mode() == ClockMode::Running {
            Self::pause(state)
        } else {
            Self::start(state)
        }
    }

    /// One second elapsed.
    ///
    /// Takes a second off the active player, never going below zero. The
    /// tick that brings a budget to zero pauses the clock and, in
    /// elimination mode, knocks the player out. Later ticks at zero change
    /// nothing.
    #[must_use]
    pub fn tick(state: &ClockState) -> ClockState {
        if state.mode() != ClockMode::Running {
            trace!(mode = %state.mode(), "tick ignored");
            return state.clone();
        }
        let Some(index) = state.active_index() else {
            debug!("tick with no active player");
            return state.clone();
        };

        let before = state.players()[index].time_left_seconds;
        let after = before.saturating_sub(1);
        let expired_now = before > 0 && after == 0;
        let eliminate = expired_now && state.elimination_mode();

        let next = state.clone().with_players(|players| {
            let player = &mut players[index];
            player.time_left_seconds = after;
            if eliminate {
                player.is_out = true;
            }
        });

        if expired_now {
            let id = next.players()[index].id;
            info!(player = %id, eliminated = eliminate, "time expired");
            next.with_mode(ClockMode::Paused)
        } else {
            next
        }
    }

    /// End the active player's turn and hand it to the next eligible player.
    ///
    /// The outgoing player gains the increment if they still have time. With
    /// an empty clock they get a fresh budget, unless elimination mode is on,
    /// in which case they stay at zero. This applies to whoever leaves the
    /// active slot, which is not necessarily the player who was just
    /// eliminated.
    ///
    /// If nobody else is eligible the game becomes `Terminal` with no active
    /// player. Otherwise the next player's clock starts running.
    pub fn try_advance_turn(state: &ClockState) -> Result<ClockState> {
        if !state.mode().has_turn() {
            return Err(rejected("advance turn", state));
        }
        let Some(current) = state.active_index() else {
            return Err(rejected("advance turn", state));
        };

        let increment = state.increment_seconds();
        let refill = state.initial_seconds_per_player();
        let elimination = state.elimination_mode();

        let next = state.clone().with_players(|players| {
            let player = &mut players[current];
            settle_outgoing(player, increment, refill, elimination);
            player.is_active = false;
        });

        let from = next.players()[current].id;
        match next_eligible(&next, current) {
            Some(j) => {
                let to = next.players()[j].id;
                debug!(%from, %to, "turn passed");
                Ok(next
                    .with_players(|players| players[j].is_active = true)
                    .with_mode(ClockMode::Running))
            }
            None => {
                info!(last = %from, "no eligible players remain");
                Ok(next.with_mode(ClockMode::Terminal))
            }
        }
    }

    /// Lenient form of [`ClockEngine::try_advance_turn`].
    #[must_use]
    pub fn advance_turn(state: &ClockState) -> ClockState {
        or_unchanged(state, Self::try_advance_turn(state))
    }

    /// Discard the game. Valid from any mode.
    #[must_use]
    pub fn reset(state: &ClockState) -> ClockState {
        debug!(mode = %state.mode(), "clock reset");
        ClockState::uninitialized()
    }

    /// Apply a shell command.
    ///
    /// Only `Initialize` can fail: on a bad config, or when a game is
    /// already running (configuration is fixed until `Reset`).
    pub fn apply(state: &ClockState, command: &Command) -> Result<ClockState> {
        match command {
            Command::Initialize(config) => {
                if !matches!(state.mode(), ClockMode::Uninitialized | ClockMode::Ready) {
                    return Err(rejected(command.name(), state));
                }
                Self::initialize(config)
            }
            Command::Start => Ok(Self::start(state)),
            Command::Pause => Ok(Self::pause(state)),
            Command::TogglePause => Ok(Self::toggle(state)),
            Command::AdvanceTurn => Ok(Self::advance_turn(state)),
            Command::Reset => Ok(Self::reset(state)),
        }
    }
}

/// Increment/refill policy for the player leaving the active slot.
fn settle_outgoing(player: &mut Player, increment: u32, refill: u32, elimination: bool) {
    if player.time_left_seconds > 0 {
        player.time_left_seconds = player.time_left_seconds.saturating_add(increment);
    } else if !elimination {
        player.time_left_seconds = refill;
    }
}

/// Forward scan from `current`, wrapping, bounded to one full round.
///
/// `current` itself only qualifies in a one-player game.
fn next_eligible(state: &ClockState, current: usize) -> Option<usize> {
    let n = state.player_count();
    (1..=n)
        .map(|step| (current + step) % n)
        .find(|&j| (j != current || n == 1) && state.is_eligible(j))
}

fn rejected(command: &'static str, state: &ClockState) -> ClockError {
    ClockError::InvalidTransition {
        command,
        mode: state.mode(),
    }
}

fn or_unchanged(state: &ClockState, result: Result<ClockState>) -> ClockState {
    result.unwrap_or_else(|err| {
        debug!(%err, "command ignored");
        state.clone()
    })
}

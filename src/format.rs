//! Display helpers for the presentation shell.
//!
//! Formatting carries no game logic, but it is where the zero boundary
//! becomes visible: a budget of zero is shown as a label, never as `00:00`
//! or a negative time.

use crate::core::Player;

/// Label for an eliminated player.
pub const OUT_LABEL: &str = "Out";

/// Label for a player whose budget is used up but who is still in the game.
pub const LOST_LABEL: &str = "Lost";

/// Render seconds as zero-padded `MM:SS`.
///
/// Minutes are not capped, so long budgets read `125:00`.
///
/// ```
/// use turn_clock::format::format_clock;
///
/// assert_eq!(format_clock(300), "05:00");
/// assert_eq!(format_clock(61), "01:01");
/// ```
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// What a player's clock face should show.
#[must_use]
pub fn remaining_label(player: &Player) -> String {
    if player.is_out {
        OUT_LABEL.to_string()
    } else if player.is_expired() {
        LOST_LABEL.to_string()
    } else {
        format_clock(player.time_left_seconds)
    }
}

/// Describe a configured budget, e.g. `5min 0s`.
#[must_use]
pub fn describe_budget(seconds: u32) -> String {
    format!("{}min {}s", seconds / 60, seconds % 60)
}

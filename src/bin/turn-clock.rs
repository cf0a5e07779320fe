//! Terminal driver for the clock.
//!
//! The game config comes from the `TURN_CLOCK_*` environment variables.
//! Commands are read from stdin, one per line:
//!
//! - empty line, `n`, `next`: end the current turn
//! - `p`, `toggle`: play/pause
//! - `start`, `pause`, `reset`
//! - `init`: set up a new game with the same config (after `reset`)
//! - `q`, `quit`
//!
//! Set `RUST_LOG=turn_clock=debug` to see rejected commands.

use std::io::BufRead;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use turn_clock::format::{describe_budget, remaining_label};
use turn_clock::{
    ClockConfig, ClockEvent, ClockSession, ClockSnapshot, Command, IntervalTicker, SessionInput,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match ClockConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("turn-clock: {err}");
            std::process::exit(2);
        }
    };

    let (inputs, mut queue) = mpsc::unbounded_channel();
    let mut session = ClockSession::new(IntervalTicker::every_second(Handle::current(), inputs.clone()));
    session.subscribe(render);

    if let Err(err) = session.handle(&Command::Initialize(config.clone())) {
        eprintln!("turn-clock: {err}");
        std::process::exit(2);
    }
    println!(
        "{} players, {} each, +{}s increment, elimination {}",
        config.player_count,
        describe_budget(session.state().initial_seconds_per_player()),
        session.state().increment_seconds(),
        if config.elimination_mode { "on" } else { "off" },
    );

    // Stdin is blocking; read it off the runtime.
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let Some(input) = parse_line(&line, &config) else {
                eprintln!("unknown command: {}", line.trim());
                continue;
            };
            let quit = matches!(input, SessionInput::Shutdown);
            if inputs.send(input).is_err() || quit {
                return;
            }
        }
        if inputs.send(SessionInput::Shutdown).is_err() {
            warn!("session stopped before stdin closed");
        }
    });

    session.run(&mut queue).await;
}

fn parse_line(line: &str, config: &ClockConfig) -> Option<SessionInput> {
    let command = match line.trim().to_ascii_lowercase().as_str() {
        "" | "n" | "next" => Command::AdvanceTurn,
        "p" | "toggle" => Command::TogglePause,
        "start" => Command::Start,
        "pause" => Command::Pause,
        "reset" => Command::Reset,
        "init" => Command::Initialize(config.clone()),
        "q" | "quit" => return Some(SessionInput::Shutdown),
        _ => return None,
    };
    Some(SessionInput::Command(command))
}

fn render(snapshot: &ClockSnapshot, events: &[ClockEvent]) {
    for event in events {
        println!("* {event}");
    }

    let clocks: Vec<String> = snapshot
        .players
        .iter()
        .map(|player| {
            let marker = if player.is_active { ">" } else { " " };
            format!("{marker}P{} {}", player.id.get(), remaining_label(player))
        })
        .collect();
    println!("[{}] {}", snapshot.mode, clocks.join(" | "));
}

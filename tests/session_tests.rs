//! Session integration tests.
//!
//! These drive `ClockSession` the way a shell would: through commands, a
//! tick source and observers, and through the channel-based run loop.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use turn_clock::core::{ClockConfig, ClockMode, ClockSnapshot, PlayerId};
use turn_clock::engine::Command;
use turn_clock::format::remaining_label;
use turn_clock::session::{
    ClockEvent, ClockSession, IntervalTicker, ManualTicks, SessionInput, TickSource,
};

type Seen = Rc<RefCell<Vec<(ClockSnapshot, Vec<ClockEvent>)>>>;

fn observed_session() -> (ClockSession<ManualTicks>, Seen) {
    let seen: Seen = Rc::default();
    let mut session = ClockSession::new(ManualTicks::new());
    let sink = Rc::clone(&seen);
    session.subscribe(move |snapshot: &ClockSnapshot, events: &[ClockEvent]| {
        sink.borrow_mut().push((snapshot.clone(), events.to_vec()));
    });
    (session, seen)
}

// =============================================================================
// Observers
// =============================================================================

/// Test that every command and every applied tick publishes one snapshot.
#[test]
fn test_snapshot_per_command_and_tick() {
    let (mut session, seen) = observed_session();

    session
        .handle(&Command::Initialize(ClockConfig::new(2).with_seconds_per_player(5)))
        .unwrap();
    session.handle(&Command::Start).unwrap();
    session.tick();
    session.tick();
    session.handle(&Command::Pause).unwrap();
    // Repeated pause is a no-op but still a command.
    session.handle(&Command::Pause).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 6);
    assert_eq!(seen[3].0.players[0].time_left_seconds, 3);
    assert_eq!(seen[4].0.mode, ClockMode::Paused);
    assert!(seen[5].1.is_empty());
}

/// Test that dropped ticks publish nothing.
#[test]
fn test_stale_ticks_not_published() {
    let (mut session, seen) = observed_session();
    session.handle(&Command::Initialize(ClockConfig::new(3))).unwrap();

    session.tick();
    session.tick();

    assert_eq!(seen.borrow().len(), 1);
}

/// Test that a rejected initialize publishes nothing.
#[test]
fn test_rejected_command_not_published() {
    let (mut session, seen) = observed_session();
    assert!(session.handle(&Command::Initialize(ClockConfig::new(1))).is_err());
    assert!(seen.borrow().is_empty());
}

/// Test that observers see expiry events alongside the paused snapshot.
#[test]
fn test_observer_sees_expiry() {
    let (mut session, seen) = observed_session();
    session
        .handle(&Command::Initialize(
            ClockConfig::new(2)
                .with_seconds_per_player(1)
                .with_elimination(true),
        ))
        .unwrap();
    session.handle(&Command::Start).unwrap();
    session.tick();

    let seen = seen.borrow();
    let (snapshot, events) = seen.last().unwrap();
    assert_eq!(snapshot.mode, ClockMode::Paused);
    assert_eq!(remaining_label(&snapshot.players[0]), "Out");
    assert!(events.contains(&ClockEvent::PlayerEliminated { player: PlayerId::new(1) }));
}

// =============================================================================
// Run loop
// =============================================================================

/// Test that the run loop applies queued inputs in order and stops on shutdown.
#[tokio::test]
async fn test_run_applies_queue_in_order() {
    let mut session = ClockSession::new(ManualTicks::new());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let config = ClockConfig::new(3).with_seconds_per_player(10).with_increment(5);
    tx.send(SessionInput::Command(Command::Initialize(config))).unwrap();
    tx.send(SessionInput::Command(Command::Start)).unwrap();
    // The first arm is generation 1.
    tx.send(SessionInput::Tick { generation: 1 }).unwrap();
    tx.send(SessionInput::Tick { generation: 1 }).unwrap();
    tx.send(SessionInput::Command(Command::AdvanceTurn)).unwrap();
    tx.send(SessionInput::Shutdown).unwrap();
    tx.send(SessionInput::Command(Command::Reset)).unwrap();

    let processed = session.run(&mut rx).await;

    assert_eq!(processed, 6);
    let state = session.state();
    assert_eq!(state.mode(), ClockMode::Running);
    assert_eq!(state.player(PlayerId::new(1)).unwrap().time_left_seconds, 13);
    assert_eq!(state.active_player().unwrap().id, PlayerId::new(2));
}

/// Test that a tick queued behind a pause is dropped.
#[tokio::test]
async fn test_run_drops_tick_after_pause() {
    let mut session = ClockSession::new(ManualTicks::new());
    let (tx, mut rx) = mpsc::unbounded_channel();

    tx.send(SessionInput::Command(Command::Initialize(ClockConfig::new(2).with_seconds_per_player(10))))
        .unwrap();
    tx.send(SessionInput::Command(Command::Start)).unwrap();
    tx.send(SessionInput::Command(Command::Pause)).unwrap();
    tx.send(SessionInput::Tick { generation: 1 }).unwrap();
    drop(tx);

    assert_eq!(session.run(&mut rx).await, 4);
    assert_eq!(session.state().players()[0].time_left_seconds, 10);
}

/// Test that a tick sent before a pause is not applied after the resume.
#[tokio::test]
async fn test_run_drops_tick_from_before_resume() {
    let mut session = ClockSession::new(ManualTicks::new());
    let (tx, mut rx) = mpsc::unbounded_channel();

    tx.send(SessionInput::Command(Command::Initialize(ClockConfig::new(2).with_seconds_per_player(10))))
        .unwrap();
    tx.send(SessionInput::Command(Command::Start)).unwrap();
    tx.send(SessionInput::Command(Command::Pause)).unwrap();
    tx.send(SessionInput::Command(Command::Start)).unwrap();
    // Sent by the first arm before it was cancelled.
    tx.send(SessionInput::Tick { generation: 1 }).unwrap();
    tx.send(SessionInput::Tick { generation: 2 }).unwrap();
    drop(tx);

    assert_eq!(session.run(&mut rx).await, 6);
    assert_eq!(session.state().mode(), ClockMode::Running);
    assert_eq!(session.state().players()[0].time_left_seconds, 9);
}

/// Test that rejected commands in the queue do not stop the loop.
#[tokio::test]
async fn test_run_skips_rejected_commands() {
    let mut session = ClockSession::new(ManualTicks::new());
    let (tx, mut rx) = mpsc::unbounded_channel();

    tx.send(SessionInput::Command(Command::Initialize(ClockConfig::new(9)))).unwrap();
    tx.send(SessionInput::Command(Command::Initialize(ClockConfig::new(4)))).unwrap();
    drop(tx);

    session.run(&mut rx).await;
    assert_eq!(session.state().player_count(), 4);
}

// =============================================================================
// Real timer
// =============================================================================

/// Test the session against a real interval ticker on paused tokio time.
#[tokio::test(start_paused = true)]
async fn test_interval_ticker_drives_session() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = ClockSession::new(IntervalTicker::every_second(Handle::current(), tx));

    session
        .handle(&Command::Initialize(
            ClockConfig::new(2)
                .with_seconds_per_player(3)
                .with_elimination(true),
        ))
        .unwrap();
    session.handle(&Command::Start).unwrap();
    assert!(session.ticks().is_armed());

    // Three ticks expire player 1, which pauses the clock and disarms the ticker.
    while session.state().mode() == ClockMode::Running {
        let input = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match input {
            SessionInput::Tick { generation } => {
                session.timer_tick(generation);
            }
            other => panic!("unexpected input {other:?}"),
        }
    }

    assert_eq!(session.state().mode(), ClockMode::Paused);
    assert!(!session.ticks().is_armed());
    assert!(session.state().players()[0].is_out);
    assert_eq!(session.state().players()[1].time_left_seconds, 3);
}

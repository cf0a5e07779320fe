//! Single-writer session around one clock.
//!
//! `ClockSession` owns the only `ClockState` and is the only thing that
//! replaces it. Commands and ticks are applied one at a time through
//! `&mut self`; `run` does the same for a channel of [`SessionInput`], which
//! makes the channel the mutation queue when a tick task and a UI both feed
//! the clock.
//!
//! After every applied command or tick the session:
//! 1. re-syncs its [`TickSource`] (armed exactly while `Running`),
//! 2. records the resulting [`ClockEvent`]s in its history,
//! 3. pushes a [`ClockSnapshot`] to every observer.
//!
//! ## Example
//!
//! ```
//! use turn_clock::core::{ClockConfig, ClockMode};
//! use turn_clock::engine::Command;
//! use turn_clock::session::{ClockSession, ManualTicks, TickSource};
//!
//! let mut session = ClockSession::new(ManualTicks::new());
//! session.handle(&Command::Initialize(ClockConfig::new(2))).unwrap();
//! session.handle(&Command::Start).unwrap();
//! assert!(session.ticks().is_armed());
//!
//! session.handle(&Command::Pause).unwrap();
//! assert_eq!(session.state().mode(), ClockMode::Paused);
//! assert!(!session.ticks().is_armed());
//! ```

mod event;
mod ticker;

pub use event::{ClockEvent, EventRecord, Events};
pub use ticker::{IntervalTicker, ManualTicks, TickSource};

use im::Vector;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, trace, warn};

use crate::core::{ClockMode, ClockSnapshot, ClockState, Result};
use crate::engine::{ClockEngine, Command};

/// Input accepted by [`ClockSession::run`].
#[derive(Clone, Debug)]
pub enum SessionInput {
    /// A shell command.
    Command(Command),
    /// One second elapsed, as seen by the timer armed with `generation`.
    Tick { generation: u64 },
    /// Stop the run loop.
    Shutdown,
}

/// Receives a snapshot after every applied command or tick.
pub trait SnapshotObserver {
    /// Called with the new snapshot and the events that led to it.
    fn on_snapshot(&mut self, snapshot: &ClockSnapshot, events: &[ClockEvent]);
}

impl<F> SnapshotObserver for F
where
    F: FnMut(&ClockSnapshot, &[ClockEvent]),
{
    fn on_snapshot(&mut self, snapshot: &ClockSnapshot, events: &[ClockEvent]) {
        self(snapshot, events)
    }
}

/// The owner of one clock.
pub struct ClockSession<T: TickSource> {
    state: ClockState,
    ticks: T,
    history: Vector<EventRecord>,
    next_sequence: u64,
    generation: u64,
    observers: Vec<Box<dyn SnapshotObserver>>,
}

impl<T: TickSource> ClockSession<T> {
    /// Create a session with no game loaded. `ticks` is disarmed if needed.
    pub fn new(mut ticks: T) -> Self {
        if ticks.is_armed() {
            ticks.disarm();
        }
        Self {
            state: ClockState::uninitialized(),
            ticks,
            history: Vector::new(),
            next_sequence: 0,
            generation: 0,
            observers: Vec::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &ClockState {
        &self.state
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ClockSnapshot {
        self.state.snapshot()
    }

    /// The timing source.
    #[must_use]
    pub fn ticks(&self) -> &T {
        &self.ticks
    }

    /// Number of times the timer has been armed. Tags the ticks it sends.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Events since the last reset, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<EventRecord> {
        &self.history
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: impl SnapshotObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Apply a command.
    ///
    /// On error nothing changes and no snapshot is published.
    pub fn handle(&mut self, command: &Command) -> Result<&ClockState> {
        let next = ClockEngine::apply(&self.state, command)?;

        // Loading and discarding a game are not clock activity; the old and
        // new budgets are not compared.
        let events = match command {
            Command::Initialize(_) => {
                self.history.clear();
                smallvec::smallvec![ClockEvent::Initialized {
                    player_count: next.player_count(),
                }]
            }
            Command::Reset => {
                self.history.clear();
                smallvec::smallvec![ClockEvent::Reset]
            }
            _ => ClockEvent::between(&self.state, &next),
        };

        self.commit(next, events);
        Ok(&self.state)
    }

    /// Deliver one second.
    ///
    /// A tick that arrives after the clock stopped running (already queued
    /// when the timer was disarmed) is dropped.
    pub fn tick(&mut self) -> &ClockState {
        if self.state.mode() != ClockMode::Running {
            trace!(mode = %self.state.mode(), "stale tick dropped");
            return &self.state;
        }
        let next = ClockEngine::tick(&self.state);
        let events = ClockEvent::between(&self.state, &next);
        self.commit(next, events);
        &self.state
    }

    /// Deliver a tick produced by the timer armed with `generation`.
    ///
    /// Ticks from an earlier arm are dropped, even if the clock has been
    /// resumed since.
    pub fn timer_tick(&mut self, generation: u64) -> &ClockState {
        if generation != self.generation {
            trace!(generation, current = self.generation, "tick from earlier arm dropped");
            return &self.state;
        }
        self.tick()
    }

    /// Apply inputs until the channel closes or `Shutdown` arrives.
    ///
    /// Rejected commands are logged and skipped. Returns the number of
    /// inputs processed.
    pub async fn run(&mut self, inputs: &mut UnboundedReceiver<SessionInput>) -> usize {
        let mut processed = 0;
        while let Some(input) = inputs.recv().await {
            processed += 1;
            match input {
                SessionInput::Command(command) => {
                    if let Err(err) = self.handle(&command) {
                        warn!(%command, %err, "command rejected");
                    }
                }
                SessionInput::Tick { generation } => {
                    self.timer_tick(generation);
                }
                SessionInput::Shutdown => break,
            }
        }
        processed
    }

    fn commit(&mut self, next: ClockState, events: Events) {
        self.state = next;
        self.sync_ticks();

        for event in &events {
            if matches!(event, ClockEvent::GameOver | ClockEvent::PlayerEliminated { .. }) {
                info!(%event, "clock event");
            }
            self.history
                .push_back(EventRecord::new(self.next_sequence, event.clone()));
            self.next_sequence += 1;
        }

        let snapshot = self.state.snapshot();
        for observer in &mut self.observers {
            observer.on_snapshot(&snapshot, &events);
        }
    }

    fn sync_ticks(&mut self) {
        let running = self.state.mode() == ClockMode::Running;
        if running && !self.ticks.is_armed() {
            self.generation += 1;
            self.ticks.arm(self.generation);
        } else if !running && self.ticks.is_armed() {
            self.ticks.disarm();
        }
    }
}

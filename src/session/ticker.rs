//! Timing sources.
//!
//! The engine has no notion of wall-clock time. Something outside it must
//! deliver "one second elapsed" while the clock runs, and stop doing so when
//! it does not. `TickSource` is the session's handle on that something: the
//! session arms it on entry to `Running` and disarms it on exit.
//!
//! Every arm carries a generation number. Ticks are tagged with the
//! generation that produced them, so the session can tell a tick sent before
//! a pause from one sent after the resume.
//!
//! - [`ManualTicks`]: no timer at all; tests feed ticks by hand.
//! - [`IntervalTicker`]: a tokio interval task that pushes
//!   [`SessionInput::Tick`] into the session's input channel.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use super::SessionInput;

/// Control over the external timing driver.
pub trait TickSource {
    /// Begin delivering ticks tagged with `generation`. A fresh period
    /// starts now.
    fn arm(&mut self, generation: u64);

    /// Stop delivering ticks.
    fn disarm(&mut self);

    /// Check if ticks are being delivered.
    fn is_armed(&self) -> bool;
}

/// A tick source that only records what the session asked of it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManualTicks {
    armed: bool,
    /// Generation passed to the most recent arm.
    pub generation: u64,
    /// Number of times the source was armed.
    pub arm_count: u32,
    /// Number of times the source was disarmed.
    pub disarm_count: u32,
}

impl ManualTicks {
    /// Create a disarmed manual source.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickSource for ManualTicks {
    fn arm(&mut self, generation: u64) {
        self.armed = true;
        self.generation = generation;
        self.arm_count += 1;
    }

    fn disarm(&mut self) {
        self.armed = false;
        self.disarm_count += 1;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Sends one tick per `period` while armed, from a task on a tokio runtime.
///
/// Arming spawns an interval task and disarming aborts it, so the first tick
/// after a resume arrives a full period later. A late tick is delayed rather
/// than burst, which keeps the clock from losing several seconds at once
/// after a stall.
pub struct IntervalTicker {
    runtime: Handle,
    period: Duration,
    inputs: UnboundedSender<SessionInput>,
    task: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    /// Create a disarmed ticker that feeds `inputs` from tasks on `runtime`.
    pub fn new(runtime: Handle, period: Duration, inputs: UnboundedSender<SessionInput>) -> Self {
        Self {
            runtime,
            period,
            inputs,
            task: None,
        }
    }

    /// A ticker with the standard one-second period.
    pub fn every_second(runtime: Handle, inputs: UnboundedSender<SessionInput>) -> Self {
        Self::new(runtime, Duration::from_secs(1), inputs)
    }

    fn stop_task(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if task.is_finished() {
            warn!("tick task ended while armed; ticks were lost");
        }
        task.abort();
    }
}

async fn deliver_ticks(period: Duration, generation: u64, inputs: UnboundedSender<SessionInput>) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        trace!(generation, "tick");
        if inputs.send(SessionInput::Tick { generation }).is_err() {
            debug!("session gone, tick task exiting");
            return;
        }
    }
}

impl TickSource for IntervalTicker {
    fn arm(&mut self, generation: u64) {
        self.stop_task();
        let task = deliver_ticks(self.period, generation, self.inputs.clone());
        self.task = Some(self.runtime.spawn(task));
    }

    fn disarm(&mut self) {
        self.stop_task();
    }

    fn is_armed(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_manual_ticks() {
        let mut ticks = ManualTicks::new();
        assert!(!ticks.is_armed());

        ticks.arm(7);
        assert!(ticks.is_armed());
        assert_eq!(ticks.generation, 7);
        ticks.disarm();
        assert!(!ticks.is_armed());

        assert_eq!(ticks.arm_count, 1);
        assert_eq!(ticks.disarm_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_only_ticks_while_armed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::every_second(Handle::current(), tx);

        // Disarmed: nothing arrives.
        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());

        ticker.arm(1);
        assert!(ticker.is_armed());
        for _ in 0..3 {
            let input = rx.recv().await.unwrap();
            assert!(matches!(input, SessionInput::Tick { generation: 1 }));
        }

        ticker.disarm();
        assert!(!ticker.is_armed());
        time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_first_tick_after_full_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::every_second(Handle::current(), tx);

        let armed_at = Instant::now();
        ticker.arm(1);
        rx.recv().await.unwrap();
        assert!(armed_at.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_rearm_tags_new_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::every_second(Handle::current(), tx);

        ticker.arm(1);
        ticker.disarm();
        ticker.arm(2);

        let input = rx.recv().await.unwrap();
        assert!(matches!(input, SessionInput::Tick { generation: 2 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_disarm_after_session_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::every_second(Handle::current(), tx);
        drop(rx);

        ticker.arm(1);
        // The task exits on its first failed send.
        time::sleep(Duration::from_secs(2)).await;
        ticker.disarm();
        assert!(!ticker.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_ticker_stops_on_drop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = IntervalTicker::every_second(Handle::current(), tx);
        ticker.arm(1);
        drop(ticker);

        // The aborted task drops the last sender; the channel closes.
        while rx.recv().await.is_some() {}
        assert!(rx.try_recv().is_err());
    }
}

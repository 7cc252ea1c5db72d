//! Tick sources for the periodic schedulers.
//!
//! Each scheduler owns its own source, so two formations never share a clock.
//! [`IntervalTicker`] follows the wall clock; [`ManualTicker`] is stepped by
//! hand and reports back once the scheduler has finished with each tick.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use invaders_core::constants::STOP_POLL_INTERVAL_MS;

use crate::task::StopSignal;

/// Produces ticks for a periodic scheduler.
pub trait TickSource: Send + 'static {
    /// Block until the next tick and return the time elapsed since the
    /// previous one. Returns `None` once `stop` is raised or the source is
    /// exhausted.
    fn next_tick(&mut self, stop: &StopSignal) -> Option<Duration>;
}

/// Wall-clock ticker with an initial delay and a fixed interval.
pub struct IntervalTicker {
    initial_delay: Duration,
    interval: Duration,
    next_deadline: Option<Instant>,
    last_tick: Instant,
}

impl IntervalTicker {
    pub fn new(initial_delay: Duration, interval: Duration) -> Self {
        Self {
            initial_delay,
            interval,
            next_deadline: None,
            last_tick: Instant::now(),
        }
    }

    /// Ticker whose first tick is one interval away.
    pub fn every(interval: Duration) -> Self {
        Self::new(interval, interval)
    }
}

impl TickSource for IntervalTicker {
    fn next_tick(&mut self, stop: &StopSignal) -> Option<Duration> {
        let deadline = match self.next_deadline {
            Some(deadline) => deadline,
            None => {
                self.last_tick = Instant::now();
                self.last_tick + self.initial_delay
            }
        };

        if !stop.sleep_until(deadline) {
            return None;
        }

        let now = Instant::now();
        let mut next = deadline + self.interval;
        if now > next + self.interval {
            // Too far behind — reset to avoid catch-up spiral
            next = now + self.interval;
        }
        self.next_deadline = Some(next);

        let elapsed = now - self.last_tick;
        self.last_tick = now;
        Some(elapsed)
    }
}

struct ManualTick {
    elapsed: Duration,
    done: mpsc::SyncSender<()>,
}

/// Ticker driven by a [`TickHandle`].
pub struct ManualTicker {
    ticks: mpsc::Receiver<ManualTick>,
    pending: Option<mpsc::SyncSender<()>>,
}

/// Steps a [`ManualTicker`] from another thread.
#[derive(Clone)]
pub struct TickHandle {
    ticks: mpsc::Sender<ManualTick>,
}

impl ManualTicker {
    pub fn new() -> (Self, TickHandle) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                ticks: rx,
                pending: None,
            },
            TickHandle { ticks: tx },
        )
    }
}

impl TickSource for ManualTicker {
    fn next_tick(&mut self, stop: &StopSignal) -> Option<Duration> {
        // Being asked for the next tick means the previous one was handled.
        if let Some(done) = self.pending.take() {
            let _ = done.send(());
        }

        let poll = Duration::from_millis(STOP_POLL_INTERVAL_MS);
        loop {
            if stop.is_stopped() {
                return None;
            }
            match self.ticks.recv_timeout(poll) {
                Ok(tick) => {
                    self.pending = Some(tick.done);
                    return Some(tick.elapsed);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}

impl TickHandle {
    /// How long `tick` waits for the scheduler before giving up.
    const ACK_TIMEOUT: Duration = Duration::from_secs(5);

    /// Deliver one tick and wait until the scheduler has processed it.
    ///
    /// Returns `false` if the scheduler is gone or stopped before finishing.
    pub fn tick(&self, elapsed: Duration) -> bool {
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        let tick = ManualTick {
            elapsed,
            done: done_tx,
        };
        if self.ticks.send(tick).is_err() {
            return false;
        }
        done_rx.recv_timeout(Self::ACK_TIMEOUT).is_ok()
    }
}

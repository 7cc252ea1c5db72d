//! Latest-value position streams.
//!
//! A projectile's owner publishes positions through a [`PositionSender`];
//! the collision engine reads them through a [`PositionReceiver`]. A newer
//! position overwrites an unread one, so the producer never blocks and a slow
//! consumer only ever sees the most recent value.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use glam::Vec2;

use invaders_core::constants::STOP_POLL_INTERVAL_MS;

use crate::task::{lock, StopSignal};

struct Slot {
    value: Vec2,
    version: u64,
    closed: bool,
}

struct Shared {
    slot: Mutex<Slot>,
    changed: Condvar,
}

/// Publishing side of a position stream.
pub struct PositionSender {
    shared: Arc<Shared>,
}

/// Reading side of a position stream. Clones track their own read position.
#[derive(Clone)]
pub struct PositionReceiver {
    shared: Arc<Shared>,
    seen: u64,
}

/// Create a stream holding `initial`. A fresh receiver sees `initial` as its
/// first update.
pub fn position_channel(initial: Vec2) -> (PositionSender, PositionReceiver) {
    let shared = Arc::new(Shared {
        slot: Mutex::new(Slot {
            value: initial,
            version: 1,
            closed: false,
        }),
        changed: Condvar::new(),
    });
    (
        PositionSender {
            shared: shared.clone(),
        },
        PositionReceiver { shared, seen: 0 },
    )
}

impl PositionSender {
    /// Replace the current position.
    pub fn send(&self, position: Vec2) {
        let mut slot = lock(&self.shared.slot);
        slot.value = position;
        slot.version += 1;
        self.shared.changed.notify_all();
    }

    pub fn latest(&self) -> Vec2 {
        lock(&self.shared.slot).value
    }

    /// Another receiver for the same stream, starting from the current value.
    pub fn subscribe(&self) -> PositionReceiver {
        PositionReceiver {
            shared: self.shared.clone(),
            seen: 0,
        }
    }
}

impl Drop for PositionSender {
    fn drop(&mut self) {
        lock(&self.shared.slot).closed = true;
        self.shared.changed.notify_all();
    }
}

impl PositionReceiver {
    pub fn latest(&self) -> Vec2 {
        lock(&self.shared.slot).value
    }

    /// Wake every waiter on this stream so it re-checks its stop signal.
    pub fn wake(&self) {
        // Taken so the notify cannot land between a waiter's check and its wait.
        let _slot = lock(&self.shared.slot);
        self.shared.changed.notify_all();
    }

    /// Wait for a position newer than the last one returned.
    ///
    /// Returns `None` when the sender is gone or `stop` is raised. Values
    /// published in between are skipped.
    pub fn wait_for_update(&mut self, stop: &StopSignal) -> Option<Vec2> {
        let poll = Duration::from_millis(STOP_POLL_INTERVAL_MS);
        let mut slot = lock(&self.shared.slot);
        loop {
            if stop.is_stopped() {
                return None;
            }
            if slot.version > self.seen {
                self.seen = slot.version;
                return Some(slot.value);
            }
            if slot.closed {
                return None;
            }
            slot = self
                .shared
                .changed
                .wait_timeout(slot, poll)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_initial_value_is_first_update() {
        let (_tx, mut rx) = position_channel(Vec2::new(1.0, 2.0));
        let stop = StopSignal::new();
        assert_eq!(rx.wait_for_update(&stop), Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_newer_value_supersedes_unread_one() {
        let (tx, mut rx) = position_channel(Vec2::ZERO);
        let stop = StopSignal::new();
        tx.send(Vec2::new(1.0, 1.0));
        tx.send(Vec2::new(2.0, 2.0));
        assert_eq!(rx.wait_for_update(&stop), Some(Vec2::new(2.0, 2.0)));
        assert_eq!(rx.latest(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_closed_sender_ends_stream() {
        let (tx, mut rx) = position_channel(Vec2::ZERO);
        let stop = StopSignal::new();
        assert!(rx.wait_for_update(&stop).is_some());
        drop(tx);
        assert_eq!(rx.wait_for_update(&stop), None);
    }

    #[test]
    fn test_pending_value_delivered_after_close() {
        let (tx, mut rx) = position_channel(Vec2::ZERO);
        let stop = StopSignal::new();
        tx.send(Vec2::new(5.0, 5.0));
        drop(tx);
        assert_eq!(rx.wait_for_update(&stop), Some(Vec2::new(5.0, 5.0)));
        assert_eq!(rx.wait_for_update(&stop), None);
    }

    #[test]
    fn test_stop_interrupts_wait() {
        let (_tx, mut rx) = position_channel(Vec2::ZERO);
        let stop = StopSignal::new();
        assert!(rx.wait_for_update(&stop).is_some());

        let waiter_stop = stop.clone();
        let waiter = thread::spawn(move || rx.wait_for_update(&waiter_stop));
        stop.stop();
        assert_eq!(waiter.join().unwrap(), None);
    }

    #[test]
    fn test_wake_interrupts_wait_immediately() {
        let (_tx, mut rx) = position_channel(Vec2::ZERO);
        let stop = StopSignal::new();
        assert!(rx.wait_for_update(&stop).is_some());

        let waker = rx.clone();
        let waiter_stop = stop.clone();
        let waiter = thread::spawn(move || rx.wait_for_update(&waiter_stop));
        thread::sleep(Duration::from_millis(20));

        let start = std::time::Instant::now();
        stop.stop();
        waker.wake();
        assert_eq!(waiter.join().unwrap(), None);
        assert!(start.elapsed() < Duration::from_millis(STOP_POLL_INTERVAL_MS));
    }

    #[test]
    fn test_wakes_on_send_from_other_thread() {
        let (tx, mut rx) = position_channel(Vec2::ZERO);
        let stop = StopSignal::new();
        assert!(rx.wait_for_update(&stop).is_some());

        let sender = thread::spawn(move || {
            tx.send(Vec2::new(3.0, 4.0));
            tx
        });
        assert_eq!(rx.wait_for_update(&stop), Some(Vec2::new(3.0, 4.0)));
        drop(sender.join().unwrap());
    }

    #[test]
    fn test_subscribe_starts_from_current_value() {
        let (tx, _rx) = position_channel(Vec2::ZERO);
        tx.send(Vec2::new(7.0, 7.0));
        let mut late = tx.subscribe();
        assert_eq!(
            late.wait_for_update(&StopSignal::new()),
            Some(Vec2::new(7.0, 7.0))
        );
        assert_eq!(tx.latest(), Vec2::new(7.0, 7.0));
    }
}

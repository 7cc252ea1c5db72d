//! Cooperative cancellation and owned worker threads.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::error::SimError;

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable stop flag. Sleepers wake as soon as it is raised.
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake every sleeper.
    pub fn stop(&self) {
        let (flag, cvar) = &*self.inner;
        *lock(flag) = true;
        cvar.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *lock(&self.inner.0)
    }

    /// Sleep until `deadline`. Returns `false` if stopped first.
    pub fn sleep_until(&self, deadline: Instant) -> bool {
        let (flag, cvar) = &*self.inner;
        let mut stopped = lock(flag);
        loop {
            if *stopped {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            stopped = cvar
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

/// A worker thread together with the signal that stops it.
///
/// Dropping the handle stops the worker and waits for it, so no task ever
/// outlives its owner.
pub struct TaskHandle {
    name: String,
    stop: StopSignal,
    thread: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Spawn a named worker. The closure receives the stop signal and must
    /// return once it is raised.
    pub fn spawn<F>(name: impl Into<String>, body: F) -> Result<Self, SimError>
    where
        F: FnOnce(StopSignal) + Send + 'static,
    {
        let name = name.into();
        let stop = StopSignal::new();
        let worker_stop = stop.clone();
        let thread = thread::Builder::new()
            .name(name.clone())
            .spawn(move || body(worker_stop))
            .map_err(|source| SimError::ThreadSpawn {
                name: name.clone(),
                source,
            })?;

        Ok(Self {
            name,
            stop,
            thread: Some(thread),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Raise the stop signal without waiting for the worker.
    pub fn request_stop(&self) {
        self.stop.stop();
    }

    /// Raise the stop signal and wait for the worker to return.
    ///
    /// Called from the worker itself (a sink reacting to an event by
    /// stopping the scheduler that emitted it), the join is skipped; the
    /// worker returns on its own once the callback unwinds.
    pub fn stop(&mut self) {
        self.stop.stop();
        let Some(thread) = self.thread.take() else {
            return;
        };
        if thread.thread().id() == thread::current().id() {
            return;
        }
        if thread.join().is_err() {
            log::warn!("task {} panicked before shutdown", self.name);
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_sleep_until_wakes_on_stop() {
        let signal = StopSignal::new();
        let sleeper = signal.clone();
        let (tx, rx) = mpsc::channel();
        let thread = thread::spawn(move || {
            let completed = sleeper.sleep_until(Instant::now() + Duration::from_secs(30));
            tx.send(completed).unwrap();
        });

        signal.stop();
        let completed = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(!completed, "sleep should report the stop");
        thread.join().unwrap();
    }

    #[test]
    fn test_sleep_until_past_deadline_returns_immediately() {
        let signal = StopSignal::new();
        assert!(signal.sleep_until(Instant::now()));
    }

    #[test]
    fn test_task_handle_stop_joins_worker() {
        let mut task = TaskHandle::spawn("test-worker", |stop| {
            while stop.sleep_until(Instant::now() + Duration::from_millis(5)) {}
        })
        .unwrap();

        assert_eq!(task.name(), "test-worker");
        assert!(!task.is_finished());
        task.stop();
        assert!(task.is_finished());
    }

    #[test]
    fn test_task_handle_drop_stops_worker() {
        let (tx, rx) = mpsc::channel::<()>();
        let task = TaskHandle::spawn("drop-worker", move |stop| {
            while stop.sleep_until(Instant::now() + Duration::from_millis(5)) {}
            drop(tx);
        })
        .unwrap();

        drop(task);
        // Sender dropped by the worker on exit.
        assert!(rx.recv_timeout(Duration::from_secs(1)).is_err());
    }
}

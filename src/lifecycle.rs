//! Process lifecycle: the shared running flag, owned background tasks,
//! and the ordered shutdown sequence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::handoff::RateConsumer;

/// How often a pending join re-checks a task that has not finished yet
const JOIN_POLL: Duration = Duration::from_millis(10);

/// Process-wide lifecycle flag shared by every execution context.
///
/// The only transition is running -> shutting down; it is never reversed.
/// Tasks poll the flag cooperatively instead of being killed.
#[derive(Debug, Default)]
pub struct Lifecycle {
    shutting_down: AtomicBool,
}

impl Lifecycle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            shutting_down: AtomicBool::new(false),
        })
    }

    pub fn is_running(&self) -> bool {
        !self.is_shutting_down()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Request the transition to shutting down.
    ///
    /// Returns `true` only for the call that performed the transition, so
    /// concurrent exit paths (tray menu, window close, Ctrl+C) collapse
    /// into one.
    pub fn request_shutdown(&self) -> bool {
        !self.shutting_down.swap(true, Ordering::SeqCst)
    }
}

/// A named background thread that is joined with a bounded wait.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    thread: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Spawn `body` on a new named thread.
    pub fn spawn<F>(name: &'static str, body: F) -> std::io::Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let thread = thread::Builder::new().name(name.to_string()).spawn(body)?;
        Ok(Self {
            name,
            thread: Some(thread),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// True once the task's thread has returned (or was never spawned).
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Join the task, giving up after `timeout`.
    ///
    /// A task that misses the deadline is detached rather than killed;
    /// process exit reclaims it. Returns whether the join completed.
    pub fn join_timeout(&mut self, timeout: Duration) -> bool {
        let Some(handle) = self.thread.take() else {
            return true;
        };

        let deadline = Instant::now() + timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                tracing::warn!(
                    task = self.name,
                    timeout_ms = timeout.as_millis() as u64,
                    "task did not stop in time, detaching"
                );
                return false;
            }
            thread::sleep(JOIN_POLL);
        }

        match handle.join() {
            Ok(()) => {
                tracing::debug!(task = self.name, "task joined");
                true
            }
            Err(_) => {
                tracing::warn!(task = self.name, "task panicked before join");
                false
            }
        }
    }
}

/// Runs the ordered shutdown sequence exactly once.
///
/// Teardown order: flip the flag, drain the sample queue, stop the tray
/// task, destroy the window (the caller's half), join the sampler, release
/// the remaining handles. The tray stops before the window goes away so no
/// tray callback can land in a half-destroyed UI, and the sampler join
/// comes last so a slow poll cannot delay the window teardown.
#[derive(Debug)]
pub struct Coordinator {
    lifecycle: Arc<Lifecycle>,
    samples: RateConsumer,
    tray: Option<TaskHandle>,
    sampler: Option<TaskHandle>,
    join_timeout: Duration,
    begun: bool,
}

impl Coordinator {
    pub fn new(
        lifecycle: Arc<Lifecycle>,
        samples: RateConsumer,
        tray: Option<TaskHandle>,
        sampler: Option<TaskHandle>,
        join_timeout: Duration,
    ) -> Self {
        Self {
            lifecycle,
            samples,
            tray,
            sampler,
            join_timeout,
            begun: false,
        }
    }

    pub fn lifecycle(&self) -> &Arc<Lifecycle> {
        &self.lifecycle
    }

    /// First half of the teardown, safe to call any number of times.
    ///
    /// Flips the flag (a no-op if Ctrl+C already did), drains queued
    /// samples, and stops the tray task. Returns `true` only on the call
    /// that ran the teardown; the caller should then destroy the window.
    pub fn begin(&mut self) -> bool {
        if self.begun {
            return false;
        }
        self.begun = true;

        self.lifecycle.request_shutdown();
        tracing::info!("shutting down");

        let discarded = self.samples.discard_all();
        if discarded > 0 {
            tracing::debug!(discarded, "dropped queued samples");
        }

        if let Some(mut tray) = self.tray.take() {
            tray.join_timeout(self.join_timeout);
        }
        true
    }

    /// Second half, run after the window is gone: join the sampler and
    /// release the remaining handles. Idempotent.
    pub fn finish(&mut self) {
        // On fault paths the event loop can die without begin() having run.
        self.begin();

        if let Some(mut sampler) = self.sampler.take() {
            sampler.join_timeout(self.join_timeout);
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.finish();
    }
}

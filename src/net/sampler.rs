//! Background sampler: polls the OS counters on a fixed tick and publishes
//! rate samples toward the UI and tray.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::handoff::RatePublisher;
use crate::lifecycle::{Lifecycle, TaskHandle};
use crate::net::counters::CounterSource;
use crate::net::rate::RateTracker;

/// Upper bound on any single sleep, so the lifecycle flag is re-checked
/// at least this often regardless of the tick interval.
const FLAG_POLL: Duration = Duration::from_millis(100);

/// A configured sampling task, ready to spawn.
pub struct Sampler<S> {
    source: S,
    tick: Duration,
    outputs: Vec<RatePublisher>,
}

impl<S: CounterSource + 'static> Sampler<S> {
    pub fn new(source: S, tick: Duration, outputs: Vec<RatePublisher>) -> Self {
        Self {
            source,
            tick,
            outputs,
        }
    }

    /// Spawn the sampling loop as an owned background task.
    ///
    /// `wake` runs after each publish so the consumer can schedule a
    /// render (the UI passes its repaint handle). The loop re-checks the
    /// lifecycle flag at least every [`FLAG_POLL`], so shutdown never
    /// waits for a full tick.
    pub fn spawn<W>(self, lifecycle: Arc<Lifecycle>, wake: W) -> std::io::Result<TaskHandle>
    where
        W: Fn() + Send + 'static,
    {
        TaskHandle::spawn("sampler", move || self.run(&lifecycle, wake))
    }

    fn run<W: Fn()>(mut self, lifecycle: &Lifecycle, wake: W) {
        let mut tracker = RateTracker::new();
        // Read immediately on startup; the first read only seeds the tracker.
        let mut next_tick = Instant::now();
        tracing::info!(tick_ms = self.tick.as_millis() as u64, "sampler started");

        while lifecycle.is_running() {
            let now = Instant::now();
            if now < next_tick {
                std::thread::sleep(FLAG_POLL.min(next_tick - now));
                continue;
            }
            next_tick = now + self.tick;

            match self.source.read() {
                Ok(totals) => {
                    if let Some(sample) = tracker.update(totals, Instant::now()) {
                        for output in &self.outputs {
                            output.publish(sample);
                        }
                        wake();
                        tracing::trace!(
                            sent_bps = sample.bytes_per_sec_sent,
                            recv_bps = sample.bytes_per_sec_recv,
                            "sample published"
                        );
                    }
                }
                Err(e) => {
                    // Transient: keep the previous snapshot and retry on
                    // the next tick.
                    tracing::warn!(error = %e, "counter read failed, retrying next tick");
                }
            }
        }

        tracing::info!("sampler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::rate_channel;
    use crate::net::counters::{CounterError, CounterTotals};

    /// Grows by a fixed step on every read, so every computed rate is
    /// strictly positive.
    struct GrowingCounters {
        total: u64,
        step: u64,
    }

    impl CounterSource for GrowingCounters {
        fn read(&mut self) -> Result<CounterTotals, CounterError> {
            self.total += self.step;
            Ok(CounterTotals {
                bytes_sent: self.total,
                bytes_recv: self.total * 2,
            })
        }
    }

    #[test]
    fn test_sampler_stops_promptly() {
        let lifecycle = Lifecycle::new();
        let (tx, rx) = rate_channel(8);
        let mut task = Sampler::new(
            GrowingCounters {
                total: 0,
                step: 1024,
            },
            Duration::from_secs(60),
            vec![tx],
        )
        .spawn(Arc::clone(&lifecycle), || {})
        .unwrap();

        // A 60s tick must not delay shutdown: the flag is polled every
        // FLAG_POLL at most.
        lifecycle.request_shutdown();
        let started = Instant::now();
        assert!(task.join_timeout(Duration::from_secs(1)));
        assert!(started.elapsed() < Duration::from_secs(1));
        rx.discard_all();
    }
}

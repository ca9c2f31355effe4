//! Instantaneous throughput from successive counter snapshots.

use std::time::{Duration, Instant};

use crate::net::counters::CounterTotals;

/// Ticks shorter than this are skipped rather than divided by near-zero.
pub const MIN_ELAPSED: Duration = Duration::from_millis(1);

/// One instantaneous throughput measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    /// Upload rate in bytes per second.
    pub bytes_per_sec_sent: f64,
    /// Download rate in bytes per second.
    pub bytes_per_sec_recv: f64,
    /// When the underlying counters were read.
    pub taken_at: Instant,
}

/// Turns successive cumulative snapshots into rates.
///
/// A rate only means something relative to the immediately preceding
/// snapshot, so the first read seeds the tracker and produces nothing.
/// A read arriving within [`MIN_ELAPSED`] of the previous one is dropped
/// without replacing the snapshot, so the next good read spans the full
/// elapsed time instead of a sliver of it.
#[derive(Debug, Default)]
pub struct RateTracker {
    prev: Option<(CounterTotals, Instant)>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self { prev: None }
    }

    /// Feed one counter snapshot. Returns `None` while seeding or when the
    /// elapsed time is below [`MIN_ELAPSED`].
    pub fn update(&mut self, totals: CounterTotals, taken_at: Instant) -> Option<RateSample> {
        let Some((prev_totals, prev_at)) = self.prev else {
            self.prev = Some((totals, taken_at));
            return None;
        };

        let elapsed = taken_at.saturating_duration_since(prev_at);
        if elapsed < MIN_ELAPSED {
            tracing::trace!(
                elapsed_us = elapsed.as_micros() as u64,
                "tick too short, skipping"
            );
            return None;
        }

        // Counters restart from zero when an interface resets; clamp the
        // delta instead of letting it go negative.
        let sent = totals.bytes_sent.saturating_sub(prev_totals.bytes_sent);
        let recv = totals.bytes_recv.saturating_sub(prev_totals.bytes_recv);
        let secs = elapsed.as_secs_f64();

        self.prev = Some((totals, taken_at));
        Some(RateSample {
            bytes_per_sec_sent: sent as f64 / secs,
            bytes_per_sec_recv: recv as f64 / secs,
            taken_at,
        })
    }
}

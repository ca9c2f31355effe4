//! Latest-wins handoff between the sampler and its consumers.
//!
//! Samples are gauge readings, not a stream to be preserved: when the
//! queue overflows the oldest reading is shed so the newest one always
//! lands, and a consumer that drains several at once keeps only the
//! newest. Both ends are non-blocking.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::net::rate::RateSample;

/// Queue depth per channel. Deep enough that a briefly stalled consumer
/// does not force shedding, shallow enough to stay a gauge.
pub const DEFAULT_CAPACITY: usize = 8;

/// Create a connected publisher/consumer pair with the given capacity.
pub fn rate_channel(capacity: usize) -> (RatePublisher, RateConsumer) {
    let (tx, rx) = bounded(capacity);
    (
        RatePublisher {
            tx,
            reaper: rx.clone(),
        },
        RateConsumer { rx },
    )
}

/// Producer half, held by the sampler.
#[derive(Debug, Clone)]
pub struct RatePublisher {
    tx: Sender<RateSample>,
    /// Only used to shed the oldest sample when the queue is full.
    reaper: Receiver<RateSample>,
}

impl RatePublisher {
    /// Queue a sample without blocking.
    ///
    /// On a full queue the oldest sample is dropped to make room. A
    /// disconnected consumer is ignored: that only happens while shutdown
    /// is racing the sampler, and the sample is worthless by then.
    pub fn publish(&self, sample: RateSample) {
        match self.tx.try_send(sample) {
            Ok(()) => {}
            Err(TrySendError::Full(sample)) => {
                let _ = self.reaper.try_recv();
                let _ = self.tx.try_send(sample);
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// Consumer half, held by the overlay and the tray.
#[derive(Debug, Clone)]
pub struct RateConsumer {
    rx: Receiver<RateSample>,
}

impl RateConsumer {
    /// Drain everything queued and return only the newest sample.
    pub fn latest(&self) -> Option<RateSample> {
        let mut latest = None;
        while let Ok(sample) = self.rx.try_recv() {
            latest = Some(sample);
        }
        latest
    }

    /// Drop everything queued, returning how many samples were discarded.
    pub fn discard_all(&self) -> usize {
        let mut discarded = 0;
        while self.rx.try_recv().is_ok() {
            discarded += 1;
        }
        discarded
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn sample(value: f64) -> RateSample {
        RateSample {
            bytes_per_sec_sent: value,
            bytes_per_sec_recv: value,
            taken_at: Instant::now(),
        }
    }

    #[test]
    fn test_latest_wins() {
        let (tx, rx) = rate_channel(8);
        for i in 1..=5 {
            tx.publish(sample(i as f64));
        }
        assert_eq!(rx.latest().unwrap().bytes_per_sec_sent, 5.0);
        assert!(rx.latest().is_none());
    }

    #[test]
    fn test_overflow_sheds_oldest() {
        let (tx, rx) = rate_channel(2);
        for i in 1..=6 {
            tx.publish(sample(i as f64));
        }
        assert_eq!(rx.len(), 2);
        assert_eq!(rx.latest().unwrap().bytes_per_sec_sent, 6.0);
    }

    #[test]
    fn test_discard_counts() {
        let (tx, rx) = rate_channel(8);
        for i in 0..3 {
            tx.publish(sample(i as f64));
        }
        assert_eq!(rx.discard_all(), 3);
        assert_eq!(rx.discard_all(), 0);
        assert!(rx.is_empty());
    }
}

//! Cumulative network byte counters read from the OS.

use sysinfo::Networks;
use thiserror::Error;

/// Bytes transferred across all interfaces since boot (or since the
/// interface last reset), as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterTotals {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

#[derive(Error, Debug)]
pub enum CounterError {
    #[error("no network interfaces visible")]
    NoInterfaces,
}

/// Source of cumulative counters. The sampler owns its source exclusively,
/// so reads never contend.
pub trait CounterSource: Send {
    fn read(&mut self) -> Result<CounterTotals, CounterError>;
}

/// OS-backed source summing every interface sysinfo reports.
pub struct NetCounters {
    networks: Networks,
}

impl NetCounters {
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
        }
    }

    /// Interface names with their cumulative totals, for `--list`.
    pub fn interfaces(&mut self) -> Vec<(String, CounterTotals)> {
        self.networks.refresh();
        let mut interfaces: Vec<(String, CounterTotals)> = self
            .networks
            .iter()
            .map(|(name, data)| {
                (
                    name.clone(),
                    CounterTotals {
                        bytes_sent: data.total_transmitted(),
                        bytes_recv: data.total_received(),
                    },
                )
            })
            .collect();
        interfaces.sort_by(|a, b| a.0.cmp(&b.0));
        interfaces
    }
}

impl Default for NetCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for NetCounters {
    fn read(&mut self) -> Result<CounterTotals, CounterError> {
        self.networks.refresh();

        let mut totals = CounterTotals::default();
        let mut seen = false;
        for (_name, data) in self.networks.iter() {
            totals.bytes_sent = totals.bytes_sent.saturating_add(data.total_transmitted());
            totals.bytes_recv = totals.bytes_recv.saturating_add(data.total_received());
            seen = true;
        }

        if !seen {
            // Adapters can vanish across suspend/resume. Re-enumerate so
            // the next tick sees whatever came back.
            self.networks.refresh_list();
            return Err(CounterError::NoInterfaces);
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_counters_read() {
        // Tolerant of the environment: a machine with no interfaces is a
        // valid outcome, a panic is not.
        let mut counters = NetCounters::new();
        let first = counters.read();
        let second = counters.read();
        if let (Ok(a), Ok(b)) = (first, second) {
            // Cumulative counters are monotonic between back-to-back reads.
            assert!(b.bytes_sent >= a.bytes_sent);
            assert!(b.bytes_recv >= a.bytes_recv);
        }
    }

    #[test]
    fn test_interface_listing_is_sorted() {
        let mut counters = NetCounters::new();
        let interfaces = counters.interfaces();
        for pair in interfaces.windows(2) {
            assert!(pair[0].0 <= pair[1].0);
        }
    }
}

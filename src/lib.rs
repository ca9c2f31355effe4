//! Netglance - desktop network throughput overlay
//!
//! This library provides the pieces behind the overlay widget: a background
//! sampler that polls the OS-wide cumulative network counters once per tick,
//! a latest-wins handoff channel toward the UI, the always-on-top overlay
//! window, the system tray icon, and the lifecycle coordinator that ties
//! their shutdown together.

pub mod app;
pub mod handoff;
pub mod lifecycle;
pub mod net;
pub mod ui;

pub use handoff::{rate_channel, RateConsumer, RatePublisher};
pub use lifecycle::{Coordinator, Lifecycle, TaskHandle};
pub use net::{counters::NetCounters, rate::RateTracker, sampler::Sampler};

use std::time::Duration;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default interval between network counter polls
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Bounded wait when joining a background task during shutdown
pub const JOIN_TIMEOUT: Duration = Duration::from_secs(1);

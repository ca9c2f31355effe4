//! Network measurement module
//!
//! Contains:
//! - Cumulative OS byte counters ([`counters`])
//! - Rate computation from counter deltas ([`rate`])
//! - The background sampling task ([`sampler`])

pub mod counters;
pub mod rate;
pub mod sampler;

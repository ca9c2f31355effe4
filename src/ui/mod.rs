//! User interface module
//!
//! Contains:
//! - Throughput text formatting ([`format`])
//! - The always-on-top overlay window ([`overlay`])
//! - System tray icon and menu ([`tray`])

pub mod format;
pub mod overlay;
pub mod tray;

//! E2E tests for throughput text formatting
//!
//! Verifies the unit steps of the compact overlay form, the full form
//! used by the tooltip, and the tooltip layout itself.

use std::time::Instant;

use netglance::net::rate::RateSample;
use netglance::ui::format::{format_speed, format_speed_compact, tray_tooltip};

/// Test the compact form around the KB boundary
#[test]
fn test_compact_form_kilobyte_range() {
    assert_eq!(format_speed_compact(0.0), "0.0 KB/s");
    assert_eq!(
        format_speed_compact(500.0),
        "0.5 KB/s",
        "Sub-KB rates still display in KB"
    );
    assert_eq!(format_speed_compact(1024.0), "1.0 KB/s");
    assert_eq!(format_speed_compact(2048.0), "2.0 KB/s");
    assert_eq!(format_speed_compact(1_048_575.0), "1024.0 KB/s");
}

/// Test the compact form switches to MB at 1024 KB and stays there
#[test]
fn test_compact_form_megabyte_range() {
    assert_eq!(format_speed_compact(1_048_576.0), "1.0 MB/s");
    assert_eq!(format_speed_compact(5.0 * 1_048_576.0), "5.0 MB/s");
    assert_eq!(
        format_speed_compact(5.0 * 1_073_741_824.0),
        "5120.0 MB/s",
        "The compact form has no GB step"
    );
}

/// Test the full form walks the whole unit ladder
#[test]
fn test_full_form_unit_ladder() {
    assert_eq!(format_speed(0.0), "0.0 B");
    assert_eq!(format_speed(500.0), "500.0 B");
    assert_eq!(format_speed(1024.0), "1.0 KB");
    assert_eq!(format_speed(1536.0), "1.5 KB");
    assert_eq!(format_speed(1_048_576.0), "1.0 MB");
    assert_eq!(format_speed(1_073_741_824.0), "1.0 GB");
    assert_eq!(format_speed(1_099_511_627_776.0), "1.0 TB");
    assert_eq!(
        format_speed(1_125_899_906_842_624.0),
        "1024.0 TB",
        "Values past TB stay in TB"
    );
}

/// Test that both forms keep one decimal place
#[test]
fn test_one_decimal_place() {
    assert_eq!(format_speed_compact(1536.0), "1.5 KB/s");
    assert_eq!(format_speed_compact(1587.2), "1.6 KB/s");
    assert_eq!(format_speed(1234.0), "1.2 KB");
}

/// Test the tray tooltip layout: direction arrows, one line each
#[test]
fn test_tooltip_two_line_layout() {
    let sample = RateSample {
        bytes_per_sec_sent: 500.0,
        bytes_per_sec_recv: 1_048_576.0,
        taken_at: Instant::now(),
    };
    assert_eq!(
        tray_tooltip(&sample),
        "↑ 500.0 B/s\n↓ 1.0 MB/s",
        "Tooltip shows up then down, full form, per-second suffix"
    );
}

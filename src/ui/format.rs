//! Throughput text formatting.

use crate::net::rate::RateSample;

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Full form used by the tray tooltip and `--list`: walks B -> KB -> MB
/// -> GB and falls through to TB. `1536.0` -> `"1.5 KB"`.
pub fn format_speed(bytes: f64) -> String {
    let mut value = bytes;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} TB")
}

/// Compact form for the overlay labels: always in KB or MB so the text
/// width stays put. `500.0` -> `"0.5 KB/s"`, `2048.0` -> `"2.0 KB/s"`.
pub fn format_speed_compact(bytes_per_sec: f64) -> String {
    let kb = bytes_per_sec / 1024.0;
    if kb < 1024.0 {
        format!("{kb:.1} KB/s")
    } else {
        format!("{:.1} MB/s", kb / 1024.0)
    }
}

/// Tray tooltip: one direction per line, full form.
pub fn tray_tooltip(sample: &RateSample) -> String {
    format!(
        "↑ {}/s\n↓ {}/s",
        format_speed(sample.bytes_per_sec_sent),
        format_speed(sample.bytes_per_sec_recv)
    )
}

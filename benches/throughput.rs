//! Benchmarks for the per-tick hot path: rate computation and the text
//! formatting done on every render.

use std::hint::black_box;
use std::time::{Duration, Instant};

use criterion::{criterion_group, criterion_main, Criterion};
use netglance::handoff::rate_channel;
use netglance::net::counters::CounterTotals;
use netglance::net::rate::RateTracker;
use netglance::ui::format::{format_speed, format_speed_compact};

fn bench_rate_update(c: &mut Criterion) {
    let t0 = Instant::now();
    c.bench_function("rate_tracker_update", |b| {
        b.iter(|| {
            let mut tracker = RateTracker::new();
            tracker.update(
                CounterTotals {
                    bytes_sent: 0,
                    bytes_recv: 0,
                },
                t0,
            );
            black_box(tracker.update(
                CounterTotals {
                    bytes_sent: 123_456,
                    bytes_recv: 654_321,
                },
                t0 + Duration::from_secs(1),
            ))
        })
    });
}

fn bench_format(c: &mut Criterion) {
    c.bench_function("format_speed_compact", |b| {
        b.iter(|| black_box(format_speed_compact(black_box(1_234_567.0))))
    });
    c.bench_function("format_speed", |b| {
        b.iter(|| black_box(format_speed(black_box(1_234_567.0))))
    });
}

fn bench_handoff(c: &mut Criterion) {
    let (tx, rx) = rate_channel(8);
    let sample = netglance::net::rate::RateSample {
        bytes_per_sec_sent: 1024.0,
        bytes_per_sec_recv: 2048.0,
        taken_at: Instant::now(),
    };
    c.bench_function("publish_then_drain", |b| {
        b.iter(|| {
            for _ in 0..5 {
                tx.publish(black_box(sample));
            }
            black_box(rx.latest())
        })
    });
}

criterion_group!(benches, bench_rate_update, bench_format, bench_handoff);
criterion_main!(benches);

//! Meta-tests that verify test suite integrity
//!
//! These tests ensure that:
//! - E2E test files exist and are not stubs
//! - The public API surface stays accessible

/// Verify E2E test files exist and are not empty
#[test]
fn e2e_tests_exist() {
    let test_files = [
        "e2e_rate.rs",
        "e2e_format.rs",
        "e2e_handoff.rs",
        "e2e_lifecycle.rs",
        "e2e_tray.rs",
    ];

    for file in test_files {
        let path = format!("tests/{}", file);
        let full_path = std::path::Path::new(&path);

        assert!(
            full_path.exists(),
            "Missing E2E test file: {}. All E2E tests must be present.",
            file
        );

        let metadata = std::fs::metadata(full_path).expect("Failed to get file metadata");
        assert!(
            metadata.len() > 100,
            "E2E test file {} appears to be empty or too small ({} bytes)",
            file,
            metadata.len()
        );
    }
}

/// Verify all exported types are accessible
#[test]
fn public_api_accessible() {
    use std::sync::Arc;
    use std::time::Duration;

    // These type checks verify the public API hasn't broken
    let _: fn() -> Arc<netglance::Lifecycle> = netglance::Lifecycle::new;
    let _: fn() -> netglance::NetCounters = netglance::NetCounters::new;
    let _: fn() -> netglance::RateTracker = netglance::RateTracker::new;
    let _: fn(usize) -> (netglance::RatePublisher, netglance::RateConsumer) =
        netglance::rate_channel;

    assert_eq!(netglance::DEFAULT_TICK_INTERVAL, Duration::from_secs(1));
    assert_eq!(netglance::JOIN_TIMEOUT, Duration::from_secs(1));
    assert!(!netglance::VERSION.is_empty());
}

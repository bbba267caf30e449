//! Integration tests for telemetry initialization and span helpers.

use later_store::keys::TaskKey;

#[test]
fn telemetry_initializes_without_endpoint() {
    // Note: tracing subscriber can only be set once per process.
    // init_telemetry uses try_init(), so a second call returns Err
    // instead of panicking; that is acceptable here.
    let config = later_store::telemetry::TelemetryConfig {
        endpoint: None,
        service_name: "later-test".to_string(),
        log_level: "debug".to_string(),
    };
    let _guard = later_store::telemetry::init_telemetry(config);
}

#[test]
fn telemetry_config_follows_crate_config() {
    let config = later_store::config::Config::default();
    let telemetry = later_store::telemetry::TelemetryConfig::from_config(&config, "later");
    assert!(telemetry.endpoint.is_none());
    assert_eq!(telemetry.service_name, "later");
    assert_eq!(telemetry.log_level, "info");
}

#[test]
fn task_span_creates_and_records_outcome() {
    let key = TaskKey::new("jobs:abc");
    let span = later_store::telemetry::task::start_task_span(&key);
    later_store::telemetry::task::record_outcome(&span, true, 12);
}

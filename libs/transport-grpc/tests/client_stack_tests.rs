//! Integration tests for the gRPC client transport stack.

use std::time::Duration;

use confect_transport_grpc::client::{ChannelConfig, connect_lazy, connect_with_stack};

#[test]
fn default_config_is_sane() {
    let cfg = ChannelConfig::default();

    assert!(
        cfg.connect_timeout > Duration::from_millis(0),
        "connect_timeout should be positive"
    );
    assert!(
        cfg.rpc_timeout > Duration::from_millis(0),
        "rpc_timeout should be positive"
    );
    assert!(
        cfg.base_backoff > Duration::from_millis(0),
        "base_backoff should be positive"
    );
    assert!(
        cfg.max_backoff >= cfg.base_backoff,
        "max_backoff should be >= base_backoff"
    );
    assert!(
        !cfg.service_name.is_empty(),
        "service_name should not be empty"
    );
    assert!(!cfg.user_agent.is_empty(), "user_agent should not be empty");
}

#[test]
fn config_builder_pattern_works() {
    let cfg = ChannelConfig::new("test_service")
        .with_connect_timeout(Duration::from_secs(5))
        .with_rpc_timeout(Duration::from_secs(15))
        .with_max_retries(5);

    assert_eq!(cfg.service_name, "test_service");
    assert_eq!(cfg.connect_timeout, Duration::from_secs(5));
    assert_eq!(cfg.rpc_timeout, Duration::from_secs(15));
    assert_eq!(cfg.max_retries, 5);
}

#[tokio::test]
async fn connect_with_stack_applies_timeouts() {
    let cfg = ChannelConfig::new("test")
        .with_connect_timeout(Duration::from_millis(100))
        .with_rpc_timeout(Duration::from_millis(200));

    // Non-routable TEST-NET address; should fail quickly via connect_timeout.
    let result = connect_with_stack("http://192.0.2.1:50051", &cfg).await;
    assert!(
        result.is_err(),
        "Should fail to connect to non-existent server"
    );
}

#[tokio::test]
async fn connect_with_stack_rejects_invalid_uri() {
    let cfg = ChannelConfig::default();
    let result = connect_with_stack("not-a-valid-uri", &cfg).await;
    assert!(result.is_err(), "Should fail with invalid URI");
}

#[tokio::test]
async fn connect_lazy_returns_usable_channel_without_server() {
    let cfg = ChannelConfig::default();
    let result = connect_lazy("http://127.0.0.1:1", &cfg);
    assert!(result.is_ok(), "Lazy connect must not require a live server");
}

#[test]
fn multiple_configs_are_independent() {
    let cfg1 = ChannelConfig::new("service1").with_max_retries(3);
    let cfg2 = ChannelConfig::new("service2").with_max_retries(5);

    assert_eq!(cfg1.max_retries, 3);
    assert_eq!(cfg2.max_retries, 5);
}

#[test]
fn config_handles_extreme_values() {
    let cfg = ChannelConfig::new("test")
        .with_connect_timeout(Duration::from_millis(1))
        .with_rpc_timeout(Duration::from_millis(1))
        .with_max_retries(0);

    assert_eq!(cfg.connect_timeout, Duration::from_millis(1));
    assert_eq!(cfg.rpc_timeout, Duration::from_millis(1));
    assert_eq!(cfg.max_retries, 0);
}

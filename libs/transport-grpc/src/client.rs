//! gRPC client transport configuration and connection utilities.
//!
//! This module is responsible only for transport-level concerns: connect and
//! RPC timeouts, HTTP/2 keepalive, the SDK user agent, and channel
//! establishment (lazy or eager). Per-call deadlines and error normalization
//! live in the SDK crate on top of the channel produced here.

use std::time::Duration;

use tonic::transport::{Channel, Endpoint};
use tracing::Instrument;

fn duration_to_u64_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Configuration for the gRPC client transport stack.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Timeout for establishing the initial connection.
    pub connect_timeout: Duration,

    /// Transport-level ceiling for individual RPC calls. The SDK applies its
    /// own, usually tighter, per-operation deadline on top of this.
    pub rpc_timeout: Duration,

    /// Maximum number of connection retry attempts for [`connect_with_retry`].
    pub max_retries: u32,

    /// Base duration for exponential backoff between connection retries.
    pub base_backoff: Duration,

    /// Maximum duration for exponential backoff.
    pub max_backoff: Duration,

    /// Service name for tracing.
    pub service_name: &'static str,

    /// User agent announced on every request over this channel.
    pub user_agent: String,

    /// TCP keepalive probe interval.
    pub tcp_keepalive: Duration,

    /// HTTP/2 keepalive ping interval; pings are sent while idle too.
    pub http2_keepalive_interval: Duration,

    /// How long to wait for a keepalive ping acknowledgement before the
    /// connection is considered dead.
    pub keepalive_timeout: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            rpc_timeout: Duration::from_secs(120),
            max_retries: 3,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            service_name: "grpc_client",
            user_agent: "confect-sdk-rust/v1".to_owned(),
            tcp_keepalive: Duration::from_secs(30),
            http2_keepalive_interval: Duration::from_secs(60),
            keepalive_timeout: Duration::from_secs(10),
        }
    }
}

impl ChannelConfig {
    /// Create a new configuration with the given service name.
    #[must_use]
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            ..Default::default()
        }
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the transport-level RPC timeout.
    #[must_use]
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    /// Set the maximum number of connection retries.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the user agent announced on requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the TCP keepalive probe interval.
    #[must_use]
    pub fn with_tcp_keepalive(mut self, interval: Duration) -> Self {
        self.tcp_keepalive = interval;
        self
    }

    /// Set the HTTP/2 keepalive ping interval.
    #[must_use]
    pub fn with_http2_keepalive_interval(mut self, interval: Duration) -> Self {
        self.http2_keepalive_interval = interval;
        self
    }

    /// Set the keepalive ping acknowledgement timeout.
    #[must_use]
    pub fn with_keepalive_timeout(mut self, timeout: Duration) -> Self {
        self.keepalive_timeout = timeout;
        self
    }
}

/// Build a tonic `Endpoint` with timeouts, keepalive, and the SDK user agent.
///
/// Configures:
/// - Connect timeout
/// - Per-RPC timeout (transport ceiling)
/// - TCP keepalive (default 30 seconds)
/// - HTTP/2 keepalive interval (default 60 seconds), keep alive while idle
/// - Keepalive timeout (default 10 seconds)
pub fn build_endpoint(
    uri: impl Into<String>,
    cfg: &ChannelConfig,
) -> Result<Endpoint, tonic::transport::Error> {
    let endpoint = Endpoint::from_shared(uri.into())?
        .user_agent(cfg.user_agent.clone())?
        .connect_timeout(cfg.connect_timeout)
        .timeout(cfg.rpc_timeout)
        .tcp_keepalive(Some(cfg.tcp_keepalive))
        .http2_keep_alive_interval(cfg.http2_keepalive_interval)
        .keep_alive_timeout(cfg.keepalive_timeout)
        .keep_alive_while_idle(true);

    Ok(endpoint)
}

/// Produce a channel without waiting for the connection to come up.
///
/// The returned channel connects on first use, which lets service clients be
/// constructed synchronously. Connection failures surface as `UNAVAILABLE`
/// statuses on the first calls.
pub fn connect_lazy(
    uri: impl Into<String>,
    cfg: &ChannelConfig,
) -> Result<Channel, tonic::transport::Error> {
    let endpoint = build_endpoint(uri, cfg)?;
    Ok(endpoint.connect_lazy())
}

/// Connect to a gRPC service with the configured transport stack, eagerly.
///
/// Establishes the connection before returning, wrapped in a tracing span.
/// No retries are performed; see [`connect_with_retry`].
pub async fn connect_with_stack(
    uri: impl Into<String>,
    cfg: &ChannelConfig,
) -> anyhow::Result<Channel> {
    let uri_string = uri.into();
    let span = tracing::debug_span!(
        "grpc_connect",
        service = cfg.service_name,
        uri = %uri_string
    );

    async move {
        let endpoint = build_endpoint(uri_string, cfg)?;
        let channel = endpoint.connect().await?;

        tracing::info!(
            service_name = cfg.service_name,
            connect_timeout_ms = duration_to_u64_ms(cfg.connect_timeout),
            rpc_timeout_ms = duration_to_u64_ms(cfg.rpc_timeout),
            "gRPC client connected"
        );

        Ok(channel)
    }
    .instrument(span)
    .await
}

/// Connect to a gRPC service with retry logic using exponential backoff.
///
/// Retries failed connection attempts per the retry parameters in
/// [`ChannelConfig`]: `max_retries`, `base_backoff` (multiplied by the
/// attempt number), and `max_backoff` (cap).
pub async fn connect_with_retry(
    uri: impl Into<String>,
    cfg: &ChannelConfig,
) -> anyhow::Result<Channel> {
    use anyhow::Context;

    let uri_string = uri.into();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match connect_with_stack(&uri_string, cfg).await {
            Ok(channel) => {
                if attempt > 1 {
                    tracing::info!(
                        service = cfg.service_name,
                        attempt,
                        "gRPC connection established after retries"
                    );
                }
                return Ok(channel);
            }
            Err(e) if attempt <= cfg.max_retries => {
                let backoff = (cfg.base_backoff * attempt).min(cfg.max_backoff);
                tracing::warn!(
                    service = cfg.service_name,
                    attempt,
                    max_retries = cfg.max_retries,
                    error = %e,
                    backoff_ms = duration_to_u64_ms(backoff),
                    "gRPC connection failed, retrying..."
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => {
                tracing::error!(
                    service = cfg.service_name,
                    attempt,
                    error = %e,
                    "gRPC connection failed after all retries"
                );
                return Err(e).context(format!(
                    "Failed to connect to {} after {attempt} attempts",
                    cfg.service_name
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ChannelConfig::default();
        assert_eq!(cfg.connect_timeout, Duration::from_secs(10));
        assert_eq!(cfg.rpc_timeout, Duration::from_secs(120));
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.user_agent, "confect-sdk-rust/v1");
        assert_eq!(cfg.tcp_keepalive, Duration::from_secs(30));
        assert_eq!(cfg.http2_keepalive_interval, Duration::from_secs(60));
        assert_eq!(cfg.keepalive_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_config_builder() {
        let cfg = ChannelConfig::new("test_service")
            .with_connect_timeout(Duration::from_secs(5))
            .with_rpc_timeout(Duration::from_secs(15))
            .with_max_retries(5)
            .with_user_agent("custom-agent/2")
            .with_tcp_keepalive(Duration::from_secs(15))
            .with_http2_keepalive_interval(Duration::from_secs(20))
            .with_keepalive_timeout(Duration::from_secs(4));

        assert_eq!(cfg.service_name, "test_service");
        assert_eq!(cfg.connect_timeout, Duration::from_secs(5));
        assert_eq!(cfg.rpc_timeout, Duration::from_secs(15));
        assert_eq!(cfg.max_retries, 5);
        assert_eq!(cfg.user_agent, "custom-agent/2");
        assert_eq!(cfg.tcp_keepalive, Duration::from_secs(15));
        assert_eq!(cfg.http2_keepalive_interval, Duration::from_secs(20));
        assert_eq!(cfg.keepalive_timeout, Duration::from_secs(4));
    }

    #[test]
    fn test_build_endpoint_accepts_keepalive_overrides() {
        let cfg = ChannelConfig::default()
            .with_tcp_keepalive(Duration::from_secs(5))
            .with_http2_keepalive_interval(Duration::from_secs(10))
            .with_keepalive_timeout(Duration::from_secs(2));
        let result = build_endpoint("http://localhost:50051", &cfg);
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_endpoint_succeeds() {
        let cfg = ChannelConfig::default();
        let result = build_endpoint("http://localhost:50051", &cfg);
        assert!(
            result.is_ok(),
            "build_endpoint should succeed with valid URI"
        );
    }

    #[test]
    fn test_build_endpoint_empty_uri() {
        let cfg = ChannelConfig::default();
        let result = build_endpoint(String::new(), &cfg);
        assert!(result.is_err(), "build_endpoint should fail with empty URI");
    }

    #[tokio::test]
    async fn test_connect_lazy_does_not_touch_network() {
        let cfg = ChannelConfig::default();
        // 192.0.2.0/24 is TEST-NET; nothing listens there. Lazy connection
        // must still succeed because no traffic is attempted.
        let result = connect_lazy("http://192.0.2.1:50051", &cfg);
        assert!(result.is_ok());
    }
}

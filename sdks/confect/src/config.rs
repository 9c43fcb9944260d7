//! Immutable SDK configuration and its builder.

use std::time::Duration;

use tokio::runtime::Handle;

use confect_transport_grpc::client::ChannelConfig;

/// Default Confect API endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.confect.dev:443";

/// User agent announced by this SDK.
pub const SDK_USER_AGENT: &str = "confect-sdk-rust/v1";

/// Immutable configuration shared by every service a manager mounts.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    endpoint: String,
    api_key: Option<String>,
    user_agent: String,
    connect_timeout: Duration,
    rpc_timeout: Duration,
    runtime_handle: Option<Handle>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SdkConfig {
    #[must_use]
    pub fn builder() -> SdkConfigBuilder {
        SdkConfigBuilder::default()
    }

    /// Full endpoint used for all mounted services.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// API key sent as `x-api-key` on every call, if configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Transport-level RPC ceiling; per-operation timeouts are tighter.
    #[must_use]
    pub fn rpc_timeout(&self) -> Duration {
        self.rpc_timeout
    }

    /// Caller-supplied runtime handle for blocking call variants, if any.
    pub fn runtime_handle(&self) -> Option<&Handle> {
        self.runtime_handle.as_ref()
    }

    pub(crate) fn channel_config(&self) -> ChannelConfig {
        ChannelConfig::new("confect-api")
            .with_connect_timeout(self.connect_timeout)
            .with_rpc_timeout(self.rpc_timeout)
            .with_user_agent(self.user_agent.clone())
    }
}

/// Builder for [`SdkConfig`].
#[derive(Debug, Clone)]
pub struct SdkConfigBuilder {
    endpoint: Option<String>,
    api_key: Option<String>,
    user_agent: Option<String>,
    connect_timeout: Duration,
    rpc_timeout: Duration,
    runtime_handle: Option<Handle>,
}

impl Default for SdkConfigBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            user_agent: None,
            connect_timeout: Duration::from_secs(10),
            rpc_timeout: Duration::from_secs(120),
            runtime_handle: None,
        }
    }
}

impl SdkConfigBuilder {
    /// Point the SDK at a custom API endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API key sent with every call.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the announced user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Timeout for establishing the transport connection.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Transport-level ceiling for individual RPC calls.
    #[must_use]
    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    /// Drive blocking call variants on the caller's runtime instead of the
    /// SDK's shared one.
    #[must_use]
    pub fn runtime_handle(mut self, handle: Handle) -> Self {
        self.runtime_handle = Some(handle);
        self
    }

    #[must_use]
    pub fn build(self) -> SdkConfig {
        SdkConfig {
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_owned()),
            api_key: self.api_key,
            user_agent: self.user_agent.unwrap_or_else(|| SDK_USER_AGENT.to_owned()),
            connect_timeout: self.connect_timeout,
            rpc_timeout: self.rpc_timeout,
            runtime_handle: self.runtime_handle,
        }
    }
}

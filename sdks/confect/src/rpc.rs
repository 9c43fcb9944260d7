//! Sync/async RPC operation wrappers.
//!
//! An RPC wrapper pairs a request message with the timeout enforced for the
//! whole operation and an optional [`CallContext`] carrying per-call metadata.
//! The wrappers are plain immutable values; execution happens in the service
//! layer. Every synchronous operation converts into its asynchronous form
//! before it runs ([`SyncRpc::into_async`]), so the async path is the single
//! execution path.

use std::time::Duration;

use tonic::Status;
use tonic::metadata::{MetadataKey, MetadataMap, MetadataValue};

/// Client-side timeout applied to RPC operations unless otherwise specified.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-call metadata applied on top of the manager-level headers.
///
/// Entries win over manager-level headers on key collision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    entries: Vec<(String, String)>,
}

impl CallContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a metadata entry to send with the call.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Entries carried by this context, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub(crate) fn apply(&self, meta: &mut MetadataMap) -> Result<(), Status> {
        for (key, value) in &self.entries {
            let key: MetadataKey<_> = key
                .parse()
                .map_err(|_| Status::internal(format!("invalid metadata key '{key}'")))?;
            let value: MetadataValue<_> = value
                .parse()
                .map_err(|_| Status::internal(format!("invalid metadata value for '{key}'")))?;
            meta.insert(key, value);
        }
        Ok(())
    }
}

/// A non-blocking RPC operation: request, timeout, optional call context.
#[derive(Debug, Clone)]
pub struct AsyncRpc<R> {
    request: R,
    timeout: Duration,
    context: Option<CallContext>,
}

impl<R> AsyncRpc<R> {
    /// Wrap a request with the default timeout and no custom context.
    pub fn of(request: R) -> Self {
        Self {
            request,
            timeout: DEFAULT_TIMEOUT,
            context: None,
        }
    }

    /// Override the timeout enforced for this operation.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Attach per-call metadata.
    #[must_use]
    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn request(&self) -> &R {
        &self.request
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn context(&self) -> Option<&CallContext> {
        self.context.as_ref()
    }

    pub(crate) fn into_parts(self) -> (R, Duration, Option<CallContext>) {
        (self.request, self.timeout, self.context)
    }
}

/// A blocking RPC operation.
///
/// Carries the same payload as [`AsyncRpc`]; the marker type selects the
/// blocking execution bridge. Conversion via [`SyncRpc::into_async`] is how
/// every sync operation reaches the wire.
#[derive(Debug, Clone)]
pub struct SyncRpc<R>(AsyncRpc<R>);

impl<R> SyncRpc<R> {
    /// Wrap a request with the default timeout and no custom context.
    pub fn of(request: R) -> Self {
        Self(AsyncRpc::of(request))
    }

    /// Override the timeout enforced for this operation.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.0 = self.0.with_timeout(timeout);
        self
    }

    /// Attach per-call metadata.
    #[must_use]
    pub fn with_context(mut self, context: CallContext) -> Self {
        self.0 = self.0.with_context(context);
        self
    }

    pub fn request(&self) -> &R {
        self.0.request()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.0.timeout()
    }

    pub fn context(&self) -> Option<&CallContext> {
        self.0.context()
    }

    /// Convert into the asynchronous form, preserving request, timeout, and
    /// context.
    pub fn into_async(self) -> AsyncRpc<R> {
        self.0
    }
}

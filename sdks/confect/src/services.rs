//! Shared per-service execution layer.
//!
//! Every service client funnels its calls through [`execute`] (unary) or
//! [`execute_stream`] (server streaming). The helpers attach manager-level
//! headers and per-call context metadata, enforce the operation's timeout,
//! wrap the call in a tracing span, and normalize failures into
//! [`SdkError`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use futures::StreamExt;
use futures_core::Stream;
use tonic::{Request, Response, Status, Streaming};
use tracing::Instrument;

use confect_transport_grpc::attach_api_key;

use crate::errors::SdkError;
use crate::executor::Executor;
use crate::rpc::AsyncRpc;

/// Static descriptor for a mounted API service.
pub trait ServiceInfo: Send + Sync + 'static {
    /// Short name of the service, e.g. `"catalog"`.
    fn service_name(&self) -> &'static str;

    /// API version of the service, e.g. `"v1"`.
    fn service_version(&self) -> &'static str;

    /// Whether the service requires an API key.
    fn api_key_required(&self) -> bool {
        true
    }

    /// Whether the service requires user authorization.
    fn authorization_required(&self) -> bool {
        false
    }

    /// Combined tag, used as the cache fingerprint for this service.
    fn service_tag(&self) -> String {
        format!("{}:{}", self.service_name(), self.service_version())
    }
}

/// Cache key identifying one service client instance: name plus version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey {
    pub name: &'static str,
    pub version: &'static str,
}

impl ServiceKey {
    #[must_use]
    pub fn of(info: &dyn ServiceInfo) -> Self {
        Self {
            name: info.service_name(),
            version: info.service_version(),
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// Boxed stream of transformed server-streaming items.
pub type SdkStream<T> = Pin<Box<dyn Stream<Item = Result<T, SdkError>> + Send + 'static>>;

/// Shared state threaded into every call a service client makes.
#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) key: ServiceKey,
    pub(crate) api_key: Option<String>,
    pub(crate) executor: Executor,
}

impl ServiceContext {
    fn prepare<R>(&self, rpc: AsyncRpc<R>, method: &'static str) -> PreparedCall<R> {
        let (request, timeout, context) = rpc.into_parts();
        let mut request = Request::new(request);

        let mut status = None;
        if let Some(api_key) = &self.api_key {
            status = attach_api_key(request.metadata_mut(), api_key).err();
        }
        if status.is_none() {
            if let Some(ctx) = context {
                status = ctx.apply(request.metadata_mut()).err();
            }
        }

        PreparedCall {
            request,
            timeout,
            error: status.map(|status| SdkError::RpcExecution { method, status }),
        }
    }
}

struct PreparedCall<R> {
    request: Request<R>,
    timeout: std::time::Duration,
    error: Option<SdkError>,
}

/// Execute a unary RPC: attach headers, enforce the timeout, transform the
/// response, and normalize failures.
pub(crate) async fn execute<Req, Res, T, F, Fut>(
    ctx: &ServiceContext,
    rpc: AsyncRpc<Req>,
    method: &'static str,
    call: F,
    transform: impl FnOnce(Res) -> T,
) -> Result<T, SdkError>
where
    F: FnOnce(Request<Req>) -> Fut,
    Fut: Future<Output = Result<Response<Res>, Status>>,
{
    let prepared = ctx.prepare(rpc, method);
    if let Some(err) = prepared.error {
        tracing::error!(service = %ctx.key, method, error = %err, "failed to prepare rpc");
        return Err(err);
    }

    let timeout = prepared.timeout;
    let span = tracing::debug_span!("rpc_call", service = %ctx.key, method);
    async move {
        match tokio::time::timeout(timeout, call(prepared.request)).await {
            Ok(Ok(response)) => Ok(transform(response.into_inner())),
            Ok(Err(status)) => {
                tracing::warn!(
                    code = ?status.code(),
                    message = %status.message(),
                    method,
                    "rpc failed"
                );
                Err(SdkError::RpcExecution { method, status })
            }
            Err(_elapsed) => {
                tracing::error!(method, timeout_ms = timeout.as_millis() as u64, "rpc timed out");
                Err(SdkError::RpcTimeout { method, timeout })
            }
        }
    }
    .instrument(span)
    .await
}

/// Execute a server-streaming RPC.
///
/// The operation timeout covers stream establishment; once the stream is
/// open, items flow until the server half-closes. Each response message is
/// flattened into zero or more items via `transform`.
pub(crate) async fn execute_stream<Req, Res, T, F, Fut>(
    ctx: &ServiceContext,
    rpc: AsyncRpc<Req>,
    method: &'static str,
    call: F,
    transform: impl Fn(Res) -> Vec<T> + Send + 'static,
) -> Result<SdkStream<T>, SdkError>
where
    Req: Send + 'static,
    Res: Send + 'static,
    T: Send + 'static,
    F: FnOnce(Request<Req>) -> Fut,
    Fut: Future<Output = Result<Response<Streaming<Res>>, Status>>,
{
    let stream = execute(ctx, rpc, method, call, |streaming| streaming).await?;

    let flattened = stream.flat_map(move |item| match item {
        Ok(response) => futures::stream::iter(transform(response).into_iter().map(Ok)).boxed(),
        Err(status) => {
            futures::stream::once(async move { Err(SdkError::RpcExecution { method, status }) })
                .boxed()
        }
    });

    Ok(Box::pin(flattened))
}

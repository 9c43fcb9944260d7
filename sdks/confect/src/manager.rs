//! SDK manager: shared channel, executor, and the per-fingerprint service
//! cache.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use tonic::transport::Channel;

use confect_transport_grpc::client::{connect_lazy, connect_with_retry};

use crate::catalog::CatalogClient;
use crate::catalog::v1::CatalogClientV1;
use crate::config::SdkConfig;
use crate::errors::SdkError;
use crate::executor::Executor;
use crate::services::ServiceKey;
use crate::storefront::Storefront;
use crate::storefront::v1::{MenuClientV1, ProfileClientV1};

/// Entry point for the Confect SDK.
///
/// A manager owns one lazily-connected channel to the configured endpoint
/// and caches one client instance per service fingerprint (name+version).
/// Managers are cheap to share behind an `Arc`; service clients returned
/// from the accessors are cached and reused.
pub struct SdkManager {
    config: SdkConfig,
    channel: Channel,
    executor: Executor,
    services: DashMap<ServiceKey, Arc<dyn Any + Send + Sync>>,
    closed: AtomicBool,
}

impl SdkManager {
    /// Build a manager from configuration.
    ///
    /// The transport channel is created lazily; no network traffic happens
    /// until the first call (or an explicit [`SdkManager::connect`]).
    ///
    /// # Errors
    /// Returns [`SdkError::Setup`] when the endpoint URI is invalid or the
    /// shared runtime cannot be spawned.
    pub fn new(config: SdkConfig) -> Result<Self, SdkError> {
        let executor = match config.runtime_handle() {
            Some(handle) => Executor::from_handle(handle.clone()),
            None => Executor::shared()?,
        };
        let channel =
            connect_lazy(config.endpoint(), &config.channel_config()).map_err(SdkError::setup)?;

        Ok(Self {
            config,
            channel,
            executor,
            services: DashMap::new(),
            closed: AtomicBool::new(false),
        })
    }

    /// Eagerly establish (and validate) the transport connection, with
    /// retry/backoff.
    ///
    /// # Errors
    /// Returns [`SdkError::Setup`] when the endpoint stays unreachable after
    /// all retries.
    pub async fn connect(&self) -> Result<(), SdkError> {
        connect_with_retry(self.config.endpoint(), &self.config.channel_config())
            .await
            .map(|_channel| ())
            .map_err(SdkError::Setup)
    }

    /// Active configuration for this manager.
    #[must_use]
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// True once [`SdkManager::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Close the manager: further service resolution fails with
    /// [`SdkError::Closed`] and cached clients are released. Idempotent.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.services.clear();
        }
    }

    /// Resolve a cached service client, constructing and registering it on
    /// first use.
    fn resolve<S>(
        &self,
        key: ServiceKey,
        make: impl FnOnce() -> Result<S, SdkError>,
    ) -> Result<Arc<S>, SdkError>
    where
        S: Send + Sync + 'static,
    {
        if self.is_closed() {
            tracing::error!(service = %key, "cannot resolve service: manager is closed");
            return Err(SdkError::Closed);
        }

        if let Some(entry) = self.services.get(&key) {
            if let Ok(service) = Arc::clone(entry.value()).downcast::<S>() {
                tracing::debug!(service = %key, "using cached service");
                return Ok(service);
            }
        }

        // The entry API makes construct-and-register atomic, so racing
        // callers all end up with the same instance.
        let entry = self.services.entry(key).or_try_insert_with(|| {
            tracing::debug!(service = %key, "creating registered service");
            make().map(|service| Arc::new(service) as Arc<dyn Any + Send + Sync>)
        })?;

        Arc::clone(entry.value()).downcast::<S>().map_err(|_| {
            SdkError::setup(anyhow::anyhow!("cached service '{key}' has the wrong type"))
        })
    }

    /// The Catalog API client (`catalog:v1`), cached per manager.
    ///
    /// # Errors
    /// Returns [`SdkError::Closed`] after [`SdkManager::close`].
    pub fn catalog(&self) -> Result<Arc<dyn CatalogClient>, SdkError> {
        let client = self.resolve(CatalogClientV1::key(), || {
            Ok(CatalogClientV1::configure(
                self.channel.clone(),
                &self.config,
                self.executor.clone(),
            ))
        })?;
        Ok(client)
    }

    /// The Storefront facade, bundling cached menu (`menu:v1`) and profile
    /// (`profile:v1`) clients.
    ///
    /// # Errors
    /// Returns [`SdkError::Closed`] after [`SdkManager::close`].
    pub fn storefront(&self) -> Result<Storefront, SdkError> {
        let menu = self.resolve(MenuClientV1::key(), || {
            Ok(MenuClientV1::configure(
                self.channel.clone(),
                &self.config,
                self.executor.clone(),
            ))
        })?;
        let profile = self.resolve(ProfileClientV1::key(), || {
            Ok(ProfileClientV1::configure(
                self.channel.clone(),
                &self.config,
                self.executor.clone(),
            ))
        })?;
        Ok(Storefront::with_services(menu, profile))
    }
}

impl std::fmt::Debug for SdkManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkManager")
            .field("endpoint", &self.config.endpoint())
            .field("services", &self.services.len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

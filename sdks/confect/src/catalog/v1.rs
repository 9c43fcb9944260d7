//! Catalog API client, version 1.

use async_trait::async_trait;
use tonic::transport::Channel;

use confect_schema_grpc::catalog::v1::catalog_v1_client::CatalogV1Client;
use confect_schema_grpc::catalog::v1::{
    Brand, BrandsRequest, CatalogProduct, FinalProduct, MultiProductRequest, ProductRequest,
    Strain, StrainsRequest,
};

use crate::catalog::CatalogClient;
use crate::config::SdkConfig;
use crate::errors::SdkError;
use crate::executor::Executor;
use crate::rpc::{AsyncRpc, SyncRpc};
use crate::services::{SdkStream, ServiceContext, ServiceInfo, ServiceKey, execute, execute_stream};

pub const NAME: &str = "catalog";
pub const VERSION: &str = "v1";

/// Service info for the Catalog API, version 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogServiceInfo;

impl ServiceInfo for CatalogServiceInfo {
    fn service_name(&self) -> &'static str {
        NAME
    }

    fn service_version(&self) -> &'static str {
        VERSION
    }
}

/// Catalog API client over the generated gRPC stub.
pub struct CatalogClientV1 {
    stub: CatalogV1Client<Channel>,
    ctx: ServiceContext,
}

impl CatalogClientV1 {
    /// Cache fingerprint for this service.
    #[must_use]
    pub fn key() -> ServiceKey {
        ServiceKey::of(&CatalogServiceInfo)
    }

    /// Service descriptor for this client.
    #[must_use]
    pub fn info() -> CatalogServiceInfo {
        CatalogServiceInfo
    }

    pub(crate) fn configure(channel: Channel, config: &SdkConfig, executor: Executor) -> Self {
        Self {
            stub: CatalogV1Client::new(channel),
            ctx: ServiceContext {
                key: Self::key(),
                api_key: config.api_key().map(str::to_owned),
                executor,
            },
        }
    }

    /// Build a client directly over a channel, bypassing the SDK manager.
    ///
    /// Intended for tests and advanced integrations; no API key is attached.
    ///
    /// # Errors
    /// Returns [`SdkError::Setup`] when the shared runtime cannot be spawned.
    pub fn for_channel(channel: Channel) -> Result<Self, SdkError> {
        Ok(Self {
            stub: CatalogV1Client::new(channel),
            ctx: ServiceContext {
                key: Self::key(),
                api_key: None,
                executor: Executor::shared()?,
            },
        })
    }
}

#[async_trait]
impl CatalogClient for CatalogClientV1 {
    async fn brands(&self, rpc: AsyncRpc<BrandsRequest>) -> Result<Vec<Brand>, SdkError> {
        let mut stub = self.stub.clone();
        execute(
            &self.ctx,
            rpc,
            "confect.catalog.v1.CatalogV1/Brands",
            move |req| async move { stub.brands(req).await },
            |res| res.brand,
        )
        .await
    }

    fn brands_blocking(&self, rpc: SyncRpc<BrandsRequest>) -> Result<Vec<Brand>, SdkError> {
        self.ctx.executor.clone().block_on(self.brands(rpc.into_async()))
    }

    async fn strains(&self, rpc: AsyncRpc<StrainsRequest>) -> Result<Vec<Strain>, SdkError> {
        let mut stub = self.stub.clone();
        execute(
            &self.ctx,
            rpc,
            "confect.catalog.v1.CatalogV1/Strains",
            move |req| async move { stub.strains(req).await },
            |res| res.strain,
        )
        .await
    }

    fn strains_blocking(&self, rpc: SyncRpc<StrainsRequest>) -> Result<Vec<Strain>, SdkError> {
        self.ctx.executor.clone().block_on(self.strains(rpc.into_async()))
    }

    async fn product(
        &self,
        rpc: AsyncRpc<ProductRequest>,
    ) -> Result<Option<FinalProduct>, SdkError> {
        let mut stub = self.stub.clone();
        execute(
            &self.ctx,
            rpc,
            "confect.catalog.v1.CatalogV1/Product",
            move |req| async move { stub.product(req).await },
            |res| res.product,
        )
        .await
    }

    fn product_blocking(
        &self,
        rpc: SyncRpc<ProductRequest>,
    ) -> Result<Option<FinalProduct>, SdkError> {
        self.ctx.executor.clone().block_on(self.product(rpc.into_async()))
    }

    async fn sync(
        &self,
        rpc: AsyncRpc<MultiProductRequest>,
    ) -> Result<SdkStream<CatalogProduct>, SdkError> {
        let mut stub = self.stub.clone();
        execute_stream(
            &self.ctx,
            rpc,
            "confect.catalog.v1.CatalogV1/Sync",
            move |req| async move { stub.sync(req).await },
            |res| res.product,
        )
        .await
    }
}

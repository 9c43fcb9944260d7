//! Catalog API surface.

pub mod v1;

use async_trait::async_trait;

use confect_schema_grpc::catalog::v1::{
    Brand, BrandsRequest, CatalogProduct, FinalProduct, MultiProductRequest, ProductRequest,
    Strain, StrainsRequest,
};

use crate::errors::SdkError;
use crate::rpc::{AsyncRpc, SyncRpc};
use crate::services::SdkStream;

/// Typed client for the Catalog API.
///
/// Unary operations come in async and blocking pairs; the blocking variants
/// run the async path to completion on the SDK executor and must not be
/// invoked from inside an async context.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch all known brands.
    async fn brands(&self, rpc: AsyncRpc<BrandsRequest>) -> Result<Vec<Brand>, SdkError>;

    /// Blocking variant of [`CatalogClient::brands`].
    fn brands_blocking(&self, rpc: SyncRpc<BrandsRequest>) -> Result<Vec<Brand>, SdkError>;

    /// Fetch all known strains, optionally filtered by product line.
    async fn strains(&self, rpc: AsyncRpc<StrainsRequest>) -> Result<Vec<Strain>, SdkError>;

    /// Blocking variant of [`CatalogClient::strains`].
    fn strains_blocking(&self, rpc: SyncRpc<StrainsRequest>) -> Result<Vec<Strain>, SdkError>;

    /// Fetch a single product by ID; absent products resolve to `None`.
    async fn product(
        &self,
        rpc: AsyncRpc<ProductRequest>,
    ) -> Result<Option<FinalProduct>, SdkError>;

    /// Blocking variant of [`CatalogClient::product`].
    fn product_blocking(
        &self,
        rpc: SyncRpc<ProductRequest>,
    ) -> Result<Option<FinalProduct>, SdkError>;

    /// Stream catalog products in bulk for downstream synchronization.
    ///
    /// The operation timeout covers stream establishment. Async only, as the
    /// item flow is unbounded.
    async fn sync(
        &self,
        rpc: AsyncRpc<MultiProductRequest>,
    ) -> Result<SdkStream<CatalogProduct>, SdkError>;
}

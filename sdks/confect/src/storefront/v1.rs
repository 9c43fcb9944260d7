//! Storefront API clients, version 1.

use async_trait::async_trait;
use tonic::Code;
use tonic::transport::Channel;

use confect_schema_grpc::store::v1::menu_v1_client::MenuV1Client;
use confect_schema_grpc::store::v1::profile_v1_client::ProfileV1Client;
use confect_schema_grpc::store::v1::{
    MenuRequest, MenuResponse, MenuSearchRequest, MenuSearchResultset, ProductGroupRequest,
    ProductGroupResponse, ProfileRequest, ProfileResponse, ProfileUpdateRequest, StoreUser,
    UsernameCheckRequest,
};

use crate::config::SdkConfig;
use crate::errors::{SdkError, UsernameCheckError};
use crate::executor::Executor;
use crate::rpc::{AsyncRpc, SyncRpc};
use crate::services::{ServiceContext, ServiceInfo, ServiceKey, execute};
use crate::storefront::{MenuClient, ProfileClient};

/// Service info for the Storefront Menu API, version 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuServiceInfo;

impl ServiceInfo for MenuServiceInfo {
    fn service_name(&self) -> &'static str {
        "menu"
    }

    fn service_version(&self) -> &'static str {
        "v1"
    }
}

/// Service info for the Storefront Profile API, version 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileServiceInfo;

impl ServiceInfo for ProfileServiceInfo {
    fn service_name(&self) -> &'static str {
        "profile"
    }

    fn service_version(&self) -> &'static str {
        "v1"
    }

    fn authorization_required(&self) -> bool {
        true
    }
}

/// Storefront Menu API client over the generated gRPC stub.
pub struct MenuClientV1 {
    stub: MenuV1Client<Channel>,
    ctx: ServiceContext,
}

impl MenuClientV1 {
    /// Cache fingerprint for this service.
    #[must_use]
    pub fn key() -> ServiceKey {
        ServiceKey::of(&MenuServiceInfo)
    }

    /// Service descriptor for this client.
    #[must_use]
    pub fn info() -> MenuServiceInfo {
        MenuServiceInfo
    }

    pub(crate) fn configure(channel: Channel, config: &SdkConfig, executor: Executor) -> Self {
        Self {
            stub: MenuV1Client::new(channel),
            ctx: ServiceContext {
                key: Self::key(),
                api_key: config.api_key().map(str::to_owned),
                executor,
            },
        }
    }

    /// Build a client directly over a channel, bypassing the SDK manager.
    ///
    /// # Errors
    /// Returns [`SdkError::Setup`] when the shared runtime cannot be spawned.
    pub fn for_channel(channel: Channel) -> Result<Self, SdkError> {
        Ok(Self {
            stub: MenuV1Client::new(channel),
            ctx: ServiceContext {
                key: Self::key(),
                api_key: None,
                executor: Executor::shared()?,
            },
        })
    }
}

#[async_trait]
impl MenuClient for MenuClientV1 {
    async fn menu(&self, rpc: AsyncRpc<MenuRequest>) -> Result<MenuResponse, SdkError> {
        let mut stub = self.stub.clone();
        execute(
            &self.ctx,
            rpc,
            "confect.store.v1.MenuV1/Menu",
            move |req| async move { stub.menu(req).await },
            |res| res,
        )
        .await
    }

    fn menu_blocking(&self, rpc: SyncRpc<MenuRequest>) -> Result<MenuResponse, SdkError> {
        self.ctx.executor.clone().block_on(self.menu(rpc.into_async()))
    }

    async fn search(
        &self,
        rpc: AsyncRpc<MenuSearchRequest>,
    ) -> Result<MenuSearchResultset, SdkError> {
        let mut stub = self.stub.clone();
        execute(
            &self.ctx,
            rpc,
            "confect.store.v1.MenuV1/MenuSearch",
            move |req| async move { stub.menu_search(req).await },
            |res| res.resultset.unwrap_or_default(),
        )
        .await
    }

    fn search_blocking(
        &self,
        rpc: SyncRpc<MenuSearchRequest>,
    ) -> Result<MenuSearchResultset, SdkError> {
        self.ctx.executor.clone().block_on(self.search(rpc.into_async()))
    }

    async fn product_group(
        &self,
        rpc: AsyncRpc<ProductGroupRequest>,
    ) -> Result<ProductGroupResponse, SdkError> {
        let mut stub = self.stub.clone();
        execute(
            &self.ctx,
            rpc,
            "confect.store.v1.MenuV1/ProductFetch",
            move |req| async move { stub.product_fetch(req).await },
            |res| res,
        )
        .await
    }

    fn product_group_blocking(
        &self,
        rpc: SyncRpc<ProductGroupRequest>,
    ) -> Result<ProductGroupResponse, SdkError> {
        self.ctx
            .executor
            .clone()
            .block_on(self.product_group(rpc.into_async()))
    }
}

/// Storefront Profile API client over the generated gRPC stub.
pub struct ProfileClientV1 {
    stub: ProfileV1Client<Channel>,
    ctx: ServiceContext,
}

impl ProfileClientV1 {
    /// Cache fingerprint for this service.
    #[must_use]
    pub fn key() -> ServiceKey {
        ServiceKey::of(&ProfileServiceInfo)
    }

    /// Service descriptor for this client.
    #[must_use]
    pub fn info() -> ProfileServiceInfo {
        ProfileServiceInfo
    }

    pub(crate) fn configure(channel: Channel, config: &SdkConfig, executor: Executor) -> Self {
        Self {
            stub: ProfileV1Client::new(channel),
            ctx: ServiceContext {
                key: Self::key(),
                api_key: config.api_key().map(str::to_owned),
                executor,
            },
        }
    }

    /// Build a client directly over a channel, bypassing the SDK manager.
    ///
    /// # Errors
    /// Returns [`SdkError::Setup`] when the shared runtime cannot be spawned.
    pub fn for_channel(channel: Channel) -> Result<Self, SdkError> {
        Ok(Self {
            stub: ProfileV1Client::new(channel),
            ctx: ServiceContext {
                key: Self::key(),
                api_key: None,
                executor: Executor::shared()?,
            },
        })
    }
}

#[async_trait]
impl ProfileClient for ProfileClientV1 {
    async fn username_check(
        &self,
        rpc: AsyncRpc<UsernameCheckRequest>,
    ) -> Result<bool, SdkError> {
        let mut stub = self.stub.clone();
        let result = execute(
            &self.ctx,
            rpc,
            "confect.store.v1.ProfileV1/ProfileUsernameCheck",
            move |req| async move { stub.profile_username_check(req).await },
            |res| res.available,
        )
        .await;

        match result {
            Ok(available) => Ok(available),
            Err(SdkError::RpcExecution { method, status }) => match status.code() {
                // The account has not been activated yet, a prerequisite for
                // picking a username.
                Code::FailedPrecondition => Err(UsernameCheckError::Ineligible.into()),

                // Not taken, but rejected for policy reasons.
                Code::InvalidArgument => Err(UsernameCheckError::Invalid.into()),

                // Taken by another user: a negative answer, not an error.
                Code::AlreadyExists => Ok(false),

                _ => Err(SdkError::RpcExecution { method, status }),
            },
            Err(other) => Err(other),
        }
    }

    fn username_check_blocking(&self, username: &str) -> Result<bool, SdkError> {
        let rpc = SyncRpc::of(UsernameCheckRequest {
            username: username.to_owned(),
        });
        self.ctx
            .executor
            .clone()
            .block_on(self.username_check(rpc.into_async()))
    }

    async fn fetch(
        &self,
        rpc: AsyncRpc<ProfileRequest>,
    ) -> Result<Option<ProfileResponse>, SdkError> {
        let mut stub = self.stub.clone();
        let result = execute(
            &self.ctx,
            rpc,
            "confect.store.v1.ProfileV1/Profile",
            move |req| async move { stub.profile(req).await },
            Some,
        )
        .await;

        match result {
            Err(SdkError::RpcExecution { status, .. }) if status.code() == Code::NotFound => {
                Ok(None)
            }
            other => other,
        }
    }

    fn fetch_blocking(
        &self,
        rpc: SyncRpc<ProfileRequest>,
    ) -> Result<Option<ProfileResponse>, SdkError> {
        self.ctx.executor.clone().block_on(self.fetch(rpc.into_async()))
    }

    async fn update(&self, rpc: AsyncRpc<ProfileUpdateRequest>) -> Result<StoreUser, SdkError> {
        let mut stub = self.stub.clone();
        execute(
            &self.ctx,
            rpc,
            "confect.store.v1.ProfileV1/ProfileUpdate",
            move |req| async move { stub.profile_update(req).await },
            |res| res.user.unwrap_or_default(),
        )
        .await
    }

    fn update_blocking(&self, rpc: SyncRpc<ProfileUpdateRequest>) -> Result<StoreUser, SdkError> {
        self.ctx.executor.clone().block_on(self.update(rpc.into_async()))
    }
}

//! Storefront API surface: menu and profile clients.

pub mod v1;

use std::sync::Arc;

use async_trait::async_trait;

use confect_schema_grpc::catalog::v1::ProductLine;
use confect_schema_grpc::store::v1::{
    MenuRequest, MenuResponse, MenuSearchRequest, MenuSearchResultset, ProductContext,
    ProductGroupRequest, ProductGroupResponse, ProfileRequest, ProfileResponse,
    ProfileUpdateRequest, StoreKey, StoreUser, UserLocation, UsernameCheckRequest,
};

use crate::errors::SdkError;
use crate::rpc::{AsyncRpc, SyncRpc};
use crate::storefront::v1::{MenuClientV1, ProfileClientV1};

/// Locale applied to menu requests when the caller does not pick one.
pub const DEFAULT_LOCALE: &str = "en-US";

const DEFAULT_PRODUCT_LINES: [ProductLine; 5] = [
    ProductLine::Thc,
    ProductLine::Cbd,
    ProductLine::Mushrooms,
    ProductLine::Apparel,
    ProductLine::Merchandise,
];

/// Declarative options for a storefront menu fetch.
///
/// A spec captures the caller's intent (locale, store, location, product
/// lines, keys-only) and converts into the wire-level [`MenuRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct MenuRequestSpec {
    locale: String,
    location: Option<UserLocation>,
    store_key: Option<StoreKey>,
    user_id: Option<String>,
    keys_only: bool,
    product_lines: Vec<ProductLine>,
}

impl MenuRequestSpec {
    fn new(
        locale: impl Into<String>,
        location: Option<UserLocation>,
        store_key: Option<StoreKey>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            locale: locale.into(),
            location,
            store_key,
            user_id,
            keys_only: false,
            product_lines: DEFAULT_PRODUCT_LINES.to_vec(),
        }
    }

    /// Default spec: default locale, no store, full product line set.
    #[must_use]
    pub fn defaults() -> Self {
        Self::new(DEFAULT_LOCALE, None, None, None)
    }

    /// Spec for a specific locale.
    #[must_use]
    pub fn for_locale(locale: impl Into<String>) -> Self {
        Self::new(locale, None, None, None)
    }

    /// Spec targeting a specific store, default locale.
    #[must_use]
    pub fn for_store(key: StoreKey) -> Self {
        Self::new(DEFAULT_LOCALE, None, Some(key), None)
    }

    /// Spec targeting a specific store and locale.
    #[must_use]
    pub fn for_store_locale(key: StoreKey, locale: impl Into<String>) -> Self {
        Self::new(locale, None, Some(key), None)
    }

    /// Spec anchored to the user's location, default locale.
    #[must_use]
    pub fn for_user_location(location: UserLocation) -> Self {
        Self::new(DEFAULT_LOCALE, None, None, None).with_location(location)
    }

    /// Attach the user's location.
    #[must_use]
    pub fn with_location(mut self, location: UserLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach the user's account ID.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Request matching keys only instead of full records.
    #[must_use]
    pub fn keys_only(mut self, keys_only: bool) -> Self {
        self.keys_only = keys_only;
        self
    }

    /// Drop all product line filters.
    #[must_use]
    pub fn clear_product_lines(mut self) -> Self {
        self.product_lines.clear();
        self
    }

    /// Add product lines to the filter set.
    #[must_use]
    pub fn add_product_lines(mut self, lines: &[ProductLine]) -> Self {
        for line in lines {
            if !self.product_lines.contains(line) {
                self.product_lines.push(*line);
            }
        }
        self
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn store_key(&self) -> Option<&StoreKey> {
        self.store_key.as_ref()
    }

    pub fn location(&self) -> Option<&UserLocation> {
        self.location.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn is_keys_only(&self) -> bool {
        self.keys_only
    }

    #[must_use]
    pub fn product_lines(&self) -> &[ProductLine] {
        &self.product_lines
    }

    /// Convert into the wire-level menu request.
    #[must_use]
    pub fn into_request(self) -> MenuRequest {
        MenuRequest {
            line: self.product_lines.iter().map(|line| *line as i32).collect(),
            location: self.location,
            store: self.store_key,
            keys_only: self.keys_only,
            context: Some(ProductContext {
                locale: self.locale,
            }),
        }
    }
}

impl Default for MenuRequestSpec {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Typed client for the Storefront Menu API.
#[async_trait]
pub trait MenuClient: Send + Sync {
    /// Fetch a menu using declarative [`MenuRequestSpec`] options.
    async fn menu_with(&self, spec: MenuRequestSpec) -> Result<MenuResponse, SdkError> {
        self.menu(AsyncRpc::of(spec.into_request())).await
    }

    /// Fetch a full storefront menu.
    async fn menu(&self, rpc: AsyncRpc<MenuRequest>) -> Result<MenuResponse, SdkError>;

    /// Blocking variant of [`MenuClient::menu`].
    fn menu_blocking(&self, rpc: SyncRpc<MenuRequest>) -> Result<MenuResponse, SdkError>;

    /// Search a storefront menu.
    async fn search(
        &self,
        rpc: AsyncRpc<MenuSearchRequest>,
    ) -> Result<MenuSearchResultset, SdkError>;

    /// Blocking variant of [`MenuClient::search`].
    fn search_blocking(
        &self,
        rpc: SyncRpc<MenuSearchRequest>,
    ) -> Result<MenuSearchResultset, SdkError>;

    /// Fetch a single product group from a storefront menu.
    async fn product_group(
        &self,
        rpc: AsyncRpc<ProductGroupRequest>,
    ) -> Result<ProductGroupResponse, SdkError>;

    /// Blocking variant of [`MenuClient::product_group`].
    fn product_group_blocking(
        &self,
        rpc: SyncRpc<ProductGroupRequest>,
    ) -> Result<ProductGroupResponse, SdkError>;
}

/// Typed client for the Storefront Profile API.
#[async_trait]
pub trait ProfileClient: Send + Sync {
    /// Check whether a username is available for registration.
    ///
    /// Semantics of the server's answer:
    /// - success → availability flag,
    /// - `ALREADY_EXISTS` → `Ok(false)` (taken, not an error),
    /// - `FAILED_PRECONDITION` → [`crate::UsernameCheckError::Ineligible`],
    /// - `INVALID_ARGUMENT` → [`crate::UsernameCheckError::Invalid`].
    async fn username_check(
        &self,
        rpc: AsyncRpc<UsernameCheckRequest>,
    ) -> Result<bool, SdkError>;

    /// Blocking convenience: check a bare username string.
    fn username_check_blocking(&self, username: &str) -> Result<bool, SdkError>;

    /// Fetch a user profile; `NOT_FOUND` resolves to `None`.
    async fn fetch(&self, rpc: AsyncRpc<ProfileRequest>)
    -> Result<Option<ProfileResponse>, SdkError>;

    /// Blocking variant of [`ProfileClient::fetch`].
    fn fetch_blocking(
        &self,
        rpc: SyncRpc<ProfileRequest>,
    ) -> Result<Option<ProfileResponse>, SdkError>;

    /// Update the calling user's profile.
    async fn update(&self, rpc: AsyncRpc<ProfileUpdateRequest>) -> Result<StoreUser, SdkError>;

    /// Blocking variant of [`ProfileClient::update`].
    fn update_blocking(&self, rpc: SyncRpc<ProfileUpdateRequest>) -> Result<StoreUser, SdkError>;
}

/// Storefront facade bundling the cached menu and profile clients.
#[derive(Clone)]
pub struct Storefront {
    menu: Arc<MenuClientV1>,
    profile: Arc<ProfileClientV1>,
}

impl Storefront {
    pub(crate) fn with_services(menu: Arc<MenuClientV1>, profile: Arc<ProfileClientV1>) -> Self {
        Self { menu, profile }
    }

    /// The Storefront Menu API client.
    #[must_use]
    pub fn menu(&self) -> Arc<dyn MenuClient> {
        self.menu.clone()
    }

    /// The Storefront Profile API client.
    #[must_use]
    pub fn profile(&self) -> Arc<dyn ProfileClient> {
        self.profile.clone()
    }

    /// Concrete v1 menu client, for callers that need the full type.
    #[must_use]
    pub fn menu_v1(&self) -> Arc<MenuClientV1> {
        self.menu.clone()
    }

    /// Concrete v1 profile client, for callers that need the full type.
    #[must_use]
    pub fn profile_v1(&self) -> Arc<ProfileClientV1> {
        self.profile.clone()
    }
}

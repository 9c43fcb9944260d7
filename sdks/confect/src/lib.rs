//! Confect Platform client SDK.
//!
//! Wraps the platform's gRPC services (Catalog API, Storefront Menu and
//! Profile APIs) behind a facade with synchronous and asynchronous call
//! variants, shared configuration, per-service client caching, and
//! timeout/error normalization.
//!
//! ```no_run
//! use confect_sdk::rpc::AsyncRpc;
//! use confect_sdk::schema::catalog::v1::BrandsRequest;
//! use confect_sdk::{SdkConfig, SdkManager};
//!
//! # async fn example() -> Result<(), confect_sdk::SdkError> {
//! let manager = SdkManager::new(
//!     SdkConfig::builder().api_key("cnf_live_...").build(),
//! )?;
//!
//! let catalog = manager.catalog()?;
//! let brands = catalog.brands(AsyncRpc::of(BrandsRequest::default())).await?;
//! println!("{} brands", brands.len());
//! # Ok(())
//! # }
//! ```
//!
//! Every operation also has a blocking variant (`*_blocking`) that runs the
//! async path on the SDK executor; blocking variants must not be called from
//! inside an async context.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod catalog;
pub mod config;
pub mod errors;
pub mod executor;
pub mod manager;
pub mod rpc;
pub mod services;
pub mod storefront;

pub use catalog::CatalogClient;
pub use config::{DEFAULT_API_ENDPOINT, SDK_USER_AGENT, SdkConfig, SdkConfigBuilder};
pub use errors::{SdkError, UsernameCheckError};
pub use executor::Executor;
pub use manager::SdkManager;
pub use rpc::{AsyncRpc, CallContext, SyncRpc};
pub use services::{SdkStream, ServiceInfo, ServiceKey};
pub use storefront::{MenuClient, MenuRequestSpec, ProfileClient, Storefront};

/// Re-exported message and stub types for the wrapped APIs.
pub use confect_schema_grpc as schema;

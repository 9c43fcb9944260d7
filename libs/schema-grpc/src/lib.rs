//! Generated gRPC stubs for the Confect Platform APIs.
//!
//! Client stubs are consumed by the SDK crate; server stubs are kept so test
//! suites can stand up in-process mock services.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(clippy::enum_glob_use, clippy::wildcard_imports)]

/// Catalog API schema and stubs.
pub mod catalog {
    pub mod v1 {
        tonic::include_proto!("confect.catalog.v1");
    }
}

/// Storefront (menu/profile) API schema and stubs.
pub mod store {
    pub mod v1 {
        tonic::include_proto!("confect.store.v1");
    }
}

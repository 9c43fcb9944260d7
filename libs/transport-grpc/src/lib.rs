#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod client;

/// Header carrying the caller's designated API key.
pub const API_KEY_METADATA_KEY: &str = "x-api-key";

use tonic::Status;
use tonic::metadata::{MetadataMap, MetadataValue};

/// Insert the configured API key into gRPC request metadata.
pub fn attach_api_key(meta: &mut MetadataMap, api_key: &str) -> Result<(), Status> {
    let value: MetadataValue<_> = api_key
        .parse()
        .map_err(|_| Status::internal("api key is not valid metadata"))?;

    meta.insert(API_KEY_METADATA_KEY, value);
    Ok(())
}

/// Read the API key back out of gRPC request metadata, if present.
///
/// Used by test doubles to assert that the SDK propagated credentials.
pub fn extract_api_key(meta: &MetadataMap) -> Option<&str> {
    meta.get(API_KEY_METADATA_KEY).and_then(|v| v.to_str().ok())
}

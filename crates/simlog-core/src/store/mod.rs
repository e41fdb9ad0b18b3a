//! Read-only object storage access for job metadata.
//!
//! Training jobs point at two JSON documents in S3: the model metadata file
//! (action space) and the shared `hyperparameters.json`. This module fetches
//! and decodes them. Besides S3 it supports a local directory and an
//! in-memory backend, both of which lay buckets out as top-level folders.

pub mod error;
pub mod naming;
pub mod object_store_backend;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

pub use error::{StoreError, StoreResult};
pub use naming::ObjectLocation;
pub use object_store_backend::ObjectStoreMetadataStore;

/// Parsed store specification from CLI/config.
///
/// # Examples
///
/// ```text
/// s3://                    (bucket taken from each job)
/// s3://?region=eu-west-1
/// file:///tmp/simlog-store (bucket = first directory level)
/// memory://                (for testing)
/// ```
#[derive(Debug, Clone)]
pub struct StoreSpec {
    /// The scheme (s3, file, memory)
    pub scheme: String,
    /// Base path for file stores; ignored for S3.
    pub prefix: String,
    /// Optional region (for S3)
    pub region: Option<String>,
}

impl StoreSpec {
    /// Parse a store URL like `s3://` or `file:///path`.
    pub fn parse(url: &str) -> StoreResult<Self> {
        let parsed = url::Url::parse(url).map_err(|e| StoreError::InvalidSpec {
            spec: url.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = parsed.scheme().to_string();
        let host = parsed.host_str().unwrap_or_default();
        let path = parsed.path().trim_matches('/');
        let prefix = match (host.is_empty(), path.is_empty()) {
            (true, _) => path.to_string(),
            (false, true) => host.to_string(),
            (false, false) => format!("{}/{}", host, path),
        };

        let region = parsed
            .query_pairs()
            .find(|(k, _)| k == "region")
            .map(|(_, v)| v.to_string());

        Ok(Self {
            scheme,
            prefix,
            region,
        })
    }
}

/// Read access to job metadata objects.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Raw bytes of an object.
    ///
    /// # Returns
    ///
    /// - `Ok(Bytes)` with the object contents
    /// - `Err(StoreError::NotFound)` if the object doesn't exist
    async fn get_object(&self, location: &ObjectLocation) -> StoreResult<Bytes>;

    /// Object decoded as UTF-8 text and parsed as JSON.
    async fn get_json(&self, location: &ObjectLocation) -> StoreResult<Value> {
        let bytes = self.get_object(location).await?;
        let text = std::str::from_utf8(&bytes).map_err(|e| StoreError::InvalidContent {
            location: location.to_string(),
            reason: format!("not UTF-8: {}", e),
        })?;
        serde_json::from_str(text).map_err(|e| StoreError::InvalidContent {
            location: location.to_string(),
            reason: e.to_string(),
        })
    }
}

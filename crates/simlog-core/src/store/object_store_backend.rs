//! Object store implementation of MetadataStore.
//!
//! S3 reads go to the bucket named by each job; local and in-memory stores
//! keep every bucket under one root.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload};
use tracing::debug;

use super::{MetadataStore, ObjectLocation, StoreError, StoreResult, StoreSpec};

enum Backend {
    /// One S3 client per bucket, built on demand from the environment.
    S3 { region: Option<String> },
    /// Every bucket is a top-level directory of one store.
    Shared(Arc<dyn ObjectStore>),
}

/// Metadata store backed by `object_store`.
///
/// Supports:
/// - S3 (credentials and region from the standard AWS environment)
/// - Local filesystem
/// - In-memory (for testing)
pub struct ObjectStoreMetadataStore {
    backend: Backend,
}

impl ObjectStoreMetadataStore {
    /// Create a store from a parsed spec.
    pub fn from_spec(spec: &StoreSpec) -> StoreResult<Self> {
        let backend = match spec.scheme.as_str() {
            "memory" => Backend::Shared(Arc::new(object_store::memory::InMemory::new())),
            "file" => {
                let path = if spec.prefix.is_empty() {
                    "/".to_string()
                } else {
                    format!("/{}", spec.prefix)
                };
                let local = object_store::local::LocalFileSystem::new_with_prefix(&path)
                    .map_err(|e| StoreError::Io {
                        message: format!("failed to open local store at {}: {}", path, e),
                    })?;
                Backend::Shared(Arc::new(local))
            }
            "s3" => Backend::S3 {
                region: spec.region.clone(),
            },
            scheme => {
                return Err(StoreError::InvalidSpec {
                    spec: spec.scheme.clone(),
                    reason: format!("unsupported scheme: {}", scheme),
                })
            }
        };

        Ok(Self { backend })
    }

    /// Create a store from a URL string.
    pub fn from_url(url: &str) -> StoreResult<Self> {
        let spec = StoreSpec::parse(url)?;
        Self::from_spec(&spec)
    }

    /// Create an in-memory store for testing.
    pub fn memory() -> Self {
        Self {
            backend: Backend::Shared(Arc::new(object_store::memory::InMemory::new())),
        }
    }

    /// Write an object. Only shared (local/memory) backends accept writes;
    /// they are used to seed fixtures.
    pub async fn put_object(&self, location: &ObjectLocation, bytes: Bytes) -> StoreResult<()> {
        match &self.backend {
            Backend::Shared(inner) => {
                let path = location.shared_path();
                inner
                    .put(&path, PutPayload::from_bytes(bytes))
                    .await
                    .map_err(|e| StoreError::from_object_store(e, &location.to_string()))?;
                Ok(())
            }
            Backend::S3 { .. } => Err(StoreError::AccessDenied {
                message: "S3 metadata store is read-only".to_string(),
            }),
        }
    }

    fn s3_client(bucket: &str, region: Option<&str>) -> StoreResult<Arc<dyn ObjectStore>> {
        let mut builder = object_store::aws::AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_allow_http(false);

        if let Some(region) = region {
            builder = builder.with_region(region);
        }

        Ok(Arc::new(builder.build().map_err(|e| StoreError::Io {
            message: format!("failed to create S3 client: {}", e),
        })?))
    }
}

#[async_trait]
impl MetadataStore for ObjectStoreMetadataStore {
    async fn get_object(&self, location: &ObjectLocation) -> StoreResult<Bytes> {
        debug!(location = %location, "reading metadata object");

        let (inner, path) = match &self.backend {
            Backend::S3 { region } => (
                Self::s3_client(&location.bucket, region.as_deref())?,
                location.key_path(),
            ),
            Backend::Shared(inner) => (inner.clone(), location.shared_path()),
        };

        let result = inner
            .get(&path)
            .await
            .map_err(|e| StoreError::from_object_store(e, &location.to_string()))?;

        result.bytes().await.map_err(|e| StoreError::Io {
            message: format!("failed to read {}: {}", location, e),
        })
    }
}

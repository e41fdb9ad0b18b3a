//! Object locations for job metadata.
//!
//! # Key Schema
//!
//! ```text
//! {METRICS_S3_BUCKET}/{MODEL_METADATA_FILE_S3_KEY}                      # action space
//! {SAGEMAKER_SHARED_S3_BUCKET}/{SAGEMAKER_SHARED_S3_PREFIX}/ip/hyperparameters.json
//! ```
//!
//! Backends that hold every bucket in one tree (local directory, memory)
//! store an object under `{bucket}/{key}`.

use std::fmt;

use object_store::path::Path;

/// A bucket + key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Location of the hyperparameters file under a shared prefix.
    ///
    /// Returns: `{bucket}/{prefix}/ip/hyperparameters.json`
    pub fn hyperparameters(bucket: impl Into<String>, prefix: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        let key = if prefix.is_empty() {
            "ip/hyperparameters.json".to_string()
        } else {
            format!("{}/ip/hyperparameters.json", prefix)
        };
        Self::new(bucket, key)
    }

    /// Path within a single-bucket store.
    pub fn key_path(&self) -> Path {
        Path::from(self.key.trim_start_matches('/'))
    }

    /// Path within a store that holds every bucket side by side.
    ///
    /// Returns: `{bucket}/{key}`
    pub fn shared_path(&self) -> Path {
        Path::from(format!("{}/{}", self.bucket, self.key.trim_start_matches('/')))
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key.trim_start_matches('/'))
    }
}

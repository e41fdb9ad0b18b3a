//! Error types for the job catalog and log parser.

use crate::store::StoreError;

/// Catalog and parser errors.
#[derive(Debug, thiserror::Error)]
pub enum SimlogError {
    /// An outbound call (job service, log service, object storage) failed.
    #[error("{service} request failed: {message}")]
    RemoteService { service: String, message: String },

    /// The caller violated a precondition.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Remote content was not in the expected shape (usually not JSON).
    #[error("malformed {what}: {message}")]
    MalformedData { what: String, message: String },

    /// The requested job id is not part of the current catalog snapshot.
    #[error("job not found: {id}")]
    SelectionNotFound { id: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl SimlogError {
    pub fn remote(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteService {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn malformed(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedData {
            what: what.into(),
            message: message.into(),
        }
    }
}

impl From<StoreError> for SimlogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidSpec { spec, reason } => Self::Config {
                message: format!("invalid store spec '{}': {}", spec, reason),
            },
            StoreError::InvalidContent { location, reason } => Self::MalformedData {
                what: format!("object {}", location),
                message: reason,
            },
            other => Self::RemoteService {
                service: "object storage".to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// Result type for catalog operations.
pub type SimlogResult<T> = Result<T, SimlogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_is_remote_error() {
        let err: SimlogError = StoreError::NotFound {
            location: "bucket/key.json".to_string(),
        }
        .into();
        assert!(matches!(err, SimlogError::RemoteService { .. }));
        assert!(err.to_string().contains("object storage"));
    }

    #[test]
    fn test_store_invalid_content_is_malformed() {
        let err: SimlogError = StoreError::InvalidContent {
            location: "bucket/key.json".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        }
        .into();
        assert!(matches!(err, SimlogError::MalformedData { .. }));
        assert!(err.to_string().contains("bucket/key.json"));
    }
}

//! Catalog configuration.

use serde::{Deserialize, Serialize};

/// Largest page the job service accepts for a single listing call.
pub const MAX_PAGE_SIZE: i32 = 100;

/// Log group RoboMaker writes simulation job logs to.
pub const DEFAULT_LOG_GROUP: &str = "/aws/robomaker/SimulationJobs";

/// Number of log events fetched per hyperparameter lookup.
pub const DEFAULT_LOG_LIMIT: i32 = 10_000;

/// Catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimlogConfig {
    /// Simulation application used to filter the job listing.
    /// `None` means "the first application the service lists".
    #[serde(default)]
    pub application_name: Option<String>,

    /// Log group searched for hyperparameter dumps.
    #[serde(default = "default_log_group")]
    pub log_group: String,

    /// Jobs fetched per listing (capped at 100).
    #[serde(default = "default_page_size")]
    pub page_size: i32,

    /// Log events fetched per lookup.
    #[serde(default = "default_log_limit")]
    pub log_limit: i32,

    /// AWS region override.
    #[serde(default)]
    pub region: Option<String>,

    /// Object storage backend (`s3://`, `file:///root`, `memory://`).
    #[serde(default = "default_store_url")]
    pub store_url: String,
}

fn default_log_group() -> String {
    DEFAULT_LOG_GROUP.to_string()
}

fn default_page_size() -> i32 {
    MAX_PAGE_SIZE
}

fn default_log_limit() -> i32 {
    DEFAULT_LOG_LIMIT
}

fn default_store_url() -> String {
    "s3://".to_string()
}

impl Default for SimlogConfig {
    fn default() -> Self {
        Self {
            application_name: None,
            log_group: default_log_group(),
            page_size: default_page_size(),
            log_limit: default_log_limit(),
            region: None,
            store_url: default_store_url(),
        }
    }
}

impl SimlogConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `SIMLOG_APPLICATION_NAME` | Simulation application filter |
    /// | `SIMLOG_LOG_GROUP` | Log group for hyperparameter lookups |
    /// | `SIMLOG_PAGE_SIZE` | Jobs per listing (max 100) |
    /// | `SIMLOG_LOG_LIMIT` | Log events per lookup |
    /// | `SIMLOG_REGION` | AWS region override |
    /// | `SIMLOG_STORE_URL` | Object storage backend |
    pub fn from_env() -> Self {
        Self {
            application_name: std::env::var("SIMLOG_APPLICATION_NAME")
                .ok()
                .filter(|v| !v.is_empty()),
            log_group: std::env::var("SIMLOG_LOG_GROUP").unwrap_or_else(|_| default_log_group()),
            page_size: std::env::var("SIMLOG_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_page_size),
            log_limit: std::env::var("SIMLOG_LOG_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_log_limit),
            region: std::env::var("SIMLOG_REGION").ok().filter(|v| !v.is_empty()),
            store_url: std::env::var("SIMLOG_STORE_URL").unwrap_or_else(|_| default_store_url()),
        }
    }

    /// Page size clamped to what the job service accepts.
    pub fn effective_page_size(&self) -> i32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Set the simulation application name.
    pub fn with_application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = Some(name.into());
        self
    }

    /// Set the log group.
    pub fn with_log_group(mut self, group: impl Into<String>) -> Self {
        self.log_group = group.into();
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the object storage URL.
    pub fn with_store_url(mut self, url: impl Into<String>) -> Self {
        self.store_url = url.into();
        self
    }
}

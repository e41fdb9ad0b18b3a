//! Remote service seams: the simulation job service and the log service.
//!
//! The catalog only talks to these traits. `aws` provides the RoboMaker and
//! CloudWatch Logs implementations; tests plug in in-memory fakes.

pub mod aws;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SimlogResult;

pub use aws::{AwsLogService, AwsSimulationService};

/// Entry of a job listing.
#[derive(Debug, Clone)]
pub struct JobSummary {
    pub arn: String,
    pub status: String,
}

/// Launch configuration of the job's simulation application.
#[derive(Debug, Clone, Default)]
pub struct LaunchConfig {
    pub launch_file: String,
    pub environment_variables: BTreeMap<String, String>,
}

impl LaunchConfig {
    pub fn env(&self, name: &str) -> Option<&str> {
        self.environment_variables.get(name).map(String::as_str)
    }
}

/// Full job record returned by a describe call.
#[derive(Debug, Clone)]
pub struct JobDescription {
    pub arn: String,
    pub status: String,
    pub max_job_duration_in_seconds: i64,
    pub last_started_at: Option<DateTime<Utc>>,
    /// Launch configuration of `simulationApplications[0]`.
    pub launch_config: LaunchConfig,
}

/// Which log streams a query covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSelector {
    Name(String),
    Prefix(String),
}

/// A resolved log query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub log_group: String,
    pub streams: StreamSelector,
    /// Epoch milliseconds, inclusive.
    pub start_time: i64,
    /// Epoch milliseconds, inclusive.
    pub end_time: i64,
    pub limit: i32,
}

/// Simulation job service.
#[async_trait]
pub trait SimulationService: Send + Sync {
    /// Names of the registered simulation applications, in service order.
    async fn list_simulation_applications(&self) -> SimlogResult<Vec<String>>;

    /// Up to `max_results` jobs run by `application_name`.
    async fn list_simulation_jobs(
        &self,
        application_name: &str,
        max_results: i32,
    ) -> SimlogResult<Vec<JobSummary>>;

    async fn describe_simulation_job(&self, arn: &str) -> SimlogResult<JobDescription>;
}

/// Log event query service.
#[async_trait]
pub trait LogService: Send + Sync {
    /// Messages of the matching events, in the order the service returns them.
    async fn filter_log_events(&self, query: &LogQuery) -> SimlogResult<Vec<String>>;
}

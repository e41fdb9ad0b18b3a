//! Simulation job catalog for RoboMaker training and evaluation runs.
//!
//! This crate provides:
//!
//! - Job listing and classification (training / evaluation) by launch file
//! - Action space and hyperparameter resolution from object storage
//! - Hyperparameter recovery from CloudWatch log streams for older jobs
//! - Text rendering of job summaries
//!
//! # Quick Start
//!
//! ```no_run
//! use simlog_core::{JobCatalog, JobType, SimlogConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let catalog = JobCatalog::from_config(SimlogConfig::from_env()).await?;
//!
//! let jobs = catalog.list_jobs(JobType::Training).await?;
//! if let Some(first) = jobs.first() {
//!     let session = catalog.select_job(&jobs, &first.id).await?;
//!     println!("{}", session.describe());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `SIMLOG_APPLICATION_NAME` | Simulation application filter (default: first listed) |
//! | `SIMLOG_LOG_GROUP` | Log group (default: `/aws/robomaker/SimulationJobs`) |
//! | `SIMLOG_PAGE_SIZE` | Jobs per listing, max 100 (default: 100) |
//! | `SIMLOG_LOG_LIMIT` | Log events per lookup (default: 10000) |
//! | `SIMLOG_REGION` | AWS region override |
//! | `SIMLOG_STORE_URL` | Metadata store (default: `s3://`) |

pub mod catalog;
pub mod config;
pub mod error;
pub mod logparse;
pub mod model;
pub mod remote;
pub mod render;
pub mod session;
pub mod store;

pub use catalog::{get_job, JobCatalog, MetadataLocations};
pub use config::SimlogConfig;
pub use error::{SimlogError, SimlogResult};
pub use logparse::{
    scan_messages, HyperparameterLogParser, HyperparameterRequest, HyperparameterScanner,
};
pub use model::{
    ActionEntry, ActionSpace, Hyperparameters, Job, JobStatus, JobType, MetadataSource,
};
pub use remote::{
    JobDescription, JobSummary, LaunchConfig, LogQuery, LogService, SimulationService,
    StreamSelector,
};
pub use render::describe;
pub use session::Session;
pub use store::{MetadataStore, ObjectLocation, ObjectStoreMetadataStore, StoreError, StoreSpec};

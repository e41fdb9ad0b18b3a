//! Job listing, classification, metadata enrichment and selection.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::SimlogConfig;
use crate::error::{SimlogError, SimlogResult};
use crate::logparse::{HyperparameterLogParser, HyperparameterRequest};
use crate::model::{
    job_id_from_arn, ActionSpace, Hyperparameters, Job, JobStatus, JobType, MetadataSource,
};
use crate::remote::aws::{load_sdk_config, AwsLogService, AwsSimulationService};
use crate::remote::{JobDescription, JobSummary, LaunchConfig, LogService, SimulationService};
use crate::session::Session;
use crate::store::{MetadataStore, ObjectLocation, ObjectStoreMetadataStore, StoreSpec};

pub const WORLD_NAME: &str = "WORLD_NAME";
pub const METRICS_S3_BUCKET: &str = "METRICS_S3_BUCKET";
pub const MODEL_METADATA_FILE_S3_KEY: &str = "MODEL_METADATA_FILE_S3_KEY";
pub const SAGEMAKER_SHARED_S3_BUCKET: &str = "SAGEMAKER_SHARED_S3_BUCKET";
pub const SAGEMAKER_SHARED_S3_PREFIX: &str = "SAGEMAKER_SHARED_S3_PREFIX";

const METADATA_VARS: [&str; 4] = [
    METRICS_S3_BUCKET,
    MODEL_METADATA_FILE_S3_KEY,
    SAGEMAKER_SHARED_S3_BUCKET,
    SAGEMAKER_SHARED_S3_PREFIX,
];

/// Object locations of a training job's structured metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataLocations {
    pub model_metadata: ObjectLocation,
    pub hyperparameters: ObjectLocation,
}

impl MetadataLocations {
    /// Read the locations from a launch configuration.
    ///
    /// `Ok(None)` when none of the variables are set (jobs that predate
    /// structured metadata); an error when only some are.
    pub fn from_launch_config(launch: &LaunchConfig) -> SimlogResult<Option<Self>> {
        let present: Vec<&str> = METADATA_VARS
            .iter()
            .copied()
            .filter(|v| launch.env(v).is_some())
            .collect();

        if present.is_empty() {
            return Ok(None);
        }
        if present.len() < METADATA_VARS.len() {
            let missing: Vec<&str> = METADATA_VARS
                .iter()
                .copied()
                .filter(|v| !present.contains(v))
                .collect();
            return Err(SimlogError::malformed(
                "launch configuration",
                format!("missing {}", missing.join(", ")),
            ));
        }

        let get = |name: &str| launch.env(name).unwrap_or_default();
        Ok(Some(Self {
            model_metadata: ObjectLocation::new(
                get(METRICS_S3_BUCKET),
                get(MODEL_METADATA_FILE_S3_KEY),
            ),
            hyperparameters: ObjectLocation::hyperparameters(
                get(SAGEMAKER_SHARED_S3_BUCKET),
                get(SAGEMAKER_SHARED_S3_PREFIX),
            ),
        }))
    }
}

/// Resolves simulation jobs into classified, enriched [`Job`] records.
#[derive(Clone)]
pub struct JobCatalog {
    jobs: Arc<dyn SimulationService>,
    store: Arc<dyn MetadataStore>,
    parser: HyperparameterLogParser,
    config: SimlogConfig,
}

impl JobCatalog {
    pub fn new(
        jobs: Arc<dyn SimulationService>,
        store: Arc<dyn MetadataStore>,
        logs: Arc<dyn LogService>,
        config: SimlogConfig,
    ) -> Self {
        let parser = HyperparameterLogParser::with_config(logs, &config);
        Self {
            jobs,
            store,
            parser,
            config,
        }
    }

    /// Catalog backed by RoboMaker, CloudWatch Logs and the configured store.
    pub async fn from_config(config: SimlogConfig) -> SimlogResult<Self> {
        let sdk = load_sdk_config(config.region.as_deref()).await;

        let mut spec = StoreSpec::parse(&config.store_url)?;
        if spec.region.is_none() {
            spec.region = config.region.clone();
        }
        let store = ObjectStoreMetadataStore::from_spec(&spec)?;

        Ok(Self::new(
            Arc::new(AwsSimulationService::new(&sdk)),
            Arc::new(store),
            Arc::new(AwsLogService::new(&sdk)),
            config,
        ))
    }

    async fn application_name(&self) -> SimlogResult<String> {
        if let Some(name) = &self.config.application_name {
            return Ok(name.clone());
        }
        let apps = self.jobs.list_simulation_applications().await?;
        let name = apps.into_iter().next().ok_or_else(|| {
            SimlogError::remote("robomaker", "no simulation applications are registered")
        })?;
        debug!(application = %name, "using first simulation application");
        Ok(name)
    }

    /// Jobs of the given type, in listing order.
    pub async fn list_jobs(&self, job_type: JobType) -> SimlogResult<Vec<Job>> {
        if job_type == JobType::Unknown {
            return Err(SimlogError::invalid_input(
                "job type must be training or evaluation",
            ));
        }

        let application = self.application_name().await?;
        let summaries = self
            .jobs
            .list_simulation_jobs(&application, self.config.effective_page_size())
            .await?;
        debug!(count = summaries.len(), "listed simulation jobs");

        let mut jobs = Vec::new();
        for summary in &summaries {
            let description = self.jobs.describe_simulation_job(&summary.arn).await?;
            let classified = JobType::from_launch_file(&description.launch_config.launch_file);
            debug!(arn = %summary.arn, job_type = %classified, "classified job");

            if classified == JobType::Unknown {
                info!(
                    arn = %summary.arn,
                    launch_file = %description.launch_config.launch_file,
                    "skipping job with unrecognized launch file"
                );
                continue;
            }
            if classified != job_type {
                continue;
            }

            jobs.push(self.build_job(summary, description, classified).await?);
        }

        Ok(jobs)
    }

    async fn build_job(
        &self,
        summary: &JobSummary,
        description: JobDescription,
        job_type: JobType,
    ) -> SimlogResult<Job> {
        let status = if description.status.is_empty() {
            JobStatus::from(summary.status.as_str())
        } else {
            JobStatus::from(description.status.as_str())
        };

        let launch = &description.launch_config;
        let track = launch
            .env(WORLD_NAME)
            .ok_or_else(|| {
                SimlogError::malformed(
                    "launch configuration",
                    format!("{} has no {}", summary.arn, WORLD_NAME),
                )
            })?
            .to_string();

        let (action_space, hyperparameters, metadata_source) =
            if job_type == JobType::Training && !status.is_failed() {
                match MetadataLocations::from_launch_config(launch)? {
                    Some(locations) => {
                        let (space, hp) = self.read_structured_metadata(&locations).await?;
                        (Some(space), Some(hp), MetadataSource::Structured)
                    }
                    None => (None, None, MetadataSource::LogDerived),
                }
            } else {
                (None, None, MetadataSource::Unavailable)
            };

        Ok(Job {
            id: job_id_from_arn(&summary.arn).to_string(),
            arn: summary.arn.clone(),
            job_type,
            status,
            track,
            max_duration_seconds: description.max_job_duration_in_seconds.max(0) as u64,
            start_time: description.last_started_at,
            action_space,
            hyperparameters,
            metadata_source,
        })
    }

    async fn read_structured_metadata(
        &self,
        locations: &MetadataLocations,
    ) -> SimlogResult<(ActionSpace, Hyperparameters)> {
        let metadata = self.store.get_json(&locations.model_metadata).await?;
        let space = ActionSpace::from_metadata(&metadata)?;

        let raw = self.store.get_json(&locations.hyperparameters).await?;
        let hp = Hyperparameters::from_value(&locations.hyperparameters.to_string(), raw)?;

        Ok((space, hp))
    }

    /// Select a job and resolve its hyperparameters.
    ///
    /// Jobs without structured metadata get theirs from the log stream named
    /// after the job id.
    pub async fn select_job(&self, jobs: &[Job], id: &str) -> SimlogResult<Session> {
        let job = get_job(jobs, id)?.clone();

        let hyperparameters = match job.metadata_source {
            MetadataSource::Structured => job.hyperparameters.clone(),
            MetadataSource::LogDerived => {
                let request = HyperparameterRequest::for_stream_prefix(job.id.clone());
                Some(self.parser.extract_hyperparameters(&request).await?)
            }
            MetadataSource::Unavailable => None,
        };

        info!(job_id = %job.id, source = ?job.metadata_source, "selected job");
        let source = job.metadata_source;
        Ok(Session::new(job, hyperparameters, source))
    }
}

/// Look up a job by id in a catalog snapshot.
pub fn get_job<'a>(jobs: &'a [Job], id: &str) -> SimlogResult<&'a Job> {
    jobs.iter()
        .find(|job| job.id == id)
        .ok_or_else(|| SimlogError::SelectionNotFound { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn launch(vars: &[(&str, &str)]) -> LaunchConfig {
        LaunchConfig {
            launch_file: "distributed_training.launch".to_string(),
            environment_variables: vars
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_locations_absent_for_legacy_jobs() {
        let result = MetadataLocations::from_launch_config(&launch(&[("WORLD_NAME", "Oval")]));
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_locations_from_launch_config() {
        let locations = MetadataLocations::from_launch_config(&launch(&[
            ("METRICS_S3_BUCKET", "metrics-bucket"),
            ("MODEL_METADATA_FILE_S3_KEY", "model/model_metadata.json"),
            ("SAGEMAKER_SHARED_S3_BUCKET", "shared-bucket"),
            ("SAGEMAKER_SHARED_S3_PREFIX", "sagemaker-shared"),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(
            locations.model_metadata,
            ObjectLocation::new("metrics-bucket", "model/model_metadata.json")
        );
        assert_eq!(
            locations.hyperparameters,
            ObjectLocation::new("shared-bucket", "sagemaker-shared/ip/hyperparameters.json")
        );
    }

    #[test]
    fn test_partial_locations_are_malformed() {
        let result = MetadataLocations::from_launch_config(&launch(&[(
            "METRICS_S3_BUCKET",
            "metrics-bucket",
        )]));
        match result {
            Err(SimlogError::MalformedData { message, .. }) => {
                assert!(message.contains("MODEL_METADATA_FILE_S3_KEY"));
            }
            other => panic!("expected MalformedData, got {:?}", other),
        }
    }

    #[test]
    fn test_get_job_missing() {
        let result = get_job(&[], "sim-nope");
        assert!(matches!(result, Err(SimlogError::SelectionNotFound { id }) if id == "sim-nope"));
    }
}

//! RoboMaker and CloudWatch Logs implementations of the remote seams.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::Client as LogsClient;
use aws_sdk_robomaker::types::Filter;
use aws_sdk_robomaker::Client as RoboMakerClient;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::{
    JobDescription, JobSummary, LaunchConfig, LogQuery, LogService, SimulationService,
    StreamSelector,
};
use crate::error::{SimlogError, SimlogResult};

const ROBOMAKER: &str = "robomaker";
const LOGS: &str = "logs";

/// Load the shared SDK config, honoring an explicit region.
pub async fn load_sdk_config(region: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region.to_string()));
    }
    loader.load().await
}

/// RoboMaker-backed simulation job service.
#[derive(Debug, Clone)]
pub struct AwsSimulationService {
    client: RoboMakerClient,
}

impl AwsSimulationService {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: RoboMakerClient::new(config),
        }
    }
}

fn remote_error<E>(service: &str, err: E) -> SimlogError
where
    E: std::error::Error + 'static,
{
    SimlogError::remote(
        service,
        aws_sdk_robomaker::error::DisplayErrorContext(&err).to_string(),
    )
}

fn to_chrono(dt: &aws_sdk_robomaker::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(dt.secs(), dt.subsec_nanos())
}

#[async_trait]
impl SimulationService for AwsSimulationService {
    async fn list_simulation_applications(&self) -> SimlogResult<Vec<String>> {
        debug!("listing simulation applications");
        let output = self
            .client
            .list_simulation_applications()
            .send()
            .await
            .map_err(|e| remote_error(ROBOMAKER, e))?;

        Ok(output
            .simulation_application_summaries()
            .iter()
            .filter_map(|s| s.name().map(String::from))
            .collect())
    }

    async fn list_simulation_jobs(
        &self,
        application_name: &str,
        max_results: i32,
    ) -> SimlogResult<Vec<JobSummary>> {
        debug!(application = %application_name, max_results, "listing simulation jobs");
        let filter = Filter::builder()
            .name("simulationApplicationName")
            .values(application_name)
            .build();

        let output = self
            .client
            .list_simulation_jobs()
            .max_results(max_results)
            .filters(filter)
            .send()
            .await
            .map_err(|e| remote_error(ROBOMAKER, e))?;

        Ok(output
            .simulation_job_summaries()
            .iter()
            .filter_map(|s| {
                let arn = s.arn()?.to_string();
                let status = s
                    .status()
                    .map(|st| st.as_str().to_string())
                    .unwrap_or_default();
                Some(JobSummary { arn, status })
            })
            .collect())
    }

    async fn describe_simulation_job(&self, arn: &str) -> SimlogResult<JobDescription> {
        debug!(arn = %arn, "describing simulation job");
        let output = self
            .client
            .describe_simulation_job()
            .job(arn)
            .send()
            .await
            .map_err(|e| remote_error(ROBOMAKER, e))?;

        let launch_config = output
            .simulation_applications()
            .first()
            .and_then(|app| app.launch_config())
            .map(|lc| LaunchConfig {
                launch_file: lc.launch_file().unwrap_or_default().to_string(),
                environment_variables: lc
                    .environment_variables()
                    .map(|vars| {
                        vars.iter()
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect::<BTreeMap<_, _>>()
                    })
                    .unwrap_or_default(),
            })
            .unwrap_or_default();

        Ok(JobDescription {
            arn: output.arn().unwrap_or(arn).to_string(),
            status: output
                .status()
                .map(|st| st.as_str().to_string())
                .unwrap_or_default(),
            max_job_duration_in_seconds: output.max_job_duration_in_seconds(),
            last_started_at: output.last_started_at().and_then(to_chrono),
            launch_config,
        })
    }
}

/// CloudWatch Logs-backed log service.
#[derive(Debug, Clone)]
pub struct AwsLogService {
    client: LogsClient,
}

impl AwsLogService {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: LogsClient::new(config),
        }
    }
}

#[async_trait]
impl LogService for AwsLogService {
    async fn filter_log_events(&self, query: &LogQuery) -> SimlogResult<Vec<String>> {
        debug!(
            log_group = %query.log_group,
            streams = ?query.streams,
            start_time = query.start_time,
            end_time = query.end_time,
            limit = query.limit,
            "filtering log events"
        );

        let mut request = self
            .client
            .filter_log_events()
            .log_group_name(&query.log_group)
            .start_time(query.start_time)
            .end_time(query.end_time)
            .limit(query.limit);

        request = match &query.streams {
            StreamSelector::Name(name) => request.log_stream_names(name),
            StreamSelector::Prefix(prefix) => request.log_stream_name_prefix(prefix),
        };

        let output = request.send().await.map_err(|e| remote_error(LOGS, e))?;

        Ok(output
            .events()
            .iter()
            .map(|e| e.message().unwrap_or_default().to_string())
            .collect())
    }
}

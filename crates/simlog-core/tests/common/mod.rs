//! In-memory fakes for the remote services.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use simlog_core::{
    JobCatalog, JobDescription, JobSummary, LaunchConfig, LogQuery, LogService, ObjectLocation,
    ObjectStoreMetadataStore, SimlogConfig, SimlogError, SimlogResult, SimulationService,
};

pub const APP: &str = "deepracer-sim-app";

#[derive(Default)]
pub struct FakeSimulationService {
    pub applications: Vec<String>,
    pub jobs: Vec<JobSummary>,
    pub descriptions: HashMap<String, JobDescription>,
    pub fail_listing: bool,
    pub listed_with: Mutex<Vec<(String, i32)>>,
}

#[async_trait]
impl SimulationService for FakeSimulationService {
    async fn list_simulation_applications(&self) -> SimlogResult<Vec<String>> {
        Ok(self.applications.clone())
    }

    async fn list_simulation_jobs(
        &self,
        application_name: &str,
        max_results: i32,
    ) -> SimlogResult<Vec<JobSummary>> {
        self.listed_with
            .lock()
            .unwrap()
            .push((application_name.to_string(), max_results));
        if self.fail_listing {
            return Err(SimlogError::remote("robomaker", "throttled"));
        }
        Ok(self.jobs.clone())
    }

    async fn describe_simulation_job(&self, arn: &str) -> SimlogResult<JobDescription> {
        self.descriptions
            .get(arn)
            .cloned()
            .ok_or_else(|| SimlogError::remote("robomaker", format!("no such job {}", arn)))
    }
}

#[derive(Default)]
pub struct FakeLogService {
    pub messages: Vec<String>,
    pub fail: bool,
    pub queries: Mutex<Vec<LogQuery>>,
}

impl FakeLogService {
    pub fn with_messages(messages: &[&str]) -> Self {
        Self {
            messages: messages.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl LogService for FakeLogService {
    async fn filter_log_events(&self, query: &LogQuery) -> SimlogResult<Vec<String>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(SimlogError::remote("logs", "access denied"));
        }
        Ok(self.messages.clone())
    }
}

pub fn arn(id: &str) -> String {
    format!(
        "arn:aws:robomaker:us-east-1:123456789012:simulation-job/{}",
        id
    )
}

pub fn started() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 11, 30, 17, 5, 0).unwrap()
}

/// Job fixture builder.
pub struct JobFixture {
    pub id: String,
    pub status: String,
    pub launch_file: String,
    pub vars: BTreeMap<String, String>,
    pub duration: i64,
    pub started: Option<DateTime<Utc>>,
}

impl JobFixture {
    pub fn training(id: &str) -> Self {
        Self::new(id, "distributed_training.launch").with_metadata_vars(id)
    }

    pub fn evaluation(id: &str) -> Self {
        Self::new(id, "evaluation.launch")
    }

    pub fn new(id: &str, launch_file: &str) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert("WORLD_NAME".to_string(), "reInvent2019_track".to_string());
        Self {
            id: id.to_string(),
            status: "Completed".to_string(),
            launch_file: launch_file.to_string(),
            vars,
            duration: 3600,
            started: Some(started()),
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    pub fn without_metadata_vars(mut self) -> Self {
        self.vars.retain(|k, _| k == "WORLD_NAME");
        self
    }

    pub fn with_metadata_vars(mut self, id: &str) -> Self {
        self.vars
            .insert("METRICS_S3_BUCKET".to_string(), "metrics".to_string());
        self.vars.insert(
            "MODEL_METADATA_FILE_S3_KEY".to_string(),
            format!("{}/model/model_metadata.json", id),
        );
        self.vars
            .insert("SAGEMAKER_SHARED_S3_BUCKET".to_string(), "shared".to_string());
        self.vars.insert(
            "SAGEMAKER_SHARED_S3_PREFIX".to_string(),
            format!("sagemaker/{}", id),
        );
        self
    }

    pub fn never_started(mut self) -> Self {
        self.started = None;
        self
    }

    fn into_parts(self) -> (JobSummary, JobDescription) {
        let arn = arn(&self.id);
        (
            JobSummary {
                arn: arn.clone(),
                status: self.status.clone(),
            },
            JobDescription {
                arn,
                status: self.status,
                max_job_duration_in_seconds: self.duration,
                last_started_at: self.started,
                launch_config: LaunchConfig {
                    launch_file: self.launch_file,
                    environment_variables: self.vars,
                },
            },
        )
    }
}

pub fn service(fixtures: Vec<JobFixture>) -> FakeSimulationService {
    let mut service = FakeSimulationService {
        applications: vec![APP.to_string(), "other-app".to_string()],
        ..Default::default()
    };
    for fixture in fixtures {
        let (summary, description) = fixture.into_parts();
        service
            .descriptions
            .insert(summary.arn.clone(), description);
        service.jobs.push(summary);
    }
    service
}

pub const MODEL_METADATA: &str = r#"{
    "action_space": [
        {"steering_angle": -30, "speed": 0.8, "index": 0},
        {"steering_angle": 0, "speed": 1.6, "index": 1},
        {"steering_angle": 30, "speed": 0.8, "index": 2}
    ],
    "sensor": ["FRONT_FACING_CAMERA"],
    "neural_network": "DEEP_CONVOLUTIONAL_NETWORK_SHALLOW"
}"#;

pub const HYPERPARAMETERS: &str = r#"{
    "batch_size": 64,
    "beta_entropy": 0.01,
    "discount_factor": 0.999,
    "e_greedy_value": 0.05,
    "loss_type": "huber",
    "lr": 0.0003,
    "num_episodes_between_training": 20,
    "num_epochs": 10
}"#;

/// Memory store seeded with structured metadata for each job id.
pub async fn seeded_store(ids: &[&str]) -> ObjectStoreMetadataStore {
    let store = ObjectStoreMetadataStore::memory();
    for id in ids {
        store
            .put_object(
                &ObjectLocation::new("metrics", format!("{}/model/model_metadata.json", id)),
                Bytes::from(MODEL_METADATA),
            )
            .await
            .unwrap();
        store
            .put_object(
                &ObjectLocation::hyperparameters("shared", &format!("sagemaker/{}", id)),
                Bytes::from(HYPERPARAMETERS),
            )
            .await
            .unwrap();
    }
    store
}

pub fn catalog(
    jobs: FakeSimulationService,
    store: ObjectStoreMetadataStore,
    logs: FakeLogService,
) -> (JobCatalog, Arc<FakeSimulationService>, Arc<FakeLogService>) {
    let jobs = Arc::new(jobs);
    let logs = Arc::new(logs);
    let catalog = JobCatalog::new(
        jobs.clone(),
        Arc::new(store),
        logs.clone(),
        SimlogConfig::default(),
    );
    (catalog, jobs, logs)
}

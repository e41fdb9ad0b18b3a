//! Job records and the metadata attached to them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{SimlogError, SimlogResult};

/// Launch file used by training jobs.
pub const TRAINING_LAUNCH_FILE: &str = "distributed_training.launch";

/// Launch file used by evaluation jobs.
pub const EVALUATION_LAUNCH_FILE: &str = "evaluation.launch";

/// Job classification, derived from the launch file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Training,
    Evaluation,
    Unknown,
}

impl JobType {
    pub fn from_launch_file(launch_file: &str) -> Self {
        match launch_file {
            TRAINING_LAUNCH_FILE => Self::Training,
            EVALUATION_LAUNCH_FILE => Self::Evaluation,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Evaluation => "evaluation",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulation job status as reported by the job service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Preparing,
    Running,
    Restarting,
    Completed,
    Failed,
    RunningFailed,
    Terminating,
    Terminated,
    Canceled,
    /// Any status this crate does not know about, kept verbatim.
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Preparing => "Preparing",
            Self::Running => "Running",
            Self::Restarting => "Restarting",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::RunningFailed => "RunningFailed",
            Self::Terminating => "Terminating",
            Self::Terminated => "Terminated",
            Self::Canceled => "Canceled",
            Self::Other(s) => s,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "Preparing" => Self::Preparing,
            "Running" => Self::Running,
            "Restarting" => Self::Restarting,
            "Completed" => Self::Completed,
            "Failed" => Self::Failed,
            "RunningFailed" => Self::RunningFailed,
            "Terminating" => Self::Terminating,
            "Terminated" => Self::Terminated,
            "Canceled" => Self::Canceled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a job's hyperparameters come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataSource {
    /// Read from `hyperparameters.json` in object storage while listing.
    Structured,
    /// Recovered from the job's log stream when the job is selected.
    LogDerived,
    /// The job has no hyperparameters to show (failed or evaluation jobs).
    Unavailable,
}

/// One discrete action available to the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub index: u32,
    pub steering_angle: f64,
    pub speed: f64,
}

/// Ordered action space of a trained model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionSpace(pub Vec<ActionEntry>);

#[derive(Deserialize)]
struct RawActionEntry {
    #[serde(default)]
    index: Option<u32>,
    steering_angle: f64,
    speed: f64,
}

impl ActionSpace {
    /// Extract the `action_space` array from a model metadata document.
    ///
    /// Entries without an explicit `index` take their position in the array.
    pub fn from_metadata(metadata: &Value) -> SimlogResult<Self> {
        let raw = metadata.get("action_space").ok_or_else(|| {
            SimlogError::malformed("model metadata", "missing `action_space` field")
        })?;

        let entries: Vec<RawActionEntry> = serde_json::from_value(raw.clone())
            .map_err(|e| SimlogError::malformed("model metadata", e.to_string()))?;

        Ok(Self(
            entries
                .into_iter()
                .enumerate()
                .map(|(pos, e)| ActionEntry {
                    index: e.index.unwrap_or(pos as u32),
                    steering_angle: e.steering_angle,
                    speed: e.speed,
                })
                .collect(),
        ))
    }

    pub fn entries(&self) -> &[ActionEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Training hyperparameters.
///
/// Every named field is optional: log-derived records carry whatever the
/// training container printed. Named values are coerced where possible
/// (`64.0` and `"64"` both give a batch size of 64). Keys this struct does not
/// name, and named values that cannot be coerced, are kept in `extra` and
/// written back on serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hyperparameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta_entropy: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_factor: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_type: Option<String>,

    /// Learning rate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lr: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_episodes_between_training: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_epochs: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for Hyperparameters {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_map)
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }
}

fn whole(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Move `key` out of `map` when `coerce` accepts it; otherwise leave it.
fn take<T>(
    map: &mut Map<String, Value>,
    key: &str,
    coerce: fn(&Value) -> Option<T>,
) -> Option<T> {
    let parsed = map.get(key).and_then(coerce)?;
    map.remove(key);
    Some(parsed)
}

impl Hyperparameters {
    /// Decode a JSON document. Anything but an object is malformed.
    pub fn from_json_str(what: &str, text: &str) -> SimlogResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| SimlogError::malformed(what, e.to_string()))?;
        Self::from_value(what, value)
    }

    pub fn from_value(what: &str, value: Value) -> SimlogResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            _ => Err(SimlogError::malformed(what, "expected a JSON object")),
        }
    }

    /// Build from any JSON object. Never fails.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            batch_size: take(&mut map, "batch_size", coerce_int),
            beta_entropy: take(&mut map, "beta_entropy", coerce_float),
            discount_factor: take(&mut map, "discount_factor", coerce_float),
            loss_type: take(&mut map, "loss_type", coerce_string),
            lr: take(&mut map, "lr", coerce_float),
            num_episodes_between_training: take(
                &mut map,
                "num_episodes_between_training",
                coerce_int,
            ),
            num_epochs: take(&mut map, "num_epochs", coerce_int),
            extra: map,
        }
    }

    /// True when none of the named fields and no extra keys are present.
    pub fn is_empty(&self) -> bool {
        self.batch_size.is_none()
            && self.beta_entropy.is_none()
            && self.discount_factor.is_none()
            && self.loss_type.is_none()
            && self.lr.is_none()
            && self.num_episodes_between_training.is_none()
            && self.num_epochs.is_none()
            && self.extra.is_empty()
    }
}

/// A simulation job snapshot.
///
/// Built once per catalog refresh and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub arn: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub status: JobStatus,
    pub track: String,
    pub max_duration_seconds: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub action_space: Option<ActionSpace>,
    pub hyperparameters: Option<Hyperparameters>,
    pub metadata_source: MetadataSource,
}

impl Job {
    pub fn duration_minutes(&self) -> f64 {
        self.max_duration_seconds as f64 / 60.0
    }

    /// One-line label used when offering jobs for selection.
    pub fn label(&self) -> String {
        format!(
            "{} - Track: {} - Duration: {:.1}",
            self.id,
            self.track,
            self.duration_minutes()
        )
    }
}

/// Job id from a resource identifier: the segment after the last `/`.
pub fn job_id_from_arn(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

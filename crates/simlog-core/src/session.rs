//! The result of selecting a job.

use serde::Serialize;

use crate::error::{SimlogError, SimlogResult};
use crate::model::{Hyperparameters, Job, MetadataSource};
use crate::render;

/// A selected job together with its resolved hyperparameters.
///
/// Returned by [`crate::JobCatalog::select_job`]; callers keep it and hand it
/// to whatever displays or exports the selection.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub job_id: String,
    pub track: String,
    pub hyperparameters: Option<Hyperparameters>,
    pub metadata_source: MetadataSource,
    pub job: Job,
}

impl Session {
    pub fn new(
        job: Job,
        hyperparameters: Option<Hyperparameters>,
        metadata_source: MetadataSource,
    ) -> Self {
        Self {
            job_id: job.id.clone(),
            track: job.track.clone(),
            hyperparameters,
            metadata_source,
            job,
        }
    }

    /// Text summary of the selection.
    pub fn describe(&self) -> String {
        render::describe_with(&self.job, self.hyperparameters.as_ref())
    }

    /// Pretty JSON export of the selection.
    pub fn to_json(&self) -> SimlogResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimlogError::malformed("session", e.to_string()))
    }
}

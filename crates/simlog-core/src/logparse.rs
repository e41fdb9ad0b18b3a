//! Recovery of hyperparameters printed into a job's log stream.
//!
//! Older training jobs never stored `hyperparameters.json`; the training
//! container instead printed the dictionary, pretty-printed, right after a
//! fixed sentinel line:
//!
//! ```text
//! Using the following hyper-parameters
//! {
//!   "batch_size": 64,
//!   ...
//! }
//! ```
//!
//! The scanner captures every line after the sentinel up to and including
//! the first line that is exactly `}`. A nested object whose closing brace
//! sits alone on its own line ends the capture early; the resulting text is
//! then not valid JSON and surfaces as [`SimlogError::MalformedData`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{SimlogConfig, DEFAULT_LOG_GROUP, DEFAULT_LOG_LIMIT};
use crate::error::{SimlogError, SimlogResult};
use crate::model::Hyperparameters;
use crate::remote::{LogQuery, LogService, StreamSelector};

/// Log line that precedes the hyperparameter dump.
pub const SENTINEL: &str = "Using the following hyper-parameters";

/// Line that ends the dump.
pub const TERMINATOR: &str = "}";

/// Default window start (2015-12-30, before any simulation job existed).
pub const DEFAULT_START_TIME_MS: i64 = 1_451_490_400_000;

/// Default window end (2033-05-18).
pub const DEFAULT_END_TIME_MS: i64 = 2_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    Capturing,
}

/// Two-state scanner over log messages.
#[derive(Debug)]
pub struct HyperparameterScanner {
    state: ScanState,
    captured: String,
}

impl Default for HyperparameterScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperparameterScanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::Idle,
            captured: String::new(),
        }
    }

    /// Feed one log message.
    pub fn push(&mut self, message: &str) {
        match self.state {
            ScanState::Idle => {
                if message == SENTINEL {
                    self.state = ScanState::Capturing;
                }
            }
            ScanState::Capturing => {
                self.captured.push_str(message);
                if message == TERMINATOR {
                    self.state = ScanState::Idle;
                }
            }
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.state == ScanState::Capturing
    }

    /// Text captured so far.
    pub fn captured(&self) -> &str {
        &self.captured
    }

    /// Decode the captured text. Nothing captured yields an empty record.
    pub fn finish(self) -> SimlogResult<Hyperparameters> {
        if self.state == ScanState::Capturing {
            warn!("log ended before the hyperparameter block was closed");
        }
        if self.captured.is_empty() {
            return Ok(Hyperparameters::default());
        }
        Hyperparameters::from_json_str("hyperparameters in log", &self.captured)
    }
}

/// Scan a sequence of log messages in order.
pub fn scan_messages<I, S>(messages: I) -> SimlogResult<Hyperparameters>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scanner = HyperparameterScanner::new();
    for message in messages {
        scanner.push(message.as_ref());
    }
    scanner.finish()
}

/// Caller-facing lookup parameters; unset fields take the defaults.
#[derive(Debug, Clone, Default)]
pub struct HyperparameterRequest {
    pub log_group: Option<String>,
    pub stream_name: Option<String>,
    pub stream_prefix: Option<String>,
    /// Epoch milliseconds.
    pub start_time: Option<i64>,
    /// Epoch milliseconds.
    pub end_time: Option<i64>,
}

impl HyperparameterRequest {
    pub fn for_stream_prefix(prefix: impl Into<String>) -> Self {
        Self {
            stream_prefix: Some(prefix.into()),
            ..Default::default()
        }
    }

    pub fn for_stream_name(name: impl Into<String>) -> Self {
        Self {
            stream_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_log_group(mut self, group: impl Into<String>) -> Self {
        self.log_group = Some(group.into());
        self
    }

    pub fn with_window(mut self, start_time: i64, end_time: i64) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }
}

/// Fetches a job's log window and scans it for the hyperparameter dump.
#[derive(Clone)]
pub struct HyperparameterLogParser {
    logs: Arc<dyn LogService>,
    default_log_group: String,
    limit: i32,
}

impl HyperparameterLogParser {
    pub fn new(logs: Arc<dyn LogService>) -> Self {
        Self {
            logs,
            default_log_group: DEFAULT_LOG_GROUP.to_string(),
            limit: DEFAULT_LOG_LIMIT,
        }
    }

    pub fn with_config(logs: Arc<dyn LogService>, config: &SimlogConfig) -> Self {
        Self {
            logs,
            default_log_group: config.log_group.clone(),
            limit: config.log_limit,
        }
    }

    /// Turn a request into a concrete query.
    ///
    /// Exactly one of stream name and stream prefix must be set.
    pub fn resolve_query(&self, request: &HyperparameterRequest) -> SimlogResult<LogQuery> {
        let streams = match (&request.stream_name, &request.stream_prefix) {
            (Some(name), None) => StreamSelector::Name(name.clone()),
            (None, Some(prefix)) => StreamSelector::Prefix(prefix.clone()),
            (Some(_), Some(_)) => {
                return Err(SimlogError::invalid_input(
                    "give either a stream name or a stream prefix, not both",
                ))
            }
            (None, None) => {
                return Err(SimlogError::invalid_input(
                    "a stream name or a stream prefix is required",
                ))
            }
        };

        let start_time = request.start_time.unwrap_or(DEFAULT_START_TIME_MS);
        let end_time = request.end_time.unwrap_or(DEFAULT_END_TIME_MS);
        if start_time > end_time {
            return Err(SimlogError::invalid_input(format!(
                "start time {} is after end time {}",
                start_time, end_time
            )));
        }

        Ok(LogQuery {
            log_group: request
                .log_group
                .clone()
                .unwrap_or_else(|| self.default_log_group.clone()),
            streams,
            start_time,
            end_time,
            limit: self.limit,
        })
    }

    pub async fn extract_hyperparameters(
        &self,
        request: &HyperparameterRequest,
    ) -> SimlogResult<Hyperparameters> {
        let query = self.resolve_query(request)?;
        let messages = self.logs.filter_log_events(&query).await?;
        debug!(
            log_group = %query.log_group,
            events = messages.len(),
            "scanning log events for hyperparameters"
        );
        scan_messages(&messages)
    }
}

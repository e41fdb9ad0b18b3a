//! `simlog hyperparams` - Recover hyperparameters from a log stream.

use std::sync::Arc;

use anyhow::{Context, Result};
use simlog_core::remote::aws::{load_sdk_config, AwsLogService};
use simlog_core::{HyperparameterLogParser, HyperparameterRequest, SimlogConfig};

use crate::cli::args::HyperparamsArgs;
use crate::exit_codes::SUCCESS;

pub fn request(args: &HyperparamsArgs, config: &SimlogConfig) -> HyperparameterRequest {
    HyperparameterRequest {
        log_group: Some(config.log_group.clone()),
        stream_name: args.stream_name.clone(),
        stream_prefix: args.stream_prefix.clone(),
        start_time: args.start_time,
        end_time: args.end_time,
    }
}

pub async fn run(args: HyperparamsArgs, config: SimlogConfig) -> Result<i32> {
    let sdk = load_sdk_config(config.region.as_deref()).await;
    let parser = HyperparameterLogParser::with_config(Arc::new(AwsLogService::new(&sdk)), &config);

    let hyperparameters = parser
        .extract_hyperparameters(&request(&args, &config))
        .await
        .context("failed to recover hyperparameters")?;

    if hyperparameters.is_empty() {
        eprintln!("(no hyperparameter block found in the log window)");
    }
    println!("{}", serde_json::to_string_pretty(&hyperparameters)?);

    Ok(SUCCESS)
}

//! `simlog show` - Select a job and display or export it.

use anyhow::{Context, Result};
use simlog_core::{JobCatalog, JobType, SimlogConfig};
use tracing::debug;

use crate::cli::args::{ShowArgs, ShowFormat};
use crate::exit_codes::SUCCESS;

pub async fn run(args: ShowArgs, config: SimlogConfig) -> Result<i32> {
    let catalog = JobCatalog::from_config(config)
        .await
        .context("failed to set up job catalog")?;

    let job_type = JobType::from(args.job_type);
    let jobs = catalog
        .list_jobs(job_type)
        .await
        .with_context(|| format!("failed to list {} jobs", job_type))?;
    debug!(count = jobs.len(), "catalog snapshot loaded");

    let session = catalog
        .select_job(&jobs, &args.job_id)
        .await
        .with_context(|| format!("failed to load job {}", args.job_id))?;

    match args.format {
        ShowFormat::Text => print!("{}", session.describe()),
        ShowFormat::Json => println!("{}", session.to_json()?),
    }

    Ok(SUCCESS)
}

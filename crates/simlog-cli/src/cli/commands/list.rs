//! `simlog list` - List simulation jobs of one type.

use anyhow::{Context, Result};
use simlog_core::{Job, JobCatalog, JobType, SimlogConfig};

use crate::cli::args::{ListArgs, ListFormat};
use crate::exit_codes::SUCCESS;

pub async fn run(args: ListArgs, config: SimlogConfig) -> Result<i32> {
    let catalog = JobCatalog::from_config(config)
        .await
        .context("failed to set up job catalog")?;

    let job_type = JobType::from(args.job_type);
    let jobs = catalog
        .list_jobs(job_type)
        .await
        .with_context(|| format!("failed to list {} jobs", job_type))?;

    print!("{}", render(&jobs, args.format)?);

    if jobs.is_empty() && !matches!(args.format, ListFormat::Json) {
        eprintln!("(no {} jobs found)", job_type);
    }

    Ok(SUCCESS)
}

pub fn render(jobs: &[Job], format: ListFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        ListFormat::Plain => {
            for job in jobs {
                out.push_str(&job.label());
                out.push('\n');
            }
        }
        ListFormat::Ids => {
            for job in jobs {
                out.push_str(&job.id);
                out.push('\n');
            }
        }
        ListFormat::Json => {
            out.push_str(&serde_json::to_string_pretty(jobs)?);
            out.push('\n');
        }
        ListFormat::Table => {
            out.push_str(&format!(
                "{:<40} {:<14} {:<32} {:>8}\n",
                "JOB_ID", "STATUS", "TRACK", "MINUTES"
            ));
            out.push_str(&format!("{:-<97}\n", ""));
            for job in jobs {
                out.push_str(&format!(
                    "{:<40} {:<14} {:<32} {:>8.1}\n",
                    job.id,
                    job.status.as_str(),
                    job.track,
                    job.duration_minutes()
                ));
            }
        }
    }
    Ok(out)
}

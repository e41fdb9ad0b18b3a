use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use simlog_core::{JobType, SimlogConfig};

#[derive(Parser, Debug)]
#[command(
    name = "simlog",
    version,
    about = "List RoboMaker training/evaluation jobs and recover their hyperparameters"
)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List simulation jobs of one type
    List(ListArgs),
    /// Select a job and show its summary and hyperparameters
    Show(ShowArgs),
    /// Recover hyperparameters from a log stream
    Hyperparams(HyperparamsArgs),
    /// Print the version
    Version,
}

/// Options shared by every command. Unset values fall back to `SIMLOG_*`
/// environment variables.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// AWS region
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Simulation application to list jobs for (default: first registered)
    #[arg(long, global = true)]
    pub application: Option<String>,

    /// Metadata store URL (s3://, file:///path, memory://)
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Log group for hyperparameter lookups
    #[arg(long, global = true)]
    pub log_group: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn config(&self) -> SimlogConfig {
        let mut config = SimlogConfig::from_env();
        if let Some(region) = &self.region {
            config = config.with_region(region);
        }
        if let Some(app) = &self.application {
            config = config.with_application_name(app);
        }
        if let Some(store) = &self.store {
            config = config.with_store_url(store);
        }
        if let Some(group) = &self.log_group {
            config = config.with_log_group(group);
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JobTypeArg {
    Training,
    Evaluation,
}

impl From<JobTypeArg> for JobType {
    fn from(arg: JobTypeArg) -> Self {
        match arg {
            JobTypeArg::Training => JobType::Training,
            JobTypeArg::Evaluation => JobType::Evaluation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// One selection label per line: id, track and duration
    Plain,
    /// One job id per line (machine-friendly)
    Ids,
    /// Human-readable table
    Table,
    /// JSON array of job records
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, value_enum, default_value_t = JobTypeArg::Training)]
    pub job_type: JobTypeArg,

    #[arg(long, value_enum, default_value_t = ListFormat::Table)]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    Text,
    /// Export the selection as JSON
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Job id (last segment of the job ARN)
    #[arg(value_name = "JOB_ID")]
    pub job_id: String,

    #[arg(long, value_enum, default_value_t = JobTypeArg::Training)]
    pub job_type: JobTypeArg,

    #[arg(long, value_enum, default_value_t = ShowFormat::Text)]
    pub format: ShowFormat,
}

#[derive(Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("stream")
        .required(true)
        .multiple(false)
        .args(["stream_name", "stream_prefix"])
))]
pub struct HyperparamsArgs {
    /// Exact log stream name
    #[arg(long)]
    pub stream_name: Option<String>,

    /// Log stream name prefix (usually the job id)
    #[arg(long)]
    pub stream_prefix: Option<String>,

    /// Window start, epoch milliseconds
    #[arg(long)]
    pub start_time: Option<i64>,

    /// Window end, epoch milliseconds
    #[arg(long)]
    pub end_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::try_parse_from([
            "simlog",
            "show",
            "sim-abc",
            "--job-type",
            "evaluation",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.cmd {
            Command::Show(args) => {
                assert_eq!(args.job_id, "sim-abc");
                assert_eq!(args.job_type, JobTypeArg::Evaluation);
                assert_eq!(args.format, ShowFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_hyperparams_requires_exactly_one_stream() {
        let both = Cli::try_parse_from([
            "simlog",
            "hyperparams",
            "--stream-name",
            "a",
            "--stream-prefix",
            "b",
        ]);
        assert!(both.is_err());

        let neither = Cli::try_parse_from(["simlog", "hyperparams"]);
        assert!(neither.is_err());

        let one = Cli::try_parse_from(["simlog", "hyperparams", "--stream-prefix", "sim-1"]);
        assert!(one.is_ok());
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let cli = Cli::try_parse_from([
            "simlog",
            "list",
            "--region",
            "us-east-1",
            "--application",
            "deepracer",
        ])
        .unwrap();
        assert_eq!(cli.common.region.as_deref(), Some("us-east-1"));
        assert_eq!(cli.common.application.as_deref(), Some("deepracer"));
    }
}

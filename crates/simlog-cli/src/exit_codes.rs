//! Process exit codes for `simlog`.
//! Scripts depend on these values; keep them stable.

use simlog_core::SimlogError;

pub const SUCCESS: i32 = 0;
pub const INVALID_INPUT: i32 = 1; // Bad arguments or configuration
pub const INTERNAL_ERROR: i32 = 2; // Anything not classified below
pub const MALFORMED_DATA: i32 = 3; // Metadata or log payload could not be parsed
pub const JOB_NOT_FOUND: i32 = 4; // Selected job id is not in the catalog
pub const REMOTE_FAILURE: i32 = 5; // Job, log or object service failed

pub fn for_simlog_error(err: &SimlogError) -> i32 {
    match err {
        SimlogError::InvalidInput { .. } | SimlogError::Config { .. } => INVALID_INPUT,
        SimlogError::MalformedData { .. } => MALFORMED_DATA,
        SimlogError::SelectionNotFound { .. } => JOB_NOT_FOUND,
        SimlogError::RemoteService { .. } => REMOTE_FAILURE,
    }
}

/// Exit code for an error bubbled up to `main`.
///
/// Walks the anyhow chain so context added by commands does not hide the
/// underlying [`SimlogError`].
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<SimlogError>())
        .map(for_simlog_error)
        .unwrap_or(INTERNAL_ERROR)
}

/// Exit code for an argument parsing outcome. Help and version output
/// succeed; every usage error is invalid input.
pub fn for_parse_error(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        INVALID_INPUT
    } else {
        SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::Cli;
    use anyhow::Context;
    use clap::Parser;

    #[test]
    fn test_codes_follow_error_kind() {
        let err: anyhow::Error = SimlogError::invalid_input("both stream selectors set").into();
        assert_eq!(for_error(&err), INVALID_INPUT);

        let err = Err::<(), _>(SimlogError::remote("RoboMaker", "throttled"))
            .context("failed to list training jobs")
            .unwrap_err();
        assert_eq!(for_error(&err), REMOTE_FAILURE);

        let err = Err::<(), _>(SimlogError::malformed("hyperparameters", "eof"))
            .context("outer")
            .unwrap_err();
        assert_eq!(for_error(&err), MALFORMED_DATA);

        let err: anyhow::Error = SimlogError::SelectionNotFound {
            id: "sim-x".to_string(),
        }
        .into();
        assert_eq!(for_error(&err), JOB_NOT_FOUND);

        let err: anyhow::Error = SimlogError::Config {
            message: "bad store".to_string(),
        }
        .into();
        assert_eq!(for_error(&err), INVALID_INPUT);
    }

    #[test]
    fn test_unclassified_is_internal() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(for_error(&err), INTERNAL_ERROR);
    }

    #[test]
    fn test_usage_errors_are_invalid_input() {
        let both = Cli::try_parse_from([
            "simlog",
            "hyperparams",
            "--stream-name",
            "a",
            "--stream-prefix",
            "b",
        ])
        .unwrap_err();
        assert_eq!(for_parse_error(&both), INVALID_INPUT);

        let neither = Cli::try_parse_from(["simlog", "hyperparams"]).unwrap_err();
        assert_eq!(for_parse_error(&neither), INVALID_INPUT);
    }

    #[test]
    fn test_help_is_success() {
        let help = Cli::try_parse_from(["simlog", "--help"]).unwrap_err();
        assert_eq!(for_parse_error(&help), SUCCESS);
    }
}

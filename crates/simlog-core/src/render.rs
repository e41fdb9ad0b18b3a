//! Human-readable job summaries.

use std::fmt::Write;

use crate::model::{ActionSpace, Hyperparameters, Job};

/// Shown in place of a start time for jobs that never started.
pub const NOT_STARTED: &str = "not started";

/// Shown for hyperparameter fields the record does not carry.
pub const MISSING: &str = "n/a";

/// Multi-line summary of a job, including its own metadata.
pub fn describe(job: &Job) -> String {
    describe_with(job, job.hyperparameters.as_ref())
}

/// Multi-line summary of a job with hyperparameters resolved elsewhere
/// (e.g. from logs at selection time).
pub fn describe_with(job: &Job, hyperparameters: Option<&Hyperparameters>) -> String {
    let mut out = String::new();

    let start = job
        .start_time
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| NOT_STARTED.to_string());

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Job ID: {}\tTrack: {}", job.id, job.track);
    let _ = writeln!(
        out,
        "Max Run Time: {:.1}\t\tStart Time: {}",
        job.duration_minutes(),
        start
    );
    let _ = writeln!(out, "Status: {}", job.status);

    if let Some(space) = &job.action_space {
        out.push('\n');
        out.push_str(&action_space_table(space));
    }

    if let Some(hp) = hyperparameters {
        out.push('\n');
        out.push_str(&hyperparameter_block(hp));
    }

    out
}

/// Fixed-width action space table.
pub fn action_space_table(space: &ActionSpace) -> String {
    let mut out = String::from("Action Space:\n");
    let _ = writeln!(out, "{:>5}   {:>5}   {:>5}", "Index", "Angle", "Speed");
    for entry in space.entries() {
        let _ = writeln!(
            out,
            "{:>5}   {:>5}   {:>5}",
            entry.index,
            significant(entry.steering_angle, 3),
            entry.speed
        );
    }
    out
}

/// Labeled hyperparameter block.
pub fn hyperparameter_block(hp: &Hyperparameters) -> String {
    format!(
        "Hyperparameters:\n\
         Batch Size:\t\t\t{}\n\
         Entropy:\t\t\t{}\n\
         Discount Factor:\t\t{}\n\
         Loss Type:\t\t\t{}\n\
         Learning Rate:\t\t\t{}\n\
         Episodes per iteration\t\t{}\n\
         No Epochs\t\t\t{}\n",
        field(hp.batch_size),
        field(hp.beta_entropy),
        field(hp.discount_factor),
        field(hp.loss_type.as_deref()),
        field(hp.lr),
        field(hp.num_episodes_between_training),
        field(hp.num_epochs),
    )
}

fn field<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Format `value` with `digits` significant figures, dropping trailing
/// zeros (`-30` → `-30`, `7.4999` → `7.5`, `0.12345` → `0.123`).
pub fn significant(value: f64, digits: u32) -> String {
    if value == 0.0 || !value.is_finite() {
        return if value == 0.0 {
            "0".to_string()
        } else {
            value.to_string()
        };
    }

    let digits = digits.max(1) as i32;
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = digits - 1 - magnitude;

    if decimals >= 0 {
        let text = format!("{:.*}", decimals as usize, value);
        trim_fraction(&text)
    } else {
        let scale = 10f64.powi(-decimals);
        format!("{:.0}", (value / scale).round() * scale)
    }
}

fn trim_fraction(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionEntry, JobStatus, JobType, MetadataSource};
    use chrono::{TimeZone, Utc};

    fn job() -> Job {
        Job {
            id: "sim-abc".to_string(),
            arn: "arn:aws:robomaker:us-east-1:1:simulation-job/sim-abc".to_string(),
            job_type: JobType::Training,
            status: JobStatus::Completed,
            track: "reInvent2019_wide".to_string(),
            max_duration_seconds: 5400,
            start_time: None,
            action_space: None,
            hyperparameters: None,
            metadata_source: MetadataSource::LogDerived,
        }
    }

    #[test]
    fn test_not_started_marker() {
        let text = describe(&job());
        assert!(text.contains("Start Time: not started"));
        assert!(text.contains("Max Run Time: 90.0"));
        assert!(text.starts_with("Job ID: sim-abc\tTrack: reInvent2019_wide\n"));
        assert!(text.contains("Status: Completed"));
    }

    #[test]
    fn test_start_time_rendered() {
        let mut j = job();
        j.start_time = Some(Utc.with_ymd_and_hms(2019, 12, 1, 8, 30, 0).unwrap());
        let text = describe(&j);
        assert!(text.contains("Start Time: 2019-12-01T08:30:00+00:00"));
    }

    #[test]
    fn test_no_optional_blocks_without_metadata() {
        let text = describe(&job());
        assert!(!text.contains("Action Space:"));
        assert!(!text.contains("Hyperparameters:"));
    }

    #[test]
    fn test_action_space_table() {
        let space = ActionSpace(vec![
            ActionEntry {
                index: 0,
                steering_angle: -30.0,
                speed: 0.8,
            },
            ActionEntry {
                index: 1,
                steering_angle: 7.4999,
                speed: 1.6,
            },
        ]);
        let table = action_space_table(&space);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Action Space:");
        assert_eq!(lines[1], "Index   Angle   Speed");
        assert_eq!(lines[2], "    0     -30     0.8");
        assert_eq!(lines[3], "    1     7.5     1.6");
    }

    #[test]
    fn test_hyperparameter_block_labels_and_missing() {
        let hp = Hyperparameters {
            batch_size: Some(64),
            loss_type: Some("huber".to_string()),
            ..Default::default()
        };
        let block = hyperparameter_block(&hp);
        assert!(block.starts_with("Hyperparameters:\n"));
        assert!(block.contains("Batch Size:\t\t\t64\n"));
        assert!(block.contains("Loss Type:\t\t\thuber\n"));
        assert!(block.contains("Entropy:\t\t\tn/a\n"));
        assert!(block.contains("No Epochs\t\t\tn/a\n"));
    }

    #[test]
    fn test_describe_with_external_hyperparameters() {
        let hp = Hyperparameters {
            num_epochs: Some(3),
            ..Default::default()
        };
        let text = describe_with(&job(), Some(&hp));
        assert!(text.contains("No Epochs\t\t\t3"));
    }

    #[test]
    fn test_significant_figures() {
        assert_eq!(significant(-30.0, 3), "-30");
        assert_eq!(significant(0.0, 3), "0");
        assert_eq!(significant(15.0, 3), "15");
        assert_eq!(significant(0.12345, 3), "0.123");
        assert_eq!(significant(7.4999, 3), "7.5");
        assert_eq!(significant(1234.0, 3), "1230");
        assert_eq!(significant(-0.0004, 3), "-0.0004");
    }
}

//! User interface module - console reporting and CI step outputs.
//!
//! - `formatter` - Pure formatting functions
//! - This module - Step-output files consumed by later pipeline steps

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::cli::orchestration::WorkflowResult;
use crate::error::Result;
use crate::outcome::BumpOutcome;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_outcome, display_status, display_success, display_version_change,
    summarize,
};

/// Key/value pairs describing a workflow result for downstream steps.
///
/// Keys: `bumped`, `decision`, `version`, `previous_version`, `skip_reason`, `commit`.
/// Values that do not apply are empty strings so the key set is stable.
pub fn step_outputs(result: &WorkflowResult) -> Vec<(&'static str, String)> {
    let (version, previous, skip_reason) = match &result.outcome {
        BumpOutcome::Skipped(reason) => (String::new(), String::new(), reason.code().to_string()),
        BumpOutcome::Bumped {
            previous, current, ..
        } => (current.to_string(), previous.to_string(), String::new()),
    };

    vec![
        ("bumped", result.outcome.is_bumped().to_string()),
        ("decision", result.outcome.decision().to_string()),
        ("version", version),
        ("previous_version", previous),
        ("skip_reason", skip_reason),
        ("commit", result.commit.clone().unwrap_or_default()),
    ]
}

/// Appends `key=value` lines to a step-output file (GitHub Actions `GITHUB_OUTPUT` format).
///
/// The file is created if it does not exist; existing content is kept.
pub fn write_step_outputs(path: &Path, result: &WorkflowResult) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (key, value) in step_outputs(result) {
        writeln!(file, "{}={}", key, value)?;
    }
    tracing::debug!(path = %path.display(), "wrote step outputs");
    Ok(())
}

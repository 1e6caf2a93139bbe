//! Pure formatting functions for UI output.
//!
//! Everything user-facing goes to stdout except errors; logs go to stderr
//! through `tracing`.

use console::style;

use crate::cli::orchestration::WorkflowResult;
use crate::domain::Version;
use crate::outcome::BumpOutcome;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display the version change.
///
/// Shows "From: old -> To: new" with the decision that caused it.
pub fn display_version_change(previous: &Version, current: &Version, decision: &str) {
    println!("\n{}", style(format!("Version bump ({}):", decision)).bold());
    println!("  From: {}", style(previous).red());
    println!("  To:   {}", style(current).green());
}

/// One-line summary of a workflow result
pub fn summarize(result: &WorkflowResult) -> String {
    match &result.outcome {
        BumpOutcome::Skipped(_) => result.outcome.to_string(),
        BumpOutcome::Bumped { current, .. } if result.dry_run => format!(
            "Dry run: version {} would be written to {}",
            current,
            result.manifest_path.display()
        ),
        BumpOutcome::Bumped { current, .. } => {
            let mut line = format!(
                "Version {} written to {}",
                current,
                result.manifest_path.display()
            );
            if let Some(hash) = &result.commit {
                line.push_str(&format!(", committed {}", short_hash(hash)));
                if result.pushed {
                    line.push_str(" and pushed");
                }
            }
            line
        }
    }
}

/// Display the outcome of a workflow run.
pub fn display_outcome(result: &WorkflowResult) {
    match &result.outcome {
        BumpOutcome::Skipped(_) => display_status(&summarize(result)),
        BumpOutcome::Bumped {
            decision,
            previous,
            current,
        } => {
            display_version_change(previous, current, decision.as_str());
            println!();
            display_success(&summarize(result));
        }
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

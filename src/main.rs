use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use commit_bump::cli::{run_bump_workflow, BumpWorkflowArgs};
use commit_bump::git::Git2Repository;
use commit_bump::{config, observability, ui};

#[derive(clap::Parser)]
#[command(
    name = "commit-bump",
    version,
    about = "Bump the manifest version based on the latest conventional commit"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Manifest file containing the version declaration")]
    manifest: Option<PathBuf>,

    #[arg(long, help = "Key label of the version declaration")]
    key: Option<String>,

    #[arg(long, help = "Classify this message instead of the HEAD commit")]
    message: Option<String>,

    #[arg(long, default_value = ".", help = "Path inside the git repository")]
    repo: PathBuf,

    #[arg(long, help = "Preview the new version without writing anything")]
    dry_run: bool,

    #[arg(long, help = "Update the manifest but do not commit it")]
    no_commit: bool,

    #[arg(long, help = "Push the bump commit to the remote")]
    push: bool,

    #[arg(long, help = "Remote to push to")]
    remote: Option<String>,

    #[arg(
        long,
        env = "GITHUB_OUTPUT",
        help = "Append step outputs (bumped, version, ...) to this file"
    )]
    output_file: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,

    #[arg(short, long, help = "Only log errors")]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    observability::init_logging(observability::env_filter(
        args.quiet,
        args.verbose,
        observability::DEFAULT_LEVEL,
    ));

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    let workflow_args = BumpWorkflowArgs {
        message: args.message,
        manifest_path: args.manifest,
        key: args.key,
        dry_run: args.dry_run,
        no_commit: args.no_commit,
        push: args.push,
        remote: args.remote,
    };

    // The repository is only opened when something needs it.
    let effective = workflow_args.apply_to(config.clone());
    let needs_repo =
        workflow_args.message.is_none() || (effective.commit.enabled && !workflow_args.dry_run);
    let repo = if needs_repo {
        Some(Git2Repository::open(&args.repo).context("Git repository error")?)
    } else {
        None
    };

    let result = run_bump_workflow(&workflow_args, &config, repo.as_ref())?;
    ui::display_outcome(&result);

    if let Some(path) = &args.output_file {
        ui::write_step_outputs(path, &result)
            .with_context(|| format!("Failed to write step outputs to {}", path.display()))?;
    }

    Ok(())
}

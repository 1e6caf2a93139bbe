//! Main workflow orchestration logic
//!
//! Drives one invocation end to end: obtain the commit message, classify it,
//! update the manifest, then record and optionally publish the change.
//! Argument parsing stays in `main.rs`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::conventional::classify_with_rule;
use crate::domain::{bump, CommitMessage};
use crate::error::{CommitBumpError, Result};
use crate::git::{CommitAuthor, Repository};
use crate::manifest::{ManifestDocument, ManifestFormat};
use crate::outcome::{BumpOutcome, SkipReason};

/// Arguments for the bump workflow
///
/// Mirrors the CLI flags that override configuration, decoupled from clap so
/// the workflow can be called programmatically.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BumpWorkflowArgs {
    /// Commit message to classify instead of reading `HEAD`
    pub message: Option<String>,

    /// Manifest file path override
    pub manifest_path: Option<PathBuf>,

    /// Version key label override
    pub key: Option<String>,

    /// Compute and report, but write nothing
    pub dry_run: bool,

    /// Write the manifest but do not commit it
    pub no_commit: bool,

    /// Push the bump commit
    pub push: bool,

    /// Remote override for the push
    pub remote: Option<String>,
}

impl BumpWorkflowArgs {
    /// Applies the overrides on top of a loaded configuration
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(path) = &self.manifest_path {
            config.manifest.path = path.clone();
        }
        if let Some(key) = &self.key {
            config.manifest.key = key.clone();
        }
        if self.no_commit {
            config.commit.enabled = false;
        }
        if self.push {
            config.push.enabled = true;
        }
        if let Some(remote) = &self.remote {
            config.push.remote = remote.clone();
        }
        config
    }
}

/// Result of a workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Whether a bump happened, and why not if it didn't
    pub outcome: BumpOutcome,

    /// The manifest that was (or would have been) updated
    pub manifest_path: PathBuf,

    /// Hash of the bump commit, if one was created
    pub commit: Option<String>,

    /// Whether the bump commit was pushed
    pub pushed: bool,

    /// Whether this was a dry run
    pub dry_run: bool,
}

impl WorkflowResult {
    pub fn skipped(reason: SkipReason, manifest_path: PathBuf) -> Self {
        WorkflowResult {
            outcome: BumpOutcome::Skipped(reason),
            manifest_path,
            commit: None,
            pushed: false,
            dry_run: false,
        }
    }
}

/// Where the commit happens and where it goes afterwards
struct CommitPlan {
    author: CommitAuthor,
    push_to: Option<(String, String)>,
}

/// Resolves commit/push targets up front so that a detached `HEAD` or a
/// missing repository fails before the manifest is touched.
fn plan_commit<R: Repository>(
    config: &Config,
    repo: Option<&R>,
    dry_run: bool,
) -> Result<Option<CommitPlan>> {
    if dry_run || !config.commit.enabled {
        if config.push.enabled {
            warn!("push requested without a bump commit; nothing will be pushed");
        }
        return Ok(None);
    }

    let repo = repo.ok_or_else(|| {
        CommitBumpError::config("committing the bump requires a git repository")
    })?;

    let push_to = if config.push.enabled {
        let branch = match &config.push.branch {
            Some(branch) => branch.clone(),
            None => repo.current_branch()?,
        };
        Some((config.push.remote.clone(), branch))
    } else {
        None
    };

    Ok(Some(CommitPlan {
        author: CommitAuthor::new(&config.commit.author_name, &config.commit.author_email),
        push_to,
    }))
}

fn read_manifest(path: &Path) -> Result<ManifestDocument> {
    let text = fs::read_to_string(path).map_err(|e| {
        CommitBumpError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot read manifest {}: {}", path.display(), e),
        ))
    })?;
    Ok(ManifestDocument::new(text))
}

/// Main bump workflow
///
/// 1. Take the commit message from `args` or from the repository `HEAD`
/// 2. Skip automation commits and non-qualifying commits
/// 3. Read, bump and render the manifest version
/// 4. Write the manifest, commit it, and push if configured
///
/// Every failure is raised before the manifest is written.
///
/// # Arguments
///
/// * `args` - Workflow arguments (overrides, dry_run)
/// * `config` - Loaded configuration
/// * `repo` - Repository; required unless a message is given and no commit is made
pub fn run_bump_workflow<R: Repository>(
    args: &BumpWorkflowArgs,
    config: &Config,
    repo: Option<&R>,
) -> Result<WorkflowResult> {
    let config = args.apply_to(config.clone());
    config.validate()?;
    let manifest_path = config.manifest.path.clone();
    let format = ManifestFormat::new(config.manifest.key.clone())?;

    let message = match (&args.message, repo) {
        (Some(message), _) => CommitMessage::new(message.as_str()),
        (None, Some(repo)) => {
            let head = repo.head_commit()?;
            debug!(commit = %head.hash, "classifying HEAD commit");
            CommitMessage::new(head.message)
        }
        (None, None) => {
            return Err(CommitBumpError::config(
                "no commit message given and no repository to read one from",
            ))
        }
    };

    if let Some(marker) = message.find_skip_marker(&config.behavior.skip_markers) {
        info!(marker, "automation commit, skipping");
        return Ok(WorkflowResult::skipped(
            SkipReason::AutomationCommit {
                marker: marker.to_string(),
            },
            manifest_path,
        ));
    }

    let (decision, rule) = classify_with_rule(&message);
    if decision.is_none() {
        info!(subject = message.subject(), "non-qualifying commit, skipping");
        return Ok(WorkflowResult::skipped(
            SkipReason::NonQualifyingCommit,
            manifest_path,
        ));
    }

    let plan = plan_commit(&config, repo, args.dry_run)?;

    let document = read_manifest(&manifest_path)?;
    let previous = format.read_version(&document)?;
    let current = bump(&previous, decision)?;
    let rendered = format.render(&document, &previous, &current)?;
    info!(
        rule = rule.unwrap_or_default(),
        %previous,
        %current,
        "computed new version"
    );

    let outcome = BumpOutcome::Bumped {
        decision,
        previous,
        current,
    };

    if args.dry_run {
        return Ok(WorkflowResult {
            outcome,
            manifest_path,
            commit: None,
            pushed: false,
            dry_run: true,
        });
    }

    fs::write(&manifest_path, rendered.as_str())?;
    info!(path = %manifest_path.display(), "manifest updated");

    let (Some(plan), Some(repo)) = (plan, repo) else {
        return Ok(WorkflowResult {
            outcome,
            manifest_path,
            commit: None,
            pushed: false,
            dry_run: false,
        });
    };

    let commit_message = config
        .commit
        .render_message(&previous.to_string(), &current.to_string());
    let hash = repo.commit_file(&manifest_path, &commit_message, &plan.author)?;

    let pushed = match &plan.push_to {
        Some((remote, branch)) => {
            repo.push_branch(remote, branch)?;
            true
        }
        None => false,
    };

    Ok(WorkflowResult {
        outcome,
        manifest_path,
        commit: Some(hash),
        pushed,
        dry_run: false,
    })
}

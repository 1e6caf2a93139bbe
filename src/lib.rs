pub mod cli;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod observability;
pub mod outcome;
pub mod ui;

pub use conventional::classify;
pub use domain::{bump, BumpDecision, CommitMessage, Version};
pub use error::{CommitBumpError, Result};
pub use manifest::{render, ManifestDocument, ManifestFormat};
pub use outcome::{BumpOutcome, SkipReason};

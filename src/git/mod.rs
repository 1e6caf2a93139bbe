//! Git operations abstraction layer
//!
//! Version control is an external collaborator: the driver needs the latest
//! commit message, and afterwards records and optionally publishes the
//! manifest change. The [Repository] trait captures exactly that surface.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::Path;

/// Commit information
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The commit message
    pub message: String,
    /// The commit author
    pub author: String,
}

/// Identity used for the bump commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

impl CommitAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        CommitAuthor {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Git operations used by the bump workflow
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the appropriate
/// [crate::error::CommitBumpError] variants.
pub trait Repository {
    /// Get the commit `HEAD` points at
    fn head_commit(&self) -> Result<CommitInfo>;

    /// Get the short name of the checked-out branch
    ///
    /// # Returns
    /// * `Ok(String)` - Branch name (e.g., "main")
    /// * `Err` - If `HEAD` is detached or unborn
    fn current_branch(&self) -> Result<String>;

    /// Stage a single file and commit it on top of `HEAD`
    ///
    /// # Arguments
    /// * `path` - File to stage; must live inside the working directory
    /// * `message` - Commit message
    /// * `author` - Author and committer identity
    ///
    /// # Returns
    /// * `Ok(String)` - Hash of the new commit
    fn commit_file(&self, path: &Path, message: &str, author: &CommitAuthor) -> Result<String>;

    /// Push a local branch to the same-named branch on a remote
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()>;
}

use crate::error::{CommitBumpError, Result};
use crate::git::{CommitAuthor, CommitInfo, Repository};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// A commit recorded by [MockRepository::commit_file]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommit {
    pub hash: String,
    pub path: PathBuf,
    pub message: String,
    pub author: CommitAuthor,
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    head: CommitInfo,
    branch: Option<String>,
    remotes: Vec<String>,
    commits: RefCell<Vec<RecordedCommit>>,
    pushes: RefCell<Vec<(String, String)>>,
}

impl MockRepository {
    /// Create a mock whose `HEAD` commit has the given message
    pub fn new(head_message: impl Into<String>) -> Self {
        MockRepository {
            head: CommitInfo {
                hash: "0".repeat(40),
                message: head_message.into(),
                author: "Test Author".to_string(),
            },
            branch: Some("main".to_string()),
            remotes: vec!["origin".to_string()],
            commits: RefCell::new(Vec::new()),
            pushes: RefCell::new(Vec::new()),
        }
    }

    /// Set the checked-out branch; `None` means detached `HEAD`
    pub fn with_branch(mut self, branch: Option<&str>) -> Self {
        self.branch = branch.map(str::to_string);
        self
    }

    /// Replace the set of known remotes
    pub fn with_remotes(mut self, remotes: &[&str]) -> Self {
        self.remotes = remotes.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn commits(&self) -> Vec<RecordedCommit> {
        self.commits.borrow().clone()
    }

    /// Recorded pushes as `(remote, branch)` pairs
    pub fn pushes(&self) -> Vec<(String, String)> {
        self.pushes.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new("")
    }
}

impl Repository for MockRepository {
    fn head_commit(&self) -> Result<CommitInfo> {
        Ok(self
            .commits
            .borrow()
            .last()
            .map(|c| CommitInfo {
                hash: c.hash.clone(),
                message: c.message.clone(),
                author: c.author.name.clone(),
            })
            .unwrap_or_else(|| self.head.clone()))
    }

    fn current_branch(&self) -> Result<String> {
        self.branch
            .clone()
            .ok_or_else(|| git2::Error::from_str("HEAD is detached; no branch to push").into())
    }

    fn commit_file(&self, path: &Path, message: &str, author: &CommitAuthor) -> Result<String> {
        let mut commits = self.commits.borrow_mut();
        let hash = format!("{:040x}", commits.len() + 1);
        commits.push(RecordedCommit {
            hash: hash.clone(),
            path: path.to_path_buf(),
            message: message.to_string(),
            author: author.clone(),
        });
        Ok(hash)
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        if !self.remotes.iter().any(|r| r == remote) {
            return Err(CommitBumpError::remote(format!(
                "Cannot find remote '{}'",
                remote
            )));
        }
        self.pushes
            .borrow_mut()
            .push((remote.to_string(), branch.to_string()));
        Ok(())
    }
}

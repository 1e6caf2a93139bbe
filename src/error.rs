use thiserror::Error;

/// Unified error type for commit-bump operations
#[derive(Error, Debug)]
pub enum CommitBumpError {
    #[error("Manifest parse error: no `{key}:` declaration found")]
    ManifestParse { key: String },

    #[error("Ambiguous manifest: `{key}:` declared on lines {}", join_lines(.lines))]
    AmbiguousManifest { key: String, lines: Vec<usize> },

    #[error("Version format error: '{text}' {reason}")]
    VersionFormat { text: String, reason: String },

    #[error("Version mismatch: manifest declares {found}, expected {expected}")]
    VersionMismatch { expected: String, found: String },

    #[error("No bump requested: the updater cannot apply a `none` decision")]
    NoBumpRequested,

    #[error("Version overflow: cannot bump {0}")]
    VersionOverflow(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in commit-bump
pub type Result<T> = std::result::Result<T, CommitBumpError>;

fn join_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CommitBumpError {
    /// Create a version format error for the given text
    pub fn version_format(text: impl Into<String>, reason: impl Into<String>) -> Self {
        CommitBumpError::VersionFormat {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        CommitBumpError::Config(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        CommitBumpError::Remote(msg.into())
    }

    /// True for errors raised while reading or validating the manifest.
    ///
    /// These always abort before anything is written.
    pub fn is_manifest_error(&self) -> bool {
        matches!(
            self,
            CommitBumpError::ManifestParse { .. }
                | CommitBumpError::AmbiguousManifest { .. }
                | CommitBumpError::VersionFormat { .. }
                | CommitBumpError::VersionMismatch { .. }
        )
    }
}

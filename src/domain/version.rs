use crate::error::{CommitBumpError, Result};
use std::fmt;
use std::str::FromStr;

/// Version declaration: semantic triple plus a monotonically increasing build counter.
///
/// Always serializes as `MAJOR.MINOR.PATCH+BUILD`, even when the build number
/// was absent from the parsed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub build: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64, build: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            build,
        }
    }

    /// Parse `MAJOR.MINOR.PATCH` or `MAJOR.MINOR.PATCH+BUILD`.
    ///
    /// The triple goes through `semver`, so leading zeros and empty components
    /// are rejected. Pre-release identifiers are not part of this format, and
    /// build metadata must be a single decimal integer.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CommitBumpError::version_format(text, "is empty"));
        }

        let core = trimmed.split_once('+').map_or(trimmed, |(core, _)| core);
        if core.split('.').count() != 3 {
            return Err(CommitBumpError::version_format(
                text,
                "does not have the form MAJOR.MINOR.PATCH",
            ));
        }

        let parsed = semver::Version::parse(trimmed)
            .map_err(|e| CommitBumpError::version_format(text, format!("is malformed: {}", e)))?;

        if !parsed.pre.is_empty() {
            return Err(CommitBumpError::version_format(
                text,
                format!("has a pre-release identifier '{}'", parsed.pre),
            ));
        }

        let build = match parsed.build.as_str() {
            "" => 0,
            digits if digits.chars().all(|c| c.is_ascii_digit()) => {
                digits.parse::<u64>().map_err(|_| {
                    CommitBumpError::version_format(text, "has a build number that is too large")
                })?
            }
            other => {
                return Err(CommitBumpError::version_format(
                    text,
                    format!("has a non-numeric build number '{}'", other),
                ))
            }
        };

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            build,
        })
    }

    /// Apply a bump decision, deriving a new version.
    ///
    /// See [`bump`].
    pub fn bump(&self, decision: BumpDecision) -> Result<Self> {
        bump(self, decision)
    }
}

impl FromStr for Version {
    type Err = CommitBumpError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}+{}",
            self.major, self.minor, self.patch, self.build
        )
    }
}

/// Outcome of classifying a commit message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BumpDecision {
    None,
    Patch,
    Minor,
    Major,
}

impl BumpDecision {
    pub fn is_none(&self) -> bool {
        matches!(self, BumpDecision::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BumpDecision::None => "none",
            BumpDecision::Patch => "patch",
            BumpDecision::Minor => "minor",
            BumpDecision::Major => "major",
        }
    }
}

impl fmt::Display for BumpDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bumps a version according to the decision.
///
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
///
/// The build counter is incremented by exactly one on every bump and never reset.
///
/// # Errors
/// * `NoBumpRequested` - if `decision` is [`BumpDecision::None`]
/// * `VersionOverflow` - if a component would exceed `u64::MAX`
pub fn bump(current: &Version, decision: BumpDecision) -> Result<Version> {
    let overflow = || CommitBumpError::VersionOverflow(current.to_string());
    let inc = |n: u64| n.checked_add(1).ok_or_else(overflow);

    if decision.is_none() {
        return Err(CommitBumpError::NoBumpRequested);
    }

    let build = inc(current.build)?;
    match decision {
        BumpDecision::None => Err(CommitBumpError::NoBumpRequested),
        BumpDecision::Major => Ok(Version::new(inc(current.major)?, 0, 0, build)),
        BumpDecision::Minor => Ok(Version::new(current.major, inc(current.minor)?, 0, build)),
        BumpDecision::Patch => Ok(Version::new(
            current.major,
            current.minor,
            inc(current.patch)?,
            build,
        )),
    }
}

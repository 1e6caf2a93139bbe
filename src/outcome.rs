use std::fmt;

use crate::domain::{BumpDecision, Version};

/// Why a run finished without bumping. These are deliberate no-ops, not faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The commit carries no `feat`, `fix` or breaking-change marker
    NonQualifyingCommit,
    /// The commit was produced by automation (e.g. a previous bump)
    AutomationCommit { marker: String },
}

impl SkipReason {
    /// Machine-readable identifier, used in step outputs
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::NonQualifyingCommit => "non-qualifying-commit",
            SkipReason::AutomationCommit { .. } => "automation-commit",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NonQualifyingCommit => write!(f, "non-qualifying commit"),
            SkipReason::AutomationCommit { marker } => {
                write!(f, "automation commit (marked '{}')", marker)
            }
        }
    }
}

/// Result of one classification + update pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpOutcome {
    Skipped(SkipReason),
    Bumped {
        decision: BumpDecision,
        previous: Version,
        current: Version,
    },
}

impl BumpOutcome {
    pub fn is_bumped(&self) -> bool {
        matches!(self, BumpOutcome::Bumped { .. })
    }

    pub fn decision(&self) -> BumpDecision {
        match self {
            BumpOutcome::Skipped(_) => BumpDecision::None,
            BumpOutcome::Bumped { decision, .. } => *decision,
        }
    }

    /// The version after this run, if it changed
    pub fn new_version(&self) -> Option<&Version> {
        match self {
            BumpOutcome::Skipped(_) => None,
            BumpOutcome::Bumped { current, .. } => Some(current),
        }
    }
}

impl fmt::Display for BumpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpOutcome::Skipped(reason) => {
                write!(f, "no bump performed, reason: {}", reason)
            }
            BumpOutcome::Bumped {
                decision,
                previous,
                current,
            } => write!(f, "bumped {} -> {} ({})", previous, current, decision),
        }
    }
}

//! Commit classification.
//!
//! A commit message maps to a [`BumpDecision`] through an ordered list of
//! rules, evaluated top-down; the first rule that matches wins. Anything that
//! matches no rule is [`BumpDecision::None`].

use crate::domain::{BumpDecision, CommitMessage};
use regex::Regex;
use tracing::debug;

/// Marker that forces a major bump wherever it appears in the message
pub const BREAKING_CHANGE_MARKER: &str = "BREAKING CHANGE";

struct Rule {
    name: &'static str,
    matches: fn(&CommitMessage) -> bool,
    decision: BumpDecision,
}

// Order matters: a breaking change outranks the type prefix.
static RULES: [Rule; 3] = [
    Rule {
        name: "breaking-change",
        matches: has_breaking_change,
        decision: BumpDecision::Major,
    },
    Rule {
        name: "feat",
        matches: is_feature,
        decision: BumpDecision::Minor,
    },
    Rule {
        name: "fix",
        matches: is_fix,
        decision: BumpDecision::Patch,
    },
];

fn has_breaking_change(message: &CommitMessage) -> bool {
    message
        .as_str()
        .to_lowercase()
        .contains(&BREAKING_CHANGE_MARKER.to_lowercase())
}

/// `feat:` or `feat(<scope>):` at the very start of the subject line
fn is_feature(message: &CommitMessage) -> bool {
    Regex::new(r"(?i)^feat(\([^)\r\n]*\))?:")
        .map(|re| re.is_match(message.subject()))
        .unwrap_or(false)
}

/// Literal `fix:` at the very start of the subject line
fn is_fix(message: &CommitMessage) -> bool {
    message
        .subject()
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("fix:"))
}

/// Classifies a commit message, also returning the name of the rule that matched.
pub fn classify_with_rule(message: &CommitMessage) -> (BumpDecision, Option<&'static str>) {
    match RULES.iter().find(|rule| (rule.matches)(message)) {
        Some(rule) => {
            debug!(rule = rule.name, decision = %rule.decision, "commit matched rule");
            (rule.decision, Some(rule.name))
        }
        None => {
            debug!(subject = message.subject(), "commit matched no rule");
            (BumpDecision::None, None)
        }
    }
}

/// Classifies a commit message into a bump decision.
///
/// Total and pure: every input, including the empty string, yields a decision.
pub fn classify(message: &CommitMessage) -> BumpDecision {
    classify_with_rule(message).0
}

//! Domain logic - pure business rules independent of git operations

pub mod commit;
pub mod version;

pub use commit::CommitMessage;
pub use version::{bump, BumpDecision, Version};

//! Type definitions for GitHub entities
//!
//! Rust structs for the issue records read from the GitHub REST API
//! through `gh api`.

pub mod common;
pub mod issue;

pub use common::{Label, Milestone, PullRequestLinks, User};
pub use issue::Issue;

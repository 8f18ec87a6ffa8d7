//! Issue tracker capability
//!
//! The remediator talks to the hosting service only through [`IssueTracker`]:
//! list open issues, add labels, post a comment. [`GhTracker`] drives the
//! `gh` CLI; [`RecordingTracker`] is an in-memory double for tests.

pub mod gh;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::gh::GhError;
use crate::types::Issue;

pub use gh::GhTracker;
pub use memory::{RecordedCall, RecordingTracker};

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Gh(#[from] GhError),

    #[error("operation cancelled")]
    Cancelled,

    /// Failure reported by a non-gh backend
    #[error("{0}")]
    Api(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// A comment created on an issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub issue_number: u64,
    pub body: String,
    /// Location reported by the tracker, when it gives one
    pub url: Option<String>,
}

/// Narrow view of a repository issue tracker
///
/// Every call is bound to `ctx`; implementations return
/// [`TrackerError::Cancelled`] once it fires.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Open issues and pull requests, intermixed, in listing order
    async fn list_open_issues(
        &self,
        ctx: &CancellationToken,
        owner: &str,
        repo: &str,
    ) -> TrackerResult<Vec<Issue>>;

    async fn add_labels(
        &self,
        ctx: &CancellationToken,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> TrackerResult<()>;

    async fn create_comment(
        &self,
        ctx: &CancellationToken,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> TrackerResult<Comment>;
}

//! In-memory [`IssueTracker`] for tests and dry experiments
//!
//! Serves a fixed issue list and records every mutating call so tests can
//! assert on exactly what a run did. Failures can be injected per
//! operation.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{Comment, IssueTracker, TrackerError, TrackerResult};
use crate::types::Issue;

/// A mutating call observed by [`RecordingTracker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    AddLabels {
        owner: String,
        repo: String,
        number: u64,
        labels: Vec<String>,
    },
    CreateComment {
        owner: String,
        repo: String,
        number: u64,
        body: String,
    },
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<RecordedCall>,
    list_requests: usize,
    comments_posted: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingTracker {
    issues: Vec<Issue>,
    fail_list: Option<String>,
    fail_labels: Option<String>,
    /// Fail the comment with this zero-based index (and every later one)
    fail_comment_from: Option<(usize, String)>,
    /// Cancel the caller's context once this many comments have been posted
    cancel_after_comments: Option<usize>,
    state: Arc<Mutex<State>>,
}

impl RecordingTracker {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            ..Default::default()
        }
    }

    pub fn failing_list(mut self, message: impl Into<String>) -> Self {
        self.fail_list = Some(message.into());
        self
    }

    pub fn failing_labels(mut self, message: impl Into<String>) -> Self {
        self.fail_labels = Some(message.into());
        self
    }

    /// Let the first `index` comments succeed, then fail
    pub fn failing_comments_from(mut self, index: usize, message: impl Into<String>) -> Self {
        self.fail_comment_from = Some((index, message.into()));
        self
    }

    /// Cancel the run's context right after the `count`th comment is posted
    pub fn cancelling_after_comments(mut self, count: usize) -> Self {
        self.cancel_after_comments = Some(count);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn list_requests(&self) -> usize {
        self.lock().list_requests
    }

    pub fn label_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, RecordedCall::AddLabels { .. }))
            .collect()
    }

    pub fn comment_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, RecordedCall::CreateComment { .. }))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoned lock only means another test thread panicked mid-record.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn check_ctx(ctx: &CancellationToken) -> TrackerResult<()> {
    if ctx.is_cancelled() {
        Err(TrackerError::Cancelled)
    } else {
        Ok(())
    }
}

#[async_trait]
impl IssueTracker for RecordingTracker {
    async fn list_open_issues(
        &self,
        ctx: &CancellationToken,
        _owner: &str,
        _repo: &str,
    ) -> TrackerResult<Vec<Issue>> {
        check_ctx(ctx)?;
        self.lock().list_requests += 1;
        if let Some(message) = &self.fail_list {
            return Err(TrackerError::Api(message.clone()));
        }
        Ok(self.issues.clone())
    }

    async fn add_labels(
        &self,
        ctx: &CancellationToken,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> TrackerResult<()> {
        check_ctx(ctx)?;
        self.lock().calls.push(RecordedCall::AddLabels {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
            labels: labels.to_vec(),
        });
        match &self.fail_labels {
            Some(message) => Err(TrackerError::Api(message.clone())),
            None => Ok(()),
        }
    }

    async fn create_comment(
        &self,
        ctx: &CancellationToken,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> TrackerResult<Comment> {
        check_ctx(ctx)?;
        let mut state = self.lock();
        state.calls.push(RecordedCall::CreateComment {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
            body: body.to_string(),
        });

        let index = state.comments_posted;
        state.comments_posted += 1;
        if let Some((from, message)) = &self.fail_comment_from {
            if index >= *from {
                return Err(TrackerError::Api(message.clone()));
            }
        }
        if self.cancel_after_comments == Some(index + 1) {
            ctx.cancel();
        }

        Ok(Comment {
            issue_number: number,
            body: body.to_string(),
            url: Some(format!(
                "https://github.com/{}/{}/issues/{}#issuecomment-{}",
                owner,
                repo,
                number,
                index + 1
            )),
        })
    }
}

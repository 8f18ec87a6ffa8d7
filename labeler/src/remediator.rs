//! One audit pass over a repository
//!
//! Fetches open issues, classifies them, and remediates each violation in
//! turn by either applying the default label and explaining why, or asking
//! for a label to be added. The pass aborts at the first fatal error;
//! issues already handled stay handled.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::classifier;
use crate::config::PolicyConfig;
use crate::tracker::{IssueTracker, TrackerError};
use crate::types::Issue;

#[derive(Error, Debug)]
pub enum RemediationError {
    #[error("error getting issues: {0}")]
    ListIssues(#[source] TrackerError),

    /// Only raised with `fail_on_label_error`
    #[error("error adding label to issue #{number}: {source}")]
    AddLabel {
        number: u64,
        #[source]
        source: TrackerError,
    },

    #[error("error adding comment: {source}")]
    CreateComment {
        number: u64,
        #[source]
        source: TrackerError,
    },

    #[error("run cancelled before issue #{next_issue}")]
    Cancelled { next_issue: u64 },
}

/// Outcome of a completed pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Records returned by the tracker, pull requests included
    pub inspected: usize,
    pub flagged: Vec<u64>,
    pub labeled: Vec<u64>,
    pub commented: Vec<u64>,
}

pub fn label_added_comment(config: &PolicyConfig) -> String {
    format!(
        "Added default label `{}`. Please consider re-labeling this issue appropriately.",
        config.default_label
    )
}

pub fn missing_label_comment(config: &PolicyConfig) -> String {
    format!(
        "No label with prefix \"{}\" found. Please add the appropriate label.",
        config.required_prefix()
    )
}

/// Run one pass against `config.repo_owner/config.repo_name`
#[instrument(skip_all, fields(repo = %config.repo_slug(), dry_run = config.dry_run))]
pub async fn run<T>(
    ctx: &CancellationToken,
    tracker: &T,
    config: &PolicyConfig,
) -> Result<RunReport, RemediationError>
where
    T: IssueTracker + ?Sized,
{
    let issues = tracker
        .list_open_issues(ctx, &config.repo_owner, &config.repo_name)
        .await
        .map_err(RemediationError::ListIssues)?;

    let flagged = classifier::select(&issues, config);
    info!(
        inspected = issues.len(),
        flagged = flagged.len(),
        "classified open issues"
    );

    let mut report = RunReport {
        inspected: issues.len(),
        flagged: flagged.iter().map(|issue| issue.number).collect(),
        ..Default::default()
    };

    for issue in flagged {
        if ctx.is_cancelled() {
            return Err(RemediationError::Cancelled {
                next_issue: issue.number,
            });
        }

        println!(
            "Issue #{} does not have the required label prefix: \"{}\"",
            issue.number,
            config.required_prefix()
        );

        if config.dry_run {
            continue;
        }

        remediate(ctx, tracker, config, issue, &mut report).await?;
    }

    Ok(report)
}

async fn remediate<T>(
    ctx: &CancellationToken,
    tracker: &T,
    config: &PolicyConfig,
    issue: &Issue,
    report: &mut RunReport,
) -> Result<(), RemediationError>
where
    T: IssueTracker + ?Sized,
{
    let comment = if config.add_label {
        let labels = [config.default_label.clone()];
        match tracker
            .add_labels(ctx, &config.repo_owner, &config.repo_name, issue.number, &labels)
            .await
        {
            Ok(()) => report.labeled.push(issue.number),
            Err(source) if config.fail_on_label_error => {
                return Err(RemediationError::AddLabel {
                    number: issue.number,
                    source,
                });
            }
            Err(error) => {
                warn!(issue = issue.number, error = %error, "failed to add default label");
            }
        }
        label_added_comment(config)
    } else {
        missing_label_comment(config)
    };

    let posted = tracker
        .create_comment(ctx, &config.repo_owner, &config.repo_name, issue.number, &comment)
        .await
        .map_err(|source| RemediationError::CreateComment {
            number: issue.number,
            source,
        })?;

    debug!(issue = issue.number, url = ?posted.url, "comment posted");
    report.commented.push(issue.number);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PolicyConfig {
        PolicyConfig {
            repo_owner: "owner".to_string(),
            repo_name: "repo".to_string(),
            label_prefix: "type".to_string(),
            label_separator: "/".to_string(),
            default_label: "type/unknown".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_comment_wording() {
        let config = config();
        assert_eq!(
            label_added_comment(&config),
            "Added default label `type/unknown`. Please consider re-labeling this issue appropriately."
        );
        assert_eq!(
            missing_label_comment(&config),
            "No label with prefix \"type/\" found. Please add the appropriate label."
        );
    }

    #[test]
    fn test_error_messages_carry_context() {
        let list = RemediationError::ListIssues(TrackerError::Api("boom".into()));
        assert_eq!(list.to_string(), "error getting issues: boom");

        let comment = RemediationError::CreateComment {
            number: 3,
            source: TrackerError::Api("denied".into()),
        };
        assert_eq!(comment.to_string(), "error adding comment: denied");
    }
}

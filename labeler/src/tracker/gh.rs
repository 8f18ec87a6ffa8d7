//! [`IssueTracker`] backed by the GitHub CLI
//!
//! Listing goes through `gh api` because `gh issue list` hides pull
//! requests, and the pull-request marker must be visible to the classifier.
//! Labels and comments use the regular `gh issue` subcommands.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{Comment, IssueTracker, TrackerError, TrackerResult};
use crate::gh::{GhError, GhExecutor};
use crate::types::Issue;

#[derive(Debug, Clone, Default)]
pub struct GhTracker {
    gh: GhExecutor,
}

impl GhTracker {
    pub fn new(gh: GhExecutor) -> Self {
        Self { gh }
    }
}

fn repo_arg(owner: &str, repo: &str) -> String {
    format!("{}/{}", owner, repo)
}

/// Decode `gh api --paginate` output
///
/// Each page is printed as its own JSON array back to back, so the body is
/// read as a stream of arrays and flattened in page order.
pub fn parse_issue_pages(raw: &str) -> Result<Vec<Issue>, GhError> {
    let mut issues = Vec::new();
    for page in serde_json::Deserializer::from_str(raw).into_iter::<Vec<Issue>>() {
        issues.extend(page?);
    }
    Ok(issues)
}

/// Value for one `--add-label` flag
///
/// gh reads the flag as a CSV list, so a label containing a comma or a
/// quote is quoted to stay a single label.
fn label_flag_value(label: &str) -> String {
    if label.contains([',', '"']) {
        format!("\"{}\"", label.replace('"', "\"\""))
    } else {
        label.to_string()
    }
}

fn map_gh(err: GhError) -> TrackerError {
    match err {
        GhError::Cancelled => TrackerError::Cancelled,
        other => TrackerError::Gh(other),
    }
}

#[async_trait]
impl IssueTracker for GhTracker {
    async fn list_open_issues(
        &self,
        ctx: &CancellationToken,
        owner: &str,
        repo: &str,
    ) -> TrackerResult<Vec<Issue>> {
        let endpoint = format!("repos/{}/{}/issues?state=open&per_page=100", owner, repo);
        let args: [&str; 3] = ["api", "--paginate", &endpoint];
        let raw = self.gh.raw(ctx, &args).await.map_err(map_gh)?;

        let issues = parse_issue_pages(&raw)?;
        debug!(count = issues.len(), "fetched open issues");
        Ok(issues)
    }

    async fn add_labels(
        &self,
        ctx: &CancellationToken,
        owner: &str,
        repo: &str,
        number: u64,
        labels: &[String],
    ) -> TrackerResult<()> {
        let number_str = number.to_string();
        let repo_str = repo_arg(owner, repo);
        let values: Vec<String> = labels.iter().map(|l| label_flag_value(l)).collect();
        let mut args: Vec<&str> = vec!["issue", "edit", &number_str, "-R", &repo_str];
        for value in &values {
            args.extend(["--add-label", value.as_str()]);
        }

        self.gh.action(ctx, &args).await.map_err(map_gh)?;
        Ok(())
    }

    async fn create_comment(
        &self,
        ctx: &CancellationToken,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> TrackerResult<Comment> {
        let number_str = number.to_string();
        let repo_str = repo_arg(owner, repo);
        let args: [&str; 7] = ["issue", "comment", &number_str, "-R", &repo_str, "-b", body];

        let output = self.gh.action(ctx, &args).await.map_err(map_gh)?;
        Ok(Comment {
            issue_number: number,
            body: body.to_string(),
            url: (!output.is_empty()).then_some(output),
        })
    }
}

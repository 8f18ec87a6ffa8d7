//! Issue type definitions
//!
//! Mirrors the JSON returned by `gh api repos/{owner}/{repo}/issues`.
//! Fields default when absent so that incomplete records are passed through
//! to the classifier untouched.

use serde::{Deserialize, Serialize};

use super::common::{Label, Milestone, PullRequestLinks, User};

/// An entry from the open-issue listing (an issue or a pull request)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number (unique within repository)
    #[serde(default)]
    pub number: u64,

    #[serde(default)]
    pub title: String,

    /// open/closed
    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub body: Option<String>,

    /// Issue author
    #[serde(default)]
    pub user: Option<User>,

    /// Applied labels, in the order GitHub reports them
    #[serde(default)]
    pub labels: Vec<Label>,

    #[serde(default)]
    pub milestone: Option<Milestone>,

    /// Set when the record is a pull request
    #[serde(default)]
    pub pull_request: Option<PullRequestLinks>,

    #[serde(default)]
    pub assignees: Vec<User>,

    #[serde(default)]
    pub html_url: String,

    /// ISO 8601
    #[serde(default)]
    pub created_at: Option<String>,

    /// ISO 8601
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Issue {
    pub fn new(number: u64, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            state: "open".to_string(),
            ..Default::default()
        }
    }

    pub fn with_labels<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = names.into_iter().map(Label::new).collect();
        self
    }

    pub fn with_assignees<I, S>(mut self, logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees = logins.into_iter().map(User::new).collect();
        self
    }

    pub fn with_milestone(mut self, number: u64, title: impl Into<String>) -> Self {
        self.milestone = Some(Milestone {
            number,
            title: title.into(),
            state: Some("open".to_string()),
        });
        self
    }

    pub fn as_pull_request(mut self) -> Self {
        self.pull_request = Some(PullRequestLinks::default());
        self
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn assignee_logins(&self) -> impl Iterator<Item = &str> {
        self.assignees.iter().map(|user| user.login.as_str())
    }

    pub fn label_names(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|label| label.name.as_str())
    }
}

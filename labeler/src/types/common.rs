//! Records nested inside an issue payload
//!
//! Users, labels, milestones and the pull-request marker as they appear in
//! the GitHub REST `issues` listing.

use serde::{Deserialize, Serialize};

/// A GitHub account (author or assignee)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account handle
    #[serde(default)]
    pub login: String,
}

impl User {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }
}

/// A label attached to an issue
///
/// Only `name` is consulted by the policy; the other fields are carried
/// through for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name
    #[serde(default)]
    pub name: String,

    /// Label color (hex without #)
    #[serde(default)]
    pub color: Option<String>,

    /// Label description
    #[serde(default)]
    pub description: Option<String>,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Milestone reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(default)]
    pub number: u64,

    #[serde(default)]
    pub title: String,

    /// open/closed
    #[serde(default)]
    pub state: Option<String>,
}

/// Marker present on records that are really pull requests
///
/// The issues endpoint returns pull requests alongside issues; any object
/// under `pull_request`, even an empty one, identifies the record as a PR.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestLinks {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub html_url: Option<String>,

    #[serde(default)]
    pub diff_url: Option<String>,

    #[serde(default)]
    pub patch_url: Option<String>,
}

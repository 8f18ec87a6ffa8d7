//! Configuration loading
//!
//! The policy for a run is resolved once from, highest priority first:
//! command-line flags, environment variables (both via clap), a
//! `.labeler.toml` file, and built-in defaults. The result is immutable.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".labeler.toml";

const DEFAULT_SEPARATOR: &str = "/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("repository not configured - set --repo OWNER/REPO or --owner and --name")]
    MissingRepository,

    #[error("invalid repository '{0}', expected OWNER/REPO")]
    InvalidRepoSlug(String),

    #[error("label prefix not configured - set --label-prefix")]
    MissingLabelPrefix,

    #[error("--add-label requires a default label - set --default-label")]
    MissingDefaultLabel,

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Label policy and remediation mode for one run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PolicyConfig {
    pub repo_owner: String,
    pub repo_name: String,
    pub label_prefix: String,
    pub label_separator: String,
    /// Issues without a milestone are exempt
    pub only_milestone: bool,
    /// When non-empty, only issues whose assignees all belong here are eligible
    pub assignees: BTreeSet<String>,
    /// Apply `default_label` instead of only commenting
    pub add_label: bool,
    pub default_label: String,
    /// Report violations without touching the tracker
    pub dry_run: bool,
    /// Abort when applying the default label fails instead of carrying on
    pub fail_on_label_error: bool,
}

impl PolicyConfig {
    /// The string a label must start with, e.g. `type/`
    pub fn required_prefix(&self) -> String {
        format!("{}{}", self.label_prefix, self.label_separator)
    }

    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }
}

/// Fully resolved settings: the policy plus how to reach the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub policy: PolicyConfig,
    /// GitHub Enterprise host passed to gh as `GH_HOST`
    pub gh_host: Option<String>,
}

/// Values supplied on the command line or through the environment
///
/// `None` means "not given here"; an explicit `Some(false)` switches off a
/// value set in the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub repo: Option<String>,
    pub owner: Option<String>,
    pub name: Option<String>,
    pub label_prefix: Option<String>,
    pub label_separator: Option<String>,
    pub only_milestone: Option<bool>,
    pub assignees: Vec<String>,
    pub add_label: Option<bool>,
    pub default_label: Option<String>,
    pub dry_run: Option<bool>,
    pub fail_on_label_error: Option<bool>,
    pub gh_host: Option<String>,
}

// ============================================================================
// Config file (.labeler.toml)
// ============================================================================

/// Top-level file configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub repository: RepositorySection,
    #[serde(default)]
    pub policy: PolicySection,
    #[serde(default)]
    pub remediation: RemediationSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositorySection {
    pub owner: Option<String>,
    pub name: Option<String>,
    pub host: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    pub label_prefix: Option<String>,
    pub label_separator: Option<String>,
    #[serde(default)]
    pub only_milestone: bool,
    #[serde(default)]
    pub assignees: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemediationSection {
    #[serde(default)]
    pub add_label: bool,
    pub default_label: Option<String>,
    #[serde(default)]
    pub fail_on_label_error: bool,
    #[serde(default)]
    pub dry_run: bool,
}

impl FileConfig {
    /// Load `.labeler.toml`
    ///
    /// Search order:
    /// 1. Walk up the directory tree from cwd
    /// 2. `~/.config/issue-labeler/.labeler.toml`
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match find_config_file(CONFIG_FILE_NAME) {
            Some(path) => {
                tracing::debug!("Loading config from: {}", path.display());
                Self::load_from_path(&path).map(Some)
            }
            None => {
                tracing::debug!("No {} found", CONFIG_FILE_NAME);
                Ok(None)
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Find a config file by walking up from the cwd, then checking the global
/// config directory.
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, filename).or_else(|| {
        let global_path = dirs::config_dir()?.join("issue-labeler").join(filename);
        global_path.exists().then_some(global_path)
    })
}

fn find_config_file_from(start: &Path, filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.exists())
}

// ============================================================================
// Resolution
// ============================================================================

fn split_repo_slug(slug: &str) -> Result<(String, String), ConfigError> {
    match slug.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(ConfigError::InvalidRepoSlug(slug.to_string())),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Settings {
    /// Merge overrides over an optional file config and validate the result
    pub fn resolve(overrides: Overrides, file: Option<FileConfig>) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();

        let (slug_owner, slug_name) = match non_empty(overrides.repo) {
            Some(slug) => {
                let (owner, name) = split_repo_slug(&slug)?;
                (Some(owner), Some(name))
            }
            None => (None, None),
        };

        let repo_owner = non_empty(overrides.owner)
            .or(slug_owner)
            .or(non_empty(file.repository.owner))
            .ok_or(ConfigError::MissingRepository)?;
        let repo_name = non_empty(overrides.name)
            .or(slug_name)
            .or(non_empty(file.repository.name))
            .ok_or(ConfigError::MissingRepository)?;

        let label_prefix = non_empty(overrides.label_prefix)
            .or(non_empty(file.policy.label_prefix))
            .ok_or(ConfigError::MissingLabelPrefix)?;
        let label_separator = overrides
            .label_separator
            .or(file.policy.label_separator)
            .unwrap_or_else(|| DEFAULT_SEPARATOR.to_string());

        let assignees: BTreeSet<String> = if overrides.assignees.is_empty() {
            file.policy.assignees
        } else {
            overrides.assignees
        }
        .into_iter()
        .map(|login| login.trim().to_string())
        .filter(|login| !login.is_empty())
        .collect();

        let add_label = overrides.add_label.unwrap_or(file.remediation.add_label);
        let default_label = non_empty(overrides.default_label)
            .or(non_empty(file.remediation.default_label))
            .unwrap_or_default();
        if add_label && default_label.is_empty() {
            return Err(ConfigError::MissingDefaultLabel);
        }

        let policy = PolicyConfig {
            repo_owner,
            repo_name,
            label_prefix,
            label_separator,
            only_milestone: overrides
                .only_milestone
                .unwrap_or(file.policy.only_milestone),
            assignees,
            add_label,
            default_label,
            dry_run: overrides.dry_run.unwrap_or(file.remediation.dry_run),
            fail_on_label_error: overrides
                .fail_on_label_error
                .unwrap_or(file.remediation.fail_on_label_error),
        };

        Ok(Self {
            policy,
            gh_host: non_empty(overrides.gh_host).or(non_empty(file.repository.host)),
        })
    }
}

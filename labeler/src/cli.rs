//! CLI argument definitions

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "issue-labeler")]
#[command(about = "Flag open issues missing a required label prefix and remediate them")]
pub struct Cli {
    /// Config file (default: nearest .labeler.toml, then ~/.config/issue-labeler/)
    #[arg(long, env = "LABELER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Repository in OWNER/REPO format
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Repository owner (overrides --repo)
    #[arg(long, env = "LABELER_REPO_OWNER")]
    pub owner: Option<String>,

    /// Repository name (overrides --repo)
    #[arg(long, env = "LABELER_REPO_NAME")]
    pub name: Option<String>,

    /// Required label namespace, e.g. "type"
    #[arg(long, env = "LABELER_LABEL_PREFIX")]
    pub label_prefix: Option<String>,

    /// Separator between prefix and the rest of the label (default: "/")
    #[arg(long, env = "LABELER_LABEL_SEPARATOR")]
    pub label_separator: Option<String>,

    /// Skip issues that have no milestone
    #[arg(
        long,
        env = "LABELER_ONLY_MILESTONE",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub only_milestone: Option<bool>,

    /// Only flag issues whose assignees are all in this list (comma-separated)
    #[arg(long, env = "LABELER_ASSIGNEES", value_delimiter = ',')]
    pub assignees: Vec<String>,

    /// Apply the default label to flagged issues instead of only commenting
    #[arg(
        long,
        env = "LABELER_ADD_LABEL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub add_label: Option<bool>,

    /// Label applied with --add-label
    #[arg(long, env = "LABELER_DEFAULT_LABEL")]
    pub default_label: Option<String>,

    /// Report flagged issues without labeling or commenting
    #[arg(
        long,
        env = "LABELER_DRY_RUN",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub dry_run: Option<bool>,

    /// Abort the run when the default label cannot be applied
    #[arg(
        long,
        env = "LABELER_FAIL_ON_LABEL_ERROR",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub fail_on_label_error: Option<bool>,

    /// GitHub Enterprise hostname
    #[arg(long, env = "GH_HOST")]
    pub gh_host: Option<String>,

    /// Cancel the run after this many seconds
    #[arg(long, env = "LABELER_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            repo: self.repo.clone(),
            owner: self.owner.clone(),
            name: self.name.clone(),
            label_prefix: self.label_prefix.clone(),
            label_separator: self.label_separator.clone(),
            only_milestone: self.only_milestone,
            assignees: self.assignees.clone(),
            add_label: self.add_label,
            default_label: self.default_label.clone(),
            dry_run: self.dry_run,
            fail_on_label_error: self.fail_on_label_error,
            gh_host: self.gh_host.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "issue-labeler",
            "--repo",
            "acme/widgets",
            "--label-prefix",
            "type",
            "--assignees",
            "user1,user2",
            "--add-label",
            "--default-label",
            "type/unknown",
            "--timeout",
            "30",
            "-vv",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.repo.as_deref(), Some("acme/widgets"));
        assert_eq!(overrides.assignees, ["user1", "user2"]);
        assert_eq!(overrides.add_label, Some(true));
        assert_eq!(overrides.only_milestone, None);
        assert_eq!(cli.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_switch_accepts_explicit_false() {
        let cli = Cli::try_parse_from([
            "issue-labeler",
            "--add-label=false",
            "--only-milestone",
            "false",
            "--dry-run",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.add_label, Some(false));
        assert_eq!(overrides.only_milestone, Some(false));
        assert_eq!(overrides.dry_run, Some(true));
    }
}

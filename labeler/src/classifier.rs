//! Issue selection
//!
//! Decides which open issues violate the labeling policy. Pure and
//! order-preserving; no I/O and no validation of the records.
//!
//! Gates are evaluated in order, first exclusion wins:
//! 1. pull requests are never in scope
//! 2. with `only_milestone`, issues without a milestone are exempt
//! 3. with a non-empty assignee set, every assignee must be in the set
//!    (unassigned issues pass)
//! 4. the issue is flagged unless some label starts with `prefix + separator`

use crate::config::PolicyConfig;
use crate::types::{Issue, Label};

/// Whether any label name starts with `prefix` immediately followed by
/// `separator`. Case-sensitive.
pub fn labels_contain_prefix(labels: &[Label], prefix: &str, separator: &str) -> bool {
    labels.iter().any(|label| {
        label
            .name
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(separator))
    })
}

fn assignees_allowed(issue: &Issue, config: &PolicyConfig) -> bool {
    config.assignees.is_empty()
        || issue
            .assignee_logins()
            .all(|login| config.assignees.contains(login))
}

/// Whether `issue` must be surfaced for remediation under `config`
pub fn requires_remediation(issue: &Issue, config: &PolicyConfig) -> bool {
    if issue.is_pull_request() {
        return false;
    }

    if config.only_milestone && issue.milestone.is_none() {
        return false;
    }

    if !assignees_allowed(issue, config) {
        return false;
    }

    !labels_contain_prefix(&issue.labels, &config.label_prefix, &config.label_separator)
}

/// The issues requiring remediation, in input order
pub fn select<'a>(issues: &'a [Issue], config: &PolicyConfig) -> Vec<&'a Issue> {
    issues
        .iter()
        .filter(|issue| requires_remediation(issue, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "prefix";
    const SEPARATOR: &str = "/";
    const MATCHING: &str = "prefix/suffix";

    fn config() -> PolicyConfig {
        PolicyConfig {
            repo_owner: "owner".to_string(),
            repo_name: "repo".to_string(),
            label_prefix: PREFIX.to_string(),
            label_separator: SEPARATOR.to_string(),
            ..Default::default()
        }
    }

    fn with_assignees(logins: &[&str]) -> PolicyConfig {
        PolicyConfig {
            assignees: logins.iter().map(|s| s.to_string()).collect(),
            ..config()
        }
    }

    fn titles(selected: Vec<&Issue>) -> Vec<&str> {
        selected.into_iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_single_issue_missing_label() {
        let issues = vec![Issue::new(1, "issue1")];
        assert_eq!(titles(select(&issues, &config())), ["issue1"]);
    }

    #[test]
    fn test_single_issue_contains_label() {
        let issues = vec![Issue::new(1, "issue1").with_labels([MATCHING])];
        assert!(select(&issues, &config()).is_empty());
    }

    #[test]
    fn test_pull_request_excluded() {
        let issues = vec![Issue::new(1, "issue1").as_pull_request()];
        assert!(select(&issues, &config()).is_empty());
    }

    #[test]
    fn test_pull_request_excluded_regardless_of_other_fields() {
        let config = PolicyConfig {
            only_milestone: true,
            ..with_assignees(&["user1"])
        };
        let issues = vec![Issue::new(1, "pr")
            .as_pull_request()
            .with_milestone(1, "v1")
            .with_assignees(["user1"])
            .with_labels(["other"])];
        assert!(select(&issues, &config).is_empty());
    }

    #[test]
    fn test_multiple_issues() {
        let issues = vec![
            Issue::new(1, "issue1").with_labels([MATCHING]),
            Issue::new(2, "issue2"),
        ];
        assert_eq!(titles(select(&issues, &config())), ["issue2"]);
    }

    #[test]
    fn test_only_milestone() {
        let config = PolicyConfig {
            only_milestone: true,
            ..config()
        };
        let issues = vec![
            Issue::new(1, "no milestone"),
            Issue::new(2, "milestone").with_milestone(4, "v2"),
            Issue::new(3, "milestone labeled")
                .with_milestone(4, "v2")
                .with_labels([MATCHING]),
        ];
        assert_eq!(titles(select(&issues, &config)), ["milestone"]);
    }

    #[test]
    fn test_milestone_ignored_when_not_required() {
        let issues = vec![
            Issue::new(1, "no milestone"),
            Issue::new(2, "milestone").with_milestone(4, "v2"),
        ];
        assert_eq!(
            titles(select(&issues, &config())),
            ["no milestone", "milestone"]
        );
    }

    #[test]
    fn test_issue_with_specified_assignees() {
        let config = with_assignees(&["user1", "user2", "user3"]);
        let issues = vec![
            Issue::new(1, "issue1").with_assignees(["user1"]),
            Issue::new(2, "issue2"),
            Issue::new(3, "issue3").with_assignees(["user1", "user2", "user3"]),
        ];
        assert_eq!(
            titles(select(&issues, &config)),
            ["issue1", "issue2", "issue3"]
        );
    }

    #[test]
    fn test_no_assignee_matched() {
        let config = with_assignees(&["user1", "user2", "user3"]);
        let issues = vec![Issue::new(1, "issue1").with_assignees(["user4"])];
        assert!(select(&issues, &config).is_empty());
    }

    #[test]
    fn test_partially_matching_assignees_excluded() {
        let config = with_assignees(&["user1", "user2"]);
        let issues = vec![Issue::new(1, "issue1").with_assignees(["user1", "user4"])];
        assert!(select(&issues, &config).is_empty());
    }

    #[test]
    fn test_assignees_not_specified() {
        let issues = vec![
            Issue::new(1, "issue1"),
            Issue::new(2, "issue2").with_assignees(["user2"]),
        ];
        assert_eq!(titles(select(&issues, &config())), ["issue1", "issue2"]);
    }

    #[test]
    fn test_assignees_with_label() {
        let config = with_assignees(&["user1", "user2", "user3"]);
        let issues = vec![
            Issue::new(1, "issue1")
                .with_assignees(["user1"])
                .with_labels([MATCHING]),
            Issue::new(2, "issue2").with_assignees(["user2"]),
        ];
        assert_eq!(titles(select(&issues, &config)), ["issue2"]);
    }

    #[test]
    fn test_prefix_without_separator_does_not_match() {
        let issues = vec![
            Issue::new(1, "bare").with_labels([PREFIX]),
            Issue::new(2, "joined").with_labels(["prefixOther"]),
            Issue::new(3, "separated").with_labels(["prefix/"]),
        ];
        assert_eq!(titles(select(&issues, &config())), ["bare", "joined"]);
    }

    #[test]
    fn test_prefix_match_is_case_sensitive_and_anchored() {
        let issues = vec![
            Issue::new(1, "upper").with_labels(["Prefix/suffix"]),
            Issue::new(2, "inner").with_labels(["x-prefix/suffix"]),
        ];
        assert_eq!(titles(select(&issues, &config())), ["upper", "inner"]);
    }

    #[test]
    fn test_any_matching_label_suffices() {
        let issues = vec![Issue::new(1, "mixed").with_labels(["bug", MATCHING, "urgent"])];
        assert!(select(&issues, &config()).is_empty());
    }

    #[test]
    fn test_multi_character_separator() {
        let config = PolicyConfig {
            label_separator: "::".to_string(),
            ..config()
        };
        assert!(labels_contain_prefix(
            &[Label::new("prefix::a")],
            &config.label_prefix,
            &config.label_separator
        ));
        assert!(!labels_contain_prefix(
            &[Label::new("prefix:a")],
            &config.label_prefix,
            &config.label_separator
        ));
    }

    #[test]
    fn test_output_preserves_order_and_identity() {
        let issues: Vec<Issue> = (1..=6)
            .map(|n| {
                let issue = Issue::new(n, format!("issue{n}"));
                if n % 2 == 0 {
                    issue.with_labels([MATCHING])
                } else {
                    issue
                }
            })
            .collect();

        let selected = select(&issues, &config());
        let numbers: Vec<u64> = selected.iter().map(|i| i.number).collect();
        assert_eq!(numbers, [1, 3, 5]);
        for issue in selected {
            assert!(issues.iter().any(|i| std::ptr::eq(i, issue)));
        }
    }

    #[test]
    fn test_duplicates_are_kept() {
        let issues = vec![Issue::new(1, "same"), Issue::new(1, "same")];
        assert_eq!(select(&issues, &config()).len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(select(&[], &config()).is_empty());
    }
}

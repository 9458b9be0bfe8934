//! The uniform activity record shared by every stage of the feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of repository activity an [`Activity`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    PullRequest,
    Commit,
    Merge,
}

impl ActivityKind {
    /// Short label used when rendering the feed
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::PullRequest => "PR",
            ActivityKind::Commit => "commit",
            ActivityKind::Merge => "merge",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference from a commit to the pull request that introduced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// PR number
    pub number: u64,
    /// Link to the PR
    pub url: String,
}

/// A single pull request, commit or merge event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub kind: ActivityKind,
    /// Source identifier, unique within `kind` only
    pub id: String,
    pub title: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    /// Own number for pull requests, merged PR number for merge events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_number: Option<u64>,
    /// Only ever set on commits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_pull_request: Option<PullRequestRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kanban_status: Option<String>,
}

impl Activity {
    /// Create an activity with no PR links or status
    pub fn new(
        kind: ActivityKind,
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        timestamp: DateTime<Utc>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            title: title.into(),
            url: url.into(),
            timestamp,
            author: author.into(),
            pr_number: None,
            linked_pull_request: None,
            kanban_status: None,
        }
    }

    /// Set the PR number
    pub fn with_pr_number(mut self, number: u64) -> Self {
        self.pr_number = Some(number);
        self
    }

    /// Link this commit to the PR that introduced it
    pub fn with_linked_pull_request(mut self, number: u64, url: impl Into<String>) -> Self {
        self.linked_pull_request = Some(PullRequestRef {
            number,
            url: url.into(),
        });
        self
    }

    /// Set the project-board status
    pub fn with_kanban_status(mut self, status: impl Into<String>) -> Self {
        self.kanban_status = Some(status.into());
        self
    }

    /// The PR number this activity belongs to, whatever its kind
    pub fn owning_pr_number(&self) -> Option<u64> {
        match self.kind {
            ActivityKind::PullRequest | ActivityKind::Merge => self.pr_number,
            ActivityKind::Commit => self.linked_pull_request.as_ref().map(|pr| pr.number),
        }
    }
}

/// Resolve a display name from a fallback chain of optional names
///
/// Empty or whitespace-only candidates are skipped; the terminal case is
/// the literal `"unknown"`.
pub fn resolve_author<'a, I>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_resolve_author_prefers_first() {
        let author = resolve_author([Some("octocat"), Some("Mona"), Some("bob")]);
        assert_eq!(author, "octocat");
    }

    #[test]
    fn test_resolve_author_falls_through_to_committer() {
        let author = resolve_author([None, None, Some("bob")]);
        assert_eq!(author, "bob");
    }

    #[test]
    fn test_resolve_author_skips_empty() {
        let author = resolve_author([Some(""), Some("  "), Some("alice")]);
        assert_eq!(author, "alice");
    }

    #[test]
    fn test_resolve_author_unknown() {
        let author = resolve_author([None, None, None]);
        assert_eq!(author, "unknown");
        assert_eq!(resolve_author(std::iter::empty::<Option<&str>>()), "unknown");
    }

    #[test]
    fn test_owning_pr_number() {
        let pr = Activity::new(ActivityKind::PullRequest, "1", "t", "u", ts(), "a")
            .with_pr_number(42);
        assert_eq!(pr.owning_pr_number(), Some(42));

        let commit = Activity::new(ActivityKind::Commit, "abc", "t", "u", ts(), "a")
            .with_linked_pull_request(7, "https://github.com/o/r/pull/7");
        assert_eq!(commit.owning_pr_number(), Some(7));

        let bare = Activity::new(ActivityKind::Commit, "def", "t", "u", ts(), "a");
        assert_eq!(bare.owning_pr_number(), None);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ActivityKind::PullRequest.to_string(), "PR");
        assert_eq!(ActivityKind::Commit.to_string(), "commit");
        assert_eq!(ActivityKind::Merge.to_string(), "merge");
    }

    #[test]
    fn test_serialize_skips_empty_links() {
        let commit = Activity::new(ActivityKind::Commit, "abc", "t", "u", ts(), "a");
        let json = serde_json::to_value(&commit).unwrap();
        assert_eq!(json["kind"], "commit");
        assert!(json.get("linked_pull_request").is_none());
        assert!(json.get("kanban_status").is_none());
    }
}

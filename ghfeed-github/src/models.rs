//! Loosely-typed records as returned by the GitHub REST API
//!
//! Every field is optional so one odd record never fails a whole page.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Deserializer};

/// A GitHub account reference
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub login: Option<String>,
}

/// A pull request from `/pulls`, `/commits/{sha}/pulls` or an event payload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawPullRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub merged: Option<bool>,
    #[serde(default)]
    pub merge_commit_sha: Option<String>,
}

/// Name and date of a git author or committer
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawGitActor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// The git-level part of a commit record
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCommitDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<RawGitActor>,
    #[serde(default)]
    pub committer: Option<RawGitActor>,
}

/// A commit from `/commits`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCommit {
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    /// GitHub account of the author, when the email maps to one
    #[serde(default)]
    pub author: Option<RawUser>,
    #[serde(default)]
    pub commit: RawCommitDetail,
}

/// Payload of a repository event; only pull request fields are read
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEventPayload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: Option<u64>,
    #[serde(default)]
    pub pull_request: Option<RawPullRequest>,
}

/// A repository event from `/events`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub actor: Option<RawUser>,
    #[serde(default)]
    pub payload: Option<RawEventPayload>,
}

impl RawEvent {
    /// A `PullRequestEvent` whose pull request is marked merged
    pub fn is_merge(&self) -> bool {
        self.kind.as_deref() == Some("PullRequestEvent")
            && self
                .payload
                .as_ref()
                .and_then(|p| p.pull_request.as_ref())
                .and_then(|pr| pr.merged)
                .unwrap_or(false)
    }

    /// Number of the pull request this event is about
    pub fn pr_number(&self) -> Option<u64> {
        let payload = self.payload.as_ref()?;
        payload
            .number
            .or_else(|| payload.pull_request.as_ref().and_then(|pr| pr.number))
    }
}

/// Everything fetched for one load, before normalization
#[derive(Debug, Clone, Default)]
pub struct RawActivity {
    pub pulls: Vec<RawPullRequest>,
    pub commits: Vec<RawCommit>,
    pub events: Vec<RawEvent>,
    /// First associated pull request per commit sha
    pub associations: HashMap<String, RawPullRequest>,
}

impl RawActivity {
    /// Every PR number referenced by the pull list, commit associations or
    /// merge events
    pub fn referenced_pr_numbers(&self) -> BTreeSet<u64> {
        let from_pulls = self.pulls.iter().filter_map(|pr| pr.number);
        let from_commits = self.associations.values().filter_map(|pr| pr.number);
        let from_merges = self
            .events
            .iter()
            .filter(|e| e.is_merge())
            .filter_map(RawEvent::pr_number);

        from_pulls.chain(from_commits).chain(from_merges).collect()
    }
}

/// Accept a JSON unsigned integer; anything else becomes `None`
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()))
}

/// Accept a numeric or string identifier
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

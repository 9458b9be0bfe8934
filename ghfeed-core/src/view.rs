//! Filtering and ordering of feed entries for display

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ActivityKind, Error, FeedEntry, Result};

/// Which entries to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    #[serde(rename = "pr")]
    PullRequest,
    Commit,
    /// Pull requests that have a merge event
    Merge,
}

impl TypeFilter {
    /// Whether an entry passes this filter
    pub fn matches(&self, entry: &FeedEntry) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::PullRequest => entry.kind() == ActivityKind::PullRequest,
            TypeFilter::Commit => entry.kind() == ActivityKind::Commit,
            TypeFilter::Merge => entry.as_group().is_some_and(|g| g.is_merged()),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::PullRequest => "pr",
            TypeFilter::Commit => "commit",
            TypeFilter::Merge => "merge",
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "pr" | "pull" | "pullrequest" | "pull_request" => Ok(TypeFilter::PullRequest),
            "commit" | "commits" => Ok(TypeFilter::Commit),
            "merge" | "merges" | "merged" => Ok(TypeFilter::Merge),
            other => Err(Error::Parse(format!(
                "Unknown filter '{}'. Expected all, pr, commit or merge",
                other
            ))),
        }
    }
}

/// Chronological direction of the feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    /// Newest first
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("asc"),
            SortOrder::Descending => f.write_str("desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "oldest" => Ok(SortOrder::Ascending),
            "desc" | "descending" | "newest" => Ok(SortOrder::Descending),
            other => Err(Error::Parse(format!(
                "Unknown sort order '{}'. Expected asc or desc",
                other
            ))),
        }
    }
}

/// Select and order the entries to display
///
/// The sort is stable, so entries with equal timestamps keep their
/// relative input order in either direction.
pub fn apply_view(entries: &[FeedEntry], filter: TypeFilter, order: SortOrder) -> Vec<&FeedEntry> {
    let mut visible: Vec<&FeedEntry> = entries.iter().filter(|e| filter.matches(e)).collect();
    match order {
        SortOrder::Ascending => visible.sort_by_key(|e| e.sort_timestamp()),
        SortOrder::Descending => visible.sort_by(|a, b| b.sort_timestamp().cmp(&a.sort_timestamp())),
    }
    visible
}

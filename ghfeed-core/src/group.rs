//! Correlation of commits and merge events with their pull requests
//!
//! Every pull request becomes a [`PullRequestGroup`] that absorbs the commits
//! linked to it and the merge event that closed it. Activities whose PR
//! reference does not resolve stay standalone.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::{Activity, ActivityKind};

/// A pull request together with everything that happened under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestGroup {
    /// The pull request itself
    pub root: Activity,
    /// Commits linked to this PR, in input order
    pub commits: Vec<Activity>,
    /// The merge event for this PR, if one was seen
    pub merge_event: Option<Activity>,
    /// Latest timestamp across the root, its commits and its merge event
    pub effective_timestamp: DateTime<Utc>,
}

impl PullRequestGroup {
    /// Start an empty group for a pull request
    pub fn new(root: Activity) -> Self {
        let effective_timestamp = root.timestamp;
        Self {
            root,
            commits: Vec::new(),
            merge_event: None,
            effective_timestamp,
        }
    }

    /// The PR number of the root activity
    pub fn number(&self) -> Option<u64> {
        self.root.pr_number
    }

    /// Whether this PR has been merged
    pub fn is_merged(&self) -> bool {
        self.merge_event.is_some()
    }

    fn recompute_effective_timestamp(&mut self) {
        self.effective_timestamp = self
            .commits
            .iter()
            .chain(self.merge_event.iter())
            .map(|a| a.timestamp)
            .fold(self.root.timestamp, |latest, ts| latest.max(ts));
    }

    fn propagate_status(&mut self) {
        let Some(status) = self.root.kanban_status.as_ref() else {
            return;
        };
        for child in self.commits.iter_mut().chain(self.merge_event.iter_mut()) {
            if child.kanban_status.is_none() {
                child.kanban_status = Some(status.clone());
            }
        }
    }
}

/// One row of the feed: a grouped pull request or a standalone activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum FeedEntry {
    Group(PullRequestGroup),
    Single(Activity),
}

impl FeedEntry {
    /// Kind of the entry; groups are always pull requests
    pub fn kind(&self) -> ActivityKind {
        match self {
            FeedEntry::Group(_) => ActivityKind::PullRequest,
            FeedEntry::Single(activity) => activity.kind,
        }
    }

    /// Timestamp that governs the entry's sort position
    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        match self {
            FeedEntry::Group(group) => group.effective_timestamp,
            FeedEntry::Single(activity) => activity.timestamp,
        }
    }

    /// The group, if this entry is one
    pub fn as_group(&self) -> Option<&PullRequestGroup> {
        match self {
            FeedEntry::Group(group) => Some(group),
            FeedEntry::Single(_) => None,
        }
    }

    /// The standalone activity, if this entry is one
    pub fn as_single(&self) -> Option<&Activity> {
        match self {
            FeedEntry::Group(_) => None,
            FeedEntry::Single(activity) => Some(activity),
        }
    }
}

/// Group a normalized activity list into feed entries
///
/// Groups come first in pull request input order, followed by the
/// activities that could not be attached, in input order.
pub fn group_activities(activities: Vec<Activity>) -> Vec<FeedEntry> {
    let (pulls, others): (Vec<_>, Vec<_>) = activities
        .into_iter()
        .partition(|a| a.kind == ActivityKind::PullRequest);

    let mut groups: Vec<PullRequestGroup> = Vec::with_capacity(pulls.len());
    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut ungrouped = Vec::new();

    for pr in pulls {
        match pr.pr_number {
            Some(number) if !index.contains_key(&number) => {
                index.insert(number, groups.len());
                groups.push(PullRequestGroup::new(pr));
            }
            _ => ungrouped.push(pr),
        }
    }

    for activity in others {
        let slot = activity
            .owning_pr_number()
            .and_then(|number| index.get(&number).copied());

        match (activity.kind, slot) {
            (ActivityKind::Commit, Some(i)) => groups[i].commits.push(activity),
            (ActivityKind::Merge, Some(i)) if groups[i].merge_event.is_none() => {
                groups[i].merge_event = Some(activity);
            }
            _ => ungrouped.push(activity),
        }
    }

    for group in &mut groups {
        group.recompute_effective_timestamp();
        group.propagate_status();
    }

    debug!(
        groups = groups.len(),
        ungrouped = ungrouped.len(),
        "Grouped activities"
    );

    groups
        .into_iter()
        .map(FeedEntry::Group)
        .chain(ungrouped.into_iter().map(FeedEntry::Single))
        .collect()
}

//! Mapping of raw GitHub records into feed activities
//!
//! Pure functions: the same raw record always yields the same activity.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ghfeed_core::{resolve_author, Activity, ActivityKind};
use tracing::debug;

use crate::models::{RawActivity, RawCommit, RawEvent, RawPullRequest};

/// Parse an ISO-8601 timestamp
pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?;
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!(value, error = %e, "Unparseable timestamp");
            None
        }
    }
}

/// Normalize a pull request from the pull list
pub fn normalize_pull_request(pr: &RawPullRequest) -> Option<Activity> {
    let Some(timestamp) = parse_timestamp(pr.created_at.as_deref()) else {
        debug!(number = ?pr.number, "Dropping pull request without timestamp");
        return None;
    };

    let author = resolve_author([pr.user.as_ref().and_then(|u| u.login.as_deref())]);
    let id = pr
        .id
        .clone()
        .or_else(|| pr.number.map(|n| n.to_string()))
        .unwrap_or_default();

    let activity = Activity::new(
        ActivityKind::PullRequest,
        id,
        pr.title.clone().unwrap_or_default(),
        pr.html_url.clone().unwrap_or_default(),
        timestamp,
        author,
    );

    Some(match pr.number {
        Some(number) => activity.with_pr_number(number),
        None => activity,
    })
}

/// Normalize a commit, linking it to its associated pull request if known
pub fn normalize_commit(commit: &RawCommit, association: Option<&RawPullRequest>) -> Option<Activity> {
    let detail = &commit.commit;
    let date = detail
        .author
        .as_ref()
        .and_then(|a| a.date.as_deref())
        .or_else(|| detail.committer.as_ref().and_then(|c| c.date.as_deref()));

    let Some(timestamp) = parse_timestamp(date) else {
        debug!(sha = ?commit.sha, "Dropping commit without timestamp");
        return None;
    };

    let title = detail
        .message
        .as_deref()
        .and_then(|m| m.lines().next())
        .unwrap_or_default();

    let author = resolve_author([
        commit.author.as_ref().and_then(|u| u.login.as_deref()),
        detail.author.as_ref().and_then(|a| a.name.as_deref()),
        detail.committer.as_ref().and_then(|c| c.name.as_deref()),
    ]);

    let activity = Activity::new(
        ActivityKind::Commit,
        commit.sha.clone().unwrap_or_default(),
        title,
        commit.html_url.clone().unwrap_or_default(),
        timestamp,
        author,
    );

    let linked = association.and_then(|pr| {
        pr.number
            .map(|number| (number, pr.html_url.clone().unwrap_or_default()))
    });

    Some(match linked {
        Some((number, url)) => activity.with_linked_pull_request(number, url),
        None => activity,
    })
}

/// Normalize a qualifying merge event
///
/// `commit_url_base` is the web prefix that the merge commit sha is
/// appended to. Returns `None` for events that are not merges.
pub fn normalize_merge_event(event: &RawEvent, commit_url_base: &str) -> Option<Activity> {
    if !event.is_merge() {
        return None;
    }

    let Some(timestamp) = parse_timestamp(event.created_at.as_deref()) else {
        debug!(id = ?event.id, "Dropping merge event without timestamp");
        return None;
    };

    let pr = event.payload.as_ref().and_then(|p| p.pull_request.as_ref());

    let url = match pr.and_then(|p| p.merge_commit_sha.as_deref()) {
        Some(sha) if !sha.is_empty() => format!("{}/{}", commit_url_base, sha),
        _ => pr.and_then(|p| p.html_url.clone()).unwrap_or_default(),
    };

    let author = resolve_author([
        event.actor.as_ref().and_then(|a| a.login.as_deref()),
        pr.and_then(|p| p.user.as_ref()).and_then(|u| u.login.as_deref()),
    ]);

    let activity = Activity::new(
        ActivityKind::Merge,
        event.id.clone().unwrap_or_default(),
        pr.and_then(|p| p.title.clone()).unwrap_or_default(),
        url,
        timestamp,
        author,
    );

    Some(match event.pr_number() {
        Some(number) => activity.with_pr_number(number),
        None => activity,
    })
}

/// Normalize a whole load into a flat activity list
///
/// Pull requests come first, then commits, then merge events, each in
/// source order.
pub fn normalize_all(raw: &RawActivity, commit_url_base: &str) -> Vec<Activity> {
    let pulls = raw.pulls.iter().filter_map(normalize_pull_request);

    let commits = raw.commits.iter().filter_map(|c| {
        let association = c.sha.as_ref().and_then(|sha| raw.associations.get(sha));
        normalize_commit(c, association)
    });

    let merges = raw
        .events
        .iter()
        .filter_map(|e| normalize_merge_event(e, commit_url_base));

    pulls.chain(commits).chain(merges).collect()
}

/// Attach project-board status to every activity whose PR has one
///
/// Activities that already carry a status keep it.
pub fn apply_statuses(activities: &mut [Activity], statuses: &HashMap<u64, String>) {
    if statuses.is_empty() {
        return;
    }
    for activity in activities.iter_mut() {
        if activity.kanban_status.is_some() {
            continue;
        }
        if let Some(status) = activity.owning_pr_number().and_then(|n| statuses.get(&n)) {
            activity.kanban_status = Some(status.clone());
        }
    }
}

//! Plain-text rendering of the feed

use std::fmt::Write;

use ghfeed_core::{Activity, ActivityKind, FeedEntry, PullRequestGroup};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render entries as an indented tree, one block per entry
pub fn render_tree(entries: &[&FeedEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry {
            FeedEntry::Group(group) => render_group(&mut out, group),
            FeedEntry::Single(activity) => {
                let _ = writeln!(out, "{}", activity_line(activity));
            }
        }
    }
    out
}

fn render_group(out: &mut String, group: &PullRequestGroup) {
    let _ = writeln!(out, "{}", activity_line(&group.root));
    let _ = writeln!(
        out,
        "    last activity {}",
        group.effective_timestamp.format(TIME_FORMAT)
    );

    let children: Vec<&Activity> = group.commits.iter().chain(group.merge_event.iter()).collect();
    for (i, child) in children.iter().enumerate() {
        let branch = if i + 1 == children.len() { "└─" } else { "├─" };
        let _ = writeln!(out, "  {} {}", branch, child_line(child));
    }
}

fn label(activity: &Activity) -> String {
    match (activity.kind, activity.pr_number) {
        (ActivityKind::PullRequest, Some(n)) => format!("PR #{}", n),
        (ActivityKind::Merge, Some(n)) => format!("merge #{}", n),
        (ActivityKind::Commit, _) => format!("commit {}", short_sha(&activity.id)),
        (kind, None) => kind.label().to_string(),
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

fn status_suffix(activity: &Activity) -> String {
    activity
        .kanban_status
        .as_deref()
        .map(|s| format!(" [{}]", s))
        .unwrap_or_default()
}

fn activity_line(activity: &Activity) -> String {
    format!(
        "[{}] {} by {} at {}{}\n    {}",
        label(activity),
        activity.title,
        activity.author,
        activity.timestamp.format(TIME_FORMAT),
        status_suffix(activity),
        activity.url
    )
}

fn child_line(activity: &Activity) -> String {
    format!(
        "[{}] {} by {} at {}",
        label(activity),
        activity.title,
        activity.author,
        activity.timestamp.format(TIME_FORMAT)
    )
}

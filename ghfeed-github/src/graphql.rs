//! Project-board status lookup over the GitHub GraphQL API
//!
//! The REST API has no view of ProjectV2 items, so PR statuses are fetched in
//! one batched query with an aliased `pullRequest` field per PR number.

use std::collections::{BTreeSet, HashMap};

use crate::{Error, GitHubClient, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

/// Items fetched per pull request
const PROJECT_ITEMS_PER_PR: u32 = 20;

/// GraphQL query response wrapper
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

/// GraphQL error
#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct StatusQueryData {
    /// Keyed by alias (`pr42`); a PR that failed to resolve is `null`
    repository: Option<HashMap<String, Option<PullRequestNode>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    #[serde(default)]
    number: Option<u64>,
    #[serde(default)]
    project_items: Option<ProjectItemConnection>,
}

#[derive(Debug, Deserialize)]
struct ProjectItemConnection {
    #[serde(default)]
    nodes: Vec<Option<ProjectItemNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectItemNode {
    #[serde(default)]
    project: Option<ProjectNode>,
    #[serde(default)]
    field_value_by_name: Option<StatusValue>,
}

#[derive(Debug, Deserialize)]
struct ProjectNode {
    #[serde(default)]
    title: Option<String>,
}

/// Value of a project item's "Status" field, by field type
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "__typename")]
pub enum StatusValue {
    #[serde(rename = "ProjectV2ItemFieldSingleSelectValue")]
    SingleSelect {
        #[serde(default)]
        name: Option<String>,
    },
    #[serde(rename = "ProjectV2ItemFieldTextValue")]
    Text {
        #[serde(default)]
        text: Option<String>,
    },
    #[serde(rename = "ProjectV2ItemFieldNumberValue")]
    Number {
        #[serde(default)]
        number: Option<f64>,
    },
    #[serde(rename = "ProjectV2ItemFieldIterationValue")]
    Iteration {
        #[serde(default)]
        title: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

impl StatusValue {
    /// Display string for the value, if it has one
    pub fn display(&self) -> Option<String> {
        let text = match self {
            StatusValue::SingleSelect { name } => name.clone(),
            StatusValue::Text { text } => text.clone(),
            StatusValue::Number { number } => number.map(format_number),
            StatusValue::Iteration { title } => title.clone(),
            StatusValue::Unsupported => None,
        }?;
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl PullRequestNode {
    /// Combined status across every project the PR is on
    fn status(&self) -> Option<String> {
        let items = self.project_items.as_ref()?;
        let parts: Vec<String> = items
            .nodes
            .iter()
            .flatten()
            .filter_map(|item| {
                let status = item.field_value_by_name.as_ref()?.display()?;
                let project = item
                    .project
                    .as_ref()
                    .and_then(|p| p.title.as_deref())
                    .map(str::trim)
                    .filter(|t| !t.is_empty());
                Some(match project {
                    Some(title) => format!("{}: {}", title, status),
                    None => status,
                })
            })
            .collect();

        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// Build the batched status query for the given PR numbers
pub fn build_status_query(numbers: &BTreeSet<u64>) -> String {
    let fields: String = numbers
        .iter()
        .map(|n| {
            format!(
                r#"
                    pr{n}: pullRequest(number: {n}) {{
                        number
                        projectItems(first: {items}) {{
                            nodes {{
                                project {{ title }}
                                fieldValueByName(name: "Status") {{
                                    __typename
                                    ... on ProjectV2ItemFieldSingleSelectValue {{ name }}
                                    ... on ProjectV2ItemFieldTextValue {{ text }}
                                    ... on ProjectV2ItemFieldNumberValue {{ number }}
                                    ... on ProjectV2ItemFieldIterationValue {{ title }}
                                }}
                            }}
                        }}
                    }}"#,
                n = n,
                items = PROJECT_ITEMS_PER_PR
            )
        })
        .collect();

    format!(
        r#"query($owner: String!, $repo: String!) {{
                repository(owner: $owner, name: $repo) {{{fields}
                }}
            }}"#
    )
}

fn alias_number(alias: &str) -> Option<u64> {
    alias.strip_prefix("pr")?.parse().ok()
}

fn collect_statuses(data: StatusQueryData) -> HashMap<u64, String> {
    data.repository
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(alias, node)| {
            let node = node?;
            let number = node.number.or_else(|| alias_number(&alias))?;
            Some((number, node.status()?))
        })
        .collect()
}

impl GitHubClient {
    /// Fetch the project-board status of each pull request
    ///
    /// Never fails: transport or query errors are logged and the affected
    /// PRs are simply missing from the result. An empty input issues no
    /// request.
    pub async fn fetch_project_statuses(&self, numbers: &BTreeSet<u64>) -> HashMap<u64, String> {
        if numbers.is_empty() {
            debug!("No pull requests to look up project status for");
            return HashMap::new();
        }

        debug!(count = numbers.len(), "Fetching project statuses via GraphQL");

        let query = build_status_query(numbers);
        let variables = json!({
            "owner": self.owner(),
            "repo": self.repo(),
        });

        let response = match self
            .graphql_query::<StatusQueryData>(&query, &variables)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Project status lookup failed");
                return HashMap::new();
            }
        };

        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            let error_messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            warn!(
                errors = %error_messages.join(", "),
                "Project status lookup returned errors"
            );
        }

        let statuses = response.data.map(collect_statuses).unwrap_or_default();
        info!(count = statuses.len(), "Fetched project statuses");
        statuses
    }

    /// Execute a GraphQL query
    ///
    /// The `errors` array is returned to the caller alongside any partial
    /// `data` rather than turned into an error.
    async fn graphql_query<T: for<'de> Deserialize<'de>>(
        &self,
        query: &str,
        variables: &serde_json::Value,
    ) -> Result<GraphQLResponse<T>> {
        let request_body = json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .http()
            .post(&self.endpoints().graphql_url)
            .header("Authorization", format!("Bearer {}", self.token()))
            .header("User-Agent", "ghfeed")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            return Err(Error::GraphQL(format!(
                "request failed with status {}: {}",
                status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Failed to parse GraphQL response: {}", e)))
    }
}

//! End-to-end activity load for one repository

use async_trait::async_trait;
use ghfeed_core::{Activity, ActivitySource, Connection, GitHubConfig};
use tracing::{error, info};

use crate::models::RawActivity;
use crate::normalize::{apply_statuses, normalize_all};
use crate::{GitHubClient, Result};

impl GitHubClient {
    /// Fetch the three primary collections and the commit associations
    ///
    /// Fails if any primary collection fails; association lookups never do.
    pub async fn fetch_raw_activity(&self) -> Result<RawActivity> {
        let (pulls, commits, events) = tokio::try_join!(
            self.list_pull_requests(),
            self.list_commits(),
            self.list_events()
        )?;

        let associations = self.find_commit_associations(&commits).await;

        Ok(RawActivity {
            pulls,
            commits,
            events,
            associations,
        })
    }

    /// Load the normalized, status-enriched activity list
    ///
    /// Resolves to an empty list when a primary collection cannot be
    /// fetched; enrichment failures only drop the enrichment.
    pub async fn load_activity(&self) -> Vec<Activity> {
        let raw = match self.fetch_raw_activity().await {
            Ok(raw) => raw,
            Err(e) => {
                error!(
                    owner = %self.owner(),
                    repo = %self.repo(),
                    error = %e,
                    "Failed to load activity"
                );
                return Vec::new();
            }
        };

        let statuses = self
            .fetch_project_statuses(&raw.referenced_pr_numbers())
            .await;

        let mut activities = normalize_all(&raw, &self.commit_url_base());
        apply_statuses(&mut activities, &statuses);

        info!(count = activities.len(), "Activity loaded");
        activities
    }
}

/// [`ActivitySource`] backed by the GitHub API
#[derive(Debug, Clone, Default)]
pub struct GitHubSource {
    endpoints: GitHubConfig,
}

impl GitHubSource {
    /// Create a source targeting the given endpoints
    pub fn new(endpoints: GitHubConfig) -> Self {
        Self { endpoints }
    }
}

#[async_trait]
impl ActivitySource for GitHubSource {
    async fn load(&self, connection: &Connection) -> Vec<Activity> {
        match GitHubClient::new(connection, &self.endpoints) {
            Ok(client) => client.load_activity().await,
            Err(e) => {
                error!(error = %e, "Failed to create GitHub client");
                Vec::new()
            }
        }
    }
}

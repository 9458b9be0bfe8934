//! REST collections: pull requests, commits, events and commit associations

use std::collections::HashMap;

use crate::models::{RawCommit, RawEvent, RawPullRequest};
use crate::{Error, GitHubClient, Result};
use tracing::{debug, info, warn};

impl GitHubClient {
    /// List pull requests in every state (first page only)
    pub async fn list_pull_requests(&self) -> Result<Vec<RawPullRequest>> {
        debug!("Listing pull requests");

        let pulls: Vec<RawPullRequest> = self
            .client()
            .get(self.repo_route("pulls"), Some(&[("state", "all")]))
            .await
            .map_err(Error::Api)?;

        info!(count = pulls.len(), "Fetched pull requests");
        Ok(pulls)
    }

    /// List the most recent commits on the default branch
    pub async fn list_commits(&self) -> Result<Vec<RawCommit>> {
        debug!("Listing commits");

        let commits: Vec<RawCommit> = self
            .client()
            .get(self.repo_route("commits"), None::<&()>)
            .await
            .map_err(Error::Api)?;

        info!(count = commits.len(), "Fetched commits");
        Ok(commits)
    }

    /// List recent repository events
    pub async fn list_events(&self) -> Result<Vec<RawEvent>> {
        debug!("Listing repository events");

        let events: Vec<RawEvent> = self
            .client()
            .get(self.repo_route("events"), None::<&()>)
            .await
            .map_err(Error::Api)?;

        info!(count = events.len(), "Fetched events");
        Ok(events)
    }

    /// Pull requests associated with one commit
    pub async fn list_pulls_for_commit(&self, sha: &str) -> Result<Vec<RawPullRequest>> {
        self.client()
            .get(self.repo_route(&format!("commits/{}/pulls", sha)), None::<&()>)
            .await
            .map_err(Error::Api)
    }

    /// Look up the first associated pull request of every commit
    ///
    /// Lookups run concurrently. A failed lookup only leaves that commit
    /// out of the result.
    pub async fn find_commit_associations(
        &self,
        commits: &[RawCommit],
    ) -> HashMap<String, RawPullRequest> {
        let mut handles = Vec::new();

        for sha in commits.iter().filter_map(|c| c.sha.clone()) {
            let client = self.clone();
            handles.push(tokio::spawn(async move {
                let result = client.list_pulls_for_commit(&sha).await;
                (sha, result)
            }));
        }

        let mut associations = HashMap::new();

        for handle in handles {
            match handle.await {
                Ok((sha, Ok(pulls))) => {
                    if let Some(first) = pulls.into_iter().next() {
                        debug!(sha = %sha, pr_number = ?first.number, "Commit linked to pull request");
                        associations.insert(sha, first);
                    }
                }
                Ok((sha, Err(e))) => {
                    debug!(sha = %sha, error = %e, "Commit association lookup failed");
                }
                Err(e) => {
                    warn!(error = %e, "Commit association task panicked");
                }
            }
        }

        info!(
            commits = commits.len(),
            linked = associations.len(),
            "Resolved commit associations"
        );

        associations
    }
}

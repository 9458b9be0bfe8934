//! GitHub API client using octocrab

use crate::{Error, Result};
use ghfeed_core::{Connection, GitHubConfig};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use tracing::{debug, info};

/// GitHub API client bound to one repository
#[derive(Clone)]
pub struct GitHubClient {
    client: Octocrab,
    http: reqwest::Client,
    owner: String,
    repo: String,
    token: String,
    endpoints: GitHubConfig,
}

impl GitHubClient {
    /// Create a new GitHub client for the connected repository
    ///
    /// The connection is validated first; nothing is sent over the network
    /// here.
    pub fn new(connection: &Connection, endpoints: &GitHubConfig) -> Result<Self> {
        connection.validate()?;

        let client = Octocrab::builder()
            .personal_token(connection.token.clone())
            .base_uri(endpoints.api_base.as_str())
            .map_err(|e| Error::Parse(format!("Invalid API base URL {}: {}", endpoints.api_base, e)))?
            .add_retry_config(RetryConfig::None)
            .build()
            .map_err(|e| Error::Auth(format!("Failed to create GitHub client: {}", e)))?;

        info!(owner = %connection.owner, repo = %connection.repo, "Created GitHub client");

        Ok(Self {
            client,
            http: reqwest::Client::new(),
            owner: connection.owner.clone(),
            repo: connection.repo.clone(),
            token: connection.token.clone(),
            endpoints: endpoints.clone(),
        })
    }

    /// Get the repository owner
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the repository name
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Get the underlying octocrab client
    pub fn client(&self) -> &Octocrab {
        &self.client
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    pub(crate) fn endpoints(&self) -> &GitHubConfig {
        &self.endpoints
    }

    /// REST route under this repository, e.g. `repo_route("pulls")`
    pub(crate) fn repo_route(&self, tail: &str) -> String {
        format!("/repos/{}/{}/{}", self.owner, self.repo, tail)
    }

    /// Base of synthetic web links to commits in this repository
    pub fn commit_url_base(&self) -> String {
        format!(
            "{}/{}/{}/commit",
            self.endpoints.web_base.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }

    /// Test the connection by fetching repository info
    pub async fn test_connection(&self) -> Result<()> {
        debug!(
            owner = %self.owner,
            repo = %self.repo,
            "Testing GitHub connection"
        );

        self.client
            .repos(&self.owner, &self.repo)
            .get()
            .await
            .map_err(|e| match e {
                octocrab::Error::GitHub { ref source, .. }
                    if source.message.contains("Bad credentials") =>
                {
                    Error::Auth("Invalid GitHub token".to_string())
                }
                octocrab::Error::GitHub { ref source, .. }
                    if source.message.contains("Not Found") =>
                {
                    Error::Other(format!(
                        "Repository {}/{} not found or not accessible",
                        self.owner, self.repo
                    ))
                }
                other => Error::Api(other),
            })?;

        info!("GitHub connection successful");
        Ok(())
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

/// Parse a repository reference into owner and repo
///
/// Supports formats:
/// - owner/repo
/// - https://github.com/owner/repo
/// - git@github.com:owner/repo.git
pub fn parse_repository(reference: &str) -> Result<(String, String)> {
    let reference = reference.trim();

    if !reference.contains("://") && !reference.contains('@') {
        let parts: Vec<&str> = reference.split('/').collect();
        if let [owner, repo] = parts.as_slice() {
            if !owner.is_empty() && !repo.is_empty() {
                return Ok((owner.to_string(), repo.trim_end_matches(".git").to_string()));
            }
        }
        return Err(Error::Parse(format!(
            "Invalid repository format: {}. Expected owner/repo",
            reference
        )));
    }

    if reference.starts_with("https://") || reference.starts_with("http://") {
        let url = url::Url::parse(reference).map_err(|e| Error::Parse(e.to_string()))?;
        let path = url.path().trim_start_matches('/').trim_end_matches(".git");
        let parts: Vec<&str> = path.split('/').collect();
        if let [owner, repo, ..] = parts.as_slice() {
            if !owner.is_empty() && !repo.is_empty() {
                return Ok((owner.to_string(), repo.to_string()));
            }
        }
        return Err(Error::Parse(format!("Invalid GitHub URL path: {}", path)));
    }

    if reference.starts_with("git@") {
        if let Some(path) = reference.split(':').nth(1) {
            let path = path.trim_end_matches(".git");
            let parts: Vec<&str> = path.split('/').collect();
            if let [owner, repo, ..] = parts.as_slice() {
                return Ok((owner.to_string(), repo.to_string()));
            }
        }
        return Err(Error::Parse(format!("Invalid SSH URL: {}", reference)));
    }

    Err(Error::Parse(format!("Unrecognized URL format: {}", reference)))
}

//! Resolution of which repository and token a command talks to

use clap::Args;
use ghfeed_core::{Config, Connection, Secrets};
use ghfeed_github::parse_repository;

/// Repository selection shared by commands that hit the API
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Repository as owner/repo or a GitHub URL (overrides --owner/--repo)
    pub repository: Option<String>,

    /// Repository owner
    #[arg(long, env = "GHFEED_OWNER")]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, env = "GHFEED_REPO")]
    pub repo: Option<String>,

    /// Personal access token (defaults to GITHUB_TOKEN or the secrets file)
    #[arg(long)]
    pub token: Option<String>,
}

impl TargetArgs {
    /// Owner and repo given on the command line, if any
    pub fn owner_repo(&self) -> anyhow::Result<(Option<String>, Option<String>)> {
        match &self.repository {
            Some(reference) => {
                let (owner, repo) = parse_repository(reference)?;
                Ok((Some(owner), Some(repo)))
            }
            None => Ok((self.owner.clone(), self.repo.clone())),
        }
    }

    /// Build the connection from CLI args, config and secrets
    ///
    /// Missing pieces are left empty; validation happens before any request.
    pub fn connection(&self, config: &Config) -> anyhow::Result<Connection> {
        let token = match &self.token {
            Some(token) => Some(token.clone()),
            None => Secrets::load()?.github_token(),
        };

        Ok(Connection::new(
            config.feed.owner.as_deref().unwrap_or_default(),
            config.feed.repo.as_deref().unwrap_or_default(),
            token.unwrap_or_default(),
        ))
    }
}

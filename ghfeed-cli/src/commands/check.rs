//! Check command - verify the token can see the repository

use clap::Args;
use ghfeed_core::Config;
use ghfeed_github::GitHubClient;

use super::TargetArgs;

/// Verify that the repository is reachable with the configured token
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let (owner, repo) = self.target.owner_repo()?;
        let config = config.with_cli_overrides(owner, repo, None, None);
        let connection = self.target.connection(&config)?;

        let client = GitHubClient::new(&connection, &config.github)?;
        client.test_connection().await?;

        println!("Connected to {}.", connection.full_name());
        Ok(())
    }
}

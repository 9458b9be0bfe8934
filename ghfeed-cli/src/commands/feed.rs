//! Feed command - load and print repository activity

use clap::Args;
use ghfeed_core::{Config, FeedSession, SortOrder, TypeFilter};
use ghfeed_github::GitHubSource;

use super::TargetArgs;
use crate::render;

/// Show the activity feed for a repository
#[derive(Args, Debug)]
pub struct FeedArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Entry types to show: all, pr, commit, merge
    #[arg(short, long)]
    pub filter: Option<TypeFilter>,

    /// Chronological order: asc or desc
    #[arg(short, long)]
    pub sort: Option<SortOrder>,

    /// Print JSON instead of a tree
    #[arg(long)]
    pub json: bool,
}

impl FeedArgs {
    /// Execute the feed command
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let (owner, repo) = self.target.owner_repo()?;
        let config = config.with_cli_overrides(owner, repo, self.filter, self.sort);
        let connection = self.target.connection(&config)?;

        let source = GitHubSource::new(config.github.clone());
        let mut session = FeedSession::new(config.feed.filter, config.feed.sort);

        session.refresh(&source, &connection).await.map_err(|e| {
            anyhow::anyhow!(
                "{}. Pass it on the command line, set it in the config file, or export GITHUB_TOKEN",
                e
            )
        })?;

        let entries = session.view();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else if entries.is_empty() {
            println!("No activity found for {}.", connection.full_name());
        } else {
            print!("{}", render::render_tree(&entries));
        }

        Ok(())
    }
}

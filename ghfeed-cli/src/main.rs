//! ghfeed CLI - Command line interface for the repository activity feed
//!
//! Shows pull requests, commits and merges of a GitHub repository as one
//! timeline, grouped by pull request.

mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ghfeed_core::{Config, Secrets};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{CheckArgs, FeedArgs};

/// ghfeed: a grouped activity feed for GitHub repositories
#[derive(Parser, Debug)]
#[command(name = "ghfeed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (defaults to ~/.config/ghfeed/config.toml)
    #[arg(long, global = true, env = "GHFEED_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Show the activity feed for a repository
    #[command(visible_alias = "f")]
    Feed(FeedArgs),

    /// Verify the repository is reachable with the configured token
    Check(CheckArgs),

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::load_with_env(cli.config.as_deref())?;

    if cli.verbose {
        tracing::debug!(
            api_base = %config.github.api_base,
            owner = ?config.feed.owner,
            repo = ?config.feed.repo,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("ghfeed {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Feed(args)) => {
            args.execute(config).await?;
        }
        Some(Commands::Check(args)) => {
            args.execute(config).await?;
        }
        Some(Commands::Config) => {
            let token_available = Secrets::load()?.github_token().is_some();

            println!("ghfeed Configuration");
            println!("====================");
            println!();
            println!("GitHub:");
            println!("  api_base: {}", config.github.api_base);
            println!("  graphql_url: {}", config.github.graphql_url);
            println!("  web_base: {}", config.github.web_base);
            println!();
            println!("Feed:");
            println!("  owner: {}", config.feed.owner.as_deref().unwrap_or("(unset)"));
            println!("  repo: {}", config.feed.repo.as_deref().unwrap_or("(unset)"));
            println!("  filter: {}", config.feed.filter);
            println!("  sort: {}", config.feed.sort);
            println!(
                "  token: {}",
                if token_available { "(available)" } else { "(missing)" }
            );
            println!();

            let path = cli.config.clone().or_else(Config::default_config_path);
            if let Some(path) = path {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("ghfeed - grouped activity feed for GitHub repositories");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

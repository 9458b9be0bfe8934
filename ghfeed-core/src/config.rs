//! Configuration management for ghfeed
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GHFEED_*)
//! 3. Config file (~/.config/ghfeed/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, SortOrder, TypeFilter};

/// GitHub endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// REST API base URL
    pub api_base: String,

    /// GraphQL endpoint
    pub graphql_url: String,

    /// Web base URL used to build links to commits
    pub web_base: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            graphql_url: "https://api.github.com/graphql".to_string(),
            web_base: "https://github.com".to_string(),
        }
    }
}

/// Remembered connection parameters and view settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Default repository owner
    pub owner: Option<String>,

    /// Default repository name
    pub repo: Option<String>,

    /// Default type filter
    pub filter: TypeFilter,

    /// Default sort order
    pub sort: SortOrder,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub endpoints
    pub github: GitHubConfig,

    /// Feed defaults
    pub feed: FeedConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/ghfeed/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ghfeed").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - GHFEED_OWNER: Repository owner
    /// - GHFEED_REPO: Repository name
    /// - GHFEED_API_BASE: REST API base URL
    /// - GHFEED_GRAPHQL_URL: GraphQL endpoint
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(owner) = present("GHFEED_OWNER") {
            self.feed.owner = Some(owner);
        }

        if let Some(repo) = present("GHFEED_REPO") {
            self.feed.repo = Some(repo);
        }

        if let Some(api_base) = present("GHFEED_API_BASE") {
            self.github.api_base = api_base;
        }

        if let Some(graphql_url) = present("GHFEED_GRAPHQL_URL") {
            self.github.graphql_url = graphql_url;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        owner: Option<String>,
        repo: Option<String>,
        filter: Option<TypeFilter>,
        sort: Option<SortOrder>,
    ) -> Self {
        if let Some(o) = owner {
            self.feed.owner = Some(o);
        }

        if let Some(r) = repo {
            self.feed.repo = Some(r);
        }

        if let Some(f) = filter {
            self.feed.filter = f;
        }

        if let Some(s) = sort {
            self.feed.sort = s;
        }

        self
    }

    /// Load configuration from `path` (or the default location) with
    /// environment overrides applied
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::load_from_file(p)?,
            None => Self::load()?,
        };
        Ok(config.with_env_overrides())
    }
}

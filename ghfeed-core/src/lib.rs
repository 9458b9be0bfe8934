//! ghfeed core - activity model and feed logic
//!
//! This crate turns a flat list of repository activities into a feed of
//! pull request groups and standalone entries, and provides the filter and
//! sort view over it. It performs no I/O beyond reading its own config.

pub mod activity;
pub mod config;
pub mod connection;
pub mod error;
pub mod group;
pub mod secrets;
pub mod session;
pub mod view;

pub use activity::{resolve_author, Activity, ActivityKind, PullRequestRef};
pub use config::{Config, FeedConfig, GitHubConfig};
pub use connection::Connection;
pub use error::{Error, Result};
pub use group::{group_activities, FeedEntry, PullRequestGroup};
pub use secrets::{GitHubSecrets, Secrets};
pub use session::{ActivitySource, FeedSession};
pub use view::{apply_view, SortOrder, TypeFilter};

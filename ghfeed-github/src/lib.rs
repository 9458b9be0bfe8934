//! ghfeed GitHub - GitHub data source for ghfeed
//!
//! This crate fetches pull requests, commits and repository events over the
//! REST API, links commits to their pull requests, looks up project-board
//! status over GraphQL and normalizes it all into feed activities.

mod client;
mod error;
mod graphql;
mod loader;
pub mod models;
pub mod normalize;
mod rest;

pub use client::{parse_repository, GitHubClient};
pub use error::{Error, Result};
pub use graphql::{build_status_query, StatusValue};
pub use loader::GitHubSource;
pub use models::RawActivity;

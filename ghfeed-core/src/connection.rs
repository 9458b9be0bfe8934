//! Repository connection parameters supplied by the user

use std::fmt;

use crate::{Error, Result};

/// Owner, repository and access token for one feed
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Connection {
    pub owner: String,
    pub repo: String,
    /// Opaque bearer token, used as-is
    pub token: String,
}

impl Connection {
    /// Create a connection, trimming surrounding whitespace from every field
    pub fn new(
        owner: impl AsRef<str>,
        repo: impl AsRef<str>,
        token: impl AsRef<str>,
    ) -> Self {
        Self {
            owner: owner.as_ref().trim().to_string(),
            repo: repo.as_ref().trim().to_string(),
            token: token.as_ref().trim().to_string(),
        }
    }

    /// Check that every parameter is present
    pub fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() {
            return Err(Error::MissingInput("owner"));
        }
        if self.repo.trim().is_empty() {
            return Err(Error::MissingInput("repo"));
        }
        if self.token.trim().is_empty() {
            return Err(Error::MissingInput("token"));
        }
        Ok(())
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .finish()
    }
}

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A single `owner/repo` pair to fetch and unpack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskParseError {
    #[error("invalid repository '{0}': expected owner/repo")]
    Malformed(String),
    #[error("invalid repository '{0}': empty owner")]
    EmptyOwner(String),
    #[error("invalid repository '{0}': empty repository")]
    EmptyRepo(String),
}

impl DownloadTask {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parses every token, failing on the first malformed one so that no
    /// work starts on a partially valid list.
    pub fn parse_all<I, S>(tokens: I) -> Result<Vec<Self>, TaskParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens.into_iter().map(|t| t.as_ref().parse()).collect()
    }
}

impl FromStr for DownloadTask {
    type Err = TaskParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut parts = token.split('/');
        let (owner, repo) = match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) => (owner.trim(), repo.trim()),
            _ => return Err(TaskParseError::Malformed(token.to_string())),
        };
        if owner.is_empty() {
            return Err(TaskParseError::EmptyOwner(token.to_string()));
        }
        if repo.is_empty() {
            return Err(TaskParseError::EmptyRepo(token.to_string()));
        }
        Ok(Self::new(owner, repo))
    }
}

impl fmt::Display for DownloadTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

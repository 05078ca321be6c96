//! Dual-identity repository addressing.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Identifies a repository either by its owner/name slug or by numeric id.
///
/// Both forms address the same remote entity; only path building branches on
/// the variant, so every operation takes a single `RepoAddress` instead of
/// being duplicated per addressing form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepoAddress {
    /// Human-readable `owner/name` pair.
    Slug { owner: String, name: String },
    /// Server-assigned numeric repository id.
    Id(u64),
}

impl RepoAddress {
    /// Address a repository by owner and name.
    pub fn slug(owner: impl Into<String>, name: impl Into<String>) -> Self {
        RepoAddress::Slug {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Address a repository by its numeric id.
    pub fn id(id: u64) -> Self {
        RepoAddress::Id(id)
    }

    /// Canonical URL path prefix for this repository.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            RepoAddress::Slug { owner, name } => format!("/repos/{}/{}", owner, name),
            RepoAddress::Id(id) => format!("/repositories/{}", id),
        }
    }
}

impl fmt::Display for RepoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoAddress::Slug { owner, name } => write!(f, "{}/{}", owner, name),
            RepoAddress::Id(id) => write!(f, "repository {}", id),
        }
    }
}

/// Error parsing a repository address from a string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("expected owner/name or a numeric repository id, got {0:?}")]
    Malformed(String),

    #[error("owner and name must be non-empty in {0:?}")]
    EmptySegment(String),
}

impl FromStr for RepoAddress {
    type Err = AddressParseError;

    /// Accepts `owner/name` or a bare numeric id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((owner, name)) = s.split_once('/') {
            if owner.is_empty() || name.is_empty() || name.contains('/') {
                return Err(AddressParseError::EmptySegment(s.to_string()));
            }
            return Ok(RepoAddress::slug(owner, name));
        }
        if let Ok(id) = s.parse::<u64>()
            && id > 0
        {
            return Ok(RepoAddress::Id(id));
        }
        Err(AddressParseError::Malformed(s.to_string()))
    }
}

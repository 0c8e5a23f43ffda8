//! List identifiers
//!
//! A `ListId` is minted every time a list is shared. It is both the store
//! key suffix (`list-<id>`) and the last path segment of the share URL.
//!
//! Fresh ids are the base58 encoding of a random UUID, so two shares in the
//! same millisecond can't collide. Parsing is lenient enough to accept the
//! decimal timestamp ids of lists stored by older versions.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

/// Prefix of every store key
pub const KEY_PREFIX: &str = "list-";

/// Errors from parsing a list identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListIdError {
    #[error("List ID is empty")]
    Empty,
    #[error("Invalid character {0:?} in list ID")]
    InvalidChar(char),
}

/// Identifier of a stored list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListId(String);

impl ListId {
    /// Mint a new random identifier
    pub fn generate() -> Self {
        Self(bs58::encode(Uuid::new_v4().as_bytes()).into_string())
    }

    /// Parse an identifier from user input or a URL path segment
    pub fn parse(s: &str) -> Result<Self, ListIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ListIdError::Empty);
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(ListIdError::InvalidChar(c));
        }

        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which the list is stored
    pub fn storage_key(&self) -> String {
        format!("{}{}", KEY_PREFIX, self.0)
    }

    /// Recover an id from a store key
    pub fn from_storage_key(key: &str) -> Option<Self> {
        key.strip_prefix(KEY_PREFIX)
            .and_then(|rest| Self::parse(rest).ok())
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ListId {
    type Err = ListIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_is_url_safe() {
        let id = ListId::generate();
        assert!(!id.as_str().is_empty());
        assert!(id.as_str().len() <= 22);
        assert_eq!(ListId::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn test_generate_is_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| ListId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_parse_accepts_timestamp_ids() {
        let id = ListId::parse("1717171717171").unwrap();
        assert_eq!(id.as_str(), "1717171717171");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(ListId::parse(""), Err(ListIdError::Empty));
        assert_eq!(ListId::parse("   "), Err(ListIdError::Empty));
        assert_eq!(ListId::parse("../etc"), Err(ListIdError::InvalidChar('.')));
        assert_eq!(ListId::parse("a/b"), Err(ListIdError::InvalidChar('/')));
    }

    #[test]
    fn test_storage_key() {
        let id = ListId::parse("abc123").unwrap();
        assert_eq!(id.storage_key(), "list-abc123");
        assert_eq!(ListId::from_storage_key("list-abc123"), Some(id));
        assert_eq!(ListId::from_storage_key("other-abc123"), None);
    }
}

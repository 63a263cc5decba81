//! Basic type definitions for the IRC gateway
//!
//! Provides:
//! - `Nickname`: member key with protocol decoration stripped
//! - `Identity`: who we register as on the IRC network

use std::env;

use crate::error::AppError;

/// Characters trimmed from both ends of nicknames and hostnames.
///
/// Covers the trailing-parameter colon, the op/voice prefixes of NAMES
/// replies, and stray whitespace or line endings.
pub const DECORATION: &[char] = &[':', '@', '+', ' ', '\r', '\n'];

/// Trim protocol decoration from both ends of a token
pub fn trim_decoration(raw: &str) -> &str {
    raw.trim_matches(DECORATION)
}

/// IRC nickname (newtype pattern)
///
/// Always stored without decoration, so `@bob`, `:bob` and `+bob`
/// all key the same roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nickname(pub String);

impl Nickname {
    /// Create a Nickname from a raw protocol token, stripping decoration
    pub fn from_raw(raw: &str) -> Self {
        Self(trim_decoration(raw).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Nickname {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Environment variable holding our nickname
pub const ENV_NICKNAME: &str = "IRC_NICKNAME";
/// Environment variable holding our username
pub const ENV_USERNAME: &str = "IRC_USERNAME";
/// Environment variable holding our real name
pub const ENV_REALNAME: &str = "IRC_REALNAME";

/// Local identity used for registration and for echoing our own messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub nickname: String,
    pub username: String,
    pub realname: String,
}

impl Identity {
    /// Read the identity from `IRC_NICKNAME`, `IRC_USERNAME` and `IRC_REALNAME`
    ///
    /// Missing or empty variables are fatal: we never connect anonymously.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the identity from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let read = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(AppError::MissingIdentity(key))
        };

        Ok(Self {
            nickname: read(ENV_NICKNAME)?,
            username: read(ENV_USERNAME)?,
            realname: read(ENV_REALNAME)?,
        })
    }
}

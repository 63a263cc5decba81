//! Roster store
//!
//! Tracks who is in which channel, keyed by nickname. Fed by JOIN, PART,
//! NAMES and WHO traffic; read by the polling users endpoint.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::types::{trim_decoration, Nickname};

/// A tracked channel member
///
/// NAMES and JOIN only tell us the nickname and channel; WHO replies fill
/// in the rest. Records are replaced whole, never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub nickname: String,
    pub username: Option<String>,
    pub hostname: Option<String>,
    pub server: Option<String>,
    pub channel: String,
}

impl Member {
    /// Create a member known only by nickname and channel
    pub fn new(nickname: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            username: None,
            hostname: None,
            server: None,
            channel: channel.into(),
        }
    }
}

/// Channel membership, serialized behind a single mutex
///
/// Every operation takes the lock for its own duration only.
#[derive(Debug, Default)]
pub struct RosterStore {
    members: Mutex<HashMap<Nickname, Member>>,
}

impl RosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Nickname, Member>> {
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite a member, keyed by its decoration-free nickname
    pub fn upsert(&self, mut member: Member) {
        let key = Nickname::from_raw(&member.nickname);
        if key.is_empty() {
            debug!("Ignoring roster entry with empty nickname");
            return;
        }

        member.nickname = key.0.clone();
        member.hostname = member.hostname.map(|h| trim_decoration(&h).to_string());

        self.lock().insert(key, member);
    }

    /// Remove a member; unknown nicknames are ignored
    pub fn remove(&self, nickname: &str) {
        let key = Nickname::from_raw(nickname);
        if self.lock().remove(&key).is_none() {
            debug!("Part for untracked member {}", key);
        }
    }

    /// Sorted nicknames currently recorded for `channel`
    ///
    /// Ordering is lexicographic so repeated polls of an unchanged roster
    /// render identically.
    pub fn snapshot(&self, channel: &str) -> Vec<String> {
        let mut nicknames: Vec<String> = self
            .lock()
            .values()
            .filter(|m| m.channel == channel)
            .map(|m| m.nickname.clone())
            .collect();
        nicknames.sort();
        nicknames
    }

    /// Stored record for a nickname
    pub fn get(&self, nickname: &str) -> Option<Member> {
        self.lock().get(&Nickname::from_raw(nickname)).cloned()
    }

    /// Forget everyone
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

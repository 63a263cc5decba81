//! Gateway facade
//!
//! Owns the roster and the message log and is shared (behind an `Arc`)
//! between the session read loop and the HTTP handlers. The polling side
//! only ever sees the three facade operations: submit, history, roster.

use tracing::{debug, warn};

use crate::error::AppError;
use crate::history::MessageLog;
use crate::message::OutboundFrame;
use crate::roster::RosterStore;
use crate::session::Outbox;

/// Separator between nicknames in the rendered roster
pub const ROSTER_SEPARATOR: &str = ",";

/// Shared gateway state for one IRC connection and one channel
#[derive(Debug)]
pub struct Gateway {
    /// Tracked channel
    channel: String,
    /// Our own nickname, used as author of echoed messages
    nickname: String,
    roster: RosterStore,
    log: MessageLog,
    outbox: Outbox,
}

impl Gateway {
    pub fn new(channel: impl Into<String>, nickname: impl Into<String>, outbox: Outbox) -> Self {
        Self {
            channel: channel.into(),
            nickname: nickname.into(),
            roster: RosterStore::new(),
            log: MessageLog::new(),
            outbox,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn roster_store(&self) -> &RosterStore {
        &self.roster
    }

    pub fn message_log(&self) -> &MessageLog {
        &self.log
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Send a chat line to `channel` and record it locally
    ///
    /// IRC servers do not echo our own PRIVMSG back, so the log entry is the
    /// only trace of it. The append and the hand-off to the writer are
    /// separate steps; the log lock is released before any I/O happens.
    pub async fn send(&self, channel: &str, text: &str) -> Result<(), AppError> {
        self.log.append(channel, &self.nickname, text);
        self.outbox
            .send(OutboundFrame::PrivMsg {
                channel: channel.to_string(),
                text: text.to_string(),
            })
            .await
    }

    /// Submit text to the tracked channel
    ///
    /// Never fails: blank text is ignored and a dead connection is logged.
    pub async fn submit_message(&self, text: &str) {
        if text.trim().is_empty() {
            debug!("Ignoring empty message submission");
            return;
        }
        if let Err(e) = self.send(&self.channel, text).await {
            warn!("Dropping message for {}: {}", self.channel, e);
        }
    }

    /// Rendered history of the tracked channel
    pub fn history(&self) -> String {
        self.log.render(&self.channel)
    }

    /// Comma-joined, sorted roster of the tracked channel
    pub fn roster(&self) -> String {
        self.roster.snapshot(&self.channel).join(ROSTER_SEPARATOR)
    }
}

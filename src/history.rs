//! Message log
//!
//! Append-only record of chat lines, plus the raw server transcript under
//! the empty channel tag. Nothing is ever evicted.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Separator between rendered lines (the polling page is HTML)
pub const LINE_SEPARATOR: &str = "<br/>";

/// Channel tag of the raw server transcript
pub const SYSTEM_CHANNEL: &str = "";

/// One logged line; an empty author marks a system line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub channel: String,
    pub author: String,
    pub text: String,
}

/// Chronological chat history, serialized behind a single mutex
#[derive(Debug, Default)]
pub struct MessageLog {
    lines: Mutex<Vec<ChatLine>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChatLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a line at the tail
    pub fn append(&self, channel: &str, author: &str, text: &str) {
        let line = ChatLine {
            channel: channel.to_string(),
            author: author.to_string(),
            text: text.to_string(),
        };
        self.lock().push(line);
    }

    /// Every line of `channel` as `author: text`, oldest first
    pub fn render(&self, channel: &str) -> String {
        self.lock()
            .iter()
            .filter(|l| l.channel == channel)
            .map(|l| format!("{}: {}", l.author, l.text))
            .collect::<Vec<_>>()
            .join(LINE_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

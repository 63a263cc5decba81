//! IRC protocol message definitions
//!
//! `InboundEvent` is what the decoder extracts from a server line.
//! `OutboundFrame` is every line the gateway ever writes to the server;
//! its `Display` impl renders the exact wire text, CRLF included.

use std::fmt;

/// Numeric reply: registration complete
pub const RPL_WELCOME: &str = "001";
/// Numeric reply: one WHO entry
pub const RPL_WHOREPLY: &str = "352";
/// Numeric reply: NAMES listing fragment
pub const RPL_NAMREPLY: &str = "353";

/// Server → gateway event
///
/// One decoded line. Lines that match none of these shapes produce no event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Keep-alive probe; the payload must be echoed back verbatim
    LivenessPing { payload: String },
    /// Registration accepted (numeric 001)
    Welcome,
    /// NAMES listing fragment (numeric 353)
    RosterFragment {
        channel: String,
        nicknames: Vec<String>,
    },
    /// One WHO entry (numeric 352)
    WhoReply {
        channel: String,
        username: String,
        hostname: String,
        server: String,
        nickname: String,
    },
    /// Someone joined a channel
    MemberJoined { nickname: String, channel: String },
    /// Someone left
    MemberParted { nickname: String },
    /// Chat line addressed to the configured channel
    ChannelMessage { username: String, text: String },
}

/// Gateway → server frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Registration: username and real name
    User { username: String, realname: String },
    /// Registration: nickname
    Nick { nickname: String },
    /// Join a channel
    Join { channel: String },
    /// Answer to a liveness probe
    Pong { payload: String },
    /// Roster refresh request
    Who { channel: String },
    /// Chat line to a channel
    PrivMsg { channel: String, text: String },
}

impl fmt::Display for OutboundFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutboundFrame::User { username, realname } => {
                write!(f, "USER {} 0 * :{}\r\n", username, realname)
            }
            OutboundFrame::Nick { nickname } => write!(f, "NICK {}\r\n", nickname),
            OutboundFrame::Join { channel } => write!(f, "JOIN {}\r\n", channel),
            OutboundFrame::Pong { payload } => write!(f, "PONG {}\r\n", payload),
            OutboundFrame::Who { channel } => write!(f, "WHO {}\r\n", channel),
            OutboundFrame::PrivMsg { channel, text } => {
                write!(f, "PRIVMSG {} :{}\r\n", channel, text)
            }
        }
    }
}

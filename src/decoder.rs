//! Frame decoder
//!
//! Turns one server line into at most one `InboundEvent`.
//!
//! Matching is positional and substring based, the way IRC servers are
//! read in practice rather than through a full RFC 1459 grammar:
//!
//! ```text
//! PING :server123
//! :srv 001 me :Welcome
//! :srv 353 me = #chan :@op +voiced plain
//! :srv 352 me #chan user host server nick H@ :0 Real Name
//! :nick!user@host PRIVMSG #chan :text
//! :nick!user@host JOIN :#chan
//! :nick!user@host PART :#chan
//! ```
//!
//! When a line could match several shapes the first rule in that list wins.
//! Anything else decodes to `None`; the decoder never fails.

use crate::message::{InboundEvent, RPL_NAMREPLY, RPL_WELCOME, RPL_WHOREPLY};

const PING: &str = "PING";
const JOIN: &str = " JOIN ";
const PART: &str = " PART ";

/// Minimum token count of a NAMES reply (up to and including the channel)
const NAMREPLY_MIN_TOKENS: usize = 5;
/// Minimum token count of a WHO reply (up to and including the flags)
const WHOREPLY_MIN_TOKENS: usize = 9;

/// Stateless line decoder bound to the tracked channel
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    /// `PRIVMSG <channel> ` marker identifying channel-addressed chat;
    /// the trailing space keeps `#x` from matching `#xy`
    channel_marker: String,
}

impl FrameDecoder {
    pub fn new(channel: &str) -> Self {
        Self {
            channel_marker: format!("PRIVMSG {} ", channel),
        }
    }

    /// Decode one line; the trailing line delimiter is optional
    pub fn decode(&self, line: &str) -> Option<InboundEvent> {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(rest) = line.strip_prefix(PING) {
            let payload = rest.strip_prefix(' ').unwrap_or(rest);
            return Some(InboundEvent::LivenessPing {
                payload: payload.to_string(),
            });
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.get(1).copied() {
            Some(RPL_WELCOME) => return Some(InboundEvent::Welcome),
            Some(RPL_NAMREPLY) => return decode_namreply(&tokens),
            Some(RPL_WHOREPLY) => return decode_whoreply(&tokens),
            _ => {}
        }

        if line.contains(&self.channel_marker) {
            return decode_privmsg(line);
        }

        if line.contains(JOIN) {
            let parts: Vec<&str> = line.split(' ').collect();
            let channel = parts.get(2)?.trim_matches(':');
            if channel.is_empty() {
                return None;
            }
            return Some(InboundEvent::MemberJoined {
                nickname: sender_nick(parts[0]).to_string(),
                channel: channel.to_string(),
            });
        }

        if line.contains(PART) {
            let prefix = line.split(' ').next()?;
            return Some(InboundEvent::MemberParted {
                nickname: sender_nick(prefix).to_string(),
            });
        }

        None
    }
}

/// Nickname part of a `:nick!user@host` sender prefix
fn sender_nick(prefix: &str) -> &str {
    let nick = prefix.split('!').next().unwrap_or(prefix);
    nick.trim_start_matches(':')
}

// <server> 353 <me> = <channel> :<nick> <nick> ...
fn decode_namreply(tokens: &[&str]) -> Option<InboundEvent> {
    if tokens.len() < NAMREPLY_MIN_TOKENS {
        return None;
    }

    Some(InboundEvent::RosterFragment {
        channel: tokens[4].to_string(),
        nicknames: tokens[5..].iter().map(|t| t.to_string()).collect(),
    })
}

// <server> 352 <me> <channel> <user> <host> <server> <nick> <H|G>[*][@|+] :<hops> <realname>
fn decode_whoreply(tokens: &[&str]) -> Option<InboundEvent> {
    if tokens.len() < WHOREPLY_MIN_TOKENS {
        return None;
    }

    Some(InboundEvent::WhoReply {
        channel: tokens[3].to_string(),
        username: tokens[4].to_string(),
        hostname: tokens[5].to_string(),
        server: tokens[6].to_string(),
        nickname: tokens[7].to_string(),
    })
}

// :<nick>!<user>@<host> PRIVMSG <channel> :<text>
fn decode_privmsg(line: &str) -> Option<InboundEvent> {
    let parts: Vec<&str> = line.splitn(3, ':').collect();
    if parts.len() < 3 {
        return None;
    }

    let username = parts[1].split('!').next().unwrap_or_default();
    Some(InboundEvent::ChannelMessage {
        username: username.to_string(),
        text: parts[2].trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder() -> FrameDecoder {
        FrameDecoder::new("#x")
    }

    #[test]
    fn test_ping() {
        assert_eq!(
            decoder().decode("PING :server123\r\n"),
            Some(InboundEvent::LivenessPing {
                payload: ":server123".to_string()
            })
        );
    }

    #[test]
    fn test_ping_without_payload() {
        assert_eq!(
            decoder().decode("PING"),
            Some(InboundEvent::LivenessPing {
                payload: String::new()
            })
        );
    }

    #[test]
    fn test_welcome() {
        assert_eq!(
            decoder().decode(":irc.example.net 001 gnu :Welcome to the network\r\n"),
            Some(InboundEvent::Welcome)
        );
    }

    #[test]
    fn test_namreply() {
        assert_eq!(
            decoder().decode(":srv 353 me = #x :@bob alice\r\n"),
            Some(InboundEvent::RosterFragment {
                channel: "#x".to_string(),
                nicknames: vec![":@bob".to_string(), "alice".to_string()],
            })
        );
    }

    #[test]
    fn test_namreply_too_short() {
        assert_eq!(decoder().decode(":srv 353 me =\r\n"), None);
    }

    #[test]
    fn test_whoreply() {
        let line = ":*.freenode.net 352 me #x web-50 host.IP *.freenode.net web-50 H@s :0 https://kiwiirc.com/\r\n";
        assert_eq!(
            decoder().decode(line),
            Some(InboundEvent::WhoReply {
                channel: "#x".to_string(),
                username: "web-50".to_string(),
                hostname: "host.IP".to_string(),
                server: "*.freenode.net".to_string(),
                nickname: "web-50".to_string(),
            })
        );
    }

    #[test]
    fn test_whoreply_too_short() {
        assert_eq!(decoder().decode(":srv 352 me #x user host srv\r\n"), None);
    }

    #[test]
    fn test_join() {
        assert_eq!(
            decoder().decode(":a!b@c JOIN :#x\r\n"),
            Some(InboundEvent::MemberJoined {
                nickname: "a".to_string(),
                channel: "#x".to_string(),
            })
        );
    }

    #[test]
    fn test_join_missing_channel() {
        assert_eq!(decoder().decode(" JOIN "), None);
    }

    #[test]
    fn test_part() {
        assert_eq!(
            decoder().decode(":a!b@c PART :#x\r\n"),
            Some(InboundEvent::MemberParted {
                nickname: "a".to_string()
            })
        );
    }

    #[test]
    fn test_channel_message() {
        assert_eq!(
            decoder().decode(":alice!al@host PRIVMSG #x :hello: world  \r\n"),
            Some(InboundEvent::ChannelMessage {
                username: "alice".to_string(),
                text: "hello: world".to_string(),
            })
        );
    }

    #[test]
    fn test_channel_message_wins_over_join_text() {
        assert_eq!(
            decoder().decode(":alice!al@host PRIVMSG #x :please JOIN us\r\n"),
            Some(InboundEvent::ChannelMessage {
                username: "alice".to_string(),
                text: "please JOIN us".to_string(),
            })
        );
    }

    #[test]
    fn test_channel_message_malformed() {
        assert_eq!(decoder().decode("PRIVMSG #x no colons"), None);
    }

    #[test]
    fn test_message_to_channel_with_same_prefix_ignored() {
        assert_eq!(decoder().decode(":alice!al@host PRIVMSG #xy :hi\r\n"), None);
    }

    #[test]
    fn test_message_to_other_channel_ignored() {
        assert_eq!(decoder().decode(":alice!al@host PRIVMSG #y :hi\r\n"), None);
    }

    #[test]
    fn test_unrecognized_lines() {
        let d = decoder();
        for line in ["", "\r\n", "garbage", ":srv 372 me :- motd line", "NOTICE * :hi", "é"] {
            assert_eq!(d.decode(line), None, "line {:?}", line);
        }
    }
}

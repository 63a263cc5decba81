//! Single-channel IRC gateway library
//!
//! Connects to an IRC server, tracks one channel's membership and chat
//! history, and exposes that view to a polling HTTP front end.
//!
//! # Features
//! - Line-oriented frame decoding (PING, 001, 352, 353, JOIN, PART, PRIVMSG)
//! - Channel roster with decoration-stripped nicknames
//! - Append-only chat history plus raw server transcript
//! - Keep-alive answers and periodic WHO roster refresh
//! - Polling HTML pages for history, roster and message submission
//!
//! # Architecture
//! - `Session` runs the read loop and is the only network-side writer
//! - `Gateway` owns the roster and log and is shared via `Arc`
//! - Outbound frames go through an `mpsc` outbox to a writer task
//! - Each store guards its state with a mutex held for one operation
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use irc_gateway::{outbox, connect, Gateway, Identity, IrcConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), irc_gateway::AppError> {
//!     let config = IrcConfig::from_env()?;
//!     let identity = Identity::from_env()?;
//!     let (tx, rx) = outbox(256);
//!     let gateway = Arc::new(Gateway::new(config.channel.clone(), identity.nickname.clone(), tx));
//!
//!     let stream = connect(&config).await?;
//!     Session::new(gateway, identity).run(stream, rx).await
//! }
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod gateway;
pub mod history;
pub mod message;
pub mod roster;
pub mod session;
pub mod types;
pub mod web;

// Re-export main types for convenience
pub use config::IrcConfig;
pub use decoder::FrameDecoder;
pub use error::AppError;
pub use gateway::Gateway;
pub use history::{ChatLine, MessageLog};
pub use message::{InboundEvent, OutboundFrame};
pub use roster::{Member, RosterStore};
pub use session::{connect, outbox, Outbox, RefreshTimer, Session, SessionState};
pub use types::{Identity, Nickname};

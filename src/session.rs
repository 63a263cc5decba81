//! Session driver
//!
//! Owns the IRC connection for the life of the process:
//!
//! ```text
//! Connecting -> Registering -> Joined -> Reading -> Terminated
//! ```
//!
//! Termination is the error returned by `Session::run`.
//!
//! The read loop is the only network-side writer into the roster and the
//! message log. Outbound frames (ours and the gateway's) go through an
//! `mpsc` outbox to a dedicated writer task that owns the write half.
//!
//! There is no reconnect: any read or write failure ends the session and
//! the caller is expected to exit.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace};

use crate::config::IrcConfig;
use crate::decoder::FrameDecoder;
use crate::error::AppError;
use crate::gateway::Gateway;
use crate::history::SYSTEM_CHANNEL;
use crate::message::{InboundEvent, OutboundFrame};
use crate::roster::Member;
use crate::types::Identity;

/// Minimum time between two WHO refreshes of the roster
pub const ROSTER_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Outbox buffer size
pub const OUTBOX_BUFFER_SIZE: usize = 256;

/// Connection lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    /// USER/NICK sent, waiting for the welcome numeric
    Registering,
    /// Welcome received, JOIN sent
    Joined,
    /// Steady state
    Reading,
}

/// Sending side of the outbound frame queue
#[derive(Debug, Clone)]
pub struct Outbox {
    sender: mpsc::Sender<OutboundFrame>,
}

/// Create an outbox and the receiver the writer task drains
pub fn outbox(buffer: usize) -> (Outbox, mpsc::Receiver<OutboundFrame>) {
    let (sender, receiver) = mpsc::channel(buffer);
    (Outbox { sender }, receiver)
}

impl Outbox {
    /// Queue a frame for the writer task
    ///
    /// Fails only when the writer is gone.
    pub async fn send(&self, frame: OutboundFrame) -> Result<(), AppError> {
        debug!(">> {}", frame.to_string().trim_end());
        self.sender
            .send(frame)
            .await
            .map_err(|_| AppError::OutboxClosed)
    }
}

/// Best-effort WHO polling, checked once per read-loop iteration
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    last: Option<Instant>,
}

impl RefreshTimer {
    /// A timer that is due immediately, then every `interval`
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last {
            Some(last) => now.saturating_duration_since(last) > self.interval,
            None => true,
        }
    }

    pub fn reset(&mut self, now: Instant) {
        self.last = Some(now);
    }
}

/// Open the TCP connection to the configured server
///
/// No retry: failing here is fatal to the process.
pub async fn connect(config: &IrcConfig) -> Result<TcpStream, AppError> {
    let addr = config.address();
    info!("Connecting to IRC server {}", addr);
    TcpStream::connect(&addr)
        .await
        .map_err(|source| AppError::Connect { addr, source })
}

/// The read loop and its housekeeping state
pub struct Session {
    gateway: Arc<Gateway>,
    identity: Identity,
    decoder: FrameDecoder,
    refresh: RefreshTimer,
    state: SessionState,
}

impl Session {
    pub fn new(gateway: Arc<Gateway>, identity: Identity) -> Self {
        let decoder = FrameDecoder::new(gateway.channel());
        Self {
            gateway,
            identity,
            decoder,
            refresh: RefreshTimer::new(ROSTER_REFRESH_INTERVAL),
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the session over an established stream until it fails
    ///
    /// `frames` must be the receiver paired with the gateway's outbox.
    /// Always returns an error: the session only ends when the connection does.
    pub async fn run<S>(
        mut self,
        stream: S,
        frames: mpsc::Receiver<OutboundFrame>,
    ) -> Result<(), AppError>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        let mut writer_task = tokio::spawn(write_frames(writer, frames));

        let result = tokio::select! {
            result = self.read_loop(BufReader::new(reader)) => result,
            joined = &mut writer_task => match joined {
                Ok(Ok(())) => Err(AppError::OutboxClosed),
                Ok(Err(e)) => Err(e),
                Err(e) => {
                    error!("Writer task failed: {}", e);
                    Err(AppError::OutboxClosed)
                }
            },
        };

        writer_task.abort();
        if let Err(e) = &result {
            error!("IRC session terminated: {}", e);
        }
        result
    }

    async fn read_loop<R>(&mut self, mut reader: R) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
    {
        self.register().await?;

        // Raw bytes: servers relay whatever encoding clients send
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                return Err(AppError::ConnectionClosed);
            }
            let line = String::from_utf8_lossy(&buf);
            self.handle_line(&line).await?;
        }
    }

    async fn register(&mut self) -> Result<(), AppError> {
        self.state = SessionState::Registering;
        let outbox = self.gateway.outbox();
        outbox
            .send(OutboundFrame::User {
                username: self.identity.username.clone(),
                realname: self.identity.realname.clone(),
            })
            .await?;
        outbox
            .send(OutboundFrame::Nick {
                nickname: self.identity.nickname.clone(),
            })
            .await
    }

    /// Process one raw server line
    async fn handle_line(&mut self, line: &str) -> Result<(), AppError> {
        let raw = line.trim_end_matches(['\r', '\n']);
        trace!("<< {}", raw);
        self.gateway
            .message_log()
            .append(SYSTEM_CHANNEL, "", raw);

        if let Some(event) = self.decoder.decode(raw) {
            self.dispatch(event).await?;
        }

        let now = Instant::now();
        if self.refresh.is_due(now) {
            self.gateway
                .outbox()
                .send(OutboundFrame::Who {
                    channel: self.gateway.channel().to_string(),
                })
                .await?;
            self.refresh.reset(now);
        }

        Ok(())
    }

    async fn dispatch(&mut self, event: InboundEvent) -> Result<(), AppError> {
        let gateway = Arc::clone(&self.gateway);
        let roster = gateway.roster_store();

        match event {
            InboundEvent::LivenessPing { payload } => {
                gateway.outbox().send(OutboundFrame::Pong { payload }).await?;
            }
            InboundEvent::Welcome => {
                info!("Registered as {}, joining {}", self.identity.nickname, gateway.channel());
                gateway
                    .outbox()
                    .send(OutboundFrame::Join {
                        channel: gateway.channel().to_string(),
                    })
                    .await?;
                self.state = SessionState::Joined;
            }
            InboundEvent::ChannelMessage { username, text } => {
                info!("[{}] {}: {}", gateway.channel(), username, text);
                gateway
                    .message_log()
                    .append(gateway.channel(), &username, &text);
            }
            InboundEvent::RosterFragment { channel, nicknames } => {
                for nickname in nicknames {
                    roster.upsert(Member::new(nickname, channel.as_str()));
                }
            }
            InboundEvent::WhoReply {
                channel,
                username,
                hostname,
                server,
                nickname,
            } => {
                roster.upsert(Member {
                    nickname,
                    username: Some(username),
                    hostname: Some(hostname),
                    server: Some(server),
                    channel,
                });
            }
            InboundEvent::MemberJoined { nickname, channel } => {
                debug!("{} joined {}", nickname, channel);
                roster.upsert(Member::new(nickname, channel));
            }
            InboundEvent::MemberParted { nickname } => {
                debug!("{} left", nickname);
                roster.remove(&nickname);
            }
        }

        if self.state == SessionState::Joined {
            self.state = SessionState::Reading;
        }
        Ok(())
    }
}

/// Drain the outbox onto the connection's write half
async fn write_frames<W>(
    mut writer: W,
    mut frames: mpsc::Receiver<OutboundFrame>,
) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = frames.recv().await {
        writer.write_all(frame.to_string().as_bytes()).await?;
        writer.flush().await?;
    }
    debug!("Outbox closed, writer task ending");
    Ok(())
}

//! Error types for the IRC gateway
//!
//! Defines the fatal startup and runtime errors of the gateway.
//! Uses thiserror for ergonomic error definitions.
//!
//! Protocol-level anomalies (unrecognized lines, short numeric replies,
//! parts for unknown members) are not errors: the decoder skips them and
//! the stores treat them as no-ops.

use thiserror::Error;

/// Application-level errors
///
/// Every variant is fatal: either the process cannot start, or the
/// session with the IRC server is over.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error on the established connection (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON
    #[error("JSON configuration error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required identity environment variable is missing or empty
    #[error("Environment variable {0} is required")]
    MissingIdentity(&'static str),

    /// Configuration file could not be read
    #[error("Failed to read config file [{path}]: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TCP connection to the IRC server could not be opened
    #[error("Failed to connect to IRC server [{addr}]: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The IRC server closed the stream
    #[error("Connection closed by IRC server")]
    ConnectionClosed,

    /// The outbound writer task is gone (internal channel broken)
    #[error("Outbound channel closed")]
    OutboxClosed,
}

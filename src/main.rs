//! IRC gateway - Entry Point
//!
//! Loads configuration and identity, connects to the IRC server, runs the
//! session read loop and serves the polling web pages.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use irc_gateway::session::OUTBOX_BUFFER_SIZE;
use irc_gateway::{connect, outbox, web, Gateway, Identity, IrcConfig, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=irc_gateway=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("irc_gateway=info")),
        )
        .init();

    // Startup errors are fatal before any connection is attempted
    let config = IrcConfig::from_env()?;
    let identity = Identity::from_env()?;

    let (outbox, frames) = outbox(OUTBOX_BUFFER_SIZE);
    let gateway = Arc::new(Gateway::new(
        config.channel.clone(),
        identity.nickname.clone(),
        outbox,
    ));

    let stream = connect(&config).await?;
    info!("Connected to {}", config.address());

    let session = Session::new(Arc::clone(&gateway), identity);
    let mut session_task = tokio::spawn(session.run(stream, frames));
    let mut web_task = tokio::spawn(web::serve(gateway, config.web_port));

    // Whichever side ends first takes the process down with it
    tokio::select! {
        joined = &mut session_task => {
            web_task.abort();
            joined??;
        }
        joined = &mut web_task => {
            session_task.abort();
            if let Err(e) = joined? {
                error!("Web server error: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}

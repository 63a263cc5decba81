//! Polling HTTP surface
//!
//! Three tiny HTML pages over the gateway facade. The browser polls the
//! history and roster pages through `<meta refresh>`; there is no push.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::AppError;
use crate::gateway::Gateway;

pub const ENDPOINT_SEND_MESSAGE: &str = "/send-message";
pub const ENDPOINT_GET_MESSAGES: &str = "/get-messages-for-channel";
pub const ENDPOINT_GET_USERS: &str = "/get-users-for-channel";

/// Form field carrying the submitted text
pub const FORM_KEY_MESSAGE: &str = "message";

/// Query string of the send form
#[derive(Debug, Default, Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub message: String,
}

/// Build the router over a shared gateway
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/", get(index))
        .route(ENDPOINT_GET_MESSAGES, get(messages))
        .route(ENDPOINT_GET_USERS, get(users))
        .route(ENDPOINT_SEND_MESSAGE, get(send_message))
        .with_state(gateway)
}

/// Serve the polling pages until the listener fails
pub async fn serve(gateway: Arc<Gateway>, port: u16) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Web interface listening on {}", addr);

    axum::serve(listener, router(gateway)).await?;
    Ok(())
}

async fn index() -> Html<String> {
    Html(format!(
        r#"<!doctype html><html lang="en">
<head><title>minirc</title></head><body>
  <iframe marginwidth="0" marginheight="0" width="500" height="500" scrolling="no" frameborder=0 src="{messages}"></iframe>
  <iframe marginwidth="0" marginheight="0" width="500" height="25" scrolling="no" frameborder=0 src="{users}"></iframe>
  <form action="{send}">
    <input type="text" id="{key}" name="{key}" />
    <input type="submit" value="Send" />
  </form></body></html>"#,
        messages = ENDPOINT_GET_MESSAGES,
        users = ENDPOINT_GET_USERS,
        send = ENDPOINT_SEND_MESSAGE,
        key = FORM_KEY_MESSAGE,
    ))
}

async fn messages(State(gateway): State<Arc<Gateway>>) -> Html<String> {
    Html(page("minirc: messages", 1, &gateway.history()))
}

async fn users(State(gateway): State<Arc<Gateway>>) -> Html<String> {
    let body = format!("<strong>Users:</strong> {}", gateway.roster());
    Html(page("minirc: users", 5, &body))
}

async fn send_message(
    State(gateway): State<Arc<Gateway>>,
    Query(form): Query<SendForm>,
) -> Redirect {
    gateway.submit_message(&form.message).await;
    Redirect::to("/")
}

/// Auto-refreshing page wrapper
fn page(title: &str, refresh_secs: u32, body: &str) -> String {
    format!(
        r#"<!doctype html><html lang="en">
<head><title>{}</title><meta http-equiv="refresh" content="{}"></head>
<body>{}</body></html>"#,
        title, refresh_secs, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::message::OutboundFrame;
    use crate::roster::Member;
    use crate::session::outbox;

    #[tokio::test]
    async fn test_messages_page() {
        let (tx, _rx) = outbox(8);
        let gateway = Arc::new(Gateway::new("#x", "gnu", tx));
        gateway.message_log().append("#x", "u1", "hi");
        gateway.message_log().append("#x", "u2", "yo");

        let Html(body) = messages(State(gateway)).await;
        assert!(body.contains("<body>u1: hi<br/>u2: yo</body>"));
        assert!(body.contains(r#"content="1""#));
    }

    #[tokio::test]
    async fn test_users_page() {
        let (tx, _rx) = outbox(8);
        let gateway = Arc::new(Gateway::new("#x", "gnu", tx));
        gateway.roster_store().upsert(Member::new("bob", "#x"));
        gateway.roster_store().upsert(Member::new("alice", "#x"));

        let Html(body) = users(State(gateway)).await;
        assert!(body.contains("<strong>Users:</strong> alice,bob"));
        assert!(body.contains(r#"content="5""#));
    }

    #[tokio::test]
    async fn test_send_message_submits() {
        let (tx, mut rx) = outbox(8);
        let gateway = Arc::new(Gateway::new("#x", "gnu", tx));

        let form = SendForm {
            message: "hello".to_string(),
        };
        let _ = send_message(State(Arc::clone(&gateway)), Query(form)).await;

        assert_eq!(gateway.history(), "gnu: hello");
        assert_eq!(
            rx.recv().await,
            Some(OutboundFrame::PrivMsg {
                channel: "#x".to_string(),
                text: "hello".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_index_links_endpoints() {
        let Html(body) = index().await;
        assert!(body.contains(ENDPOINT_GET_MESSAGES));
        assert!(body.contains(ENDPOINT_GET_USERS));
        assert!(body.contains(ENDPOINT_SEND_MESSAGE));
    }
}

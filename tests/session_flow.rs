//! End-to-end session flow over an in-memory stream
//!
//! Plays the IRC server side of a connection and checks what the polling
//! facade reports afterwards.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf};

use irc_gateway::{outbox, AppError, Gateway, Identity, Session};

fn identity() -> Identity {
    Identity {
        nickname: "HelloMyNameIsGNU".to_string(),
        username: "gnu".to_string(),
        realname: "GNU".to_string(),
    }
}

async fn expect_line(lines: &mut Lines<BufReader<ReadHalf<DuplexStream>>>, expected: &str) {
    let line = lines.next_line().await.unwrap();
    assert_eq!(line.as_deref(), Some(expected));
}

#[tokio::test]
async fn test_full_session() {
    let (tx, rx) = outbox(64);
    let gateway = Arc::new(Gateway::new("#midnightcafe", "HelloMyNameIsGNU", tx));
    let (client, server) = tokio::io::duplex(8192);

    let task = tokio::spawn(Session::new(Arc::clone(&gateway), identity()).run(client, rx));

    let (server_read, mut server_write) = tokio::io::split(server);
    let mut lines = BufReader::new(server_read).lines();

    expect_line(&mut lines, "USER gnu 0 * :GNU").await;
    expect_line(&mut lines, "NICK HelloMyNameIsGNU").await;

    server_write
        .write_all(b":irc.example.net 001 HelloMyNameIsGNU :Welcome\r\n")
        .await
        .unwrap();
    expect_line(&mut lines, "JOIN #midnightcafe").await;
    expect_line(&mut lines, "WHO #midnightcafe").await;

    let traffic = concat!(
        ":HelloMyNameIsGNU!gnu@host JOIN :#midnightcafe\r\n",
        ":irc.example.net 353 HelloMyNameIsGNU = #midnightcafe :@web-50 HelloMyNameIsGNU +voiced\r\n",
        ":irc.example.net 366 HelloMyNameIsGNU #midnightcafe :End of /NAMES list.\r\n",
        ":web-50!web-50@host PRIVMSG #midnightcafe :hi everyone\r\n",
        ":newbie!n@host JOIN :#midnightcafe\r\n",
        ":voiced!v@host PART :#midnightcafe\r\n",
        ":web-50!web-50@host PRIVMSG HelloMyNameIsGNU :private, not logged\r\n",
        "PING :sync\r\n",
    );
    server_write.write_all(traffic.as_bytes()).await.unwrap();

    // The PONG proves every line before it has been processed
    expect_line(&mut lines, "PONG :sync").await;

    assert_eq!(gateway.roster(), "HelloMyNameIsGNU,newbie,web-50");
    assert_eq!(gateway.history(), "web-50: hi everyone");

    gateway.submit_message("hello back").await;
    expect_line(&mut lines, "PRIVMSG #midnightcafe :hello back").await;
    assert_eq!(
        gateway.history(),
        "web-50: hi everyone<br/>HelloMyNameIsGNU: hello back"
    );

    drop(server_write);
    drop(lines);

    let result = task.await.unwrap();
    assert!(matches!(result, Err(AppError::ConnectionClosed)));
}

// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-connection read and write loops.
//!
//! Each upgraded socket is split into a read half and a write half. The read
//! loop relays client frames to the manager's broadcast channel; the write
//! loop is the only writer to the socket. The two share a cancellation token
//! so either ending stops the other.

use std::fmt::Display;
use std::time::Duration;

use axum::extract::ws::{close_code, CloseFrame, Message, Utf8Bytes};
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval_at, timeout, Instant};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use letusconnect_core::{ConnectError, Envelope};

use super::manager::Manager;
use super::SessionSettings;

/// Why a write loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteExit {
    /// The manager closed the outbound queue (unregister or replacement).
    QueueClosed,
    /// A frame could not be written before the deadline.
    WriteFailed,
    /// The paired read loop ended or the server is shutting down.
    Cancelled,
}

/// Decode a client text frame and re-encode it with the authenticated sender.
pub fn relay_frame(text: &str, user_id: &str) -> Result<String, serde_json::Error> {
    let mut envelope: Envelope = serde_json::from_str(text)?;
    envelope.stamp_sender(user_id);
    serde_json::to_string(&envelope)
}

/// Read frames until the peer closes, errors, or `cancel` fires, then ask
/// the manager to unregister this connection.
pub async fn read_loop<St, E>(
    mut stream: St,
    user_id: &str,
    client_id: Uuid,
    manager: &Manager,
    cancel: &CancellationToken,
) where
    St: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    loop {
        let frame = tokio::select! {
            _ = cancel.cancelled() => break,
            frame = stream.next() => frame,
        };
        match frame {
            Some(Ok(Message::Text(text))) => match relay_frame(text.as_str(), user_id) {
                Ok(payload) => {
                    if let Err(e) = manager.broadcast(payload).await {
                        tracing::warn!(user_id, error = %e, "dropping frame");
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(user_id, error = %e, "skipping undecodable frame");
                }
            },
            Some(Ok(Message::Close(_))) | None => break,
            // Binary frames are ignored; ping/pong is answered by the transport.
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::debug!(user_id, error = %e, "websocket read failed");
                break;
            }
        }
    }

    if let Err(e) = manager.unregister_client(user_id, client_id) {
        tracing::warn!(user_id, error = %e, "could not unregister session");
    }
    cancel.cancel();
}

/// Drain the outbound queue onto the socket and send heartbeat pings.
///
/// Every exit path attempts a normal-close frame and cancels the paired
/// read loop.
pub async fn write_loop<S>(
    mut sink: S,
    mut outbound: mpsc::Receiver<String>,
    settings: SessionSettings,
    cancel: CancellationToken,
) -> WriteExit
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let period = settings.heartbeat_interval;
    let mut heartbeat = interval_at(Instant::now() + period, period);

    let exit = loop {
        tokio::select! {
            _ = cancel.cancelled() => break WriteExit::Cancelled,
            next = outbound.recv() => match next {
                Some(payload) => {
                    let frame = Message::Text(payload.into());
                    if let Err(e) = write_frame(&mut sink, frame, settings.write_timeout).await {
                        tracing::debug!(error = %e, "websocket write failed");
                        break WriteExit::WriteFailed;
                    }
                }
                None => break WriteExit::QueueClosed,
            },
            _ = heartbeat.tick() => {
                let ping = Message::Ping(Default::default());
                if let Err(e) = write_frame(&mut sink, ping, settings.write_timeout).await {
                    tracing::debug!(error = %e, "heartbeat failed");
                    break WriteExit::WriteFailed;
                }
            }
        }
    };

    let close = Message::Close(Some(CloseFrame {
        code: close_code::NORMAL,
        reason: Utf8Bytes::from_static(""),
    }));
    let _ = write_frame(&mut sink, close, settings.write_timeout).await;
    cancel.cancel();
    exit
}

async fn write_frame<S>(sink: &mut S, frame: Message, deadline: Duration) -> Result<(), ConnectError>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    match timeout(deadline, sink.send(frame)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(ConnectError::Channel {
            message: format!("websocket write failed: {e}"),
            source: None,
        }),
        Err(_) => Err(ConnectError::Channel {
            message: "websocket write timed out".to_string(),
            source: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use futures::channel::mpsc as fmpsc;

    use crate::session::Client;

    fn settings() -> SessionSettings {
        SessionSettings {
            outbound_queue_size: 8,
            heartbeat_interval: Duration::from_secs(60),
            write_timeout: Duration::from_secs(1),
        }
    }

    fn is_normal_close(msg: &Message) -> bool {
        matches!(msg, Message::Close(Some(frame)) if frame.code == close_code::NORMAL)
    }

    #[test]
    fn relay_overwrites_sender() {
        let out = relay_frame(
            r#"{"type":"chat","content":"hi","from":"mallory","to":"u2","time":5}"#,
            "u1",
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["from"], "u1");
        assert_eq!(value["to"], "u2");
        assert_eq!(value["content"], "hi");
        assert_eq!(value["time"], 5);
    }

    #[test]
    fn relay_rejects_non_json() {
        assert!(relay_frame("not json", "u1").is_err());
    }

    #[tokio::test]
    async fn write_loop_forwards_in_order_then_closes() {
        let (sink, mut written) = fmpsc::unbounded::<Message>();
        let (tx, rx) = mpsc::channel(8);
        tx.send("a".to_string()).await.unwrap();
        tx.send("b".to_string()).await.unwrap();
        drop(tx);

        let exit = write_loop(sink, rx, settings(), CancellationToken::new()).await;
        assert_eq!(exit, WriteExit::QueueClosed);

        let frames: Vec<Message> = written.by_ref().collect().await;
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0], Message::Text("a".into()));
        assert_eq!(frames[1], Message::Text("b".into()));
        assert!(is_normal_close(&frames[2]));
    }

    #[tokio::test(start_paused = true)]
    async fn write_loop_sends_heartbeat_ping() {
        let (sink, mut written) = fmpsc::unbounded::<Message>();
        let (tx, rx) = mpsc::channel::<String>(8);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(write_loop(sink, rx, settings(), cancel.clone()));

        tokio::time::sleep(Duration::from_secs(61)).await;
        let first = written.next().await.unwrap();
        assert!(matches!(first, Message::Ping(_)));

        drop(tx);
        assert_eq!(task.await.unwrap(), WriteExit::QueueClosed);
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn write_loop_stops_on_sink_error() {
        let (sink, written) = fmpsc::unbounded::<Message>();
        drop(written);
        let (tx, rx) = mpsc::channel(8);
        tx.send("a".to_string()).await.unwrap();

        let exit = write_loop(sink, rx, settings(), CancellationToken::new()).await;
        assert_eq!(exit, WriteExit::WriteFailed);
    }

    #[tokio::test]
    async fn write_loop_honours_cancellation() {
        let (sink, mut written) = fmpsc::unbounded::<Message>();
        let (_tx, rx) = mpsc::channel::<String>(8);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let exit = write_loop(sink, rx, settings(), cancel).await;
        assert_eq!(exit, WriteExit::Cancelled);
        assert!(is_normal_close(&written.next().await.unwrap()));
    }

    async fn wait_until_active(manager: &Manager, user_id: &str, expected: bool) {
        for _ in 0..200 {
            if manager.is_active(user_id).await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("{user_id} never reached active={expected}");
    }

    #[tokio::test]
    async fn write_failure_cancels_reader_and_unregisters() {
        let root = CancellationToken::new();
        let (manager, handle) = Manager::spawn(&root);
        let (client, outbound) = Client::new("u1", 8);
        let client_id = client.id();
        manager.register(client).unwrap();
        wait_until_active(&manager, "u1", true).await;

        let (sink, written) = fmpsc::unbounded::<Message>();
        drop(written);
        let cancel = CancellationToken::new();
        let writer = tokio::spawn(write_loop(sink, outbound, settings(), cancel.clone()));
        let reader = {
            let manager = manager.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let idle = futures::stream::pending::<Result<Message, axum::Error>>();
                read_loop(idle, "u1", client_id, &manager, &cancel).await;
            })
        };

        manager.broadcast(r#"{"type":"chat"}"#.to_string()).await.unwrap();

        assert_eq!(writer.await.unwrap(), WriteExit::WriteFailed);
        reader.await.unwrap();
        assert!(cancel.is_cancelled());
        wait_until_active(&manager, "u1", false).await;
        assert_eq!(manager.connected_count().await, 0);

        manager.shutdown();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn read_loop_relays_text_and_unregisters() {
        let root = CancellationToken::new();
        let (manager, handle) = Manager::spawn(&root);
        let (client, mut outbound) = Client::new("u1", 8);
        let client_id = client.id();
        manager.register(client).unwrap();

        let frames = vec![
            Ok::<_, axum::Error>(Message::Binary(vec![1, 2, 3].into())),
            Ok(Message::Text("garbage".into())),
            Ok(Message::Text(r#"{"type":"chat","content":"hi","from":"x"}"#.into())),
            Ok(Message::Close(None)),
        ];
        let cancel = CancellationToken::new();
        read_loop(
            futures::stream::iter(frames),
            "u1",
            client_id,
            &manager,
            &cancel,
        )
        .await;

        let relayed = outbound.recv().await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&relayed).unwrap();
        assert_eq!(value["from"], "u1");
        assert_eq!(value["type"], "chat");

        // Unregistration closes the queue once the owner loop gets to it.
        assert_eq!(outbound.recv().await, None);
        assert!(cancel.is_cancelled());

        manager.shutdown();
        handle.await.unwrap();
    }
}

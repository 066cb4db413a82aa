// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session registry and its owner loop.
//!
//! All registry mutation happens on a single owner task that drains the
//! register, unregister and broadcast channels. The map itself sits behind a
//! read/write lock so status queries never wait for the owner loop to go
//! idle. At most one [`Client`] exists per user id at any time.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use letusconnect_core::ConnectError;

use super::client::Client;

/// Capacity of the broadcast ingress channel.
const BROADCAST_QUEUE_SIZE: usize = 1024;

type Registry = Arc<RwLock<HashMap<String, Client>>>;

#[derive(Debug)]
struct Unregister {
    user_id: String,
    /// When set, only the session with this connection id may be removed.
    client_id: Option<Uuid>,
}

/// Cloneable handle to the process-wide session registry.
///
/// Constructed once at startup with [`Manager::spawn`]; the owner loop must
/// be running before the HTTP listener accepts upgrades.
#[derive(Clone)]
pub struct Manager {
    register_tx: mpsc::UnboundedSender<Client>,
    unregister_tx: mpsc::UnboundedSender<Unregister>,
    broadcast_tx: mpsc::Sender<String>,
    registry: Registry,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("shutdown", &self.shutdown.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Manager {
    /// Create the manager and launch its owner loop.
    ///
    /// The loop stops when `parent` is cancelled or [`Manager::shutdown`] is
    /// called, closing every remaining outbound queue on the way out.
    pub fn spawn(parent: &CancellationToken) -> (Self, JoinHandle<()>) {
        let (manager, owner) = Self::new(parent);
        let handle = tokio::spawn(owner.run());
        (manager, handle)
    }

    fn new(parent: &CancellationToken) -> (Self, OwnerLoop) {
        let (register_tx, register_rx) = mpsc::unbounded_channel();
        let (unregister_tx, unregister_rx) = mpsc::unbounded_channel();
        let (broadcast_tx, broadcast_rx) = mpsc::channel(BROADCAST_QUEUE_SIZE);
        let registry: Registry = Arc::new(RwLock::new(HashMap::new()));
        let shutdown = parent.child_token();

        let owner = OwnerLoop {
            registry: Arc::clone(&registry),
            register_rx,
            unregister_rx,
            broadcast_rx,
            shutdown: shutdown.clone(),
        };
        let manager = Self {
            register_tx,
            unregister_tx,
            broadcast_tx,
            registry,
            shutdown,
        };
        (manager, owner)
    }

    /// Hand a new client to the owner loop, replacing any session the same
    /// user already holds.
    pub fn register(&self, client: Client) -> Result<(), ConnectError> {
        self.register_tx.send(client).map_err(|_| stopped())
    }

    /// Remove whatever session `user_id` holds. No-op if none.
    pub fn unregister(&self, user_id: &str) -> Result<(), ConnectError> {
        self.send_unregister(user_id, None)
    }

    /// Remove the session for `user_id` only if it is still connection
    /// `client_id`. A replaced session calling this leaves its successor alone.
    pub fn unregister_client(&self, user_id: &str, client_id: Uuid) -> Result<(), ConnectError> {
        self.send_unregister(user_id, Some(client_id))
    }

    fn send_unregister(&self, user_id: &str, client_id: Option<Uuid>) -> Result<(), ConnectError> {
        self.unregister_tx
            .send(Unregister {
                user_id: user_id.to_string(),
                client_id,
            })
            .map_err(|_| stopped())
    }

    /// Queue a frame for fan-out to every active session.
    pub async fn broadcast(&self, payload: String) -> Result<(), ConnectError> {
        self.broadcast_tx.send(payload).await.map_err(|_| stopped())
    }

    /// Whether `user_id` currently holds an active session.
    pub async fn is_active(&self, user_id: &str) -> bool {
        self.registry
            .read()
            .await
            .get(user_id)
            .is_some_and(Client::is_active)
    }

    /// Number of registered sessions.
    pub async fn connected_count(&self) -> usize {
        self.registry.read().await.len()
    }

    /// Stop the owner loop. Every outbound queue is closed, so write loops
    /// send a normal close and exit.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

fn stopped() -> ConnectError {
    ConnectError::Channel {
        message: "session manager is not running".to_string(),
        source: None,
    }
}

/// The single writer of the registry.
struct OwnerLoop {
    registry: Registry,
    register_rx: mpsc::UnboundedReceiver<Client>,
    unregister_rx: mpsc::UnboundedReceiver<Unregister>,
    broadcast_rx: mpsc::Receiver<String>,
    shutdown: CancellationToken,
}

impl OwnerLoop {
    async fn run(mut self) {
        tracing::info!("session manager started");
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                Some(client) = self.register_rx.recv() => self.on_register(client).await,
                // Frames a session queued before leaving still fan out.
                Some(payload) = self.broadcast_rx.recv() => self.on_broadcast(payload).await,
                Some(req) = self.unregister_rx.recv() => {
                    self.on_unregister(&req.user_id, req.client_id).await;
                }
                else => break,
            }
        }
        self.close_all().await;
        tracing::info!("session manager stopped");
    }

    async fn on_register(&self, client: Client) {
        let mut registry = self.registry.write().await;
        if let Some(previous) = registry.remove(client.user_id()) {
            previous.deactivate();
            tracing::info!(
                user_id = %client.user_id(),
                replaced = %previous.id(),
                "replacing existing session"
            );
            // Dropping the old client closes its outbound queue.
            drop(previous);
        }
        client.activate();
        tracing::debug!(user_id = %client.user_id(), client_id = %client.id(), "session registered");
        registry.insert(client.user_id().to_string(), client);
    }

    async fn on_unregister(&self, user_id: &str, client_id: Option<Uuid>) {
        let mut registry = self.registry.write().await;
        let matches = match registry.get(user_id) {
            Some(current) => client_id.is_none_or(|id| id == current.id()),
            None => return,
        };
        if !matches {
            tracing::debug!(user_id, "ignoring unregister from a replaced session");
            return;
        }
        if let Some(client) = registry.remove(user_id) {
            client.deactivate();
            tracing::debug!(user_id, client_id = %client.id(), "session unregistered");
        }
    }

    async fn on_broadcast(&self, payload: String) {
        let evicted: Vec<(String, Uuid)> = {
            let registry = self.registry.read().await;
            registry
                .values()
                .filter(|client| client.is_active())
                .filter_map(|client| match client.try_deliver(payload.clone()) {
                    Ok(()) => None,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::warn!(
                            user_id = %client.user_id(),
                            "outbound queue full, evicting slow session"
                        );
                        Some((client.user_id().to_string(), client.id()))
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        tracing::debug!(user_id = %client.user_id(), "outbound queue closed");
                        Some((client.user_id().to_string(), client.id()))
                    }
                })
                .collect()
        };
        for (user_id, client_id) in evicted {
            self.on_unregister(&user_id, Some(client_id)).await;
        }
    }

    async fn close_all(&self) {
        let mut registry = self.registry.write().await;
        let count = registry.len();
        for (_, client) in registry.drain() {
            client.deactivate();
        }
        if count > 0 {
            tracing::info!(count, "closed remaining sessions");
        }
    }
}

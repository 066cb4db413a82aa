// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-connection client record held by the session registry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

/// A live WebSocket session as seen by the [`Manager`](super::Manager).
///
/// The client holds the only sender of its outbound queue, so dropping it
/// closes the queue and ends the connection's write loop.
#[derive(Debug)]
pub struct Client {
    id: Uuid,
    user_id: String,
    outbound: mpsc::Sender<String>,
    active: Arc<AtomicBool>,
}

impl Client {
    /// Create an inactive client and the receiving end of its outbound queue.
    pub fn new(user_id: impl Into<String>, queue_size: usize) -> (Self, mpsc::Receiver<String>) {
        let (outbound, rx) = mpsc::channel(queue_size.max(1));
        let client = Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            outbound,
            active: Arc::new(AtomicBool::new(false)),
        };
        (client, rx)
    }

    /// Connection id, distinct for every upgrade of the same user.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Shared view of the active flag, readable after the client has moved
    /// into the registry.
    pub fn active_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.active)
    }

    pub(crate) fn activate(&self) {
        self.active.store(true, Ordering::Release);
    }

    pub(crate) fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Non-blocking enqueue onto the outbound queue.
    pub(crate) fn try_deliver(
        &self,
        payload: String,
    ) -> Result<(), mpsc::error::TrySendError<String>> {
        self.outbound.try_send(payload)
    }
}

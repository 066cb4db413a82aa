// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end gateway testing.
//!
//! `TestHarness` assembles a complete gateway with mock adapters, a real
//! session manager and a real JWT verifier. Use [`TestHarness::router`] for
//! in-process requests or [`TestHarness::serve`] to listen on an ephemeral
//! port for WebSocket clients.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use letusconnect_auth::{JwtVerifier, TokenIssuer};
use letusconnect_core::ConnectError;
use letusconnect_gateway::{GatewayState, Manager, SessionSettings};

use crate::mock_publisher::MockPublisher;
use crate::mock_store::MockStore;

/// HS256 secret shared by the harness verifier and issuer.
pub const TEST_SECRET: &str = "letusconnect-test-secret";

/// Origins the harness router allows.
pub const TEST_ORIGINS: &[&str] = &["http://localhost:3000", "https://letusconnect.vercel.app"];

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    session: SessionSettings,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            session: SessionSettings::default(),
        }
    }

    /// Override the per-session outbound queue size.
    pub fn with_queue_size(mut self, size: usize) -> Self {
        self.session.outbound_queue_size = size;
        self
    }

    /// Override the heartbeat interval.
    pub fn with_heartbeat(mut self, interval: Duration) -> Self {
        self.session.heartbeat_interval = interval;
        self
    }

    /// Build the harness and start the session manager.
    pub fn build(self) -> TestHarness {
        let shutdown = CancellationToken::new();
        let (manager, manager_task) = Manager::spawn(&shutdown);
        let store = Arc::new(MockStore::new());
        let publisher = Arc::new(MockPublisher::new());

        let state = GatewayState {
            manager,
            store: store.clone(),
            publisher: publisher.clone(),
            verifier: Arc::new(JwtVerifier::new(TEST_SECRET)),
            session: self.session,
            shutdown: shutdown.clone(),
            start_time: Instant::now(),
        };

        TestHarness {
            state,
            store,
            publisher,
            issuer: TokenIssuer::new(TEST_SECRET),
            shutdown,
            manager_task: Some(manager_task),
        }
    }
}

/// A fully wired gateway for integration tests.
pub struct TestHarness {
    /// State shared by every route.
    pub state: GatewayState,
    /// The store behind `state.store`.
    pub store: Arc<MockStore>,
    /// The publisher behind `state.publisher`.
    pub publisher: Arc<MockPublisher>,
    issuer: TokenIssuer,
    shutdown: CancellationToken,
    manager_task: Option<JoinHandle<()>>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default session settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn manager(&self) -> &Manager {
        &self.state.manager
    }

    /// Mint a one-hour bearer token for `user_id`.
    pub fn token(&self, user_id: &str) -> Result<String, ConnectError> {
        self.issuer.issue(user_id, Duration::from_secs(3600))
    }

    /// Mint a token with arbitrary claims, e.g. an already-expired one.
    pub fn token_expiring_at(&self, user_id: &str, exp: i64) -> Result<String, ConnectError> {
        self.issuer.sign(&letusconnect_auth::Claims {
            sub: user_id.to_string(),
            exp,
            iat: exp - 3600,
        })
    }

    /// The gateway router over this harness's state.
    pub fn router(&self) -> Router {
        let origins: Vec<String> = TEST_ORIGINS.iter().map(|o| o.to_string()).collect();
        letusconnect_gateway::router(self.state.clone(), &origins)
    }

    /// Serve the router on an ephemeral localhost port until shutdown.
    pub async fn serve(&self) -> Result<SocketAddr, ConnectError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| ConnectError::Internal(format!("bind failed: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| ConnectError::Internal(format!("local_addr failed: {e}")))?;
        let app = self.router();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = letusconnect_gateway::serve(listener, app, shutdown).await {
                tracing::error!(error = %e, "test server stopped");
            }
        });
        Ok(addr)
    }

    /// Poll `is_active(user_id)` until it equals `expected` or two seconds pass.
    pub async fn wait_for_session(&self, user_id: &str, expected: bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if self.state.manager.is_active(user_id).await == expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    /// Cancel everything and wait for the manager's owner loop to exit.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.manager_task.take() {
            let _ = task.await;
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use letusconnect_core::TokenVerifier;

    #[tokio::test]
    async fn builder_overrides_session_settings() {
        let harness = TestHarness::builder()
            .with_queue_size(4)
            .with_heartbeat(Duration::from_secs(5))
            .build();

        assert_eq!(harness.state.session.outbound_queue_size, 4);
        assert_eq!(harness.state.session.heartbeat_interval, Duration::from_secs(5));
        harness.shutdown().await;
    }

    #[tokio::test]
    async fn minted_tokens_verify_against_state() {
        let harness = TestHarness::new();
        let token = harness.token("u1").unwrap();

        let user = harness.state.verifier.verify(&token).unwrap();
        assert_eq!(user.user_id, "u1");
        assert!(harness
            .state
            .verifier
            .verify(&harness.token_expiring_at("u1", 1_000_000).unwrap())
            .is_err());
    }

    #[tokio::test]
    async fn wait_for_session_times_out_for_unknown_user() {
        let harness = TestHarness::new();
        assert!(harness.wait_for_session("nobody", false).await);
        assert!(!harness.wait_for_session("nobody", true).await);
    }
}

// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `letusconnect serve`: wire adapters into the gateway and run until a
//! shutdown signal arrives.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use letusconnect_auth::JwtVerifier;
use letusconnect_broker::PusherPublisher;
use letusconnect_config::ConnectConfig;
use letusconnect_core::{ConnectError, EventPublisher};
use letusconnect_gateway::{GatewayState, Manager, SessionSettings};

use crate::shutdown::install_signal_handler;

/// Run the server with a validated configuration.
pub async fn run_serve(config: ConnectConfig) -> Result<(), ConnectError> {
    init_tracing(&config.server.log_level);

    info!("starting letusconnect serve");

    let cancel = install_signal_handler();
    let (state, manager_task) = build_state(&config, &cancel).await?;
    let store = Arc::clone(&state.store);
    let publisher = Arc::clone(&state.publisher);
    let manager = state.manager.clone();

    // The manager's owner loop is already running; only now accept upgrades.
    let listener = letusconnect_gateway::bind(&config.server).await?;
    let app = letusconnect_gateway::router(state, &config.server.allowed_origins);
    let result = letusconnect_gateway::serve(listener, app, cancel.clone()).await;

    info!("listener stopped, closing sessions");
    cancel.cancel();
    manager.shutdown();
    if let Err(e) = manager_task.await {
        warn!(error = %e, "session manager task failed");
    }
    if let Err(e) = store.shutdown().await {
        warn!(error = %e, store = store.name(), "store shutdown failed");
    }
    if let Err(e) = publisher.shutdown().await {
        warn!(error = %e, publisher = publisher.name(), "publisher shutdown failed");
    }

    info!("letusconnect serve shutdown complete");
    result
}

/// Open the adapters, spawn the session manager and assemble gateway state.
pub async fn build_state(
    config: &ConnectConfig,
    cancel: &CancellationToken,
) -> Result<(GatewayState, JoinHandle<()>), ConnectError> {
    let secret = config
        .auth
        .jwt_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConnectError::Config("auth.jwt_secret is not set".to_string()))?;

    let store = letusconnect_storage::open_store(&config.storage).await?;
    info!(store = store.name(), "document store ready");

    let publisher: Arc<dyn EventPublisher> = Arc::new(PusherPublisher::from_config(&config.broker)?);
    info!(endpoint = %config.broker.endpoint(), "broker publisher ready");

    let (manager, manager_task) = Manager::spawn(cancel);

    let state = GatewayState {
        manager,
        store,
        publisher,
        verifier: Arc::new(JwtVerifier::new(secret)),
        session: SessionSettings::from(&config.session),
        shutdown: cancel.clone(),
        start_time: Instant::now(),
    };
    Ok((state, manager_task))
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("letusconnect={log_level},warn")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}

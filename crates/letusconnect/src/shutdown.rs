// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the listener, the session manager and every
//! session's loops observe.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
/// The signal handler task runs in the background until the token is cancelled.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        tokio::select! {
            _ = wait_for_signal() => token_clone.cancel(),
            _ = token_clone.cancelled() => {}
        }
        debug!("shutdown signal handler completed");
    });

    token
}

async fn wait_for_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                    _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
                }
            }
            Err(e) => {
                warn!(error = %e, "could not install SIGTERM handler, using Ctrl+C only");
                let _ = ctrl_c.await;
                info!("received SIGINT (Ctrl+C), initiating shutdown");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
        info!("received Ctrl+C, initiating shutdown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn install_signal_handler_returns_token() {
        let token = install_signal_handler();
        // Token should not be cancelled yet.
        assert!(!token.is_cancelled());
        // Cancel it manually to clean up the background task.
        token.cancel();
    }
}

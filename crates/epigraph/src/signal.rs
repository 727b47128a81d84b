// SPDX-FileCopyrightText: 2026 Epigraph Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interrupt handling for long-running commands.

use std::future::Future;
use std::io;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs handlers for SIGINT (Ctrl+C) and, on unix, SIGTERM.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is
/// received. A handler that cannot be installed never fires. The listener
/// task ends with the process.
pub fn install_interrupt_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = delivered(tokio::signal::ctrl_c(), "SIGINT (Ctrl+C)");

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        () = ctrl_c => {}
                        _ = sigterm.recv() => info!("received SIGTERM, cancelling"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler");
                    ctrl_c.await;
                }
            }
        }

        #[cfg(not(unix))]
        ctrl_c.await;

        token_clone.cancel();
        debug!("interrupt handler completed");
    });

    token
}

/// Resolves once `signal` is delivered. If registration failed, logs the
/// error and stays pending.
async fn delivered<F>(signal: F, name: &str)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("received {name}, cancelling"),
        Err(e) => {
            warn!(error = %e, "failed to listen for {name}");
            std::future::pending::<()>().await;
        }
    }
}

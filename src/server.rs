//! HTTP server lifecycle: load the snapshot, serve, flush on shutdown.
//!
//! [`serve`] wires the store, the feedback provider and the router into a running
//! axum server. SIGINT or SIGTERM stops new connections; once in-flight requests
//! finish, the store is written to the snapshot once.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use crate::api::{self, AppState};
use crate::config::DaybookConfig;
use crate::feedback::{self, FeedbackProvider};
use crate::persist::{ShutdownFlush, Snapshot};

/// Start the journal API and block until a shutdown signal arrives.
pub async fn serve(config: DaybookConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    let snapshot = Snapshot::new(config.resolved_data_path());

    let store = snapshot.load().into_shared();
    let flush = ShutdownFlush::new(store.clone(), snapshot);

    let provider: Arc<dyn FeedbackProvider> =
        Arc::from(feedback::create_provider(&config.feedback)?);
    tracing::info!(model = %provider.model(), "feedback provider ready");

    let router = api::router(AppState::new(store, provider));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "journal API running at http://{bind_addr}");

    run(listener, router, &flush, async {
        let signal = shutdown_signal().await;
        tracing::info!(signal, "shutdown requested, finishing in-flight requests");
    })
    .await
}

/// Serve `router` until `shutdown` resolves and in-flight requests drain, then
/// save the store through `flush`.
///
/// On a server error the save is left to `flush`'s drop.
pub async fn run<F>(
    listener: TcpListener,
    router: Router,
    flush: &ShutdownFlush,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;

    tracing::info!("saving entries");
    flush.flush();
    tracing::info!("journal API stopped");
    Ok(())
}

/// Resolves with the name of the first shutdown signal received.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}

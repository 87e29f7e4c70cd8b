//! HTTP server for Rigsmith (axum).
//!
//! Listens on http://127.0.0.1:8080 and serves `POST /api/build` and `GET /health`.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`].

mod app;
mod response;

use std::future::Future;
use std::sync::Arc;

use rigsmith::Planner;
use tokio::net::TcpListener;
use tracing::info;

use app::{router, serve_config_from_env, AppState};

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";

/// Runs the server on an existing listener until `shutdown` resolves. Used by tests (bind to
/// 127.0.0.1:0 then pass the listener).
pub async fn run_serve_on_listener<F>(
    listener: TcpListener,
    planner: Arc<Planner>,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("HTTP server listening on http://{}", addr);

    let state = Arc::new(AppState {
        planner,
        config: serve_config_from_env(),
    });
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

/// Runs the server on `addr` (default 127.0.0.1:8080) until Ctrl-C.
pub async fn run_serve(
    addr: Option<&str>,
    planner: Arc<Planner>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = addr.unwrap_or(DEFAULT_HTTP_ADDR);
    let listener = TcpListener::bind(addr).await?;
    run_serve_on_listener(listener, planner, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

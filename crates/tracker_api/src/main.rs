//! Project tracker HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use tracker_api::{router, AppState, ServerConfig};
use tracker_core::db::open_db;

async fn run(config: ServerConfig) -> Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
    let app = router(AppState::new(conn));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("event=server_listen module=api status=ok addr={addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("event=shutdown_signal module=api status=ok signal=ctrl_c"),
        Err(err) => {
            warn!("event=shutdown_signal module=api status=error error={err}");
            // Without a signal handler the server runs until killed.
            std::future::pending::<()>().await;
        }
    }
}

fn main() -> Result<()> {
    let config = ServerConfig::parse();

    tracker_core::init_logging(
        config.effective_log_level(),
        config.log_dir.as_deref(),
        config.log_stderr,
    )
    .map_err(anyhow::Error::msg)
    .context("failed to initialize logging")?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}

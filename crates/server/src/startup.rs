use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use service::{actress::ActressFileStore, runtime};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = format!("{}:{}", cfg.server.host, cfg.server.port);
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Prepare the data directory and load the record file.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    runtime::ensure_env(&cfg.storage.data_file).await?;
    let store = ActressFileStore::new(&cfg.storage.data_file).await?;
    info!(
        path = %cfg.storage.data_file.display(),
        high_water_mark = store.high_water_mark().await,
        "actress store loaded"
    );
    Ok(AppState::new(store, cfg.storage.import_file.clone()))
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, shutting down");
    }
}

/// Public entry: build the app and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_uses_configured_port() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        let addr = bind_addr(&cfg).unwrap();
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn bad_host_is_invalid_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn build_state_creates_data_file() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("startup_{}", uuid::Uuid::new_v4()));
        let mut cfg = AppConfig::default();
        cfg.storage.data_file = root.join("data").join("actresses.json");
        let state = build_state(&cfg).await?;
        assert!(state.store.list().await.is_empty());
        assert!(tokio::fs::metadata(&cfg.storage.data_file).await.is_ok());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}

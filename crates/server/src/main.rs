use db::{DBService, DbErr};
use server::{AppState, http};
use services::services::config::{self, ConfigError};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, prelude::*};

const WORKSPACE_CRATES: [&str; 4] = ["server", "services", "db", "db_migration"];

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn log_filter(level: &str) -> String {
    let scoped = WORKSPACE_CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    format!("warn,tower_http={level},{scoped}")
}

fn init_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_new(log_filter(log_level.trim()))
        .unwrap_or_else(|_| EnvFilter::new(log_filter("info")));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    init_tracing();

    let config = config::load().await?;

    let sqlite_path = config.sqlite_path();
    if let Some(parent) = sqlite_path.as_deref().and_then(|path| path.parent())
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = DBService::new(&config.database_url).await?;
    let app_router = http::router(AppState::new(db), &config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("Server running on http://{local_addr}");

    axum::serve(listener, app_router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_scopes_level_to_workspace_crates() {
        let filter = log_filter("debug");

        assert!(filter.starts_with("warn,"));
        for krate in WORKSPACE_CRATES {
            assert!(filter.contains(&format!("{krate}=debug")), "{filter}");
        }
        assert!(EnvFilter::try_new(filter).is_ok());
    }

    #[test]
    fn log_filter_rejects_garbage_levels() {
        assert!(EnvFilter::try_new(log_filter("not a level!")).is_err());
    }
}

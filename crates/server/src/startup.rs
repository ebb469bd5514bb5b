use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::subscription::repo::seaorm::SeaOrmSubscriptionRepository;
use service::subscription::SubscriptionRepository;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.server.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Resolve on Ctrl+C or SIGTERM. After `grace` elapses the token is cancelled
/// so requests still waiting on storage give up.
async fn shutdown_signal(token: CancellationToken, grace: Duration) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
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
                warn!(error = %e, "failed to install SIGTERM handler");
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
    info!(event = "shutdown_signal", grace_secs = grace.as_secs(), "draining in-flight requests");

    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        token.cancel();
    });
}

/// Public entry: connect storage, build the app and serve until a shutdown signal.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Runtime(format!("migrations: {e}")))?;
        info!(event = "migrations_applied", "database schema up to date");
    }

    let repo: Arc<dyn SubscriptionRepository> = Arc::new(SeaOrmSubscriptionRepository { db: db.clone() });
    let state = ServerState::new(repo, Duration::from_secs(cfg.server.request_timeout_secs));
    let shutdown = state.shutdown.clone();

    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting subscription server");
    let listener = TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown, Duration::from_secs(cfg.server.shutdown_timeout_secs)))
        .await
        .map_err(anyhow::Error::from)?;

    if let Err(e) = db.close().await {
        warn!(error = %e, "closing database pool failed");
    }
    info!(event = "stopped", "server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_rejects_garbage_host() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    #[test]
    fn bind_addr_uses_server_section() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = 8099;
        assert_eq!(bind_addr(&cfg).unwrap().port(), 8099);
    }
}

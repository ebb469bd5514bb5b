use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use tracing::info;

use crate::errors::ModelError;

/// Build pool options from the `database` config section.
pub fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    opts
}

/// Open a pooled connection and verify it with a ping.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, ModelError> {
    cfg.validate().map_err(|e| ModelError::Config(e.to_string()))?;
    let db = Database::connect(connect_options(cfg))
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    test_connection(&db).await?;
    info!(max_connections = cfg.max_connections, min_connections = cfg.min_connections, "database pool ready");
    Ok(db)
}

/// `SELECT 1` round trip.
pub async fn test_connection(db: &DatabaseConnection) -> Result<(), ModelError> {
    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1".to_string());
    db.execute(stmt).await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(())
}

//! OKR Board
//!
//! Client state for an Objective → Key Result → Action Item tracker:
//! - store: the in-memory tree, progress and sibling reorder
//! - session: auth-scoped lifecycle plus queued document writes
//! - sync: background writer against the document store
//! - tree / dashboard: read models for display

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod session;
pub mod store;
pub mod sync;
pub mod tree;

use std::sync::Arc;

use okr_remote_lib::repository::{init_db, SqliteObjectiveRepository};
use rolling_logger::LoggerConfig;

pub use okr_remote_lib::domain;

use auth::LocalAuth;
use config::AppConfig;
use domain::{DomainError, DomainResult};
use session::Session;

/// Build a session from configuration: logger, document store, auth and the
/// sync worker. Must be called inside a tokio runtime.
pub async fn bootstrap(config: &AppConfig) -> DomainResult<Session> {
    std::fs::create_dir_all(&config.data_dir).map_err(|e| {
        DomainError::Internal(format!("Failed to create data dir {}: {}", config.data_dir.display(), e))
    })?;

    if let Err(e) = rolling_logger::init_with_config(logger_config(config)) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let db = init_db(&config.db_path()).await.map_err(|e| {
        let _ = rolling_logger::error(&format!("Document store init failed: {}", e));
        e
    })?;
    let _ = rolling_logger::info("Document store init success");
    let repo = Arc::new(SqliteObjectiveRepository::new(db.connection()));
    let auth = Arc::new(LocalAuth::new(config.user.clone()));
    log::info!("{} ready for {}", config.app_name, config.user.id);

    Ok(Session::new(auth, repo))
}

/// Logger settings; an unknown level falls back to `Info` (no logger yet to report it)
fn logger_config(config: &AppConfig) -> LoggerConfig {
    let mut logger = LoggerConfig::new(config.log_path(), &config.app_name);
    logger.level = config.log_level().unwrap_or_else(|e| {
        eprintln!("{}, using info", e);
        log::LevelFilter::Info
    });
    logger
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Schedule;

    #[test]
    fn test_logger_config_level() {
        let debug = AppConfig {
            log_level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(logger_config(&debug).level, log::LevelFilter::Debug);

        let unknown = AppConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        let logger = logger_config(&unknown);
        assert_eq!(logger.level, log::LevelFilter::Info);
        assert_eq!(logger.log_dir, unknown.log_path());
    }

    #[tokio::test]
    async fn test_bootstrap_in_memory() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: tmp.path().join("data"),
            db_file: config::IN_MEMORY_DB.to_string(),
            ..Default::default()
        };

        let mut session = bootstrap(&config).await.unwrap();
        assert!(tmp.path().join("data").is_dir());

        let user = session.sign_in().await.unwrap();
        assert_eq!(user.id, "local");
        session.add_objective("First", Schedule::default()).unwrap();
        session.flush().await;
        assert_eq!(session.sync_stats().applied, 1);
    }
}

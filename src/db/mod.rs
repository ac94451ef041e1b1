//! Relational storage using SQLite
//!
//! This module handles:
//! - Connecting to the database and creating the schema
//! - Mapping entity structs onto tables and views ([`Entity`])
//! - Queued writes and typed reads through a [`Session`]
//! - Rejecting writes against read-only views

mod entity;
mod guard;
mod schema;
mod session;

pub use entity::{Entity, SqlValue};
pub use guard::{ensure_writable, Mutation};
pub use schema::*;
pub use session::Session;

use crate::config::{Config, DatabaseConfig};
use crate::document::DocumentValidator;
use crate::error::Result;
use crate::models::DbSchema;
use serde::Serialize;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Row count of one table
#[derive(Debug, Clone, Serialize)]
pub struct TableCount {
    pub schema: DbSchema,
    pub table: &'static str,
    pub rows: i64,
}

/// Database handle
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    rules: DocumentValidator,
}

impl Database {
    /// Connect to the database file named by the configuration
    pub async fn connect(config: &Config) -> Result<Self> {
        let rules = DocumentValidator::from(&config.validation);
        Self::connect_with(&config.paths.db_file, &config.database, rules).await
    }

    /// Open a database file with default settings, creating the schema if needed
    pub async fn open(db_path: &Path) -> Result<Self> {
        let db = Self::connect_with(
            db_path,
            &DatabaseConfig::default(),
            DocumentValidator::default(),
        )
        .await?;
        if !db.is_initialized().await? {
            db.init_schema().await?;
        }
        Ok(db)
    }

    async fn connect_with(
        db_path: &Path,
        settings: &DatabaseConfig,
        rules: DocumentValidator,
    ) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(settings.foreign_keys)
            .busy_timeout(Duration::from_secs(settings.busy_timeout_secs))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool, rules })
    }

    /// Create every table, trigger, view and index
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing database schema");
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Check if the schema exists
    pub async fn is_initialized(&self) -> Result<bool> {
        let result: Option<(i32,)> = sqlx::query_as(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='welearn_document'",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(result.is_some())
    }

    /// Open a new session
    pub fn session(&self) -> Session {
        Session::new(self.pool.clone(), self.rules.clone())
    }

    /// Row counts for every table
    pub async fn table_counts(&self) -> Result<Vec<TableCount>> {
        let mut counts = Vec::with_capacity(TABLES.len());
        for &(schema, table) in TABLES {
            let rows: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(&self.pool)
                .await?;
            counts.push(TableCount {
                schema,
                table,
                rows,
            });
        }
        Ok(counts)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

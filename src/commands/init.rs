//! Init command implementation

use crate::config::Config;
use crate::db::Database;
use crate::error::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Files written by `init`
#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub config_path: PathBuf,
    pub db_path: PathBuf,
    /// Whether an existing config was replaced
    pub overwritten: bool,
}

/// Write the default configuration and create the database schema
pub async fn cmd_init(base_dir: Option<PathBuf>, force: bool) -> Result<InitReport> {
    let config = Config::new_at(base_dir);
    let config_path = config.paths.config_file.clone();

    let overwritten = config_path.exists();
    if overwritten && !force {
        return Err(Error::AlreadyInitialized(config_path.display().to_string()));
    }

    config.validate()?;
    config.save()?;

    let db = Database::connect(&config).await?;
    db.init_schema().await?;
    db.close().await;

    info!("Initialized database at {:?}", config.paths.db_file);

    Ok(InitReport {
        config_path,
        db_path: config.paths.db_file.clone(),
        overwritten,
    })
}

pub fn print_init(report: &InitReport) {
    if report.overwritten {
        println!("✓ welearn-db re-initialized (config overwritten)");
    } else {
        println!("✓ welearn-db initialized successfully");
    }
    println!("  Config: {}", report.config_path.display());
    println!("  Database: {}", report.db_path.display());
    println!("\nNext steps:");
    println!("  1. Edit the config file to customize settings");
    println!("  2. Check a scraped document: welearn-db validate draft.json");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_config_and_schema() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().to_path_buf();

        let report = cmd_init(Some(base.clone()), false).await.unwrap();
        assert!(!report.overwritten);
        assert!(report.config_path.exists());
        assert!(report.db_path.exists());

        let config = Config::load(&report.config_path).unwrap();
        let db = Database::connect(&config).await.unwrap();
        assert!(db.is_initialized().await.unwrap());
    }

    #[tokio::test]
    async fn test_init_refuses_existing_config() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().to_path_buf();
        cmd_init(Some(base.clone()), false).await.unwrap();

        let err = cmd_init(Some(base.clone()), false).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyInitialized(_)));

        let report = cmd_init(Some(base), true).await.unwrap();
        assert!(report.overwritten);
    }
}

//! Status command implementation

use crate::config::Config;
use crate::db::{Database, TableCount};
use crate::error::{Error, Result};
use crate::models::{DbSchema, DocumentStepCount};
use serde::Serialize;
use tracing::info;

/// Status information
#[derive(Debug, Clone, Serialize)]
pub struct StatusInfo {
    pub config_path: String,
    pub db_path: String,
    pub tables: Vec<TableCount>,
    pub steps: Vec<DocumentStepCount>,
}

impl StatusInfo {
    /// Total rows across the tables of one schema
    pub fn schema_rows(&self, schema: DbSchema) -> i64 {
        self.tables
            .iter()
            .filter(|t| t.schema == schema)
            .map(|t| t.rows)
            .sum()
    }
}

/// Get database status
pub async fn cmd_status(config: &Config, db: &Database) -> Result<StatusInfo> {
    info!("Getting status");

    if !db.is_initialized().await? {
        return Err(Error::NotInitialized);
    }

    let tables = db.table_counts().await?;
    let mut steps: Vec<DocumentStepCount> = db.session().all().await?;
    steps.sort_by(|a, b| a.corpus_id.cmp(&b.corpus_id).then_with(|| a.step.cmp(&b.step)));

    Ok(StatusInfo {
        config_path: config.paths.config_file.display().to_string(),
        db_path: config.paths.db_file.display().to_string(),
        tables,
        steps,
    })
}

pub fn print_status(status: &StatusInfo) {
    println!("\n📊 welearn-db Status\n");
    println!("Configuration: {}", status.config_path);
    println!("Database: {}", status.db_path);

    for schema in DbSchema::ALL {
        println!("\n{} ({} rows):", schema, status.schema_rows(schema));
        for table in status.tables.iter().filter(|t| t.schema == schema) {
            println!("  {:<38} {}", table.table, table.rows);
        }
    }

    println!("\nDocuments by latest step:");
    if status.steps.is_empty() {
        println!("  No processed documents.");
        return;
    }
    for row in &status.steps {
        println!("  {}  {:<30} {}", row.corpus_id, row.step, row.document_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{seed_corpus, seed_document};
    use crate::models::{ProcessState, Step};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_status_counts() {
        let tmp = TempDir::new().unwrap();
        let config = Config::new_at(Some(tmp.path().to_path_buf()));
        let db = Database::connect(&config).await.unwrap();
        db.init_schema().await.unwrap();

        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;
        let doc = seed_document(&mut session, corpus.id, "https://example.com/a").await;
        session
            .add(&ProcessState::new(doc.id, Step::DocumentScraped))
            .unwrap();
        session.flush().await.unwrap();

        let status = cmd_status(&config, &db).await.unwrap();
        assert_eq!(status.schema_rows(DbSchema::CorpusRelated), 2);
        assert_eq!(status.schema_rows(DbSchema::DocumentRelated), 2);
        assert_eq!(status.schema_rows(DbSchema::UserRelated), 0);
        assert_eq!(status.steps.len(), 1);
        assert_eq!(status.steps[0].step, "document_scraped");

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["tables"][0]["schema"], "corpus_related");
    }

    #[tokio::test]
    async fn test_status_requires_schema() {
        let tmp = TempDir::new().unwrap();
        let config = Config::new_at(Some(tmp.path().to_path_buf()));
        let db = Database::connect(&config).await.unwrap();

        let err = cmd_status(&config, &db).await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
    }
}

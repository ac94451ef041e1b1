//! Read-only rows computed by database views

use super::Step;
use crate::db::{Entity, SqlValue};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Documents of a corpus whose latest process state is `step`
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DocumentStepCount {
    pub corpus_id: Uuid,
    pub step: String,
    pub document_count: i64,
}

impl DocumentStepCount {
    pub fn step(&self) -> Result<Step> {
        self.step.parse()
    }
}

impl Entity for DocumentStepCount {
    const ENTITY: &'static str = "DocumentStepCount";
    const TABLE: &'static str = "document_step_count";
    const COLUMNS: &'static [&'static str] = &["corpus_id", "step", "document_count"];
    const PRIMARY_KEY: &'static [&'static str] = &["corpus_id", "step"];
    const READ_ONLY: bool = true;

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("corpus_id", self.corpus_id.into()),
            ("step", self.step.clone().into()),
            ("document_count", self.document_count.into()),
        ]
    }
}

/// Documents of a corpus currently indexed in the vector store
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QtyDocumentInQdrant {
    pub corpus_id: Uuid,
    pub document_in_qdrant: i64,
}

impl Entity for QtyDocumentInQdrant {
    const ENTITY: &'static str = "QtyDocumentInQdrant";
    const TABLE: &'static str = "qty_document_in_qdrant";
    const COLUMNS: &'static [&'static str] = &["corpus_id", "document_in_qdrant"];
    const PRIMARY_KEY: &'static [&'static str] = &["corpus_id"];
    const READ_ONLY: bool = true;

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("corpus_id", self.corpus_id.into()),
            ("document_in_qdrant", self.document_in_qdrant.into()),
        ]
    }
}

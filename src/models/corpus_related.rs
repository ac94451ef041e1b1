//! Corpora and the models attached to them

use super::local_timestamp;
use crate::db::{Entity, SqlValue};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Thematic category grouping corpora
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    pub fn new(title: impl Into<String>) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Category {
    const ENTITY: &'static str = "Category";
    const TABLE: &'static str = "category";
    const COLUMNS: &'static [&'static str] = &["id", "title", "created_at", "updated_at"];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("title", self.title.clone().into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

/// A named collection of source documents
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Corpus {
    pub id: Uuid,
    pub source_name: String,
    /// Fixed corpora are not re-crawled
    pub is_fix: bool,
    pub binary_treshold: f64,
    pub is_active: bool,
    pub category_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Corpus {
    pub fn new(source_name: impl Into<String>, category_id: Uuid, binary_treshold: f64) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            source_name: source_name.into(),
            is_fix: false,
            binary_treshold,
            is_active: true,
            category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Corpus {
    const ENTITY: &'static str = "Corpus";
    const TABLE: &'static str = "corpus";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "source_name",
        "is_fix",
        "binary_treshold",
        "is_active",
        "category_id",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("source_name", self.source_name.clone().into()),
            ("is_fix", self.is_fix.into()),
            ("binary_treshold", self.binary_treshold.into()),
            ("is_active", self.is_active.into()),
            ("category_id", self.category_id.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EmbeddingModel {
    pub id: Uuid,
    pub title: String,
    pub lang: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl EmbeddingModel {
    pub fn new(title: impl Into<String>, lang: impl Into<String>) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            lang: lang.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for EmbeddingModel {
    const ENTITY: &'static str = "EmbeddingModel";
    const TABLE: &'static str = "embedding_model";
    const COLUMNS: &'static [&'static str] = &["id", "title", "lang", "created_at", "updated_at"];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("title", self.title.clone().into()),
            ("lang", self.lang.clone().into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

/// Binary SDG / non-SDG classifier
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BiClassifierModel {
    pub id: Uuid,
    pub title: String,
    pub binary_treshold: f64,
    pub lang: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BiClassifierModel {
    pub fn new(title: impl Into<String>, lang: impl Into<String>, binary_treshold: f64) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            binary_treshold,
            lang: lang.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for BiClassifierModel {
    const ENTITY: &'static str = "BiClassifierModel";
    const TABLE: &'static str = "bi_classifier_model";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "binary_treshold",
        "lang",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("title", self.title.clone().into()),
            ("binary_treshold", self.binary_treshold.into()),
            ("lang", self.lang.clone().into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

/// Multi-label classifier with one threshold per SDG
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct NClassifierModel {
    pub id: Uuid,
    pub title: String,
    pub lang: String,
    pub treshold_sdg_1: Option<f64>,
    pub treshold_sdg_2: Option<f64>,
    pub treshold_sdg_3: Option<f64>,
    pub treshold_sdg_4: Option<f64>,
    pub treshold_sdg_5: Option<f64>,
    pub treshold_sdg_6: Option<f64>,
    pub treshold_sdg_7: Option<f64>,
    pub treshold_sdg_8: Option<f64>,
    pub treshold_sdg_9: Option<f64>,
    pub treshold_sdg_10: Option<f64>,
    pub treshold_sdg_11: Option<f64>,
    pub treshold_sdg_12: Option<f64>,
    pub treshold_sdg_13: Option<f64>,
    pub treshold_sdg_14: Option<f64>,
    pub treshold_sdg_15: Option<f64>,
    pub treshold_sdg_16: Option<f64>,
    pub treshold_sdg_17: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NClassifierModel {
    pub fn new(title: impl Into<String>, lang: impl Into<String>) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            lang: lang.into(),
            treshold_sdg_1: None,
            treshold_sdg_2: None,
            treshold_sdg_3: None,
            treshold_sdg_4: None,
            treshold_sdg_5: None,
            treshold_sdg_6: None,
            treshold_sdg_7: None,
            treshold_sdg_8: None,
            treshold_sdg_9: None,
            treshold_sdg_10: None,
            treshold_sdg_11: None,
            treshold_sdg_12: None,
            treshold_sdg_13: None,
            treshold_sdg_14: None,
            treshold_sdg_15: None,
            treshold_sdg_16: None,
            treshold_sdg_17: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Thresholds indexed by SDG number minus one
    pub fn thresholds(&self) -> [Option<f64>; 17] {
        [
            self.treshold_sdg_1,
            self.treshold_sdg_2,
            self.treshold_sdg_3,
            self.treshold_sdg_4,
            self.treshold_sdg_5,
            self.treshold_sdg_6,
            self.treshold_sdg_7,
            self.treshold_sdg_8,
            self.treshold_sdg_9,
            self.treshold_sdg_10,
            self.treshold_sdg_11,
            self.treshold_sdg_12,
            self.treshold_sdg_13,
            self.treshold_sdg_14,
            self.treshold_sdg_15,
            self.treshold_sdg_16,
            self.treshold_sdg_17,
        ]
    }

    /// Threshold for an SDG number (1-17)
    pub fn threshold_for(&self, sdg_number: usize) -> Option<f64> {
        sdg_number
            .checked_sub(1)
            .and_then(|i| self.thresholds().get(i).copied().flatten())
    }
}

impl Entity for NClassifierModel {
    const ENTITY: &'static str = "NClassifierModel";
    const TABLE: &'static str = "n_classifier_model";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "lang",
        "treshold_sdg_1",
        "treshold_sdg_2",
        "treshold_sdg_3",
        "treshold_sdg_4",
        "treshold_sdg_5",
        "treshold_sdg_6",
        "treshold_sdg_7",
        "treshold_sdg_8",
        "treshold_sdg_9",
        "treshold_sdg_10",
        "treshold_sdg_11",
        "treshold_sdg_12",
        "treshold_sdg_13",
        "treshold_sdg_14",
        "treshold_sdg_15",
        "treshold_sdg_16",
        "treshold_sdg_17",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        let mut values: Vec<(&'static str, SqlValue)> = vec![
            ("id", self.id.into()),
            ("title", self.title.clone().into()),
            ("lang", self.lang.clone().into()),
        ];
        // COLUMNS[3..20] are the thresholds, in SDG order
        for (column, threshold) in Self::COLUMNS[3..20].iter().zip(self.thresholds()) {
            values.push((*column, threshold.into()));
        }
        values.push(("created_at", self.created_at.into()));
        values.push(("updated_at", self.updated_at.into()));
        values
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CorpusEmbeddingModel {
    pub corpus_id: Uuid,
    pub embedding_model_id: Uuid,
    pub used_since: NaiveDateTime,
}

impl CorpusEmbeddingModel {
    pub fn new(corpus_id: Uuid, embedding_model_id: Uuid) -> Self {
        Self {
            corpus_id,
            embedding_model_id,
            used_since: local_timestamp(),
        }
    }
}

impl Entity for CorpusEmbeddingModel {
    const ENTITY: &'static str = "CorpusEmbeddingModel";
    const TABLE: &'static str = "corpus_embedding_model";
    const COLUMNS: &'static [&'static str] = &["corpus_id", "embedding_model_id", "used_since"];
    const PRIMARY_KEY: &'static [&'static str] = &["corpus_id", "embedding_model_id"];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("corpus_id", self.corpus_id.into()),
            ("embedding_model_id", self.embedding_model_id.into()),
            ("used_since", self.used_since.into()),
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CorpusNClassifierModel {
    pub corpus_id: Uuid,
    pub n_classifier_model_id: Uuid,
    pub used_since: NaiveDateTime,
}

impl CorpusNClassifierModel {
    pub fn new(corpus_id: Uuid, n_classifier_model_id: Uuid) -> Self {
        Self {
            corpus_id,
            n_classifier_model_id,
            used_since: local_timestamp(),
        }
    }
}

impl Entity for CorpusNClassifierModel {
    const ENTITY: &'static str = "CorpusNClassifierModel";
    const TABLE: &'static str = "corpus_n_classifier_model";
    const COLUMNS: &'static [&'static str] = &["corpus_id", "n_classifier_model_id", "used_since"];
    const PRIMARY_KEY: &'static [&'static str] = &["corpus_id", "n_classifier_model_id"];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("corpus_id", self.corpus_id.into()),
            ("n_classifier_model_id", self.n_classifier_model_id.into()),
            ("used_since", self.used_since.into()),
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CorpusBiClassifierModel {
    pub corpus_id: Uuid,
    pub bi_classifier_model_id: Uuid,
    pub used_since: NaiveDateTime,
}

impl CorpusBiClassifierModel {
    pub fn new(corpus_id: Uuid, bi_classifier_model_id: Uuid) -> Self {
        Self {
            corpus_id,
            bi_classifier_model_id,
            used_since: local_timestamp(),
        }
    }
}

impl Entity for CorpusBiClassifierModel {
    const ENTITY: &'static str = "CorpusBiClassifierModel";
    const TABLE: &'static str = "corpus_bi_classifier_model";
    const COLUMNS: &'static [&'static str] =
        &["corpus_id", "bi_classifier_model_id", "used_since"];
    const PRIMARY_KEY: &'static [&'static str] = &["corpus_id", "bi_classifier_model_id"];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("corpus_id", self.corpus_id.into()),
            ("bi_classifier_model_id", self.bi_classifier_model_id.into()),
            ("used_since", self.used_since.into()),
        ]
    }
}

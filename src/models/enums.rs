//! Enumerations stored as lower-case text columns

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Logical grouping of tables, mirroring the schemas of the production database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbSchema {
    CorpusRelated,
    DocumentRelated,
    UserRelated,
}

impl DbSchema {
    pub const ALL: [DbSchema; 3] = [
        DbSchema::CorpusRelated,
        DbSchema::DocumentRelated,
        DbSchema::UserRelated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DbSchema::CorpusRelated => "corpus_related",
            DbSchema::DocumentRelated => "document_related",
            DbSchema::UserRelated => "user_related",
        }
    }
}

impl std::fmt::Display for DbSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage of the document processing pipeline, recorded in `process_state.title`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    UrlRetrieved,
    DocumentScraped,
    DocumentVectorized,
    DocumentClassifiedSdg,
    DocumentClassifiedNonSdg,
    DocumentInQdrant,
    DocumentKeywordsExtracted,
    DocumentIsIrretrievable,
    DocumentIsInvalid,
    KeptForTrace,
}

impl Step {
    pub const ALL: [Step; 10] = [
        Step::UrlRetrieved,
        Step::DocumentScraped,
        Step::DocumentVectorized,
        Step::DocumentClassifiedSdg,
        Step::DocumentClassifiedNonSdg,
        Step::DocumentInQdrant,
        Step::DocumentKeywordsExtracted,
        Step::DocumentIsIrretrievable,
        Step::DocumentIsInvalid,
        Step::KeptForTrace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::UrlRetrieved => "url_retrieved",
            Step::DocumentScraped => "document_scraped",
            Step::DocumentVectorized => "document_vectorized",
            Step::DocumentClassifiedSdg => "document_classified_sdg",
            Step::DocumentClassifiedNonSdg => "document_classified_non_sdg",
            Step::DocumentInQdrant => "document_in_qdrant",
            Step::DocumentKeywordsExtracted => "document_keywords_extracted",
            Step::DocumentIsIrretrievable => "document_is_irretrievable",
            Step::DocumentIsInvalid => "document_is_invalid",
            Step::KeptForTrace => "kept_for_trace",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.to_lowercase();
        Step::ALL
            .into_iter()
            .find(|step| step.as_str() == lowered)
            .ok_or_else(|| Error::InvalidEnumValue {
                kind: "step",
                value: s.to_string(),
            })
    }
}

/// Named analytics counters attached to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Counter {
    Hit,
    Click,
}

impl std::fmt::Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Counter::Hit => write!(f, "hit"),
            Counter::Click => write!(f, "click"),
        }
    }
}

impl FromStr for Counter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hit" => Ok(Counter::Hit),
            "click" => Ok(Counter::Click),
            _ => Err(Error::InvalidEnumValue {
                kind: "counter",
                value: s.to_string(),
            }),
        }
    }
}

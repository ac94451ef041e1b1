//! Document ingestion model
//!
//! Raw fields coming from scrapers go through this module before a
//! [`WeLearnDocument`] exists:
//! - URL scheme check (https only)
//! - HTML stripping and whitespace collapsing of content and description
//! - minimum content length
//! - trace computation for change detection

mod sanitize;
mod trace;

pub use sanitize::*;
pub use trace::*;

use crate::config::ValidationConfig;
use crate::error::{Error, Result};
use crate::models::{local_timestamp, WeLearnDocument};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Only scheme accepted for document URLs
pub const SECURE_SCHEME: &str = "https";

/// Unvalidated document fields as produced by a scraper
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentDraft {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub full_content: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    pub corpus_id: Uuid,
}

/// Applies the document field rules
#[derive(Debug, Clone)]
pub struct DocumentValidator {
    min_content_length: usize,
}

impl Default for DocumentValidator {
    fn default() -> Self {
        Self::from(&ValidationConfig::default())
    }
}

impl From<&ValidationConfig> for DocumentValidator {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            min_content_length: config.min_content_length,
        }
    }
}

impl DocumentValidator {
    pub fn min_content_length(&self) -> usize {
        self.min_content_length
    }

    /// Validate every field of `draft` and build the document record
    pub fn validate(&self, draft: DocumentDraft) -> Result<WeLearnDocument> {
        let url = validate_url(&draft.url)?;
        let full_content = self.validate_full_content(draft.full_content.as_deref())?;
        let description = validate_description(draft.description.as_deref())?;
        let trace = compute_trace(Some(&full_content));

        let now = local_timestamp();
        Ok(WeLearnDocument {
            id: Uuid::new_v4(),
            url,
            title: trim_to_option(draft.title),
            lang: trim_to_option(draft.lang),
            description: Some(description),
            full_content: Some(full_content),
            details: draft.details.map(Json),
            trace,
            corpus_id: draft.corpus_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Re-check a document whose fields may have been changed since validation
    pub fn check(&self, document: &WeLearnDocument) -> Result<()> {
        validate_url(&document.url)?;
        validate_description(document.description.as_deref())?;
        let content = self.validate_full_content(document.full_content.as_deref())?;

        let expected = compute_trace(Some(&content));
        if document.trace != expected {
            debug!(
                "Rejected document {}: trace {:?}, expected {:?}",
                document.url, document.trace, expected
            );
            return Err(Error::TraceMismatch {
                stored: document.trace,
                expected,
            });
        }
        Ok(())
    }

    /// Sanitize content and enforce presence and minimum length
    pub fn validate_full_content(&self, raw: Option<&str>) -> Result<String> {
        let raw = raw.ok_or_else(|| {
            debug!("Rejected document: full_content missing");
            Error::MissingFullContent
        })?;

        let content = sanitize_text(raw);
        let len = content.chars().count();
        if len < self.min_content_length {
            debug!(
                "Rejected document: full_content has {} characters, minimum {}",
                len, self.min_content_length
            );
            return Err(Error::FullContentTooShort {
                len,
                min: self.min_content_length,
            });
        }

        Ok(content)
    }
}

/// Accept only absolute https URLs; anything unparsable counts as a bad scheme
pub fn validate_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(url) if url.scheme() == SECURE_SCHEME => Ok(raw.to_string()),
        Ok(url) => {
            debug!("Rejected document url {}: scheme {}", raw, url.scheme());
            Err(Error::InvalidUrlScheme(raw.to_string()))
        }
        Err(e) => {
            debug!("Rejected document url {}: {}", raw, e);
            Err(Error::InvalidUrlScheme(raw.to_string()))
        }
    }
}

/// Sanitize the description; it is mandatory
pub fn validate_description(raw: Option<&str>) -> Result<String> {
    match raw {
        Some(description) => Ok(sanitize_text(description)),
        None => {
            debug!("Rejected document: description missing");
            Err(Error::MissingDescription)
        }
    }
}

fn trim_to_option(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

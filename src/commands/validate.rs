//! Validate command implementation

use crate::config::Config;
use crate::document::{DocumentDraft, DocumentValidator};
use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Fields of a draft after validation
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub url: String,
    pub title: Option<String>,
    pub lang: Option<String>,
    pub description: Option<String>,
    pub full_content: Option<String>,
    pub content_length: usize,
    pub trace: Option<i64>,
}

/// Read a JSON document draft and run the validator on it
pub fn cmd_validate(config: &Config, draft_path: &Path) -> Result<ValidationReport> {
    debug!("Validating draft {:?}", draft_path);

    let content = std::fs::read_to_string(draft_path)?;
    let draft: DocumentDraft = serde_json::from_str(&content)?;
    let document = DocumentValidator::from(&config.validation).validate(draft)?;

    Ok(ValidationReport {
        content_length: document
            .full_content
            .as_deref()
            .map_or(0, |c| c.chars().count()),
        url: document.url,
        title: document.title,
        lang: document.lang,
        description: document.description,
        full_content: document.full_content,
        trace: document.trace,
    })
}

pub fn print_validation(report: &ValidationReport) {
    println!("✓ Document is valid\n");
    println!("URL: {}", report.url);
    println!("Title: {}", report.title.as_deref().unwrap_or("-"));
    println!("Lang: {}", report.lang.as_deref().unwrap_or("-"));
    println!("Description: {}", report.description.as_deref().unwrap_or("-"));
    println!("Content: {} characters", report.content_length);
    match report.trace {
        Some(trace) => println!("Trace: {}", trace),
        None => println!("Trace: -"),
    }
}

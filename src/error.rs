//! Custom error types for welearn-database

use crate::db::Mutation;
use thiserror::Error;

/// Main error type for welearn-database operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid URL scheme, only https is accepted: {0}")]
    InvalidUrlScheme(String),

    #[error("Document full content is missing")]
    MissingFullContent,

    #[error("Document full content is too short: {len} characters, at least {min} required")]
    FullContentTooShort { len: usize, min: usize },

    #[error("Document description is missing")]
    MissingDescription,

    #[error("Document trace {stored:?} does not match its content (expected {expected:?})")]
    TraceMismatch {
        stored: Option<i64>,
        expected: Option<i64>,
    },

    #[error("{entity} is read-only (view), {operation} rejected")]
    ReadOnlyView {
        entity: &'static str,
        operation: Mutation,
    },

    #[error("{entity} row not found for {operation}")]
    RowNotFound {
        entity: &'static str,
        operation: Mutation,
    },

    #[error("Unknown column '{column}' for {entity}")]
    UnknownColumn {
        entity: &'static str,
        column: String,
    },

    #[error("Invalid {kind} value: {value}")]
    InvalidEnumValue { kind: &'static str, value: String },

    #[error("Not initialized: run 'welearn-db init' first")]
    NotInitialized,

    #[error("Already initialized at {0}")]
    AlreadyInitialized(String),
}

/// Result type alias for welearn-database
pub type Result<T> = std::result::Result<T, Error>;

//! welearn-database: persistence layer of the WeLearn platform
//!
//! This crate provides:
//! - The relational schema for corpora, documents and users, with read-only views
//! - Validation of scraped documents before they are stored
//! - A small unit-of-work session over SQLite
//! - The `welearn-db` admin CLI

pub mod commands;
pub mod config;
pub mod db;
pub mod document;
pub mod error;
pub mod models;

pub use error::{Error, Result};

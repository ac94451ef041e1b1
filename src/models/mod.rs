//! Row types for every table and view
//!
//! Tables are grouped the way the production schemas group them:
//! - `corpus_related`: categories, corpora, embedding and classifier models
//! - `document_related`: documents and everything derived from them
//! - `user_related`: users, sessions, bookmarks and chat history
//!
//! Views live in `views` and are read-only.

mod corpus_related;
mod document_related;
mod enums;
mod user_related;
mod views;

pub use corpus_related::*;
pub use document_related::*;
pub use enums::*;
pub use user_related::*;
pub use views::*;

use chrono::{Local, NaiveDateTime};

/// Current wall-clock time without timezone, as the TIMESTAMP columns store it
pub fn local_timestamp() -> NaiveDateTime {
    Local::now().naive_local()
}

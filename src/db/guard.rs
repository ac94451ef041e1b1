//! Read-only enforcement for entities backed by database views

use super::Entity;
use crate::error::{Error, Result};
use serde::Serialize;
use tracing::warn;

/// Kinds of write a session can attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutation {
    Insert,
    Update,
    Delete,
    Flush,
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mutation::Insert => write!(f, "insert"),
            Mutation::Update => write!(f, "update"),
            Mutation::Delete => write!(f, "delete"),
            Mutation::Flush => write!(f, "flush"),
        }
    }
}

/// Fail if `T` maps onto a view
pub fn ensure_writable<T: Entity>(operation: Mutation) -> Result<()> {
    check_writable(T::ENTITY, T::READ_ONLY, operation)
}

pub(crate) fn check_writable(
    entity: &'static str,
    read_only: bool,
    operation: Mutation,
) -> Result<()> {
    if read_only {
        warn!("Rejected {} on read-only view {}", operation, entity);
        return Err(Error::ReadOnlyView { entity, operation });
    }
    Ok(())
}

use thiserror::Error;

use super::ownership::ResourceKind;
use crate::database::StoreError;

pub type ScopeResult<T> = Result<T, ScopeError>;

/// Failures of tenant resolution and of tenant-scoped operations.
///
/// `ResourceNotFound` covers both "no such id" and "id owned by another
/// organization"; callers must not be able to tell them apart.
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Invalid organization.")]
    InvalidTenantHeader { slug: String },

    #[error("Organization context required (set header X-Org-Slug).")]
    MissingTenantContext,

    #[error("{kind} {id} not found")]
    ResourceNotFound { kind: ResourceKind, id: i64 },

    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ScopeError {
    pub fn not_found(kind: ResourceKind, id: i64) -> Self {
        ScopeError::ResourceNotFound { kind, id }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ScopeError::Validation {
            field,
            message: message.into(),
        }
    }
}

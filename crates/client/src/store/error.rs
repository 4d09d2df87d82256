//! Character store errors.

use sheets5e_domain::{DomainError, Slug};

use crate::seed::SeedError;

/// Errors that can occur during character store operations.
///
/// Every variant is a synchronous rejection: the store is left exactly as
/// it was before the failing call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Character not found: {0}")]
    NotFound(String),

    #[error("Invalid update for {slug}: {source}")]
    Validation {
        slug: String,
        #[source]
        source: DomainError,
    },

    #[error("Duplicate character slug: {0}")]
    DuplicateSlug(Slug),

    #[error("Seeding failed: {0}")]
    Seed(#[from] SeedError),
}

impl StoreError {
    pub fn validation(slug: impl Into<String>, source: DomainError) -> Self {
        Self::Validation {
            slug: slug.into(),
            source,
        }
    }

    /// The sheet field blamed for a validation failure, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation {
                source: DomainError::InvalidField { field, .. },
                ..
            } => Some(field.as_str()),
            _ => None,
        }
    }
}

//! Validated slug newtype used to key characters.
//!
//! A slug is valid by construction:
//! - Non-empty after trimming
//! - At most 200 characters
//! - Only ASCII letters, digits, `-` and `_`, so it can sit in a URL path

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::error::DomainError;

/// Maximum length for a slug
const MAX_SLUG_LENGTH: usize = 200;

/// A validated, URL-safe character slug (e.g. `douglas-mctrickfoot`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Create a new validated slug.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The slug is empty after trimming
    /// - The slug exceeds 200 characters after trimming
    /// - The slug contains anything other than ASCII alphanumerics, `-` or `_`
    pub fn new(slug: impl Into<String>) -> Result<Self, DomainError> {
        let slug = slug.into();
        let trimmed = slug.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Slug cannot be empty"));
        }
        if trimmed.len() > MAX_SLUG_LENGTH {
            return Err(DomainError::validation(format!(
                "Slug cannot exceed {} characters",
                MAX_SLUG_LENGTH
            )));
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(DomainError::validation(format!(
                "Slug contains a character that is not URL-safe: {bad:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Slug {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> String {
        slug.0
    }
}

impl Borrow<str> for Slug {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

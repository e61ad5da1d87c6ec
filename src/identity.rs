// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Canonical player identity derived from an email address.
//!
//! Every read or write keyed by player goes through [`Identity::normalize`]
//! so that two raw strings differing only by case or surrounding whitespace
//! resolve to the same document key.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Normalized identity key (trimmed, lowercased email).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Normalize a raw email into a stable key.
    ///
    /// Fails with `InvalidIdentity` when the trimmed string is empty.
    pub fn normalize(raw: &str) -> Result<Self, AppError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AppError::InvalidIdentity);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace_collapse_to_same_key() {
        let a = Identity::normalize(" Foo@Bar.COM ").unwrap();
        let b = Identity::normalize("foo@bar.com").unwrap();
        let c = Identity::normalize("FOO@BAR.com").unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.as_str(), "foo@bar.com");
    }

    #[test]
    fn test_empty_after_trim_is_rejected() {
        assert!(matches!(
            Identity::normalize("   "),
            Err(AppError::InvalidIdentity)
        ));
        assert!(matches!(
            Identity::normalize(""),
            Err(AppError::InvalidIdentity)
        ));
    }

    #[test]
    fn test_interior_whitespace_is_kept() {
        // Not an email we want, but normalization only trims the ends;
        // format checks belong to request validation.
        let id = Identity::normalize(" a b@c.d ").unwrap();
        assert_eq!(id.as_str(), "a b@c.d");
    }
}

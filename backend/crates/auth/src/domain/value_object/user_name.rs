//! User Name Value Object
//!
//! The login handle. Registration commonly uses the e-mail address as the
//! user name, so `@`, `.`, `+`, `-` and `_` are allowed next to ASCII
//! alphanumerics.
//!
//! ## Invariants
//! - NFKC normalized and trimmed
//! - 1 to [`USER_NAME_MAX_LENGTH`] characters
//! - Only characters from [`ALLOWED_USER_NAME_CHARACTERS`]
//!
//! Uniqueness is checked on the normalized (uppercase) form, so
//! `Test@x.com` and `test@X.COM` are the same user.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 256;

/// Characters accepted in a user name
pub const ALLOWED_USER_NAME_CHARACTERS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-._@+";

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name cannot be empty")]
    Empty,

    #[error("User name is too long ({length} chars, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("User name '{name}' is invalid, can only contain letters or digits.")]
    InvalidCharacter { name: String, char: char },
}

/// Validated user name
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName {
    /// As entered (after NFKC + trim)
    value: String,
    /// Uppercase lookup key
    normalized: String,
}

impl UserName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let value: String = input.as_ref().nfkc().collect::<String>().trim().to_string();

        if value.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = value.chars().count();
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                length,
                max: USER_NAME_MAX_LENGTH,
            });
        }

        if let Some(ch) = value
            .chars()
            .find(|ch| !ALLOWED_USER_NAME_CHARACTERS.contains(*ch))
        {
            return Err(UserNameError::InvalidCharacter {
                name: value.clone(),
                char: ch,
            });
        }

        let normalized = Self::normalize(&value);
        Ok(Self { value, normalized })
    }

    /// Rebuild from stored columns (already validated on write)
    pub fn from_db(value: impl Into<String>, normalized: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            normalized: normalized.into(),
        }
    }

    /// Lookup key for a raw user name, without validating it
    pub fn normalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_uppercase()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserName({})", self.value)
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(user_name: UserName) -> Self {
        user_name.value
    }
}

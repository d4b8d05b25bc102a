//! Operation Status
//!
//! Outcome of an identity operation as shown to the user. `code()` is `1`
//! for success and `0` for every failure.

use derive_more::Display;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum StatusKind {
    Success,
    InvalidCredentials,
    LockedOut,
    DuplicateUser,
    PasswordMismatch,
    UnknownRole,
    InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
    /// Form field the failure belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl Status {
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Success, message)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(StatusKind::InvalidCredentials, "Invalid username or password")
    }

    pub fn locked_out() -> Self {
        Self::new(StatusKind::LockedOut, "User is locked out")
    }

    pub fn duplicate_user() -> Self {
        Self::new(StatusKind::DuplicateUser, "User already exists")
    }

    pub fn password_mismatch() -> Self {
        Self::new(StatusKind::PasswordMismatch, "Passwords do not match")
            .with_field("PasswordConfirm")
    }

    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusKind::InvalidInput, message).with_field(field)
    }

    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    /// `1` on success, `0` otherwise
    pub fn code(&self) -> i32 {
        i32::from(self.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.kind == StatusKind::Success
    }
}

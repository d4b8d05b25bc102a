//! Field-level validation
//!
//! [`ModelState`] collects validation errors keyed by the submitted field
//! name. Forms fill it before any store mutation; views render it back.

use std::collections::BTreeMap;

use serde::Serialize;

/// Key used for errors that belong to the form as a whole rather than to a
/// single field.
pub const FORM_LEVEL_KEY: &str = "";

/// Message for a missing required field.
pub fn required_message(field: &str) -> String {
    format!("The {field} field is required.")
}

/// Validation errors keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModelState {
    errors: BTreeMap<String, Vec<String>>,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_form_error(&mut self, message: impl Into<String>) {
        self.add_error(FORM_LEVEL_KEY, message);
    }

    /// Record a "field is required" error when `value` is blank.
    ///
    /// Returns `true` when the value is present.
    pub fn require(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add_error(field, required_message(field));
            false
        } else {
            true
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for `field` (empty when the field is valid).
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Names of the fields that carry at least one error.
    pub fn invalid_fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }
}

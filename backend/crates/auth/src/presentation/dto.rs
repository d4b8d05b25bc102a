//! Form Models
//!
//! Urlencoded form bodies posted by the authentication views. Field names
//! are PascalCase on the wire and double as `ModelState` keys.

use kernel::validation::ModelState;
use serde::{Deserialize, Serialize};

use crate::application::{ChangePasswordInput, LoginInput, RegisterInput};
use crate::domain::value_object::email::Email;

/// Record an error on `PasswordConfirm` when both values are present and differ.
fn check_confirmation(state: &mut ModelState, password: &str, confirm: &str) {
    if !password.is_empty() && !confirm.is_empty() && password != confirm {
        state.add_error(
            "PasswordConfirm",
            "The password and confirmation password do not match.",
        );
    }
}

// ============================================================================
// Registration
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub password_confirm: String,
    pub role: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> ModelState {
        let mut state = ModelState::new();

        state.require("FirstName", &self.first_name);
        state.require("LastName", &self.last_name);
        state.require("Username", &self.username);
        if state.require("Email", &self.email) {
            if let Err(e) = Email::new(self.email.as_str()) {
                state.add_error("Email", e.message());
            }
        }
        state.require("Password", &self.password);
        state.require("PasswordConfirm", &self.password_confirm);
        state.require("Role", &self.role);
        check_confirmation(&mut state, &self.password, &self.password_confirm);

        state
    }

    pub fn into_input(self) -> RegisterInput {
        RegisterInput {
            first_name: self.first_name,
            last_name: self.last_name,
            user_name: self.username,
            email: self.email,
            password: self.password,
            password_confirm: self.password_confirm,
            role: self.role,
        }
    }
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> ModelState {
        let mut state = ModelState::new();
        state.require("Username", &self.username);
        state.require("Password", &self.password);
        state
    }

    pub fn into_input(self) -> LoginInput {
        LoginInput {
            user_name: self.username,
            password: self.password,
        }
    }
}

// ============================================================================
// Change Password
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ChangePasswordForm {
    #[serde(skip_serializing)]
    pub current_password: String,
    #[serde(skip_serializing)]
    pub new_password: String,
    #[serde(skip_serializing)]
    pub password_confirm: String,
}

impl ChangePasswordForm {
    pub fn validate(&self) -> ModelState {
        let mut state = ModelState::new();
        state.require("CurrentPassword", &self.current_password);
        state.require("NewPassword", &self.new_password);
        state.require("PasswordConfirm", &self.password_confirm);
        check_confirmation(&mut state, &self.new_password, &self.password_confirm);
        state
    }

    pub fn into_input(self) -> ChangePasswordInput {
        ChangePasswordInput {
            current_password: self.current_password,
            new_password: self.new_password,
            password_confirm: self.password_confirm,
        }
    }
}

// ============================================================================
// Role Assignment
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RoleAssignmentForm {
    pub username: String,
    pub role: String,
}

impl RoleAssignmentForm {
    pub fn validate(&self) -> ModelState {
        let mut state = ModelState::new();
        state.require("Username", &self.username);
        state.require("Role", &self.role);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_registration() -> RegistrationForm {
        RegistrationForm {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            username: "test@x.com".to_string(),
            email: "test@x.com".to_string(),
            password: "Test#1234".to_string(),
            password_confirm: "Test#1234".to_string(),
            role: "user".to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(valid_registration().validate().is_valid());
    }

    #[test]
    fn test_one_error_per_missing_field() {
        let state = RegistrationForm::default().validate();
        let fields: Vec<&str> = state.invalid_fields().collect();
        assert_eq!(state.error_count(), 7);
        for field in [
            "FirstName",
            "LastName",
            "Username",
            "Email",
            "Password",
            "PasswordConfirm",
            "Role",
        ] {
            assert!(fields.contains(&field), "missing error for {field}");
            assert_eq!(
                state.errors_for(field),
                [format!("The {field} field is required.")]
            );
        }
    }

    #[test]
    fn test_confirmation_mismatch() {
        let form = RegistrationForm {
            password_confirm: "Other#1234".to_string(),
            ..valid_registration()
        };
        let state = form.validate();
        assert!(state.has_error("PasswordConfirm"));
        assert_eq!(state.error_count(), 1);
    }

    #[test]
    fn test_malformed_email() {
        let form = RegistrationForm {
            email: "not-an-email".to_string(),
            ..valid_registration()
        };
        assert!(form.validate().has_error("Email"));
    }

    #[test]
    fn test_deserialize_pascal_case() {
        let form: LoginForm =
            serde_json::from_str(r#"{"Username":"validUsername","Password":"secret"}"#).unwrap();
        assert_eq!(form.username, "validUsername");
        assert_eq!(form.password, "secret");

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json, serde_json::json!({ "Username": "validUsername" }));
    }

    #[test]
    fn test_change_password_form() {
        let form = ChangePasswordForm {
            current_password: "Old#1234".to_string(),
            new_password: "New#1234".to_string(),
            password_confirm: "New#5678".to_string(),
        };
        let state = form.validate();
        assert!(state.has_error("PasswordConfirm"));
        assert!(!state.has_error("NewPassword"));
    }
}

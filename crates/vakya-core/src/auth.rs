//! Login and registration forms.
//!
//! Forms are validated locally before any request goes out; the remote
//! auth service does everything else.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const PASSWORDS_DIFFER: &str = "Passwords do not match";
pub const LOGIN_SUCCESS: &str = "Login successful! Welcome back.";
pub const REGISTER_SUCCESS: &str = "Registration successful! Welcome to Sanskrit Learning System.";

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// `POST /login` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AuthError> {
        if blank(&self.email) || self.password.is_empty() {
            return Err(AuthError::Validation(FILL_ALL_FIELDS.into()));
        }
        Ok(())
    }
}

/// `POST /register` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AuthError> {
        if blank(&self.full_name)
            || blank(&self.email)
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(AuthError::Validation(FILL_ALL_FIELDS.into()));
        }
        if self.password != self.confirm_password {
            return Err(AuthError::Validation(PASSWORDS_DIFFER.into()));
        }
        Ok(())
    }
}

/// Successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            full_name: "Arjuna".into(),
            email: "arjuna@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let req = LoginRequest {
            email: " ".into(),
            password: "pw".into(),
        };
        assert_eq!(
            req.validate(),
            Err(AuthError::Validation(FILL_ALL_FIELDS.into()))
        );
        let req = LoginRequest {
            email: "a@b.c".into(),
            password: "pw".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn register_checks_password_match() {
        assert!(register("secret", "secret").validate().is_ok());
        assert_eq!(
            register("secret", "Secret").validate(),
            Err(AuthError::Validation(PASSWORDS_DIFFER.into()))
        );
        assert_eq!(
            register("", "").validate(),
            Err(AuthError::Validation(FILL_ALL_FIELDS.into()))
        );
    }

    #[test]
    fn register_serializes_camel_case() {
        let json = serde_json::to_value(register("a", "a")).unwrap();
        assert_eq!(json["fullName"], "Arjuna");
        assert_eq!(json["confirmPassword"], "a");
    }
}

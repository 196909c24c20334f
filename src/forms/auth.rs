use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::forms::{empty_string_as_none, sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a contact or store name.
const NAME_MAX_LEN: u64 = 128;
/// Passwords shorter than this are rejected at registration.
const PASSWORD_MIN_LEN: u64 = 8;

pub type AuthFormResult<T> = Result<T, AuthFormError>;

/// Errors that can occur while processing registration and login forms.
#[derive(Debug, Error)]
pub enum AuthFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("name cannot be empty")]
    EmptyName,
    /// The provided store name is empty after sanitization.
    #[error("store name cannot be empty")]
    EmptyStoreName,
}

/// Payload submitted when a seller signs up.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    /// Contact name of the account owner.
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Plaintext password, hashed before storage.
    #[validate(length(min = PASSWORD_MIN_LEN))]
    pub password: String,
    /// WhatsApp phone number in any common Indian format.
    #[validate(length(min = 1))]
    pub phone: String,
    /// Display name of the storefront, also the slug source.
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub store_name: String,
    /// Optional storefront description.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
}

/// Sanitized registration data handed to the auth service.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub store_name: String,
    pub description: Option<String>,
}

impl RegisterForm {
    /// Validates and sanitizes the payload into a [`Registration`].
    pub fn into_registration(self) -> AuthFormResult<Registration> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(AuthFormError::EmptyName);
        }

        let store_name = sanitize_inline_text(&self.store_name);
        if store_name.is_empty() {
            return Err(AuthFormError::EmptyStoreName);
        }

        let description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());

        Ok(Registration {
            name,
            email: self.email.trim().to_lowercase(),
            password: self.password,
            phone: self.phone,
            store_name,
            description,
        })
    }
}

/// Payload submitted when a seller logs in.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginForm {
    /// Validates the payload and returns the normalized login email.
    pub fn normalized_email(&self) -> AuthFormResult<String> {
        self.validate()?;
        Ok(self.email.trim().to_lowercase())
    }
}

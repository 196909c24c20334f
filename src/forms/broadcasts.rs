use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::broadcast::NewBroadcast;
use crate::forms::{empty_string_as_none, sanitize_inline_text, sanitize_multiline_text};

/// WhatsApp caps message bodies well above this; the limit keeps deep links
/// within common URL length budgets after encoding.
const MESSAGE_MAX_LEN: u64 = 2000;

pub type BroadcastFormResult<T> = Result<T, BroadcastFormError>;

/// Errors that can occur while processing broadcast and subscription forms.
#[derive(Debug, Error)]
pub enum BroadcastFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The message is empty after sanitization.
    #[error("broadcast message cannot be empty")]
    EmptyMessage,
}

/// Payload submitted when drafting a broadcast.
#[derive(Debug, Deserialize, Validate)]
pub struct NewBroadcastForm {
    #[validate(length(min = 1, max = MESSAGE_MAX_LEN))]
    pub message: String,
}

impl NewBroadcastForm {
    /// Validates and sanitizes the payload into a domain [`NewBroadcast`].
    pub fn into_new_broadcast(self, seller_id: i32) -> BroadcastFormResult<NewBroadcast> {
        self.validate()?;

        let message = sanitize_multiline_text(&self.message);
        if message.is_empty() {
            return Err(BroadcastFormError::EmptyMessage);
        }

        Ok(NewBroadcast { seller_id, message })
    }
}

/// Payload submitted when scheduling a drafted broadcast.
#[derive(Debug, Deserialize)]
pub struct ScheduleBroadcastForm {
    /// Intended send time, naive UTC. Must be in the future; checked against
    /// the clock at submission time.
    pub send_at: NaiveDateTime,
}

/// Payload submitted by a buyer opting in to a seller's broadcasts.
#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeForm {
    /// Phone number in any common Indian format.
    #[validate(length(min = 1))]
    pub phone: String,
    /// Optional display name.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
}

impl SubscribeForm {
    /// Validates the payload and returns `(raw_phone, sanitized_name)`.
    pub fn into_parts(self) -> BroadcastFormResult<(String, Option<String>)> {
        self.validate()?;
        let name = self
            .name
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|value| !value.is_empty());
        Ok((self.phone, name))
    }
}

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::forms::empty_string_as_none;

pub type CartFormResult<T> = Result<T, CartFormError>;

/// Errors that can occur while processing cart forms.
#[derive(Debug, Error)]
pub enum CartFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The requested quantity is zero or negative.
    #[error("quantity must be positive")]
    InvalidQuantity,
}

/// Payload submitted when adding a product to a cart or changing its quantity.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCartItemForm {
    /// Buyer phone number in any common Indian format.
    #[validate(length(min = 1))]
    pub buyer_phone: String,
    pub product_id: i32,
    pub quantity: i32,
}

impl AddCartItemForm {
    pub fn checked(self) -> CartFormResult<Self> {
        self.validate()?;
        if self.quantity < 1 {
            return Err(CartFormError::InvalidQuantity);
        }
        Ok(self)
    }
}

/// Payload submitted when removing one product line from a cart.
#[derive(Debug, Deserialize, Validate)]
pub struct RemoveCartItemForm {
    #[validate(length(min = 1))]
    pub buyer_phone: String,
    pub product_id: i32,
}

/// Payload submitted at checkout.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutForm {
    #[validate(length(min = 1))]
    pub buyer_phone: String,
    /// Optional buyer name included in the WhatsApp message.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub buyer_name: Option<String>,
    /// Optional free-form note appended to the WhatsApp message.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub note: Option<String>,
}

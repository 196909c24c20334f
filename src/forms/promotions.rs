use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::promotion::{DiscountType, NewPromotion, UpdatePromotion};
use crate::forms::sanitize_inline_text;

/// Maximum allowed length for a promotion name.
const NAME_MAX_LEN: u64 = 128;

pub type PromotionFormResult<T> = Result<T, PromotionFormError>;

/// Errors that can occur while processing promotion forms.
#[derive(Debug, Error)]
pub enum PromotionFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("promotion name cannot be empty")]
    EmptyName,
    /// A percentage discount outside 1..=100.
    #[error("percentage discount must be between 1 and 100")]
    InvalidPercentage,
    /// An absolute discount that is zero or negative.
    #[error("absolute discount must be positive")]
    InvalidAbsolute,
    /// Targeted promotion submitted without products.
    #[error("a promotion must either apply to all products or list product ids")]
    NoTargets,
    /// The validity window is inverted.
    #[error("promotion start must not be after its end")]
    InvertedWindow,
}

fn check_discount(discount_type: DiscountType, value: i64) -> PromotionFormResult<()> {
    match discount_type {
        DiscountType::Percentage if !(1..=100).contains(&value) => {
            Err(PromotionFormError::InvalidPercentage)
        }
        DiscountType::Absolute if value <= 0 => Err(PromotionFormError::InvalidAbsolute),
        _ => Ok(()),
    }
}

/// Payload submitted when creating a promotion.
#[derive(Debug, Deserialize, Validate)]
pub struct AddPromotionForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    pub discount_type: DiscountType,
    /// Percentage (1–100) or amount in paise, depending on `discount_type`.
    pub discount_value: i64,
    #[serde(default)]
    pub apply_to_all: bool,
    /// Targeted product set; required unless `apply_to_all` is set.
    #[serde(default)]
    pub product_ids: Vec<i32>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

impl AddPromotionForm {
    /// Validates and sanitizes the payload into a domain [`NewPromotion`].
    pub fn into_new_promotion(self, seller_id: i32) -> PromotionFormResult<NewPromotion> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(PromotionFormError::EmptyName);
        }

        check_discount(self.discount_type, self.discount_value)?;

        if !self.apply_to_all && self.product_ids.is_empty() {
            return Err(PromotionFormError::NoTargets);
        }
        if self.starts_at > self.ends_at {
            return Err(PromotionFormError::InvertedWindow);
        }

        Ok(NewPromotion {
            seller_id,
            name,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            apply_to_all: self.apply_to_all,
            product_ids: if self.apply_to_all {
                Vec::new()
            } else {
                self.product_ids
            },
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        })
    }
}

/// Payload submitted when editing a promotion.
#[derive(Debug, Deserialize, Validate)]
pub struct EditPromotionForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<i64>,
    pub apply_to_all: Option<bool>,
    pub product_ids: Option<Vec<i32>>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub is_active: Option<bool>,
}

impl EditPromotionForm {
    /// Validates the patch against the stored promotion and converts it into
    /// a domain [`UpdatePromotion`]. The current values fill any gaps so
    /// cross-field rules hold for the final state.
    pub fn into_update_promotion(
        self,
        current: &crate::domain::promotion::Promotion,
    ) -> PromotionFormResult<UpdatePromotion> {
        self.validate()?;

        let mut updates = UpdatePromotion::new();

        if let Some(name) = self.name {
            let sanitized = sanitize_inline_text(&name);
            if sanitized.is_empty() {
                return Err(PromotionFormError::EmptyName);
            }
            updates.name = Some(sanitized);
        }

        let discount_type = self.discount_type.unwrap_or(current.discount_type);
        let discount_value = self.discount_value.unwrap_or(current.discount_value);
        check_discount(discount_type, discount_value)?;
        updates.discount_type = self.discount_type;
        updates.discount_value = self.discount_value;

        let apply_to_all = self.apply_to_all.unwrap_or(current.apply_to_all);
        let product_ids = self
            .product_ids
            .clone()
            .unwrap_or_else(|| current.product_ids.clone());
        if !apply_to_all && product_ids.is_empty() {
            return Err(PromotionFormError::NoTargets);
        }
        updates.apply_to_all = self.apply_to_all;
        updates.product_ids = if apply_to_all {
            self.apply_to_all.map(|_| Vec::new())
        } else {
            self.product_ids
        };

        let starts_at = self.starts_at.unwrap_or(current.starts_at);
        let ends_at = self.ends_at.unwrap_or(current.ends_at);
        if starts_at > ends_at {
            return Err(PromotionFormError::InvertedWindow);
        }
        updates.starts_at = self.starts_at;
        updates.ends_at = self.ends_at;

        updates.is_active = self.is_active;

        Ok(updates)
    }
}

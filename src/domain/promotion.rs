use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// How a promotion's `discount_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is a percentage between 1 and 100.
    Percentage,
    /// `discount_value` is an amount in paise subtracted from the unit price.
    Absolute,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Absolute => "absolute",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "percentage" => Some(DiscountType::Percentage),
            "absolute" => Some(DiscountType::Absolute),
            _ => None,
        }
    }
}

/// Domain representation of a seller-scoped discount descriptor.
///
/// Validity is evaluated at read time against the promotion's window; nothing
/// activates or deactivates promotions in the background.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    /// Unique identifier of the promotion.
    pub id: i32,
    /// Owning seller identifier.
    pub seller_id: i32,
    /// Display name shown in the seller dashboard.
    pub name: String,
    pub discount_type: DiscountType,
    /// Percentage (1–100) or amount in paise, depending on `discount_type`.
    pub discount_value: i64,
    /// When set, the promotion covers the whole catalog.
    pub apply_to_all: bool,
    /// Explicit product set, only consulted when `apply_to_all` is false.
    pub product_ids: Vec<i32>,
    /// Start of the validity window (inclusive).
    pub starts_at: NaiveDateTime,
    /// End of the validity window (inclusive).
    pub ends_at: NaiveDateTime,
    /// Seller toggle; an inactive promotion never applies.
    pub is_active: bool,
    /// Timestamp for when the promotion record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the promotion record.
    pub updated_at: NaiveDateTime,
}

impl Promotion {
    /// Whether the promotion is live at `now`: toggled on and inside its
    /// window. An `is_active` flag alone is not enough.
    pub fn is_current(&self, now: NaiveDateTime) -> bool {
        self.is_active && self.starts_at <= now && now <= self.ends_at
    }

    /// Whether the promotion covers `product_id`.
    pub fn applies_to(&self, product_id: i32) -> bool {
        self.apply_to_all || self.product_ids.contains(&product_id)
    }
}

/// Payload required to insert a new promotion for a seller.
#[derive(Debug, Clone)]
pub struct NewPromotion {
    pub seller_id: i32,
    pub name: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub apply_to_all: bool,
    /// Product ids attached when `apply_to_all` is false.
    pub product_ids: Vec<i32>,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

/// Patch data applied when updating an existing promotion.
#[derive(Debug, Clone, Default)]
pub struct UpdatePromotion {
    pub name: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<i64>,
    pub apply_to_all: Option<bool>,
    /// When present, the attached product set is replaced.
    pub product_ids: Option<Vec<i32>>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub is_active: Option<bool>,
}

impl UpdatePromotion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Query definition used to list promotions for a seller.
///
/// Results are always ordered by `created_at` ascending; promotion resolution
/// depends on that order (oldest matching promotion wins).
#[derive(Debug, Clone)]
pub struct PromotionListQuery {
    /// Owning seller identifier.
    pub seller_id: i32,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl PromotionListQuery {
    /// Construct a query that targets all promotions belonging to `seller_id`.
    pub fn new(seller_id: i32) -> Self {
        Self {
            seller_id,
            pagination: None,
        }
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Quantity-based unit price entry attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceTier {
    /// Unique identifier of the tier.
    pub id: i32,
    /// Owning product identifier.
    pub product_id: i32,
    /// Lowest quantity (inclusive) the tier applies to.
    pub min_quantity: i32,
    /// Highest quantity (inclusive) the tier applies to, open-ended if absent.
    pub max_quantity: Option<i32>,
    /// Unit price in paise while the tier applies.
    pub price_cents: i64,
    /// Timestamp for when the tier record was created.
    pub created_at: NaiveDateTime,
}

/// Payload for a tier inserted together with its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPriceTier {
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
    pub price_cents: i64,
}

/// Domain representation of a seller-owned product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning seller identifier.
    pub seller_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// URL slug, unique within the seller's catalog.
    pub slug: String,
    /// Optional stock keeping unit identifier.
    pub sku: Option<String>,
    /// Optional longer description shown to buyers.
    pub description: Option<String>,
    /// Optional brand name, surfaced in the merchant feed.
    pub brand: Option<String>,
    /// Optional category path, surfaced in the merchant feed.
    pub product_type: Option<String>,
    /// Optional URL of the primary product image.
    pub image_url: Option<String>,
    /// Optional URL of a product video.
    pub video_url: Option<String>,
    /// Unit price in paise when no tier applies.
    pub base_price_cents: i64,
    /// ISO 4217 currency code, `INR` for every storefront today.
    pub currency: String,
    /// Units currently in stock.
    pub stock: i32,
    /// Smallest quantity a buyer may order.
    pub minimum_order_quantity: i32,
    /// Flag indicating whether the product has been archived.
    pub is_archived: bool,
    /// Seller-defined volume price schedule, may be empty.
    pub price_tiers: Vec<PriceTier>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Merchant feed availability enum for the current stock level.
    pub fn availability(&self) -> &'static str {
        match self.stock {
            0 => "out of stock",
            1..=5 => "limited availability",
            _ => "in stock",
        }
    }
}

/// Payload required to insert a new product for a seller.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Owning seller identifier.
    pub seller_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Slug candidate before per-seller uniquing.
    pub slug: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub product_type: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    /// Unit price in paise when no tier applies.
    pub base_price_cents: i64,
    pub currency: String,
    pub stock: i32,
    pub minimum_order_quantity: i32,
    /// Tiers inserted together with the product.
    pub price_tiers: Vec<NewPriceTier>,
}

impl NewProduct {
    /// Build a new product payload with the supplied essentials.
    pub fn new(seller_id: i32, name: impl Into<String>, base_price_cents: i64) -> Self {
        let name = name.into();
        let slug = crate::normalize::slugify(&name);
        Self {
            seller_id,
            name,
            slug,
            sku: None,
            description: None,
            brand: None,
            product_type: None,
            image_url: None,
            video_url: None,
            base_price_cents,
            currency: "INR".to_string(),
            stock: 0,
            minimum_order_quantity: 1,
            price_tiers: Vec::new(),
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    pub fn with_stock(mut self, stock: i32) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_minimum_order_quantity(mut self, quantity: i32) -> Self {
        self.minimum_order_quantity = quantity.max(1);
        self
    }

    pub fn with_price_tiers(mut self, tiers: Vec<NewPriceTier>) -> Self {
        self.price_tiers = tiers;
        self
    }
}

/// Patch data applied when updating an existing product.
///
/// `None` leaves a field untouched; `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub sku: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub brand: Option<Option<String>>,
    pub product_type: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub video_url: Option<Option<String>>,
    pub base_price_cents: Option<i64>,
    pub stock: Option<i32>,
    pub minimum_order_quantity: Option<i32>,
    pub is_archived: Option<bool>,
    /// When present, the whole tier set is replaced with these tiers.
    pub price_tiers: Option<Vec<NewPriceTier>>,
}

impl UpdateProduct {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sku(mut self, sku: Option<impl Into<String>>) -> Self {
        self.sku = Some(sku.map(|value| value.into()));
        self
    }

    pub fn description(mut self, description: Option<impl Into<String>>) -> Self {
        self.description = Some(description.map(|value| value.into()));
        self
    }

    pub fn brand(mut self, brand: Option<impl Into<String>>) -> Self {
        self.brand = Some(brand.map(|value| value.into()));
        self
    }

    pub fn product_type(mut self, product_type: Option<impl Into<String>>) -> Self {
        self.product_type = Some(product_type.map(|value| value.into()));
        self
    }

    pub fn image_url(mut self, url: Option<impl Into<String>>) -> Self {
        self.image_url = Some(url.map(|value| value.into()));
        self
    }

    pub fn video_url(mut self, url: Option<impl Into<String>>) -> Self {
        self.video_url = Some(url.map(|value| value.into()));
        self
    }

    pub fn base_price_cents(mut self, price_cents: i64) -> Self {
        self.base_price_cents = Some(price_cents);
        self
    }

    pub fn stock(mut self, stock: i32) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn minimum_order_quantity(mut self, quantity: i32) -> Self {
        self.minimum_order_quantity = Some(quantity.max(1));
        self
    }

    pub fn archived(mut self, is_archived: bool) -> Self {
        self.is_archived = Some(is_archived);
        self
    }

    pub fn price_tiers(mut self, tiers: Vec<NewPriceTier>) -> Self {
        self.price_tiers = Some(tiers);
        self
    }
}

/// Query definition used to list products for a seller.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    /// Owning seller identifier.
    pub seller_id: i32,
    /// Optional name or description search term.
    pub search: Option<String>,
    /// Whether archived products should be included in the results.
    pub include_archived: bool,
    /// Only return products with stock on hand (used by the merchant feed).
    pub in_stock_only: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets all live products of `seller_id`.
    pub fn new(seller_id: i32) -> Self {
        Self {
            seller_id,
            search: None,
            include_archived: false,
            in_stock_only: false,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Include archived products in the results.
    pub fn include_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    /// Restrict the results to products with positive stock.
    pub fn in_stock_only(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }
}

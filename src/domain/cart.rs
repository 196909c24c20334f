use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A buyer's cart against one seller, keyed by the buyer's phone number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Unique identifier of the cart.
    pub id: i32,
    /// Seller the cart belongs to.
    pub seller_id: i32,
    /// Normalized buyer phone number in `+91…` form.
    pub buyer_phone: String,
    /// Items currently in the cart.
    pub items: Vec<CartItem>,
    /// Timestamp for when the cart record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last mutation of the cart.
    pub updated_at: NaiveDateTime,
}

/// One product line inside a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique identifier of the line.
    pub id: i32,
    /// Owning cart identifier.
    pub cart_id: i32,
    /// Product the line refers to.
    pub product_id: i32,
    /// Requested quantity.
    pub quantity: i32,
    /// Tiered unit price in paise captured at the moment of the last
    /// add/update. A point-in-time cache: it may drift from the live
    /// promotional price and is re-resolved at view and checkout time.
    pub price_at_add_cents: i64,
    /// Timestamp for when the line was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the line.
    pub updated_at: NaiveDateTime,
}

/// Payload used to upsert a cart line.
#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub product_id: i32,
    pub quantity: i32,
    /// Unit price in paise resolved by the caller at mutation time.
    pub price_at_add_cents: i64,
}

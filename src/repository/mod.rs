use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::analytics::{AnalyticsQuery, EventCount, NewAnalyticsEvent};
use crate::domain::broadcast::{
    Broadcast, BroadcastListQuery, BroadcastOutcome, BroadcastStatus, NewBroadcast,
};
use crate::domain::cart::{Cart, NewCartItem};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::promotion::{NewPromotion, Promotion, PromotionListQuery, UpdatePromotion};
use crate::domain::seller::{NewSeller, Seller, SellerFlags, SellerListQuery, UpdateSeller};
use crate::domain::subscriber::{NewSubscriber, Subscriber, SubscriberListQuery};

pub mod analytics;
pub mod broadcast;
pub mod cart;
pub mod errors;
pub mod product;
pub mod promotion;
pub mod seller;
pub mod subscriber;

#[cfg(test)]
pub mod mock;

pub use errors::{RepositoryError, RepositoryResult};

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over seller accounts.
pub trait SellerReader {
    fn get_seller_by_id(&self, id: i32) -> RepositoryResult<Option<Seller>>;
    fn get_seller_by_email(&self, email: &str) -> RepositoryResult<Option<Seller>>;
    fn get_seller_by_slug(&self, slug: &str) -> RepositoryResult<Option<Seller>>;
    fn list_sellers(&self, query: SellerListQuery) -> RepositoryResult<(usize, Vec<Seller>)>;
}

/// Write operations over seller accounts.
pub trait SellerWriter {
    fn create_seller(&self, new_seller: &NewSeller) -> RepositoryResult<Seller>;
    fn update_seller(&self, seller_id: i32, updates: &UpdateSeller) -> RepositoryResult<Seller>;
    fn set_seller_flags(&self, seller_id: i32, flags: &SellerFlags) -> RepositoryResult<Seller>;
    fn set_trial_end(&self, seller_id: i32, ends_at: NaiveDateTime) -> RepositoryResult<Seller>;
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32, seller_id: i32) -> RepositoryResult<Option<Product>>;
    fn get_product_by_slug(&self, seller_id: i32, slug: &str)
    -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(
        &self,
        product_id: i32,
        seller_id: i32,
        updates: &UpdateProduct,
    ) -> RepositoryResult<Product>;
    fn delete_product(&self, product_id: i32, seller_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over promotion records.
pub trait PromotionReader {
    fn get_promotion_by_id(&self, id: i32, seller_id: i32)
    -> RepositoryResult<Option<Promotion>>;
    /// Promotions ordered by `created_at` ascending; price resolution relies
    /// on this order.
    fn list_promotions(
        &self,
        query: PromotionListQuery,
    ) -> RepositoryResult<(usize, Vec<Promotion>)>;
}

/// Write operations over promotion records.
pub trait PromotionWriter {
    fn create_promotion(&self, new_promotion: &NewPromotion) -> RepositoryResult<Promotion>;
    fn update_promotion(
        &self,
        promotion_id: i32,
        seller_id: i32,
        updates: &UpdatePromotion,
    ) -> RepositoryResult<Promotion>;
    fn delete_promotion(&self, promotion_id: i32, seller_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over buyer carts.
pub trait CartReader {
    fn get_cart(&self, seller_id: i32, buyer_phone: &str) -> RepositoryResult<Option<Cart>>;
}

/// Write operations over buyer carts.
pub trait CartWriter {
    /// Insert or update one cart line, creating the cart row when absent.
    fn upsert_cart_item(
        &self,
        seller_id: i32,
        buyer_phone: &str,
        item: &NewCartItem,
    ) -> RepositoryResult<Cart>;
    fn remove_cart_item(
        &self,
        seller_id: i32,
        buyer_phone: &str,
        product_id: i32,
    ) -> RepositoryResult<Cart>;
    fn clear_cart(&self, seller_id: i32, buyer_phone: &str) -> RepositoryResult<()>;
}

/// Read-only operations over broadcast subscribers.
pub trait SubscriberReader {
    fn list_subscribers(
        &self,
        query: SubscriberListQuery,
    ) -> RepositoryResult<(usize, Vec<Subscriber>)>;
}

/// Write operations over broadcast subscribers.
pub trait SubscriberWriter {
    /// Insert a subscriber, or re-opt-in an existing phone number.
    fn upsert_subscriber(&self, new_subscriber: &NewSubscriber) -> RepositoryResult<Subscriber>;
    fn opt_out_subscriber(&self, seller_id: i32, phone: &str) -> RepositoryResult<()>;
}

/// Read-only operations over broadcast records.
pub trait BroadcastReader {
    fn get_broadcast_by_id(&self, id: i32, seller_id: i32)
    -> RepositoryResult<Option<Broadcast>>;
    fn list_broadcasts(
        &self,
        query: BroadcastListQuery,
    ) -> RepositoryResult<(usize, Vec<Broadcast>)>;
}

/// Write operations over broadcast records.
pub trait BroadcastWriter {
    fn create_broadcast(&self, new_broadcast: &NewBroadcast) -> RepositoryResult<Broadcast>;
    fn set_broadcast_status(
        &self,
        broadcast_id: i32,
        seller_id: i32,
        status: BroadcastStatus,
    ) -> RepositoryResult<Broadcast>;
    /// Mark a broadcast as scheduled for `send_at`.
    fn schedule_broadcast(
        &self,
        broadcast_id: i32,
        seller_id: i32,
        send_at: NaiveDateTime,
    ) -> RepositoryResult<Broadcast>;
    fn record_broadcast_outcome(
        &self,
        broadcast_id: i32,
        seller_id: i32,
        outcome: &BroadcastOutcome,
    ) -> RepositoryResult<Broadcast>;
}

/// Write operations over analytics events.
pub trait AnalyticsWriter {
    fn record_event(&self, event: &NewAnalyticsEvent) -> RepositoryResult<()>;
}

/// Read-only operations over analytics events.
pub trait AnalyticsReader {
    fn summarize_events(
        &self,
        seller_id: i32,
        query: &AnalyticsQuery,
    ) -> RepositoryResult<Vec<EventCount>>;
}

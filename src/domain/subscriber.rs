use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// A buyer who opted in to a seller's WhatsApp broadcasts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    /// Unique identifier of the subscriber.
    pub id: i32,
    /// Seller the subscription belongs to.
    pub seller_id: i32,
    /// Normalized phone number in `+91…` form, unique per seller.
    pub phone: String,
    /// Optional display name given at opt-in.
    pub name: Option<String>,
    /// Cleared on opt-out; the row is kept so a re-opt-in preserves history.
    pub is_opted_in: bool,
    /// Timestamp for when the subscriber record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the subscriber record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new subscriber.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub seller_id: i32,
    /// Normalized phone number.
    pub phone: String,
    pub name: Option<String>,
}

/// Query definition used to list subscribers for a seller.
#[derive(Debug, Clone)]
pub struct SubscriberListQuery {
    /// Owning seller identifier.
    pub seller_id: i32,
    /// Only return subscribers that are currently opted in.
    pub opted_in_only: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl SubscriberListQuery {
    /// Construct a query that targets all subscribers of `seller_id`.
    pub fn new(seller_id: i32) -> Self {
        Self {
            seller_id,
            opted_in_only: false,
            pagination: None,
        }
    }

    /// Restrict the results to opted-in subscribers.
    pub fn opted_in_only(mut self) -> Self {
        self.opted_in_only = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination::new(page, per_page));
        self
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Kind of storefront interaction recorded for a seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A buyer opened the microsite.
    StoreView,
    /// A buyer opened a product page.
    ProductView,
    /// A buyer followed a WhatsApp deep link.
    WhatsappClick,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::StoreView => "store_view",
            EventType::ProductView => "product_view",
            EventType::WhatsappClick => "whatsapp_click",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "store_view" => Some(EventType::StoreView),
            "product_view" => Some(EventType::ProductView),
            "whatsapp_click" => Some(EventType::WhatsappClick),
            _ => None,
        }
    }
}

/// One recorded storefront interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Unique identifier of the event.
    pub id: i32,
    /// Seller whose storefront was interacted with.
    pub seller_id: i32,
    /// Product involved, if the event targets one.
    pub product_id: Option<i32>,
    pub event_type: EventType,
    /// Timestamp for when the event was recorded.
    pub created_at: NaiveDateTime,
}

/// Payload required to record a new event.
#[derive(Debug, Clone)]
pub struct NewAnalyticsEvent {
    pub seller_id: i32,
    pub product_id: Option<i32>,
    pub event_type: EventType,
}

/// Aggregated event count returned by the summary query.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EventCount {
    pub event_type: EventType,
    pub count: i64,
}

/// Time filter applied to the analytics summary.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsQuery {
    /// Only count events at or after this instant.
    pub since: Option<NaiveDateTime>,
    /// Only count events before this instant.
    pub until: Option<NaiveDateTime>,
}

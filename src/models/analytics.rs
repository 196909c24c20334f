use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::analytics::{
    AnalyticsEvent as DomainAnalyticsEvent, EventType, NewAnalyticsEvent as DomainNewAnalyticsEvent,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::analytics_events)]
pub struct AnalyticsEvent {
    pub id: i32,
    pub seller_id: i32,
    pub product_id: Option<i32>,
    pub event_type: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::analytics_events)]
pub struct NewAnalyticsEvent<'a> {
    pub seller_id: i32,
    pub product_id: Option<i32>,
    pub event_type: &'a str,
}

impl From<AnalyticsEvent> for DomainAnalyticsEvent {
    fn from(value: AnalyticsEvent) -> Self {
        Self {
            id: value.id,
            seller_id: value.seller_id,
            product_id: value.product_id,
            // The column is only written through `EventType::as_str`.
            event_type: EventType::parse(&value.event_type).unwrap_or(EventType::StoreView),
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewAnalyticsEvent> for NewAnalyticsEvent<'a> {
    fn from(value: &'a DomainNewAnalyticsEvent) -> Self {
        Self {
            seller_id: value.seller_id,
            product_id: value.product_id,
            event_type: value.event_type.as_str(),
        }
    }
}

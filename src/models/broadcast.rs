use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::broadcast::{
    Broadcast as DomainBroadcast, BroadcastOutcome, BroadcastStatus,
    NewBroadcast as DomainNewBroadcast,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::broadcasts)]
pub struct Broadcast {
    pub id: i32,
    pub seller_id: i32,
    pub message: String,
    pub status: String,
    pub sent_count: i32,
    pub failed_count: i32,
    pub scheduled_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::broadcasts)]
pub struct NewBroadcast<'a> {
    pub seller_id: i32,
    pub message: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::broadcasts)]
pub struct UpdateBroadcastOutcome<'a> {
    pub status: &'a str,
    pub sent_count: i32,
    pub failed_count: i32,
    pub updated_at: NaiveDateTime,
}

impl From<Broadcast> for DomainBroadcast {
    fn from(value: Broadcast) -> Self {
        Self {
            id: value.id,
            seller_id: value.seller_id,
            message: value.message,
            // The column is only written through `BroadcastStatus::as_str`.
            status: BroadcastStatus::parse(&value.status).unwrap_or(BroadcastStatus::Draft),
            sent_count: value.sent_count,
            failed_count: value.failed_count,
            scheduled_at: value.scheduled_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewBroadcast> for NewBroadcast<'a> {
    fn from(value: &'a DomainNewBroadcast) -> Self {
        Self {
            seller_id: value.seller_id,
            message: value.message.as_str(),
        }
    }
}

impl From<&BroadcastOutcome> for UpdateBroadcastOutcome<'_> {
    fn from(value: &BroadcastOutcome) -> Self {
        Self {
            status: value.status.as_str(),
            sent_count: value.sent_count,
            failed_count: value.failed_count,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Linear status flag of a broadcast. Set by sequential code during the send
/// loop; there is no managed transition system, no retries, no rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastStatus {
    Draft,
    /// Draft with a `scheduled_at` timestamp; the seller still triggers the
    /// actual send.
    Scheduled,
    Sending,
    Sent,
    Failed,
}

impl BroadcastStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastStatus::Draft => "draft",
            BroadcastStatus::Scheduled => "scheduled",
            BroadcastStatus::Sending => "sending",
            BroadcastStatus::Sent => "sent",
            BroadcastStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(BroadcastStatus::Draft),
            "scheduled" => Some(BroadcastStatus::Scheduled),
            "sending" => Some(BroadcastStatus::Sending),
            "sent" => Some(BroadcastStatus::Sent),
            "failed" => Some(BroadcastStatus::Failed),
            _ => None,
        }
    }

    /// Whether a send run may start from this status.
    pub fn is_sendable(&self) -> bool {
        matches!(self, BroadcastStatus::Draft | BroadcastStatus::Scheduled)
    }
}

/// A one-to-many WhatsApp message drafted by a seller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Broadcast {
    /// Unique identifier of the broadcast.
    pub id: i32,
    /// Owning seller identifier.
    pub seller_id: i32,
    /// Message body delivered to each subscriber.
    pub message: String,
    pub status: BroadcastStatus,
    /// Subscribers successfully handled by the last send run.
    pub sent_count: i32,
    /// Subscribers skipped by the last send run (counted, never retried).
    pub failed_count: i32,
    /// Intended send time, set when the seller schedules the draft.
    pub scheduled_at: Option<NaiveDateTime>,
    /// Timestamp for when the broadcast record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the broadcast record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new broadcast draft.
#[derive(Debug, Clone)]
pub struct NewBroadcast {
    pub seller_id: i32,
    pub message: String,
}

/// Counters written back after a send run together with the final status.
#[derive(Debug, Clone, Copy)]
pub struct BroadcastOutcome {
    pub status: BroadcastStatus,
    pub sent_count: i32,
    pub failed_count: i32,
}

/// Query definition used to list broadcasts for a seller.
#[derive(Debug, Clone)]
pub struct BroadcastListQuery {
    /// Owning seller identifier.
    pub seller_id: i32,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl BroadcastListQuery {
    /// Construct a query that targets all broadcasts belonging to `seller_id`.
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

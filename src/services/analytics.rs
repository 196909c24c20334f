use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::domain::analytics::{AnalyticsQuery, EventType, NewAnalyticsEvent};
use crate::repository::{AnalyticsReader, AnalyticsWriter, SellerReader};
use crate::services::auth::require_active_seller;
use crate::services::storefront::open_storefront;
use crate::services::{ServiceError, ServiceResult};

/// Payload submitted by storefront pages to record an interaction.
#[derive(Debug, Deserialize)]
pub struct RecordEventForm {
    pub event_type: EventType,
    pub product_id: Option<i32>,
}

/// Record a storefront interaction. Public endpoint, keyed by store slug.
pub fn record_event<R>(repo: &R, seller_slug: &str, form: RecordEventForm) -> ServiceResult<()>
where
    R: SellerReader + AnalyticsWriter + ?Sized,
{
    let seller = open_storefront(repo, seller_slug)?;

    repo.record_event(&NewAnalyticsEvent {
        seller_id: seller.id,
        product_id: form.product_id,
        event_type: form.event_type,
    })?;

    Ok(())
}

/// Time filter accepted by the summary endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub since: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
}

/// Event totals for the seller dashboard, zero-filled per event type.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub store_views: i64,
    pub product_views: i64,
    pub whatsapp_clicks: i64,
}

/// Summarize the seller's storefront interactions.
pub fn summarize<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: SummaryQuery,
) -> ServiceResult<AnalyticsSummary>
where
    R: SellerReader + AnalyticsReader + ?Sized,
{
    let seller = require_active_seller(repo, user)?;

    if let (Some(since), Some(until)) = (query.since, query.until)
        && since > until
    {
        return Err(ServiceError::Form(
            "since must not be after until".to_string(),
        ));
    }

    let counts = repo.summarize_events(
        seller.id,
        &AnalyticsQuery {
            since: query.since,
            until: query.until,
        },
    )?;

    let mut summary = AnalyticsSummary::default();
    for count in counts {
        match count.event_type {
            EventType::StoreView => summary.store_views = count.count,
            EventType::ProductView => summary.product_views = count.count,
            EventType::WhatsappClick => summary.whatsapp_clicks = count.count,
        }
    }

    Ok(summary)
}

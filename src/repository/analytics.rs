use diesel::prelude::*;

use crate::domain::analytics::{
    AnalyticsQuery, EventCount, EventType, NewAnalyticsEvent as DomainNewAnalyticsEvent,
};
use crate::models::analytics::NewAnalyticsEvent as DbNewAnalyticsEvent;
use crate::repository::errors::RepositoryResult;
use crate::repository::{AnalyticsReader, AnalyticsWriter, DieselRepository};

impl AnalyticsWriter for DieselRepository {
    fn record_event(&self, event: &DomainNewAnalyticsEvent) -> RepositoryResult<()> {
        use crate::schema::analytics_events;

        let mut conn = self.conn()?;

        diesel::insert_into(analytics_events::table)
            .values(&DbNewAnalyticsEvent::from(event))
            .execute(&mut conn)?;

        Ok(())
    }
}

impl AnalyticsReader for DieselRepository {
    fn summarize_events(
        &self,
        seller_id: i32,
        query: &AnalyticsQuery,
    ) -> RepositoryResult<Vec<EventCount>> {
        use crate::schema::analytics_events;

        let mut conn = self.conn()?;

        let mut counts_query = analytics_events::table
            .filter(analytics_events::seller_id.eq(seller_id))
            .group_by(analytics_events::event_type)
            .select((analytics_events::event_type, diesel::dsl::count_star()))
            .order(analytics_events::event_type.asc())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(since) = query.since {
            counts_query = counts_query.filter(analytics_events::created_at.ge(since));
        }
        if let Some(until) = query.until {
            counts_query = counts_query.filter(analytics_events::created_at.lt(until));
        }

        let rows: Vec<(String, i64)> = counts_query.load(&mut conn)?;

        Ok(rows
            .into_iter()
            .filter_map(|(event_type, count)| {
                EventType::parse(&event_type).map(|event_type| EventCount { event_type, count })
            })
            .collect())
    }
}

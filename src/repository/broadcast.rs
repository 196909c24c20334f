use diesel::prelude::*;

use crate::domain::broadcast::{
    Broadcast as DomainBroadcast, BroadcastListQuery, BroadcastOutcome, BroadcastStatus,
    NewBroadcast as DomainNewBroadcast,
};
use crate::models::broadcast::{
    Broadcast as DbBroadcast, NewBroadcast as DbNewBroadcast, UpdateBroadcastOutcome,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{BroadcastReader, BroadcastWriter, DieselRepository};

impl BroadcastReader for DieselRepository {
    fn get_broadcast_by_id(
        &self,
        id: i32,
        seller_id: i32,
    ) -> RepositoryResult<Option<DomainBroadcast>> {
        use crate::schema::broadcasts;

        let mut conn = self.conn()?;
        let broadcast = broadcasts::table
            .filter(broadcasts::id.eq(id))
            .filter(broadcasts::seller_id.eq(seller_id))
            .first::<DbBroadcast>(&mut conn)
            .optional()?;

        Ok(broadcast.map(Into::into))
    }

    fn list_broadcasts(
        &self,
        query: BroadcastListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainBroadcast>)> {
        use crate::schema::broadcasts;

        let mut conn = self.conn()?;

        let total = broadcasts::table
            .filter(broadcasts::seller_id.eq(query.seller_id))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items_query = broadcasts::table
            .filter(broadcasts::seller_id.eq(query.seller_id))
            .order(broadcasts::created_at.desc())
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &query.pagination {
            items_query = items_query
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let db_broadcasts = items_query.load::<DbBroadcast>(&mut conn)?;

        Ok((total, db_broadcasts.into_iter().map(Into::into).collect()))
    }
}

impl BroadcastWriter for DieselRepository {
    fn create_broadcast(
        &self,
        new_broadcast: &DomainNewBroadcast,
    ) -> RepositoryResult<DomainBroadcast> {
        use crate::schema::broadcasts;

        let mut conn = self.conn()?;

        let created = diesel::insert_into(broadcasts::table)
            .values(&DbNewBroadcast::from(new_broadcast))
            .get_result::<DbBroadcast>(&mut conn)?;

        Ok(created.into())
    }

    fn set_broadcast_status(
        &self,
        broadcast_id: i32,
        seller_id: i32,
        status: BroadcastStatus,
    ) -> RepositoryResult<DomainBroadcast> {
        use crate::schema::broadcasts;

        let mut conn = self.conn()?;

        let target = broadcasts::table
            .filter(broadcasts::id.eq(broadcast_id))
            .filter(broadcasts::seller_id.eq(seller_id));

        let updated = diesel::update(target)
            .set((
                broadcasts::status.eq(status.as_str()),
                broadcasts::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<DbBroadcast>(&mut conn)?;

        Ok(updated.into())
    }

    fn schedule_broadcast(
        &self,
        broadcast_id: i32,
        seller_id: i32,
        send_at: chrono::NaiveDateTime,
    ) -> RepositoryResult<DomainBroadcast> {
        use crate::schema::broadcasts;

        let mut conn = self.conn()?;

        let target = broadcasts::table
            .filter(broadcasts::id.eq(broadcast_id))
            .filter(broadcasts::seller_id.eq(seller_id));

        let updated = diesel::update(target)
            .set((
                broadcasts::status.eq(BroadcastStatus::Scheduled.as_str()),
                broadcasts::scheduled_at.eq(Some(send_at)),
                broadcasts::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<DbBroadcast>(&mut conn)?;

        Ok(updated.into())
    }

    fn record_broadcast_outcome(
        &self,
        broadcast_id: i32,
        seller_id: i32,
        outcome: &BroadcastOutcome,
    ) -> RepositoryResult<DomainBroadcast> {
        use crate::schema::broadcasts;

        let mut conn = self.conn()?;
        let changes = UpdateBroadcastOutcome::from(outcome);

        let target = broadcasts::table
            .filter(broadcasts::id.eq(broadcast_id))
            .filter(broadcasts::seller_id.eq(seller_id));

        let updated = diesel::update(target)
            .set(&changes)
            .get_result::<DbBroadcast>(&mut conn)?;

        Ok(updated.into())
    }
}

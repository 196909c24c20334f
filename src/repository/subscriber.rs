use diesel::prelude::*;

use crate::domain::subscriber::{
    NewSubscriber as DomainNewSubscriber, Subscriber as DomainSubscriber, SubscriberListQuery,
};
use crate::models::subscriber::{NewSubscriber as DbNewSubscriber, Subscriber as DbSubscriber};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, SubscriberReader, SubscriberWriter};

impl SubscriberReader for DieselRepository {
    fn list_subscribers(
        &self,
        query: SubscriberListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainSubscriber>)> {
        use crate::schema::subscribers;

        let mut conn = self.conn()?;

        let mut count_query = subscribers::table
            .filter(subscribers::seller_id.eq(query.seller_id))
            .into_boxed::<diesel::sqlite::Sqlite>();
        let mut items_query = subscribers::table
            .filter(subscribers::seller_id.eq(query.seller_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if query.opted_in_only {
            count_query = count_query.filter(subscribers::is_opted_in.eq(true));
            items_query = items_query.filter(subscribers::is_opted_in.eq(true));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        items_query = items_query.order(subscribers::created_at.asc());

        if let Some(pagination) = &query.pagination {
            items_query = items_query
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let db_subscribers = items_query.load::<DbSubscriber>(&mut conn)?;

        Ok((total, db_subscribers.into_iter().map(Into::into).collect()))
    }
}

impl SubscriberWriter for DieselRepository {
    fn upsert_subscriber(
        &self,
        new_subscriber: &DomainNewSubscriber,
    ) -> RepositoryResult<DomainSubscriber> {
        use crate::schema::subscribers;

        let mut conn = self.conn()?;

        let existing = subscribers::table
            .filter(subscribers::seller_id.eq(new_subscriber.seller_id))
            .filter(subscribers::phone.eq(&new_subscriber.phone))
            .first::<DbSubscriber>(&mut conn)
            .optional()?;

        let row = match existing {
            Some(subscriber) => diesel::update(
                subscribers::table.filter(subscribers::id.eq(subscriber.id)),
            )
            .set((
                subscribers::is_opted_in.eq(true),
                subscribers::name.eq(new_subscriber.name.as_deref()),
                subscribers::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<DbSubscriber>(&mut conn)?,
            None => diesel::insert_into(subscribers::table)
                .values(&DbNewSubscriber::from(new_subscriber))
                .get_result::<DbSubscriber>(&mut conn)?,
        };

        Ok(row.into())
    }

    fn opt_out_subscriber(&self, seller_id: i32, phone: &str) -> RepositoryResult<()> {
        use crate::schema::subscribers;

        let mut conn = self.conn()?;

        let updated = diesel::update(
            subscribers::table
                .filter(subscribers::seller_id.eq(seller_id))
                .filter(subscribers::phone.eq(phone)),
        )
        .set((
            subscribers::is_opted_in.eq(false),
            subscribers::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

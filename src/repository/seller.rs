use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::seller::{
    NewSeller as DomainNewSeller, Seller as DomainSeller, SellerFlags as DomainSellerFlags,
    SellerListQuery, UpdateSeller as DomainUpdateSeller,
};
use crate::models::seller::{
    NewSeller as DbNewSeller, Seller as DbSeller, SellerFlags as DbSellerFlags,
    UpdateSeller as DbUpdateSeller,
};
use crate::normalize::unique_slug;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, SellerReader, SellerWriter};

impl SellerReader for DieselRepository {
    fn get_seller_by_id(&self, id: i32) -> RepositoryResult<Option<DomainSeller>> {
        use crate::schema::sellers;

        let mut conn = self.conn()?;
        let seller = sellers::table
            .filter(sellers::id.eq(id))
            .first::<DbSeller>(&mut conn)
            .optional()?;

        Ok(seller.map(Into::into))
    }

    fn get_seller_by_email(&self, email: &str) -> RepositoryResult<Option<DomainSeller>> {
        use crate::schema::sellers;

        let mut conn = self.conn()?;
        let seller = sellers::table
            .filter(sellers::email.eq(email))
            .first::<DbSeller>(&mut conn)
            .optional()?;

        Ok(seller.map(Into::into))
    }

    fn get_seller_by_slug(&self, slug: &str) -> RepositoryResult<Option<DomainSeller>> {
        use crate::schema::sellers;

        let mut conn = self.conn()?;
        let seller = sellers::table
            .filter(sellers::slug.eq(slug))
            .first::<DbSeller>(&mut conn)
            .optional()?;

        Ok(seller.map(Into::into))
    }

    fn list_sellers(&self, query: SellerListQuery) -> RepositoryResult<(usize, Vec<DomainSeller>)> {
        use crate::schema::sellers;

        let mut conn = self.conn()?;

        let mut count_query = sellers::table.into_boxed::<diesel::sqlite::Sqlite>();
        let mut items_query = sellers::table.into_boxed::<diesel::sqlite::Sqlite>();

        if !query.include_inactive {
            count_query = count_query.filter(sellers::is_active.eq(true));
            items_query = items_query.filter(sellers::is_active.eq(true));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{term}%");
            count_query = count_query.filter(
                sellers::name
                    .like(pattern.clone())
                    .or(sellers::store_name.like(pattern.clone()))
                    .or(sellers::email.like(pattern.clone())),
            );
            items_query = items_query.filter(
                sellers::name
                    .like(pattern.clone())
                    .or(sellers::store_name.like(pattern.clone()))
                    .or(sellers::email.like(pattern)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        items_query = items_query.order(sellers::created_at.desc());

        if let Some(pagination) = &query.pagination {
            items_query = items_query
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let db_sellers = items_query.load::<DbSeller>(&mut conn)?;

        Ok((total, db_sellers.into_iter().map(Into::into).collect()))
    }
}

impl SellerWriter for DieselRepository {
    fn create_seller(&self, new_seller: &DomainNewSeller) -> RepositoryResult<DomainSeller> {
        use crate::schema::sellers;

        let mut conn = self.conn()?;

        // Microsite aliases are unique platform-wide; suffix on collision.
        let taken: Vec<String> = sellers::table
            .filter(
                sellers::slug
                    .eq(&new_seller.slug)
                    .or(sellers::slug.like(format!("{}-%", new_seller.slug))),
            )
            .select(sellers::slug)
            .load::<String>(&mut conn)?;
        let slug = unique_slug(&new_seller.slug, &taken);

        let mut db_new = DbNewSeller::from(new_seller);
        db_new.slug = &slug;

        let created = diesel::insert_into(sellers::table)
            .values(&db_new)
            .get_result::<DbSeller>(&mut conn)?;

        Ok(created.into())
    }

    fn update_seller(
        &self,
        seller_id: i32,
        updates: &DomainUpdateSeller,
    ) -> RepositoryResult<DomainSeller> {
        use crate::schema::sellers;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateSeller::from(updates);

        let updated = diesel::update(sellers::table.filter(sellers::id.eq(seller_id)))
            .set(&db_updates)
            .get_result::<DbSeller>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_seller_flags(
        &self,
        seller_id: i32,
        flags: &DomainSellerFlags,
    ) -> RepositoryResult<DomainSeller> {
        use crate::schema::sellers;

        let mut conn = self.conn()?;
        let db_flags = DbSellerFlags::from(flags);

        let updated = diesel::update(sellers::table.filter(sellers::id.eq(seller_id)))
            .set(&db_flags)
            .get_result::<DbSeller>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_trial_end(
        &self,
        seller_id: i32,
        ends_at: NaiveDateTime,
    ) -> RepositoryResult<DomainSeller> {
        use crate::schema::sellers;

        let mut conn = self.conn()?;

        let updated = diesel::update(sellers::table.filter(sellers::id.eq(seller_id)))
            .set((
                sellers::trial_ends_at.eq(ends_at),
                sellers::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<DbSeller>(&mut conn)?;

        Ok(updated.into())
    }
}

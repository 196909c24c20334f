use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::promotion::{
    NewPromotion as DomainNewPromotion, Promotion as DomainPromotion, PromotionListQuery,
    UpdatePromotion as DomainUpdatePromotion,
};
use crate::models::promotion::{
    NewPromotion as DbNewPromotion, NewPromotionProduct, Promotion as DbPromotion,
    PromotionProduct as DbPromotionProduct, UpdatePromotion as DbUpdatePromotion,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, PromotionReader, PromotionWriter};

impl PromotionReader for DieselRepository {
    fn get_promotion_by_id(
        &self,
        id: i32,
        seller_id: i32,
    ) -> RepositoryResult<Option<DomainPromotion>> {
        use crate::schema::promotions;

        let mut conn = self.conn()?;
        let promotion = promotions::table
            .filter(promotions::id.eq(id))
            .filter(promotions::seller_id.eq(seller_id))
            .first::<DbPromotion>(&mut conn)
            .optional()?;

        match promotion {
            Some(db_promotion) => {
                let mut products = load_products_for_promotions(&mut conn, &[db_promotion.id])?;
                let product_ids = products.remove(&db_promotion.id).unwrap_or_default();
                Ok(Some(db_promotion.into_domain(product_ids)))
            }
            None => Ok(None),
        }
    }

    fn list_promotions(
        &self,
        query: PromotionListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainPromotion>)> {
        use crate::schema::promotions;

        let mut conn = self.conn()?;

        let total = promotions::table
            .filter(promotions::seller_id.eq(query.seller_id))
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items_query = promotions::table
            .filter(promotions::seller_id.eq(query.seller_id))
            // Insertion order decides which promotion wins during price
            // resolution, so the ordering here is load-bearing.
            .order((promotions::created_at.asc(), promotions::id.asc()))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(pagination) = &query.pagination {
            items_query = items_query
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let db_promotions = items_query.load::<DbPromotion>(&mut conn)?;

        if db_promotions.is_empty() {
            return Ok((total, Vec::new()));
        }

        let promotion_ids: Vec<i32> = db_promotions.iter().map(|promotion| promotion.id).collect();
        let mut product_map = load_products_for_promotions(&mut conn, &promotion_ids)?;

        let domain_promotions = db_promotions
            .into_iter()
            .map(|db_promotion| {
                let product_ids = product_map.remove(&db_promotion.id).unwrap_or_default();
                db_promotion.into_domain(product_ids)
            })
            .collect();

        Ok((total, domain_promotions))
    }
}

impl PromotionWriter for DieselRepository {
    fn create_promotion(
        &self,
        new_promotion: &DomainNewPromotion,
    ) -> RepositoryResult<DomainPromotion> {
        use crate::schema::{promotion_products, promotions};

        let mut conn = self.conn()?;

        let created = conn.transaction::<DbPromotion, diesel::result::Error, _>(|conn| {
            let db_new = DbNewPromotion::from(new_promotion);

            let created = diesel::insert_into(promotions::table)
                .values(&db_new)
                .get_result::<DbPromotion>(conn)?;

            if !new_promotion.apply_to_all && !new_promotion.product_ids.is_empty() {
                let rows: Vec<NewPromotionProduct> = new_promotion
                    .product_ids
                    .iter()
                    .map(|product_id| NewPromotionProduct {
                        promotion_id: created.id,
                        product_id: *product_id,
                    })
                    .collect();
                diesel::insert_into(promotion_products::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            Ok(created)
        })?;

        let mut products = load_products_for_promotions(&mut conn, &[created.id])?;
        let product_ids = products.remove(&created.id).unwrap_or_default();

        Ok(created.into_domain(product_ids))
    }

    fn update_promotion(
        &self,
        promotion_id: i32,
        seller_id: i32,
        updates: &DomainUpdatePromotion,
    ) -> RepositoryResult<DomainPromotion> {
        use crate::schema::{promotion_products, promotions};

        let mut conn = self.conn()?;
        let db_updates = DbUpdatePromotion::from(updates);

        let updated = conn.transaction::<DbPromotion, diesel::result::Error, _>(|conn| {
            let target = promotions::table
                .filter(promotions::id.eq(promotion_id))
                .filter(promotions::seller_id.eq(seller_id));

            let updated = diesel::update(target)
                .set(&db_updates)
                .get_result::<DbPromotion>(conn)?;

            if let Some(product_ids) = updates.product_ids.as_ref() {
                diesel::delete(
                    promotion_products::table
                        .filter(promotion_products::promotion_id.eq(promotion_id)),
                )
                .execute(conn)?;

                if !product_ids.is_empty() {
                    let rows: Vec<NewPromotionProduct> = product_ids
                        .iter()
                        .map(|product_id| NewPromotionProduct {
                            promotion_id,
                            product_id: *product_id,
                        })
                        .collect();
                    diesel::insert_into(promotion_products::table)
                        .values(&rows)
                        .execute(conn)?;
                }
            }

            Ok(updated)
        })?;

        let mut products = load_products_for_promotions(&mut conn, &[updated.id])?;
        let product_ids = products.remove(&updated.id).unwrap_or_default();

        Ok(updated.into_domain(product_ids))
    }

    fn delete_promotion(&self, promotion_id: i32, seller_id: i32) -> RepositoryResult<()> {
        use crate::schema::promotions;

        let mut conn = self.conn()?;

        let target = promotions::table
            .filter(promotions::id.eq(promotion_id))
            .filter(promotions::seller_id.eq(seller_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn load_products_for_promotions(
    conn: &mut SqliteConnection,
    promotion_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<i32>>> {
    use crate::schema::promotion_products;

    if promotion_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = promotion_products::table
        .filter(promotion_products::promotion_id.eq_any(promotion_ids))
        .order(promotion_products::id.asc())
        .load::<DbPromotionProduct>(conn)?;

    let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
    for row in rows {
        map.entry(row.promotion_id).or_default().push(row.product_id);
    }

    Ok(map)
}

use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::product::{
    NewProduct as DomainNewProduct, PriceTier as DomainPriceTier, Product as DomainProduct,
    ProductListQuery, UpdateProduct as DomainUpdateProduct,
};
use crate::models::product::{
    NewPriceTier as DbNewPriceTier, NewProduct as DbNewProduct, PriceTier as DbPriceTier,
    Product as DbProduct, UpdateProduct as DbUpdateProduct,
};
use crate::normalize::unique_slug;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProductReader, ProductWriter};

impl ProductReader for DieselRepository {
    fn get_product_by_id(
        &self,
        id: i32,
        seller_id: i32,
    ) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .filter(products::seller_id.eq(seller_id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        attach_tiers_to_one(&mut conn, product)
    }

    fn get_product_by_slug(
        &self,
        seller_id: i32,
        slug: &str,
    ) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::seller_id.eq(seller_id))
            .filter(products::slug.eq(slug))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        attach_tiers_to_one(&mut conn, product)
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut count_query = products::table
            .filter(products::seller_id.eq(query.seller_id))
            .into_boxed::<diesel::sqlite::Sqlite>();
        let mut items_query = products::table
            .filter(products::seller_id.eq(query.seller_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !query.include_archived {
            count_query = count_query.filter(products::is_archived.eq(false));
            items_query = items_query.filter(products::is_archived.eq(false));
        }

        if query.in_stock_only {
            count_query = count_query.filter(products::stock.gt(0));
            items_query = items_query.filter(products::stock.gt(0));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{term}%");
            count_query = count_query.filter(
                products::name
                    .like(pattern.clone())
                    .or(products::description.like(pattern.clone())),
            );
            items_query = items_query.filter(
                products::name
                    .like(pattern.clone())
                    .or(products::description.like(pattern)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        items_query = items_query.order((products::is_archived.asc(), products::created_at.desc()));

        if let Some(pagination) = &query.pagination {
            items_query = items_query
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let db_products = items_query.load::<DbProduct>(&mut conn)?;

        if db_products.is_empty() {
            return Ok((total, Vec::new()));
        }

        let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();
        let mut tier_map = load_tiers_for_products(&mut conn, &product_ids)?;

        let mut domain_products = Vec::with_capacity(db_products.len());
        for db_product in db_products {
            let mut domain: DomainProduct = db_product.into();
            domain.price_tiers = tier_map.remove(&domain.id).unwrap_or_default();
            domain_products.push(domain);
        }

        Ok((total, domain_products))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::{price_tiers, products};

        let mut conn = self.conn()?;

        let created = conn.transaction::<DbProduct, diesel::result::Error, _>(|conn| {
            // Slugs are unique per seller catalog; suffix on collision.
            let taken: Vec<String> = products::table
                .filter(products::seller_id.eq(new_product.seller_id))
                .filter(
                    products::slug
                        .eq(&new_product.slug)
                        .or(products::slug.like(format!("{}-%", new_product.slug))),
                )
                .select(products::slug)
                .load::<String>(conn)?;
            let slug = unique_slug(&new_product.slug, &taken);

            let mut db_new = DbNewProduct::from(new_product);
            db_new.slug = &slug;

            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .get_result::<DbProduct>(conn)?;

            if !new_product.price_tiers.is_empty() {
                let rows: Vec<DbNewPriceTier> = new_product
                    .price_tiers
                    .iter()
                    .map(|tier| DbNewPriceTier {
                        product_id: created.id,
                        min_quantity: tier.min_quantity,
                        max_quantity: tier.max_quantity,
                        price_cents: tier.price_cents,
                    })
                    .collect();
                diesel::insert_into(price_tiers::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            Ok(created)
        })?;

        let mut domain: DomainProduct = created.into();
        let mut tiers = load_tiers_for_products(&mut conn, &[domain.id])?;
        domain.price_tiers = tiers.remove(&domain.id).unwrap_or_default();

        Ok(domain)
    }

    fn update_product(
        &self,
        product_id: i32,
        seller_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::{price_tiers, products};

        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let updated = conn.transaction::<DbProduct, diesel::result::Error, _>(|conn| {
            let target = products::table
                .filter(products::id.eq(product_id))
                .filter(products::seller_id.eq(seller_id));

            let updated = diesel::update(target)
                .set(&db_updates)
                .get_result::<DbProduct>(conn)?;

            if let Some(tiers) = updates.price_tiers.as_ref() {
                diesel::delete(price_tiers::table.filter(price_tiers::product_id.eq(product_id)))
                    .execute(conn)?;

                if !tiers.is_empty() {
                    let rows: Vec<DbNewPriceTier> = tiers
                        .iter()
                        .map(|tier| DbNewPriceTier {
                            product_id,
                            min_quantity: tier.min_quantity,
                            max_quantity: tier.max_quantity,
                            price_cents: tier.price_cents,
                        })
                        .collect();
                    diesel::insert_into(price_tiers::table)
                        .values(&rows)
                        .execute(conn)?;
                }
            }

            Ok(updated)
        })?;

        let mut domain: DomainProduct = updated.into();
        let mut tiers = load_tiers_for_products(&mut conn, &[domain.id])?;
        domain.price_tiers = tiers.remove(&domain.id).unwrap_or_default();

        Ok(domain)
    }

    fn delete_product(&self, product_id: i32, seller_id: i32) -> RepositoryResult<()> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let target = products::table
            .filter(products::id.eq(product_id))
            .filter(products::seller_id.eq(seller_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

fn attach_tiers_to_one(
    conn: &mut SqliteConnection,
    product: Option<DbProduct>,
) -> RepositoryResult<Option<DomainProduct>> {
    match product {
        Some(db_product) => {
            let mut domain: DomainProduct = db_product.into();
            let mut tiers = load_tiers_for_products(conn, &[domain.id])?;
            domain.price_tiers = tiers.remove(&domain.id).unwrap_or_default();
            Ok(Some(domain))
        }
        None => Ok(None),
    }
}

fn load_tiers_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<DomainPriceTier>>> {
    use crate::schema::price_tiers;

    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = price_tiers::table
        .filter(price_tiers::product_id.eq_any(product_ids))
        .order(price_tiers::min_quantity.asc())
        .load::<DbPriceTier>(conn)?;

    let mut map: HashMap<i32, Vec<DomainPriceTier>> = HashMap::new();
    for row in rows {
        map.entry(row.product_id).or_default().push(row.into());
    }

    Ok(map)
}

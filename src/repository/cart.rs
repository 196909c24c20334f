use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::cart::{Cart as DomainCart, NewCartItem as DomainNewCartItem};
use crate::models::cart::{
    Cart as DbCart, CartItem as DbCartItem, NewCart as DbNewCart, NewCartItem as DbNewCartItem,
    UpdateCartItem as DbUpdateCartItem,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CartReader, CartWriter, DieselRepository};

impl CartReader for DieselRepository {
    fn get_cart(&self, seller_id: i32, buyer_phone: &str) -> RepositoryResult<Option<DomainCart>> {
        let mut conn = self.conn()?;
        load_cart(&mut conn, seller_id, buyer_phone)
    }
}

impl CartWriter for DieselRepository {
    fn upsert_cart_item(
        &self,
        seller_id: i32,
        buyer_phone: &str,
        item: &DomainNewCartItem,
    ) -> RepositoryResult<DomainCart> {
        use crate::schema::{cart_items, carts};

        let mut conn = self.conn()?;

        let cart = conn.transaction::<DbCart, diesel::result::Error, _>(|conn| {
            let existing = carts::table
                .filter(carts::seller_id.eq(seller_id))
                .filter(carts::buyer_phone.eq(buyer_phone))
                .first::<DbCart>(conn)
                .optional()?;

            let cart = match existing {
                Some(cart) => cart,
                None => diesel::insert_into(carts::table)
                    .values(&DbNewCart {
                        seller_id,
                        buyer_phone,
                    })
                    .get_result::<DbCart>(conn)?,
            };

            let line = cart_items::table
                .filter(cart_items::cart_id.eq(cart.id))
                .filter(cart_items::product_id.eq(item.product_id))
                .first::<DbCartItem>(conn)
                .optional()?;

            match line {
                Some(line) => {
                    diesel::update(cart_items::table.filter(cart_items::id.eq(line.id)))
                        .set(&DbUpdateCartItem {
                            quantity: item.quantity,
                            price_at_add_cents: item.price_at_add_cents,
                            updated_at: chrono::Utc::now().naive_utc(),
                        })
                        .execute(conn)?;
                }
                None => {
                    diesel::insert_into(cart_items::table)
                        .values(&DbNewCartItem {
                            cart_id: cart.id,
                            product_id: item.product_id,
                            quantity: item.quantity,
                            price_at_add_cents: item.price_at_add_cents,
                        })
                        .execute(conn)?;
                }
            }

            diesel::update(carts::table.filter(carts::id.eq(cart.id)))
                .set(carts::updated_at.eq(chrono::Utc::now().naive_utc()))
                .execute(conn)?;

            Ok(cart)
        })?;

        load_cart(&mut conn, cart.seller_id, buyer_phone)?.ok_or(RepositoryError::NotFound)
    }

    fn remove_cart_item(
        &self,
        seller_id: i32,
        buyer_phone: &str,
        product_id: i32,
    ) -> RepositoryResult<DomainCart> {
        use crate::schema::{cart_items, carts};

        let mut conn = self.conn()?;

        let cart = carts::table
            .filter(carts::seller_id.eq(seller_id))
            .filter(carts::buyer_phone.eq(buyer_phone))
            .first::<DbCart>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        let deleted = diesel::delete(
            cart_items::table
                .filter(cart_items::cart_id.eq(cart.id))
                .filter(cart_items::product_id.eq(product_id)),
        )
        .execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        load_cart(&mut conn, seller_id, buyer_phone)?.ok_or(RepositoryError::NotFound)
    }

    fn clear_cart(&self, seller_id: i32, buyer_phone: &str) -> RepositoryResult<()> {
        use crate::schema::{cart_items, carts};

        let mut conn = self.conn()?;

        let cart = carts::table
            .filter(carts::seller_id.eq(seller_id))
            .filter(carts::buyer_phone.eq(buyer_phone))
            .first::<DbCart>(&mut conn)
            .optional()?;

        if let Some(cart) = cart {
            diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(cart.id)))
                .execute(&mut conn)?;
            diesel::delete(carts::table.filter(carts::id.eq(cart.id))).execute(&mut conn)?;
        }

        Ok(())
    }
}

fn load_cart(
    conn: &mut SqliteConnection,
    seller_id: i32,
    buyer_phone: &str,
) -> RepositoryResult<Option<DomainCart>> {
    use crate::schema::{cart_items, carts};

    let cart = carts::table
        .filter(carts::seller_id.eq(seller_id))
        .filter(carts::buyer_phone.eq(buyer_phone))
        .first::<DbCart>(conn)
        .optional()?;

    match cart {
        Some(cart) => {
            let items = cart_items::table
                .filter(cart_items::cart_id.eq(cart.id))
                .order(cart_items::created_at.asc())
                .load::<DbCartItem>(conn)?;
            Ok(Some(cart.into_domain(items)))
        }
        None => Ok(None),
    }
}

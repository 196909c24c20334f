use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::cart::{Cart as DomainCart, CartItem as DomainCartItem};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::carts)]
pub struct Cart {
    pub id: i32,
    pub seller_id: i32,
    pub buyer_phone: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::cart_items)]
#[diesel(belongs_to(Cart, foreign_key = cart_id))]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price_at_add_cents: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::carts)]
pub struct NewCart<'a> {
    pub seller_id: i32,
    pub buyer_phone: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct NewCartItem {
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price_at_add_cents: i64,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::cart_items)]
pub struct UpdateCartItem {
    pub quantity: i32,
    pub price_at_add_cents: i64,
    pub updated_at: NaiveDateTime,
}

impl Cart {
    pub fn into_domain(self, items: Vec<CartItem>) -> DomainCart {
        DomainCart {
            id: self.id,
            seller_id: self.seller_id,
            buyer_phone: self.buyer_phone,
            items: items.into_iter().map(DomainCartItem::from).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<CartItem> for DomainCartItem {
    fn from(value: CartItem) -> Self {
        Self {
            id: value.id,
            cart_id: value.cart_id,
            product_id: value.product_id,
            quantity: value.quantity,
            price_at_add_cents: value.price_at_add_cents,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

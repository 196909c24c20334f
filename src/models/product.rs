use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, PriceTier as DomainPriceTier, Product as DomainProduct,
    UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub seller_id: i32,
    pub name: String,
    pub slug: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub product_type: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub base_price_cents: i64,
    pub currency: String,
    pub stock: i32,
    pub minimum_order_quantity: i32,
    pub is_archived: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::price_tiers)]
#[diesel(belongs_to(Product, foreign_key = product_id))]
pub struct PriceTier {
    pub id: i32,
    pub product_id: i32,
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
    pub price_cents: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub seller_id: i32,
    pub name: &'a str,
    /// Final slug, already made unique within the seller's catalog.
    pub slug: &'a str,
    pub sku: Option<&'a str>,
    pub description: Option<&'a str>,
    pub brand: Option<&'a str>,
    pub product_type: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub video_url: Option<&'a str>,
    pub base_price_cents: i64,
    pub currency: &'a str,
    pub stock: i32,
    pub minimum_order_quantity: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::price_tiers)]
pub struct NewPriceTier {
    pub product_id: i32,
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
    pub price_cents: i64,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
pub struct UpdateProduct<'a> {
    pub name: Option<&'a str>,
    pub sku: Option<Option<&'a str>>,
    pub description: Option<Option<&'a str>>,
    pub brand: Option<Option<&'a str>>,
    pub product_type: Option<Option<&'a str>>,
    pub image_url: Option<Option<&'a str>>,
    pub video_url: Option<Option<&'a str>>,
    pub base_price_cents: Option<i64>,
    pub stock: Option<i32>,
    pub minimum_order_quantity: Option<i32>,
    pub is_archived: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            seller_id: value.seller_id,
            name: value.name,
            slug: value.slug,
            sku: value.sku,
            description: value.description,
            brand: value.brand,
            product_type: value.product_type,
            image_url: value.image_url,
            video_url: value.video_url,
            base_price_cents: value.base_price_cents,
            currency: value.currency,
            stock: value.stock,
            minimum_order_quantity: value.minimum_order_quantity,
            is_archived: value.is_archived,
            price_tiers: Vec::new(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<PriceTier> for DomainPriceTier {
    fn from(value: PriceTier) -> Self {
        Self {
            id: value.id,
            product_id: value.product_id,
            min_quantity: value.min_quantity,
            max_quantity: value.max_quantity,
            price_cents: value.price_cents,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            seller_id: value.seller_id,
            name: value.name.as_str(),
            slug: value.slug.as_str(),
            sku: value.sku.as_deref(),
            description: value.description.as_deref(),
            brand: value.brand.as_deref(),
            product_type: value.product_type.as_deref(),
            image_url: value.image_url.as_deref(),
            video_url: value.video_url.as_deref(),
            base_price_cents: value.base_price_cents,
            currency: value.currency.as_str(),
            stock: value.stock,
            minimum_order_quantity: value.minimum_order_quantity,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            name: value.name.as_deref(),
            sku: value.sku.as_ref().map(|sku| sku.as_deref()),
            description: value
                .description
                .as_ref()
                .map(|description| description.as_deref()),
            brand: value.brand.as_ref().map(|brand| brand.as_deref()),
            product_type: value
                .product_type
                .as_ref()
                .map(|product_type| product_type.as_deref()),
            image_url: value.image_url.as_ref().map(|url| url.as_deref()),
            video_url: value.video_url.as_ref().map(|url| url.as_deref()),
            base_price_cents: value.base_price_cents,
            stock: value.stock,
            minimum_order_quantity: value.minimum_order_quantity,
            is_archived: value.is_archived,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

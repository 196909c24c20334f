use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::promotion::{
    DiscountType, NewPromotion as DomainNewPromotion, Promotion as DomainPromotion,
    UpdatePromotion as DomainUpdatePromotion,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::promotions)]
pub struct Promotion {
    pub id: i32,
    pub seller_id: i32,
    pub name: String,
    pub discount_type: String,
    pub discount_value: i64,
    pub apply_to_all: bool,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::promotion_products)]
#[diesel(belongs_to(Promotion, foreign_key = promotion_id))]
pub struct PromotionProduct {
    pub id: i32,
    pub promotion_id: i32,
    pub product_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::promotions)]
pub struct NewPromotion<'a> {
    pub seller_id: i32,
    pub name: &'a str,
    pub discount_type: &'a str,
    pub discount_value: i64,
    pub apply_to_all: bool,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::promotion_products)]
pub struct NewPromotionProduct {
    pub promotion_id: i32,
    pub product_id: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::promotions)]
pub struct UpdatePromotion<'a> {
    pub name: Option<&'a str>,
    pub discount_type: Option<&'a str>,
    pub discount_value: Option<i64>,
    pub apply_to_all: Option<bool>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub is_active: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl Promotion {
    /// Attach the product set and convert into the domain shape.
    ///
    /// The `discount_type` column is only ever written through
    /// [`DiscountType::as_str`], so an unknown value can only come from a
    /// manual edit; it degrades to an absolute discount of the stored value.
    pub fn into_domain(self, product_ids: Vec<i32>) -> DomainPromotion {
        DomainPromotion {
            id: self.id,
            seller_id: self.seller_id,
            name: self.name,
            discount_type: DiscountType::parse(&self.discount_type)
                .unwrap_or(DiscountType::Absolute),
            discount_value: self.discount_value,
            apply_to_all: self.apply_to_all,
            product_ids,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewPromotion> for NewPromotion<'a> {
    fn from(value: &'a DomainNewPromotion) -> Self {
        Self {
            seller_id: value.seller_id,
            name: value.name.as_str(),
            discount_type: value.discount_type.as_str(),
            discount_value: value.discount_value,
            apply_to_all: value.apply_to_all,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
        }
    }
}

impl<'a> From<&'a DomainUpdatePromotion> for UpdatePromotion<'a> {
    fn from(value: &'a DomainUpdatePromotion) -> Self {
        Self {
            name: value.name.as_deref(),
            discount_type: value
                .discount_type
                .as_ref()
                .map(|discount_type| discount_type.as_str()),
            discount_value: value.discount_value,
            apply_to_all: value.apply_to_all,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            is_active: value.is_active,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

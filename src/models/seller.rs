use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::seller::{
    NewSeller as DomainNewSeller, Seller as DomainSeller, SellerFlags as DomainSellerFlags,
    UpdateSeller as DomainUpdateSeller,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sellers)]
pub struct Seller {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub slug: String,
    pub store_name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub role: String,
    pub is_approved: bool,
    pub is_active: bool,
    pub broadcasts_enabled: bool,
    pub trial_ends_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sellers)]
pub struct NewSeller<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone: &'a str,
    pub slug: &'a str,
    pub store_name: &'a str,
    pub description: Option<&'a str>,
    pub trial_ends_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::sellers)]
pub struct UpdateSeller<'a> {
    pub name: Option<&'a str>,
    pub store_name: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub phone: Option<&'a str>,
    pub logo_url: Option<&'a str>,
    pub banner_url: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::sellers)]
pub struct SellerFlags {
    pub is_approved: Option<bool>,
    pub is_active: Option<bool>,
    pub broadcasts_enabled: Option<bool>,
    pub updated_at: NaiveDateTime,
}

impl From<Seller> for DomainSeller {
    fn from(value: Seller) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            password_hash: value.password_hash,
            phone: value.phone,
            slug: value.slug,
            store_name: value.store_name,
            description: value.description,
            logo_url: value.logo_url,
            banner_url: value.banner_url,
            role: value.role,
            is_approved: value.is_approved,
            is_active: value.is_active,
            broadcasts_enabled: value.broadcasts_enabled,
            trial_ends_at: value.trial_ends_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewSeller> for NewSeller<'a> {
    fn from(value: &'a DomainNewSeller) -> Self {
        Self {
            name: value.name.as_str(),
            email: value.email.as_str(),
            password_hash: value.password_hash.as_str(),
            phone: value.phone.as_str(),
            slug: value.slug.as_str(),
            store_name: value.store_name.as_str(),
            description: value.description.as_deref(),
            trial_ends_at: value.trial_ends_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateSeller> for UpdateSeller<'a> {
    fn from(value: &'a DomainUpdateSeller) -> Self {
        Self {
            name: value.name.as_deref(),
            store_name: value.store_name.as_deref(),
            description: value
                .description
                .as_ref()
                .map(|description| description.as_deref()),
            phone: value.phone.as_deref(),
            logo_url: value.logo_url.as_deref(),
            banner_url: value.banner_url.as_deref(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl From<&DomainSellerFlags> for SellerFlags {
    fn from(value: &DomainSellerFlags) -> Self {
        Self {
            is_approved: value.is_approved,
            is_active: value.is_active,
            broadcasts_enabled: value.broadcasts_enabled,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

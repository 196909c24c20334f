use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::subscriber::{NewSubscriber as DomainNewSubscriber, Subscriber as DomainSubscriber};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::subscribers)]
pub struct Subscriber {
    pub id: i32,
    pub seller_id: i32,
    pub phone: String,
    pub name: Option<String>,
    pub is_opted_in: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::subscribers)]
pub struct NewSubscriber<'a> {
    pub seller_id: i32,
    pub phone: &'a str,
    pub name: Option<&'a str>,
}

impl From<Subscriber> for DomainSubscriber {
    fn from(value: Subscriber) -> Self {
        Self {
            id: value.id,
            seller_id: value.seller_id,
            phone: value.phone,
            name: value.name,
            is_opted_in: value.is_opted_in,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewSubscriber> for NewSubscriber<'a> {
    fn from(value: &'a DomainNewSubscriber) -> Self {
        Self {
            seller_id: value.seller_id,
            phone: value.phone.as_str(),
            name: value.name.as_deref(),
        }
    }
}

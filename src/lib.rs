pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod forms;
pub mod models;
pub mod normalize;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
pub mod whatsapp;

/// Role carried by seller accounts in their access token.
pub const SELLER_ROLE: &str = "seller";
/// Role required for the admin panel endpoints.
pub const ADMIN_ROLE: &str = "admin";

/// Days of feature access granted to a freshly registered seller.
pub const TRIAL_DAYS: i64 = 14;

pub mod analytics;
pub mod broadcast;
pub mod cart;
pub mod product;
pub mod promotion;
pub mod seller;
pub mod subscriber;

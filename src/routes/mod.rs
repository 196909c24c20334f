use actix_web::HttpResponse;
use serde_json::json;

use crate::services::ServiceError;

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod broadcasts;
pub mod cart;
pub mod media;
pub mod products;
pub mod promotions;
pub mod storefront;

/// Map a service error to its JSON error response.
pub(crate) fn error_response(error: ServiceError) -> HttpResponse {
    match &error {
        ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(json!({"error": "unauthorized"}))
        }
        ServiceError::Forbidden(message) => {
            HttpResponse::Forbidden().json(json!({"error": message}))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({"error": "not found"})),
        ServiceError::Conflict(message) => {
            HttpResponse::Conflict().json(json!({"error": message}))
        }
        ServiceError::Form(message) => HttpResponse::BadRequest().json(json!({"error": message})),
        ServiceError::Internal(message) => {
            log::error!("internal error: {message}");
            HttpResponse::InternalServerError().json(json!({"error": "internal server error"}))
        }
    }
}

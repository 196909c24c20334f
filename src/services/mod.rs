use thiserror::Error;

use crate::repository::RepositoryError;

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod broadcasts;
pub mod cart;
pub mod feed;
pub mod products;
pub mod promotions;
pub mod storefront;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the service layer, mapped to HTTP statuses by routes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or insufficient credentials.
    #[error("unauthorized")]
    Unauthorized,
    /// Authenticated but not allowed, e.g. an unapproved or expired account.
    #[error("{0}")]
    Forbidden(String),
    /// The addressed entity does not exist.
    #[error("not found")]
    NotFound,
    /// A uniqueness or state conflict.
    #[error("{0}")]
    Conflict(String),
    /// A request payload failed validation.
    #[error("{0}")]
    Form(String),
    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<tera::Error> for ServiceError {
    fn from(error: tera::Error) -> Self {
        ServiceError::Internal(format!("template rendering failed: {error}"))
    }
}

/// Format paise as a rupee amount with two decimals, e.g. `129.50`.
pub fn format_rupees(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_rupees_pads_paise() {
        assert_eq!(format_rupees(12_950), "129.50");
        assert_eq!(format_rupees(500), "5.00");
        assert_eq!(format_rupees(7), "0.07");
    }
}

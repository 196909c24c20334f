//! Bearer-token authentication for API routes.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, error::ErrorUnauthorized, web};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;

/// Lifetime of an issued access token.
const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried by a seller or admin access token.
///
/// Extractable in any handler; extraction fails with `401 Unauthorized` when
/// the `Authorization: Bearer` header is missing or the token is invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Subject, the seller's email address.
    pub sub: String,
    /// Identifier of the seller row this token belongs to.
    pub seller_id: i32,
    /// Either [`crate::SELLER_ROLE`] or [`crate::ADMIN_ROLE`].
    pub role: String,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn new(seller_id: i32, email: impl Into<String>, role: impl Into<String>) -> Self {
        let exp = (Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;
        Self {
            sub: email.into(),
            seller_id,
            role: role.into(),
            exp,
        }
    }

    /// Sign the claims into a compact JWT.
    pub fn to_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify a compact JWT and return its claims.
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

/// `true` when the claims carry the expected role.
pub fn check_role(expected: &str, user: &AuthenticatedUser) -> bool {
    user.role == expected
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let config = match req.app_data::<web::Data<ServerConfig>>() {
            Some(config) => config,
            None => return ready(Err(ErrorUnauthorized("server configuration missing"))),
        };

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match token {
            Some(token) => match Self::from_token(token, &config.secret) {
                Ok(claims) => ready(Ok(claims)),
                Err(_) => ready(Err(ErrorUnauthorized("invalid token"))),
            },
            None => ready(Err(ErrorUnauthorized("missing bearer token"))),
        }
    }
}

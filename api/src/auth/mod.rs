use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use common::{models::UserId, Error as DomainError};
use futures::future::{err, ok, Ready};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

mod middleware;
mod password;

pub use middleware::AuthenticationMiddleware;
pub use password::{hash_password, verify_password};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub exp: usize,  // Expiration timestamp
    pub iat: usize,  // Issued at timestamp
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: u64,
}

/// Verified caller identity, available to every handler behind
/// `AuthenticationMiddleware`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Claims are put there by the auth middleware
        let user_id = req
            .extensions()
            .get::<Claims>()
            .and_then(|claims| claims.sub.parse::<UserId>().ok());

        match user_id {
            Some(user_id) => ok(AuthenticatedUser { user_id }),
            None => err(ApiError::from(DomainError::Unauthenticated(
                "User not authenticated".to_string(),
            ))
            .into()),
        }
    }
}

pub fn create_token(
    user_id: UserId,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, DomainError> {
    let now = Utc::now();
    let exp = i64::try_from(expiration_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            DomainError::Internal(format!("token lifetime {expiration_seconds}s out of range"))
        })?
        .timestamp() as usize;
    let iat = now.timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| DomainError::Internal(format!("Token creation error: {}", e)))
}

pub fn validate_token(token: &str, secret: &str) -> Result<Claims, DomainError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            DomainError::Unauthenticated("Token expired".to_string())
        }
        _ => DomainError::Unauthenticated("Invalid token".to_string()),
    })
}

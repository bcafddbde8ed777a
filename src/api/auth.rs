// Bearer-token authentication for API routes

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{types::ApiError, AppState};
use crate::config::AuthConfig;

/// Claims read from a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub exp: usize,
}

/// The caller behind a verified `Authorization: Bearer` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Verify `token` against the configured keys, RS256 key first.
///
/// Returns the `sub` claim, or `None` when no key accepts the token.
pub fn verify_token(auth: &AuthConfig, token: &str) -> Option<String> {
    if let Some(pem) = &auth.clerk_jwt_key {
        match DecodingKey::from_rsa_pem(pem.as_bytes()) {
            Ok(key) => match decode::<SessionClaims>(token, &key, &Validation::new(Algorithm::RS256)) {
                Ok(data) => return Some(data.claims.sub),
                Err(e) => debug!("RS256 token rejected: {}", e),
            },
            Err(e) => debug!("CLERK_JWT_KEY is not a valid RSA PEM key: {}", e),
        }
    }

    if let Some(secret) = &auth.jwt_secret {
        let key = DecodingKey::from_secret(secret.as_bytes());
        match decode::<SessionClaims>(token, &key, &Validation::new(Algorithm::HS256)) {
            Ok(data) => return Some(data.claims.sub),
            Err(e) => debug!("HS256 token rejected: {}", e),
        }
    }

    None
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        verify_token(&state.config.auth, token)
            .filter(|user_id| !user_id.is_empty())
            .map(|user_id| AuthenticatedUser { user_id })
            .ok_or(ApiError::Unauthorized)
    }
}

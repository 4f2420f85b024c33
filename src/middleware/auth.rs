use axum::{extract::FromRequestParts, http::header};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, state::AppState};

const TOKEN_TTL_HOURS: i64 = 24;

/// Establishment authenticated by a bearer token.
#[derive(Debug, Clone)]
pub struct AuthEstablishment {
    pub establishment_id: Uuid,
}

/// Sign a token for `establishment_id` (HS256).
pub fn issue_token(establishment_id: Uuid, secret: &str) -> jsonwebtoken::errors::Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: establishment_id.to_string(),
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the establishment id in `sub`.
///
/// A leading `Bearer ` is tolerated since that is how login hands tokens out.
pub fn verify_token(token: &str, secret: &str) -> Option<Uuid> {
    let token = token.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
    let decoded = match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::debug!(error = %err, "token validation failed");
            return None;
        }
    };
    Uuid::parse_str(&decoded.claims.sub).ok()
}

impl FromRequestParts<AppState> for AuthEstablishment {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::AuthTokenMissing)?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::AuthTokenInvalid)?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::AuthTokenInvalid);
        }

        let establishment_id =
            verify_token(auth_str, &state.jwt_secret).ok_or(AppError::AuthTokenInvalid)?;

        Ok(AuthEstablishment { establishment_id })
    }
}

use std::convert::Infallible;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::app::AppState;
use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Arc<Vec<u8>>,
    pub exp_hours: i64,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| AppError::configuration("JWT_SECRET not set"))?;
        let exp_hours = std::env::var("JWT_EXP_HOURS")
            .map(|val| val.parse::<i64>())
            .unwrap_or(Ok(24))
            .map_err(|_| AppError::configuration("JWT_EXP_HOURS must be a valid integer"))?;

        Ok(Self {
            secret: Arc::new(secret.into_bytes()),
            exp_hours,
        })
    }

    pub fn encode(&self, user_id: Uuid, role: &str) -> Result<String, AppError> {
        use chrono::{Duration, Utc};

        let now = Utc::now();
        let exp = now + Duration::hours(self.exp_hours);

        let claims = Claims {
            sub: user_id,
            role: role.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(&self.secret))
            .map_err(|err| AppError::token(err.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|err| AppError::token(err.to_string()))
    }
}

/// The `role` claim is carried as a raw string: tokens may outlive a role
/// rename, and normalization is the resolver's job.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Identity taken from a valid bearer token.
#[derive(Debug, Clone)]
pub struct ActorClaims {
    pub user_id: Uuid,
    pub role: String,
}

/// Lenient actor extractor.
///
/// An absent, malformed, or expired token yields `CurrentActor(None)` rather
/// than rejecting the request: decision endpoints answer for the anonymous
/// boundary instead of failing with 401.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Option<ActorClaims>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let actor = token
            .and_then(|token| state.jwt.decode(token).ok())
            .map(|claims| ActorClaims {
                user_id: claims.sub,
                role: claims.role,
            });

        Ok(CurrentActor(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &[u8]) -> JwtConfig {
        JwtConfig {
            secret: Arc::new(secret.to_vec()),
            exp_hours: 1,
        }
    }

    #[test]
    fn roundtrip_preserves_role_claim() {
        let config = config(b"sekret");
        let user_id = Uuid::new_v4();

        let token = config.encode(user_id, "almacen").unwrap();
        let claims = config.decode(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "almacen");
    }

    #[test]
    fn decode_rejects_foreign_signature() {
        let token = config(b"one").encode(Uuid::new_v4(), "admin").unwrap();
        assert!(config(b"two").decode(&token).is_err());
    }

    #[test]
    fn decode_rejects_expired_tokens() {
        let expired = JwtConfig {
            secret: Arc::new(b"sekret".to_vec()),
            exp_hours: -1,
        };

        let token = expired.encode(Uuid::new_v4(), "admin").unwrap();
        assert!(expired.decode(&token).is_err());
    }
}

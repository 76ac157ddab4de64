use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::db::models::User;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &User) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user.id,
            username: user.username.clone(),
            roles: user.roles.clone(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Password hashing error: {0}")]
    Hash(String),
}

/// Sign a token carrying the user's identity and roles.
pub fn generate_token(user: &User) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &Claims::new(user), &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Validate a token signature and expiry, returning its claims.
pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// One-way salted password hash. The cost factor is fixed by configuration.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let cost = config::config().security.bcrypt_cost;
    bcrypt::hash(password, cost).map_err(|e| AuthError::Hash(e.to_string()))
}

/// Check a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    // The config singleton snapshots the environment on first access, so the
    // secret must be in place before any test touches it.
    fn init_env() {
        INIT.call_once(|| {
            std::env::set_var("JWT_SECRET", "test-secret");
            let _ = config::config();
        });
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "dan".to_string(),
            password: String::new(),
            roles: vec!["Employee".to_string()],
            active: true,
        }
    }

    #[test]
    fn token_round_trip_preserves_claims() {
        init_env();
        let user = test_user();

        let token = generate_token(&user).unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "dan");
        assert_eq!(claims.roles, vec!["Employee".to_string()]);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn garbage_token_is_rejected() {
        init_env();
        assert!(matches!(
            verify_token("not.a.token"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn password_hash_round_trip() {
        init_env();
        let hash = hash_password("pw123456").unwrap();
        assert_ne!(hash, "pw123456");
        assert!(verify_password("pw123456", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}

//! Password hashing and bearer token handling

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
};

/// Hash verified when the login email is unknown, so both paths pay for one Argon2 run
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"not-a-real-password", &salt)
        .map(|h| h.to_string())
        .ok()
});

/// Claims carried by a bearer token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: i32,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct CredentialService {
    config: AuthConfig,
}

impl CredentialService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Hash a plaintext password with a fresh salt
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Check a plaintext password against a stored hash
    pub fn verify_password(&self, password: &str, stored: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Spend the same effort as a real verification; always fails
    pub fn verify_unknown(&self, password: &str) {
        if let Some(ref hash) = *DUMMY_HASH {
            let _ = self.verify_password(password, hash);
        }
    }

    /// Sign a token for the user, expiring after the configured number of hours
    pub fn issue_token(&self, user_id: i32, email: &str) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            user_id,
            email: email.to_string(),
            iat: now,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Decode and verify a token; every failure is the same authentication error
    pub fn validate_token(&self, token: &str) -> AppResult<TokenClaims> {
        decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::Authentication("Invalid or expired token".to_string())
        })
    }
}

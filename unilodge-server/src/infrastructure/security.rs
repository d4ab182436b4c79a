use std::sync::Arc;

use argon2::{
    Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::infrastructure::clock::{Clock, SystemClock};

/// Session lifetime. Fixed; not configurable per request.
pub const TOKEN_TTL_SECS: i64 = 3600;

// argon2id work factor
const ARGON2_MEMORY_KIB: u32 = 19 * 1024;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("token signature mismatch")]
    InvalidSignature,
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
}

/// The identity a verified token vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: Uuid,
    pub email: String,
}

#[async_trait]
pub trait TokenService: Send + Sync {
    async fn issue(&self, user_id: Uuid, email: &str) -> Result<String, TokenError>;
    async fn verify(&self, token: &str) -> Result<TokenIdentity, TokenError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Stateless HS256 tokens. Verification needs only the secret and the clock.
#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    clock: Arc<dyn Clock>,
}

impl JwtKeys {
    pub fn new(secret: String) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: String, clock: Arc<dyn Clock>) -> Self {
        Self { secret, clock }
    }

    pub fn generate_token(&self, user_id: Uuid, email: &str) -> Result<String, TokenError> {
        let iat = self.clock.now().timestamp();
        let claims = Claims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECS,
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        // expiry is checked below against the injected clock, with no leeway
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })?;

        if self.clock.now().timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}

#[async_trait]
impl TokenService for JwtKeys {
    async fn issue(&self, user_id: Uuid, email: &str) -> Result<String, TokenError> {
        self.generate_token(user_id, email)
    }

    async fn verify(&self, token: &str) -> Result<TokenIdentity, TokenError> {
        let claims = self.verify_token(token)?;
        let user_id = Uuid::parse_str(&claims.user_id).map_err(|_| TokenError::Malformed)?;
        Ok(TokenIdentity {
            user_id,
            email: claims.email,
        })
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_PARALLELISM, None)?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    // parameters come from the stored hash
    let argon2 = Argon2::default();
    Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}

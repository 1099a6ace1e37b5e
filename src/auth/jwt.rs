use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims issued by the authentication service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// authentication-service user id
    pub sub: Uuid,
    pub role: u8,
    pub exp: usize,
    pub jti: String,
}

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

/// Signs an access token the same way the authentication service does.
/// Used by operational tooling and tests.
pub fn generate_access_token(user_id: Uuid, role: u8, secret: &str, ttl: usize) -> Result<String, Error> {
    let claims = Claims {
        sub: user_id,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

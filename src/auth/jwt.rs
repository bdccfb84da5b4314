use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;

/// Tokens are valid for 8 hours from issue.
pub const TOKEN_TTL_SECS: usize = 8 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub jti: String,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
}

pub fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub fn generate_token(username: &str, config: &Config) -> Result<String, Error> {
    let claims = Claims {
        sub: username.to_string(),
        role: "Admin".to_string(),
        jti: Uuid::new_v4().to_string(),
        exp: now() + TOKEN_TTL_SECS,
        iss: config.jwt_issuer.clone(),
        aud: config.jwt_audience.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

/// Checks signature, issuer, audience and expiry with zero leeway.
pub fn verify_token(token: &str, config: &Config) -> Result<Claims, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[&config.jwt_issuer]);
    validation.set_audience(&[&config.jwt_audience]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

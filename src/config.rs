use anyhow::{Context, bail};
use dotenvy::dotenv;
use std::env;

/// Immutable process configuration, built once in `main` and shared through
/// `web::Data<Config>`.
#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let config = Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "employee-api".to_string()),
            jwt_audience: env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "employee-api-clients".to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        // HS256 needs a key of at least 256 bits.
        if self.jwt_secret.len() < 32 {
            bail!("JWT_SECRET must be at least 32 bytes");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret(secret: &str) -> Config {
        Config {
            server_addr: "127.0.0.1:0".to_string(),
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: secret.to_string(),
            jwt_issuer: "employee-api".to_string(),
            jwt_audience: "employee-api-clients".to_string(),
        }
    }

    #[test]
    fn rejects_short_signing_key() {
        assert!(config_with_secret("too-short").validate().is_err());
    }

    #[test]
    fn accepts_256_bit_signing_key() {
        assert!(
            config_with_secret("0123456789abcdef0123456789abcdef")
                .validate()
                .is_ok()
        );
    }
}

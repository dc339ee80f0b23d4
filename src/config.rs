use std::time::Duration;

use anyhow::{bail, Result};

use crate::mask::{is_valid_email, mask_secret};

#[derive(Clone, Debug)]
pub struct Config {
    // SendGrid
    pub sendgrid_api_key: String,
    pub sendgrid_from_name: String,
    pub sendgrid_from_email: String,

    // Catalog caching
    pub catalog_cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let sendgrid_api_key = env("SENDGRID_API_KEY", "");
        let sendgrid_from_name = env("SENDGRID_FROM_NAME", "Member Accounts");
        let sendgrid_from_email = env("SENDGRID_FROM_EMAIL", "no-reply@example.com");
        if !is_valid_email(&sendgrid_from_email) {
            bail!("SENDGRID_FROM_EMAIL is not a valid email address");
        }

        let catalog_cache_ttl = humantime::parse_duration(&env("CATALOG_CACHE_TTL", "1d"))?;

        Ok(Self { sendgrid_api_key, sendgrid_from_name, sendgrid_from_email, catalog_cache_ttl })
    }

    /// Log-safe rendering of the API key.
    pub fn sendgrid_masked_key(&self) -> String {
        mask_secret(&self.sendgrid_api_key, 3, 2)
    }
}

fn env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

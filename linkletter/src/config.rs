use crate::errors::{Error, Result};

use log::warn;
use std::env;
use std::time::Duration;
use store::DbConfig;

const DEFAULT_DB_PATH: &str = "./linkletter.db3";
const DEFAULT_DIGEST_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub mailgun_api_key: String,
    pub mailgun_domain: String,
    pub from_address: String,
    /// How often the digest pass runs when looping.
    pub digest_interval: Duration,
    pub send_timeout: Duration,
    /// Render digests and record sends without calling the mail gateway.
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        let db_path = env::var("LINKLETTER_DB").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

        let mailgun_api_key = env::var("MAILGUN_API_KEY").unwrap_or_default();
        let mailgun_domain = env::var("MAILGUN_DOMAIN").unwrap_or_default();
        let dry_run = mailgun_api_key.is_empty() || mailgun_domain.is_empty();
        if dry_run {
            warn!("MAILGUN_API_KEY / MAILGUN_DOMAIN not set, digests will not be delivered");
        }

        let from_address = env::var("DIGEST_FROM")
            .unwrap_or_else(|_| format!("LinkLetter <noreply@{mailgun_domain}>"));

        Ok(Config {
            db: DbConfig::new(db_path),
            mailgun_api_key,
            mailgun_domain,
            from_address,
            digest_interval: parse_env_duration("DIGEST_INTERVAL", DEFAULT_DIGEST_INTERVAL)?,
            send_timeout: parse_env_duration("SEND_TIMEOUT", DEFAULT_SEND_TIMEOUT)?,
            dry_run,
        })
    }
}

fn parse_env_duration(key: &str, default: Duration) -> Result<Duration> {
    match env::var(key) {
        Ok(raw) => humantime::parse_duration(&raw)
            .map_err(|e| Error::Internal(format!("invalid {key} \"{raw}\": {e}"))),
        Err(_) => Ok(default),
    }
}

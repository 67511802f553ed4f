use crate::config::Config;
use crate::errors::{Error, Result};

use async_trait::async_trait;
use log::debug;

/// The outbound email seam. The digest dispatcher only ever talks to
/// this trait, which keeps delivery mockable in tests and the gateway
/// swappable.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()>;
}

/// Mailgun's HTTP API. Every request is bounded by the configured
/// timeout; a timeout surfaces as a reqwest error and is treated like
/// any other delivery failure.
pub struct MailgunMailer {
    client: reqwest::Client,
    base_url: String,
    domain: String,
    api_key: String,
    from: String,
}

const MAILGUN_API: &str = "https://api.mailgun.net";

impl MailgunMailer {
    pub fn new(config: &Config) -> Result<MailgunMailer> {
        let client = reqwest::Client::builder()
            .timeout(config.send_timeout)
            .build()?;

        Ok(MailgunMailer {
            client,
            base_url: MAILGUN_API.to_string(),
            domain: config.mailgun_domain.clone(),
            api_key: config.mailgun_api_key.clone(),
            from: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Mailer for MailgunMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<()> {
        let url = format!("{}/v3/{}/messages", self.base_url, self.domain);
        let params = [
            ("from", self.from.as_str()),
            ("to", to),
            ("subject", subject),
            ("html", html),
        ];

        debug!("posting digest mail for {to} to {url}");
        let response = self
            .client
            .post(&url)
            .basic_auth("api", Some(&self.api_key))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Gateway(format!(
                "mail gateway returned {status}: {body}"
            )))
        }
    }
}

/// Drops every message on the floor; handy for dry runs without a
/// Mailgun account.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<()> {
        debug!("noop mailer dropping \"{subject}\" for {to}");
        Ok(())
    }
}

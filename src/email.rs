use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::config::Config;
use crate::platform::Mailer;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// [`Mailer`] backed by the SendGrid v3 HTTP API.
pub struct SendGridMailer {
    api_key: String,
    from_name: String,
    from_email: String,
    client: reqwest::Client,
}

impl SendGridMailer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            api_key: cfg.sendgrid_api_key.clone(),
            from_name: cfg.sendgrid_from_name.clone(),
            from_email: cfg.sendgrid_from_email.clone(),
            client: reqwest::Client::new(),
        }
    }
}

impl Mailer for SendGridMailer {
    async fn send(&self, to: &str, subject: &str, html: &str, plain: &str) -> Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );

        let payload = serde_json::json!({
            "personalizations": [{
                "to": [{"email": to}],
                "subject": subject
            }],
            "from": {"email": self.from_email, "name": self.from_name},
            "content": [
                {"type": "text/plain", "value": plain},
                {"type": "text/html", "value": html}
            ]
        });

        let res = self
            .client
            .post(SENDGRID_SEND_URL)
            .headers(headers)
            .body(payload.to_string())
            .send()
            .await
            .context("sendgrid request failed")?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        if !status.is_success() {
            anyhow::bail!("sendgrid error: status={} body={}", status, truncate(&body));
        }
        Ok(())
    }
}

fn truncate(s: &str) -> String {
    const MAX: usize = 512;
    match s.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

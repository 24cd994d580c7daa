//! Outbound transactional email.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::MailConfig;
use crate::domain::error::DomainError;

/// A single transactional email.
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Email delivery boundary.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug {
    async fn send(&self, message: &MailMessage) -> Result<(), DomainError>;

    fn is_enabled(&self) -> bool;

    fn name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

/// Sends mail through an HTTP mail API (Resend-style JSON endpoint).
#[derive(Debug)]
pub struct HttpApiMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpApiMailer {
    pub fn from_config(config: &MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        }
    }
}

#[async_trait]
impl Mailer for HttpApiMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), DomainError> {
        let request = SendRequest {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::mail(format!("Failed to reach mail API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::mail(format!(
                "Mail API returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "http-api"
    }
}

/// Drops every message. Used in tests and when mail is disabled in config.
#[derive(Debug, Default)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, _message: &MailMessage) -> Result<(), DomainError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "noop"
    }
}

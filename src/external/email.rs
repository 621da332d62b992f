use crate::config::EmailConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

/// Transactional email over a Resend-compatible JSON API.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    config: EmailConfig,
}

impl HttpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let body = SendEmailBody {
            from: &self.config.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            log::info!("Email '{}' sent to {}", message.subject, message.to);
            Ok(())
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            Err(AppError::ExternalApiError(format!(
                "Email API returned {status}: {error_text}"
            )))
        }
    }
}

/// Used when no API key is configured; only logs.
#[derive(Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        log::info!(
            "Email delivery disabled, skipping '{}' to {}",
            message.subject,
            message.to
        );
        Ok(())
    }
}

pub fn mailer_from_config(config: &EmailConfig) -> Arc<dyn Mailer> {
    if config.api_key.trim().is_empty() {
        log::warn!("EMAIL_API_KEY not set, emails will only be logged");
        Arc::new(LogMailer)
    } else {
        Arc::new(HttpMailer::new(config.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = SendEmailBody {
            from: "B&B <noreply@example.com>",
            to: ["guest@example.com"],
            subject: "Conferma",
            html: "<p>ciao</p>",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["to"][0], "guest@example.com");
        assert_eq!(value["subject"], "Conferma");
    }

    #[tokio::test]
    async fn test_log_mailer_never_fails() {
        let message = EmailMessage {
            to: "guest@example.com".to_string(),
            subject: "Test".to_string(),
            html: String::new(),
        };
        assert!(LogMailer.send(&message).await.is_ok());
    }
}
